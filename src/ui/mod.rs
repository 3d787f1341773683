//! User interface components.
//!
//! Provides TUI widgets and drawing functions for the song list and player
//! views using ratatui.

mod player;
mod song_list;

pub use player::draw_player;
pub use song_list::draw_song_list;

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, AppMode};

/// Render the full application UI to the terminal frame.
pub fn draw(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),
            Constraint::Length(3), // Command/status bar at bottom
        ])
        .split(f.size());

    match app.mode {
        AppMode::SongList => draw_song_list(f, app, chunks[0]),
        AppMode::Player => draw_player(f, app, chunks[0]),
    }

    draw_command_bar(f, app, chunks[1]);

    if app.is_loading {
        draw_loading_indicator(f);
    }

    if let Some(notice) = app.player.as_ref().and_then(|p| p.notice()) {
        if app.mode == AppMode::Player {
            draw_modal(f, "Player", notice, Color::Cyan);
        }
    }

    // Draw error message if present (blocking)
    if let Some(error) = &app.error_message {
        draw_modal(f, "Error", error, Color::Red);
    }
}

fn draw_command_bar(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .title(Span::styled("Commands/Status", Style::default().fg(Color::Yellow)));

    f.render_widget(block, area);

    let inner_area = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1)])
        .margin(1) // Add a margin of 1 to account for the border
        .split(area)[0];

    let mut text = match app.mode {
        AppMode::SongList => create_help_text(&[
            ("Enter", "Play"),
            ("v", "View"),
            ("r", "Reload"),
            ("q", "Quit"),
        ]),
        AppMode::Player => {
            let can_jump = app.player.as_ref().is_some_and(|p| p.can_jump());
            create_help_text(&player_commands(can_jump))
        }
    };

    if let Some(status) = &app.status_message {
        text.push(Span::styled(format!(" | {status}"), Style::default().fg(Color::Gray)));
    }

    let status_bar = Paragraph::new(Line::from(text)).style(Style::default().fg(Color::Gray));
    f.render_widget(status_bar, inner_area);
}

/// Player key hints; the jump keys only show when the track length is known.
fn player_commands(can_jump: bool) -> Vec<(&'static str, &'static str)> {
    let mut commands = vec![("Space", "Play/Pause"), ("n/p", "Next/Prev"), ("←/→", "Seek")];
    if can_jump {
        commands.push(("0-9", "Jump"));
    }
    commands.push(("Esc", "Songs"));
    commands
}

/// Build styled help text spans from key-description pairs for the command bar.
pub fn create_help_text<'a>(commands: &[(&'a str, &'a str)]) -> Vec<Span<'a>> {
    let mut text = vec![Span::raw(" ")]; // Start with padding

    for (i, (key, description)) in commands.iter().enumerate() {
        text.push(Span::styled(*key, Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)));
        text.push(Span::raw(format!(": {description}")));

        if i < commands.len() - 1 {
            text.push(Span::raw(" | "));
        }
    }

    text
}

/// Create a bordered block with a title, highlighted when focused.
pub fn create_titled_block(title: &str, is_focused: bool) -> Block<'_> {
    let (title_style, border_style) = if is_focused {
        (
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            Style::default().fg(Color::Yellow),
        )
    } else {
        (Style::default(), Style::default())
    };

    Block::default()
        .title(Span::styled(title, title_style))
        .borders(Borders::ALL)
        .border_style(border_style)
}

/// Rectangle of the given size centered in `outer`.
fn centered(outer: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(outer.width);
    let height = height.min(outer.height);
    Rect {
        x: outer.x + (outer.width - width) / 2,
        y: outer.y + (outer.height - height) / 2,
        width,
        height,
    }
}

// Draw a loading indicator overlay
fn draw_loading_indicator(f: &mut Frame) {
    let area = centered(f.size(), 22, 3);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .style(Style::default().bg(Color::Black));

    let text = Paragraph::new("Loading...")
        .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center);

    f.render_widget(Clear, area);
    f.render_widget(block, area);

    let inner_area = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1)])
        .margin(1)
        .split(area)[0];

    f.render_widget(text, inner_area);
}

/// Draw a centered message box with a dismiss hint.
fn draw_modal(f: &mut Frame, title: &str, message: &str, color: Color) {
    let size = f.size();
    let area = centered(size, 50.min(size.width.saturating_sub(4)), 6);

    let block = Block::default()
        .title(Span::styled(title, Style::default().fg(color).add_modifier(Modifier::BOLD)))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color))
        .style(Style::default().bg(Color::Black));

    let text = Paragraph::new(message)
        .style(Style::default().fg(Color::White))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });

    f.render_widget(Clear, area);
    f.render_widget(block, area);

    let inner_area = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),    // message
            Constraint::Length(1), // hint
        ])
        .margin(1)
        .split(area);

    f.render_widget(text, inner_area[0]);

    let hint = Paragraph::new("Press any key to continue")
        .style(Style::default().fg(Color::Gray))
        .alignment(Alignment::Center);

    f.render_widget(hint, inner_area[1]);
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;

    #[test]
    fn test_jump_hint_needs_duration() {
        assert!(!player_commands(false).iter().any(|(key, _)| *key == "0-9"));
        assert!(player_commands(true).contains(&("0-9", "Jump")));
        assert_eq!(player_commands(true).last(), Some(&("Esc", "Songs")));
    }

    #[test]
    fn test_help_text_separates_commands() {
        let spans = create_help_text(&[("a", "One"), ("b", "Two")]);
        let text: String = spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(text, " a: One | b: Two");
    }
}
