use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Gauge, Paragraph, Wrap},
    Frame,
};

use crate::app::App;
use crate::ui::create_titled_block;

/// Player view: header, credits, lyrics and progress bar.
pub fn draw_player(f: &mut Frame, app: &App, area: Rect) {
    let Some(player) = app.player.as_ref() else {
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // title, breadcrumb, cover
            Constraint::Min(3),    // credits + lyrics
            Constraint::Length(3), // progress
        ])
        .split(area);

    let title = if player.title().is_empty() { player.song().as_str() } else { player.title() };
    let header = vec![
        Line::from(Span::styled(
            title.to_string(),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![
            Span::styled("Songs > ", Style::default().fg(Color::Gray)),
            Span::raw(title.to_string()),
        ]),
    ];
    let header_block = create_titled_block(player.image().to_str().unwrap_or("cover"), false);
    f.render_widget(Paragraph::new(header).block(header_block), chunks[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
        .split(chunks[1]);

    let credits: Vec<Line> = player.credit_lines().into_iter().map(Line::from).collect();
    f.render_widget(
        Paragraph::new(credits)
            .block(create_titled_block("Credits", false))
            .wrap(Wrap { trim: true }),
        body[0],
    );

    let lyrics: Vec<Line> = player.lyric_lines().into_iter().map(Line::from).collect();
    f.render_widget(
        Paragraph::new(lyrics)
            .block(create_titled_block("Lyrics", true))
            .wrap(Wrap { trim: true })
            .scroll((app.lyrics_scroll, 0)),
        body[1],
    );

    let progress = player.progress();
    let label = format!("{} {} / {}", player.play_icon(), progress.current, progress.duration);
    let gauge = Gauge::default()
        .block(create_titled_block("Progress", false))
        .gauge_style(Style::default().fg(Color::LightBlue).bg(Color::Black))
        .ratio((progress.percent / 100.0).clamp(0.0, 1.0))
        .label(label);
    f.render_widget(gauge, chunks[2]);
}
