use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, Paragraph, Wrap},
    Frame,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::app::App;
use crate::constants::ui as layout;
use crate::ui::create_titled_block;

/// Song cards on the left, details of the selected card on the right.
pub fn draw_song_list(f: &mut Frame, app: &mut App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(layout::SONG_LIST_PERCENT),
            Constraint::Percentage(100 - layout::SONG_LIST_PERCENT),
        ])
        .split(area);

    let selected = app.song_list_state.selected();
    let items: Vec<ListItem> = app
        .cards
        .iter()
        .enumerate()
        .map(|(i, card)| {
            let (prefix, text_style) = if Some(i) == selected {
                ("> ", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
            } else {
                ("  ", Style::default().fg(Color::White))
            };

            ListItem::new(Line::from(vec![
                Span::raw(prefix),
                Span::styled(truncate(&card.title, layout::MAX_TITLE_WIDTH), text_style),
            ]))
        })
        .collect();

    let title = format!("Songs ({})", app.cards.len());
    let list = List::new(items)
        .block(create_titled_block(&title, true))
        .highlight_style(Style::default().bg(Color::Rgb(80, 80, 120)).add_modifier(Modifier::BOLD));

    f.render_stateful_widget(list, chunks[0], &mut app.song_list_state);

    let details: Vec<Line> = app.selected_card().map_or_else(
        || vec![Line::from(Span::styled("No songs", Style::default().fg(Color::Gray)))],
        |card| {
            let mut lines = vec![
                Line::from(Span::styled(
                    card.title.clone(),
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(
                    format!("Cover: {}", card.image.display()),
                    Style::default().fg(Color::Gray),
                )),
                Line::from(""),
            ];
            lines.extend(card.credits_text.lines().map(|l| Line::from(l.to_string())));
            lines
        },
    );

    let panel = Paragraph::new(details)
        .block(create_titled_block("Details", false))
        .wrap(Wrap { trim: false });
    f.render_widget(panel, chunks[1]);
}

/// Cut `text` to `max` display columns, marking the cut with `...`.
fn truncate(text: &str, max: usize) -> String {
    if text.width() <= max {
        return text.to_string();
    }
    let budget = max.saturating_sub(3);
    let mut used = 0;
    let mut out = String::new();
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(c);
    }
    out.push_str("...");
    out
}
