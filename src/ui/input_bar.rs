use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;
use crate::model::chat::MAX_INPUT_CHARS;

pub fn render(f: &mut Frame, area: Rect, app: &App) {
    if !app.widget.is_open() {
        return;
    }

    let input = app.widget.input();
    let len = input.chars().count();
    let waiting = app.widget.is_waiting();

    // Only the tail of the input that fits on one line
    let width = area.width.saturating_sub(3) as usize;
    let shown: String = input
        .chars()
        .skip(len.saturating_sub(width))
        .map(|c| if c == '\n' { '⏎' } else { c })
        .collect();

    let text_style = if waiting {
        Style::default().fg(ratatui::style::Color::DarkGray)
    } else {
        Style::default()
    };
    let line = if input.is_empty() {
        Line::from(Span::styled(
            "Ask about hours, insurance, appointments…",
            Style::default().fg(ratatui::style::Color::DarkGray),
        ))
    } else {
        Line::from(Span::styled(shown.clone(), text_style))
    };

    let counter_color = if len >= MAX_INPUT_CHARS {
        ratatui::style::Color::Red
    } else {
        ratatui::style::Color::DarkGray
    };
    let title = if waiting { " Message (waiting) " } else { " Message " };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(ratatui::style::Color::Yellow))
        .title(title)
        .title_bottom(
            Line::from(Span::styled(
                format!(" {len}/{MAX_INPUT_CHARS} "),
                Style::default().fg(counter_color),
            ))
            .right_aligned(),
        );

    let paragraph = Paragraph::new(line).block(block);
    f.render_widget(paragraph, area);

    // Position cursor
    let x = area.x + 1 + shown.chars().count() as u16;
    let y = area.y + 1;
    f.set_cursor_position((x.min(area.x + area.width.saturating_sub(2)), y));
}
