use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::app::App;
use crate::widget::WidgetState;

pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let mut spans = Vec::new();

    match app.widget.state() {
        WidgetState::Closed => {
            spans.push(hint("a", "open assistant"));
            spans.push(hint("q", "quit"));
        }
        WidgetState::OpenIdle => {
            spans.push(hint("enter", "send"));
            spans.push(hint("shift+enter", "newline"));
            spans.push(hint("tab", "shortcuts"));
            spans.push(hint("↑↓", "scroll"));
            spans.push(hint("esc", "close"));
        }
        WidgetState::OpenWaiting => {
            spans.push(hint("↑↓", "scroll"));
            spans.push(hint("esc", "close"));
        }
    }
    spans.push(hint("ctrl+c", "quit"));

    // Flash message
    if let Some((msg, _)) = &app.flash_message {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            msg,
            Style::default().fg(ratatui::style::Color::Yellow),
        ));
    }

    let line = Line::from(spans);
    let paragraph = Paragraph::new(line);
    f.render_widget(paragraph, area);
}

fn hint(key: &str, desc: &str) -> Span<'static> {
    Span::styled(
        format!(" {key}:{desc} "),
        Style::default().fg(ratatui::style::Color::DarkGray),
    )
}
