use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
    Frame,
};

use crate::app::{App, Shortcut};
use crate::ui::theme::{link_color, ACCENT};

/// Suggested prompts and quick actions of the latest assistant message.
pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let shortcuts = app.shortcuts();
    if shortcuts.is_empty() || app.widget.is_waiting() {
        return;
    }

    let mut spans = Vec::new();
    for (i, shortcut) in shortcuts.iter().enumerate() {
        let focused = app.focused_shortcut == Some(i);
        let (text, color) = match shortcut {
            Shortcut::Prompt(prompt) => (format!(" {prompt} "), ACCENT),
            Shortcut::Link(action) => (
                format!(" {} {} ", action.marker(), action.label),
                link_color(action.leaves_app()),
            ),
        };
        let style = if focused {
            Style::default()
                .fg(ratatui::style::Color::Black)
                .bg(color)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(color)
        };
        spans.push(Span::styled(text, style));
        spans.push(Span::raw(" "));
    }

    let paragraph = Paragraph::new(Line::from(spans)).wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}
