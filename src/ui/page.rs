use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::app::App;
use crate::model::chat::{APPOINTMENT_PATH, OFFICE_PHONE_HREF};
use crate::ui::theme::ACCENT;
use crate::widget::capabilities::CurrentPathProvider;

/// The page the assistant is sitting on top of.
pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let path = app.route.current_path();
    let mut lines = vec![
        Line::from(vec![
            Span::styled("Page: ", Style::default().fg(ratatui::style::Color::Gray)),
            Span::styled(path, Style::default().add_modifier(Modifier::BOLD)),
        ]),
        Line::from(vec![
            Span::styled("Book: ", Style::default().fg(ratatui::style::Color::Gray)),
            Span::styled(APPOINTMENT_PATH, Style::default().fg(ratatui::style::Color::Blue)),
            Span::styled("   Call: ", Style::default().fg(ratatui::style::Color::Gray)),
            Span::raw(OFFICE_PHONE_HREF.trim_start_matches("tel:")),
        ]),
    ];

    if !app.widget.is_open() {
        lines.push(Line::raw(""));
        let mut launcher = vec![Span::styled(
            " 💬 Questions? Press a to chat with us ",
            Style::default()
                .fg(ratatui::style::Color::Black)
                .bg(ACCENT)
                .add_modifier(Modifier::BOLD),
        )];
        if app.widget.is_waiting() {
            launcher.push(Span::styled(
                "  (answer on its way)",
                Style::default().fg(ratatui::style::Color::DarkGray),
            ));
        }
        lines.push(Line::from(launcher));
    }

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(ratatui::style::Color::Cyan))
                .title(" Dental Practice "),
        )
        .wrap(Wrap { trim: true });

    f.render_widget(paragraph, area);
}
