use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::app::App;
use crate::model::chat::{ChatMessage, ChatRole};
use crate::ui::theme::{body_color, link_color, role_color, source_color, ACCENT};

pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let visible_height = area.height.saturating_sub(2) as usize;

    let mut all_lines: Vec<Line> = Vec::new();
    for msg in app.widget.messages() {
        push_message(&mut all_lines, msg);
    }

    // Loading indicator goes after the transcript, never in place of it
    if app.widget.is_waiting() {
        let dots = ".".repeat(app.spinner % 3 + 1);
        all_lines.push(Line::from(Span::styled(
            format!("  assistant is typing{dots}"),
            Style::default()
                .fg(ratatui::style::Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        )));
    }

    // Auto-scroll to bottom unless the user scrolled back. Offsets are in
    // wrapped rows, so long messages can't push the tail out of reach.
    let inner_width = area.width.saturating_sub(2);
    let total = Paragraph::new(all_lines.clone())
        .wrap(Wrap { trim: false })
        .line_count(inner_width);
    let max_back = total.saturating_sub(visible_height);
    let back = app.scroll_back.min(max_back);
    let offset = u16::try_from(max_back - back).unwrap_or(u16::MAX);

    let title = if back > 0 {
        format!(" Practice Assistant (↑{back}) ")
    } else {
        " Practice Assistant ".to_string()
    };

    let paragraph = Paragraph::new(all_lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(ACCENT))
                .title(title),
        )
        .wrap(Wrap { trim: false })
        .scroll((offset, 0));

    f.render_widget(paragraph, area);
}

fn push_message(lines: &mut Vec<Line<'static>>, msg: &ChatMessage) {
    let mut header_spans = vec![Span::styled(
        format!("{} ", msg.timestamp),
        Style::default().fg(ratatui::style::Color::DarkGray),
    )];

    let name = match msg.role {
        ChatRole::User => "you",
        ChatRole::Assistant => "assistant",
    };
    header_spans.push(Span::styled(
        name,
        Style::default()
            .fg(role_color(msg.role))
            .add_modifier(Modifier::BOLD),
    ));

    if let Some(source) = msg.source {
        header_spans.push(Span::styled(
            format!(" [{source}]"),
            Style::default().fg(source_color(source)),
        ));
    }
    lines.push(Line::from(header_spans));

    for text_line in msg.content.lines() {
        lines.push(Line::from(Span::styled(
            format!("  {text_line}"),
            Style::default().fg(body_color(msg.role)),
        )));
    }

    for action in &msg.actions {
        let leaves_app = action.leaves_app();
        lines.push(Line::from(vec![
            Span::styled(
                format!("  {} {}", action.marker(), action.label),
                Style::default()
                    .fg(link_color(leaves_app))
                    .add_modifier(Modifier::UNDERLINED),
            ),
            Span::styled(
                format!(" {}", action.href),
                Style::default().fg(ratatui::style::Color::DarkGray),
            ),
        ]));
    }

    // Blank line between messages
    lines.push(Line::raw(""));
}
