use ratatui::style::Color;

use crate::model::chat::{ChatRole, MessageSource};

pub const ACCENT: Color = Color::Rgb(0x26, 0xA6, 0x9A);

pub fn role_color(role: ChatRole) -> Color {
    match role {
        ChatRole::User => Color::White,
        ChatRole::Assistant => ACCENT,
    }
}

pub fn body_color(role: ChatRole) -> Color {
    match role {
        ChatRole::User => Color::White,
        ChatRole::Assistant => Color::Rgb(0xCC, 0xCC, 0xCC),
    }
}

pub fn source_color(source: MessageSource) -> Color {
    match source {
        MessageSource::KnowledgeBase => Color::Green,
        MessageSource::Llm => Color::Rgb(0xCE, 0x93, 0xD8),
    }
}

pub fn link_color(leaves_app: bool) -> Color {
    if leaves_app {
        Color::Rgb(0x4F, 0xC3, 0xF7)
    } else {
        Color::Blue
    }
}
