use serde::{Deserialize, Serialize};
use std::fmt;

/// Longest user message accepted by the widget, in characters.
pub const MAX_INPUT_CHARS: usize = 500;

/// Number of prior transcript entries sent along with each new message.
pub const HISTORY_WINDOW: usize = 7;

pub const APPOINTMENT_PATH: &str = "/schedule#appointment";
pub const OFFICE_PHONE_HREF: &str = "tel:+16503266319";

pub const WELCOME_TEXT: &str = "Hi! I'm the practice assistant. I can help with office hours, \
insurance, new patient visits, and booking an appointment. What can I help you with?";

pub const FALLBACK_TEXT: &str = "Sorry, I'm having trouble answering right now. \
You can book an appointment online or call the office and our team will be happy to help.";

const WELCOME_PROMPTS: [&str; 3] = [
    "What are your hours?",
    "Do you accept my insurance?",
    "How do I book a cleaning?",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

impl ChatRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatRole::User => "user",
            ChatRole::Assistant => "assistant",
        }
    }
}

impl fmt::Display for ChatRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where the responder says an answer came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MessageSource {
    KnowledgeBase,
    Llm,
}

impl fmt::Display for MessageSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageSource::KnowledgeBase => f.write_str("knowledge-base"),
            MessageSource::Llm => f.write_str("llm"),
        }
    }
}

/// A labelled link attached to an assistant message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuickAction {
    pub label: String,
    pub href: String,
    #[serde(default)]
    pub external: bool,
}

impl QuickAction {
    pub fn internal(label: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            href: href.into(),
            external: false,
        }
    }

    pub fn external(label: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            href: href.into(),
            external: true,
        }
    }

    /// Whether activating this action leaves the app instead of navigating.
    pub fn leaves_app(&self) -> bool {
        is_external_href(&self.href)
    }

    /// `→` navigates inside the app, `↗` hands off to a new window or
    /// handler, `↪` leaves the app in place.
    pub fn marker(&self) -> &'static str {
        match (self.leaves_app(), self.external) {
            (false, _) => "→",
            (true, true) => "↗",
            (true, false) => "↪",
        }
    }
}

/// `true` for hrefs handled outside the app: web links, mail and phone.
pub fn is_external_href(href: &str) -> bool {
    href.starts_with("http") || href.starts_with("mailto:") || href.starts_with("tel:")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub id: String,
    pub role: ChatRole,
    pub content: String,
    pub source: Option<MessageSource>,
    pub actions: Vec<QuickAction>,
    pub suggested_prompts: Vec<String>,
    pub timestamp: String,
}

impl ChatMessage {
    pub fn user(id: String, text: impl Into<String>) -> Self {
        Self {
            id,
            role: ChatRole::User,
            content: text.into(),
            source: None,
            actions: Vec::new(),
            suggested_prompts: Vec::new(),
            timestamp: now(),
        }
    }

    pub fn assistant(
        id: String,
        text: impl Into<String>,
        source: Option<MessageSource>,
        actions: Vec<QuickAction>,
        suggested_prompts: Vec<String>,
    ) -> Self {
        Self {
            id,
            role: ChatRole::Assistant,
            content: text.into(),
            source,
            actions,
            suggested_prompts,
            timestamp: now(),
        }
    }

    pub fn welcome(id: String) -> Self {
        Self::assistant(
            id,
            WELCOME_TEXT,
            None,
            practice_actions(),
            WELCOME_PROMPTS.iter().map(|p| p.to_string()).collect(),
        )
    }

    /// The canned reply used whenever the responder can't be reached or
    /// answers with something unusable.
    pub fn fallback(id: String) -> Self {
        Self::assistant(id, FALLBACK_TEXT, None, practice_actions(), Vec::new())
    }

    pub fn to_history(&self) -> ChatHistoryMessage {
        ChatHistoryMessage {
            role: self.role,
            content: self.content.clone(),
        }
    }
}

/// Book-appointment and call-office links shared by the welcome and
/// fallback messages.
pub fn practice_actions() -> Vec<QuickAction> {
    vec![
        QuickAction::internal("Book appointment", APPOINTMENT_PATH),
        QuickAction::external("Call office", OFFICE_PHONE_HREF),
    ]
}

/// `{role, content}` pair sent to the responder as conversation context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatHistoryMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatHistoryMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }
}

/// Trim and cap user input. Returns `None` when nothing is left.
pub fn normalize_input(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.chars().take(MAX_INPUT_CHARS).collect::<String>().trim_end().to_string())
}

fn now() -> String {
    chrono::Local::now().format("%H:%M").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn external_href_boundaries() {
        assert!(is_external_href("tel:+16503266319"));
        assert!(!is_external_href("/schedule#appointment"));
        assert!(is_external_href("https://example.com"));
        assert!(is_external_href("mailto:a@b.com"));
    }

    #[test]
    fn external_href_is_prefix_only() {
        assert!(is_external_href("http://example.com"));
        assert!(!is_external_href("/go?to=https://example.com"));
        assert!(!is_external_href("TEL:123"));
        assert!(!is_external_href(""));
    }

    #[test]
    fn marker_uses_href_and_external_flag() {
        assert_eq!(QuickAction::internal("Book", "/schedule#appointment").marker(), "→");
        assert_eq!(QuickAction::external("Call", "tel:+16503266319").marker(), "↗");
        assert_eq!(QuickAction::internal("Email", "mailto:a@b.com").marker(), "↪");
        // the flag alone doesn't make a relative href leave the app
        assert_eq!(QuickAction::external("Blog", "/blog").marker(), "→");
    }

    #[test]
    fn fallback_has_fixed_actions() {
        let msg = ChatMessage::fallback("x".into());
        assert_eq!(msg.role, ChatRole::Assistant);
        assert_eq!(msg.content, FALLBACK_TEXT);
        assert_eq!(msg.source, None);
        assert!(msg.suggested_prompts.is_empty());
        let labels: Vec<&str> = msg.actions.iter().map(|a| a.label.as_str()).collect();
        assert_eq!(labels, ["Book appointment", "Call office"]);
        assert!(!msg.actions[0].leaves_app());
        assert!(msg.actions[1].leaves_app());
    }

    #[test]
    fn normalize_rejects_whitespace() {
        assert_eq!(normalize_input("   "), None);
        assert_eq!(normalize_input("\n\t"), None);
        assert_eq!(normalize_input("  hi  "), Some("hi".to_string()));
    }

    #[test]
    fn normalize_caps_length() {
        let long = "é".repeat(MAX_INPUT_CHARS + 20);
        let normalized = normalize_input(&long).unwrap();
        assert_eq!(normalized.chars().count(), MAX_INPUT_CHARS);
    }

    #[test]
    fn source_serializes_kebab_case() {
        let json = serde_json::to_string(&MessageSource::KnowledgeBase).unwrap();
        assert_eq!(json, "\"knowledge-base\"");
        let parsed: MessageSource = serde_json::from_str("\"llm\"").unwrap();
        assert_eq!(parsed, MessageSource::Llm);
    }

    #[test]
    fn action_external_defaults_false() {
        let action: QuickAction =
            serde_json::from_str(r#"{"label":"Hours","href":"/contact"}"#).unwrap();
        assert!(!action.external);
    }
}
