use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::debug;

use super::{ChatReply, ChatRequest, Responder, ResponderError};
use crate::config::ResponderConfig;

const CHAT_PATH: &str = "/api/chat";

/// Talks to the practice website's `/api/chat` endpoint.
pub struct HttpResponder {
    endpoint: String,
    client: reqwest::Client,
}

impl HttpResponder {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            endpoint: format!("{}{CHAT_PATH}", base_url.trim_end_matches('/')),
            client,
        })
    }

    pub fn from_config(cfg: &ResponderConfig) -> Result<Self> {
        Self::new(&cfg.base_url, Duration::from_secs(cfg.timeout_secs))
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

fn transport_error(e: reqwest::Error) -> ResponderError {
    if e.is_timeout() {
        ResponderError::Timeout
    } else {
        ResponderError::Transport(e.to_string())
    }
}

/// Accepts a body only if it is JSON with a string `message`; any other
/// field that fails to decode makes the whole reply unusable.
pub fn parse_reply(body: &[u8]) -> Result<ChatReply, ResponderError> {
    let value: serde_json::Value =
        serde_json::from_slice(body).map_err(|e| ResponderError::Malformed(e.to_string()))?;
    if !value.get("message").is_some_and(|m| m.is_string()) {
        return Err(ResponderError::Malformed("missing string `message`".into()));
    }
    serde_json::from_value(value).map_err(|e| ResponderError::Malformed(e.to_string()))
}

#[async_trait]
impl Responder for HttpResponder {
    fn name(&self) -> &str {
        "http"
    }

    async fn respond(&self, request: &ChatRequest) -> Result<ChatReply, ResponderError> {
        debug!(
            endpoint = %self.endpoint,
            history = request.history.len(),
            pathname = %request.pathname,
            "posting chat request"
        );
        let resp = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(transport_error)?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ResponderError::Status(status.as_u16()));
        }

        let body = resp.bytes().await.map_err(transport_error)?;
        parse_reply(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::chat::{ChatHistoryMessage, MessageSource};
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn request() -> ChatRequest {
        ChatRequest {
            message: "What are your hours?".into(),
            pathname: "/".into(),
            history: vec![ChatHistoryMessage::user("What are your hours?")],
        }
    }

    #[test]
    fn endpoint_joins_base_url() {
        let r = HttpResponder::new("http://localhost:3000/", Duration::from_secs(1)).unwrap();
        assert_eq!(r.endpoint(), "http://localhost:3000/api/chat");
    }

    #[test]
    fn parse_reply_requires_string_message() {
        assert!(matches!(
            parse_reply(br#"{"message": 42}"#),
            Err(ResponderError::Malformed(_))
        ));
        assert!(matches!(
            parse_reply(br#"{"actions": []}"#),
            Err(ResponderError::Malformed(_))
        ));
        assert!(matches!(parse_reply(b"not json"), Err(ResponderError::Malformed(_))));
    }

    #[test]
    fn parse_reply_rejects_partial_garbage() {
        let body = br#"{"message": "hi", "actions": "book now"}"#;
        assert!(matches!(parse_reply(body), Err(ResponderError::Malformed(_))));
    }

    #[test]
    fn parse_reply_reads_optional_fields() {
        let body = br#"{
            "message": "We're open.",
            "source": "knowledge-base",
            "suggestedPrompts": ["Where are you?"],
            "actions": [{"label": "Directions", "href": "https://maps.example.com", "external": true}]
        }"#;
        let reply = parse_reply(body).unwrap();
        assert_eq!(reply.source, Some(MessageSource::KnowledgeBase));
        assert_eq!(reply.suggested_prompts.unwrap(), vec!["Where are you?"]);
        assert!(reply.actions.unwrap()[0].external);
    }

    #[tokio::test]
    async fn posts_payload_and_decodes_reply() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .and(body_json(json!({
                "message": "What are your hours?",
                "pathname": "/",
                "history": [{"role": "user", "content": "What are your hours?"}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "message": "Mon-Thu 8-5.",
                "source": "llm"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let responder = HttpResponder::new(&server.uri(), Duration::from_secs(5)).unwrap();
        let reply = responder.respond(&request()).await.unwrap();
        assert_eq!(reply.message, "Mon-Thu 8-5.");
        assert_eq!(reply.source, Some(MessageSource::Llm));
        assert_eq!(reply.actions, None);
        server.verify().await;
    }

    #[tokio::test]
    async fn non_success_status_is_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .respond_with(ResponseTemplate::new(500).set_body_json(json!({"message": "oops"})))
            .mount(&server)
            .await;

        let responder = HttpResponder::new(&server.uri(), Duration::from_secs(5)).unwrap();
        let err = responder.respond(&request()).await.unwrap_err();
        assert!(matches!(err, ResponderError::Status(500)));
    }

    #[tokio::test]
    async fn slow_responder_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"message": "late"}))
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&server)
            .await;

        let responder = HttpResponder::new(&server.uri(), Duration::from_millis(200)).unwrap();
        let err = responder.respond(&request()).await.unwrap_err();
        assert!(matches!(err, ResponderError::Timeout));
    }

    #[tokio::test]
    async fn unreachable_server_is_transport_error() {
        let responder = HttpResponder::new("http://127.0.0.1:9", Duration::from_secs(2)).unwrap();
        let err = responder.respond(&request()).await.unwrap_err();
        assert!(matches!(
            err,
            ResponderError::Transport(_) | ResponderError::Timeout
        ));
    }
}
