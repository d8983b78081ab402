use anyhow::{bail, Result};

use crate::config::AppConfig;
use crate::model::chat::ChatMessage;
use crate::responder::http::HttpResponder;
use crate::responder::Responder;
use crate::widget::capabilities::{FixedPath, SequentialIds};
use crate::widget::{AssistantWidget, SubmitOutcome, SubmitRejected};

pub const USAGE: &str = "Usage:
  assistant                          start the chat in the terminal
  assistant ask <question> [-p <path>]  ask once and print the answer

Examples:
  assistant ask \"What are your hours?\"
  assistant ask Do you take emergencies? --path /services/emergency";

/// Ask a single question against the configured responder and print the answer.
pub async fn handle_ask(args: &[String], config: &AppConfig) -> Result<()> {
    let (question, path) = parse_ask_args(args)?;
    let path = path.unwrap_or_else(|| config.app.start_path.clone());

    let responder = HttpResponder::from_config(&config.responder)?;
    tracing::debug!(endpoint = responder.endpoint(), "using responder");

    let reply = ask_once(&question, &path, &responder).await?;
    println!("{}", format_reply(&reply));
    Ok(())
}

/// Run one turn on a fresh widget and return the assistant's message.
pub async fn ask_once(
    question: &str,
    path: &str,
    responder: &dyn Responder,
) -> Result<ChatMessage> {
    let mut widget = AssistantWidget::new(
        Box::new(SequentialIds::default()),
        Box::new(FixedPath(path.to_string())),
    );
    widget.open();

    match widget.submit(question, responder).await {
        SubmitOutcome::Answered | SubmitOutcome::FellBack => {}
        SubmitOutcome::Rejected(SubmitRejected::Empty) => bail!("Nothing to ask.\n\n{USAGE}"),
        SubmitOutcome::Rejected(reason) => bail!("Could not ask: {reason}"),
        SubmitOutcome::Discarded => bail!("The question was cancelled"),
    }

    match widget.messages().last() {
        Some(msg) => Ok(msg.clone()),
        None => bail!("No answer recorded"),
    }
}

pub fn format_reply(msg: &ChatMessage) -> String {
    let mut out = String::new();
    match msg.source {
        Some(source) => out.push_str(&format!("assistant [{source}]:\n")),
        None => out.push_str("assistant:\n"),
    }
    for line in msg.content.lines() {
        out.push_str(&format!("  {line}\n"));
    }
    for action in &msg.actions {
        out.push_str(&format!("  {} {}  {}\n", action.marker(), action.label, action.href));
    }
    if !msg.suggested_prompts.is_empty() {
        out.push_str("Try asking:\n");
        for prompt in &msg.suggested_prompts {
            out.push_str(&format!("  • {prompt}\n"));
        }
    }
    out.trim_end().to_string()
}

/// Parse `assistant ask` arguments into (question, optional page path).
///
/// Supported forms:
///   assistant ask "What are your hours?"
///   assistant ask What are your hours?
///   assistant ask "Parking?" -p /contact
///   assistant ask "Parking?" --path /contact
pub fn parse_ask_args(args: &[String]) -> Result<(String, Option<String>)> {
    if args.is_empty() {
        bail!("{USAGE}");
    }

    let mut question_parts: Vec<String> = Vec::new();
    let mut path: Option<String> = None;
    let mut i = 0;

    while i < args.len() {
        match args[i].as_str() {
            "-p" | "--path" => {
                i += 1;
                if i < args.len() {
                    path = Some(args[i].clone());
                } else {
                    bail!("Missing value for -p/--path flag");
                }
            }
            _ => {
                question_parts.push(args[i].clone());
            }
        }
        i += 1;
    }

    let question = question_parts.join(" ");
    if question.trim().is_empty() {
        bail!("Question cannot be empty");
    }

    Ok((question, path))
}
