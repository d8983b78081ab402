use std::sync::Arc;
use std::time::Instant;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::config::AppConfig;
use crate::event::KeyAction;
use crate::model::chat::QuickAction;
use crate::responder::{ChatReply, Responder, ResponderError};
use crate::util::opener;
use crate::widget::capabilities::{CurrentPathProvider, Route, UuidIds};
use crate::widget::{AssistantWidget, PendingTurn, SubmitRejected};

#[derive(Debug)]
pub enum Action {
    Key(KeyAction),
    Tick,
    AssistantReplied {
        ticket: u64,
        result: Result<ChatReply, ResponderError>,
    },
    Quit,
}

/// Something on the latest assistant message the user can activate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shortcut {
    Prompt(String),
    Link(QuickAction),
}

pub struct App {
    pub widget: AssistantWidget,
    pub route: Route,
    pub focused_shortcut: Option<usize>,
    pub scroll_back: usize,
    pub spinner: usize,
    pub flash_message: Option<(String, Instant)>,
    pub should_quit: bool,
    pub action_tx: mpsc::UnboundedSender<Action>,
    open_external: bool,
    link_opener: LinkOpener,
    responder: Arc<dyn Responder>,
}

/// Hands an external href to the desktop.
pub type LinkOpener = Box<dyn Fn(&str) -> anyhow::Result<()>>;

impl App {
    pub fn new(
        config: &AppConfig,
        responder: Arc<dyn Responder>,
        action_tx: mpsc::UnboundedSender<Action>,
    ) -> Self {
        let route = Route::new(config.app.start_path.clone());
        let widget = AssistantWidget::new(Box::new(UuidIds), Box::new(route.clone()));

        Self {
            widget,
            route,
            focused_shortcut: None,
            scroll_back: 0,
            spinner: 0,
            flash_message: None,
            should_quit: false,
            action_tx,
            open_external: config.app.open_external,
            link_opener: Box::new(opener::open_external),
            responder,
        }
    }

    pub fn with_link_opener(mut self, link_opener: LinkOpener) -> Self {
        self.link_opener = link_opener;
        self
    }

    pub fn update(&mut self, action: Action) {
        // Clear flash message after 3 seconds
        if let Some((_, t)) = &self.flash_message {
            if t.elapsed().as_secs() >= 3 {
                self.flash_message = None;
            }
        }

        match action {
            Action::Key(key) => self.handle_key(key),
            Action::Tick => {
                if self.widget.is_waiting() {
                    self.spinner = self.spinner.wrapping_add(1);
                }
            }
            Action::AssistantReplied { ticket, result } => {
                if self.widget.complete(ticket, result) {
                    self.scroll_back = 0;
                    self.focused_shortcut = None;
                }
            }
            Action::Quit => {
                self.widget.shutdown();
                self.should_quit = true;
            }
        }
    }

    fn handle_key(&mut self, key: KeyAction) {
        if !self.widget.is_open() {
            match key {
                KeyAction::Char('a') | KeyAction::Enter => {
                    self.widget.open();
                    self.scroll_back = 0;
                }
                KeyAction::Char('q') => self.update(Action::Quit),
                _ => {}
            }
            return;
        }

        match key {
            KeyAction::Escape => {
                self.widget.close();
                self.focused_shortcut = None;
            }
            KeyAction::Enter => {
                if self.widget.input().trim().is_empty() {
                    if let Some(shortcut) = self.focused() {
                        self.activate(shortcut);
                    }
                    return;
                }
                match self.widget.begin_submit_input() {
                    Ok(turn) => self.spawn_exchange(turn),
                    Err(reason) => debug!(%reason, "submit rejected"),
                }
            }
            KeyAction::Char(c) => {
                self.focused_shortcut = None;
                if !self.widget.push_char(c) {
                    self.flash("Message limit reached");
                }
            }
            KeyAction::Backspace => self.widget.backspace(),
            KeyAction::Tab => self.cycle_focus(true),
            KeyAction::BackTab => self.cycle_focus(false),
            KeyAction::Up => self.scroll_back += 1,
            KeyAction::Down => self.scroll_back = self.scroll_back.saturating_sub(1),
        }
    }

    /// Suggested prompts first, then quick actions, all from the latest
    /// assistant message.
    pub fn shortcuts(&self) -> Vec<Shortcut> {
        let Some(latest) = self.widget.latest_assistant() else {
            return Vec::new();
        };
        latest
            .suggested_prompts
            .iter()
            .cloned()
            .map(Shortcut::Prompt)
            .chain(latest.actions.iter().cloned().map(Shortcut::Link))
            .collect()
    }

    fn focused(&self) -> Option<Shortcut> {
        self.focused_shortcut
            .and_then(|i| self.shortcuts().into_iter().nth(i))
    }

    fn cycle_focus(&mut self, forward: bool) {
        let count = self.shortcuts().len();
        if count == 0 {
            self.focused_shortcut = None;
            return;
        }
        self.focused_shortcut = Some(match (self.focused_shortcut, forward) {
            (None, true) => 0,
            (None, false) => count - 1,
            (Some(i), true) => (i + 1) % count,
            (Some(i), false) => (i + count - 1) % count,
        });
    }

    pub fn submit(&mut self, text: &str) {
        match self.widget.begin_submit(text) {
            Ok(turn) => self.spawn_exchange(turn),
            Err(SubmitRejected::Empty) => {}
            Err(reason) => debug!(%reason, "submit rejected"),
        }
    }

    fn spawn_exchange(&mut self, turn: PendingTurn) {
        self.focused_shortcut = None;
        self.scroll_back = 0;
        let responder = Arc::clone(&self.responder);
        let tx = self.action_tx.clone();
        let ticket = turn.ticket;
        let exchange = tokio::spawn(async move { turn.exchange(responder.as_ref()).await });
        tokio::spawn(async move {
            // A responder that panics still has to end the turn
            let result = match exchange.await {
                Ok(Some(result)) => result,
                Ok(None) => return,
                Err(e) => {
                    warn!(ticket, error = %e, "chat exchange task failed");
                    Err(ResponderError::Transport(format!("exchange task failed: {e}")))
                }
            };
            let _ = tx.send(Action::AssistantReplied { ticket, result });
        });
    }

    pub fn activate(&mut self, shortcut: Shortcut) {
        match shortcut {
            Shortcut::Prompt(prompt) => self.submit(&prompt),
            Shortcut::Link(action) if action.leaves_app() => {
                if !self.open_external {
                    self.flash(format!("{}: {}", action.label, action.href));
                    return;
                }
                match (self.link_opener)(&action.href) {
                    Ok(()) => {
                        info!(href = %action.href, "opened external link");
                        self.flash(format!("Opened {}", action.href));
                    }
                    Err(e) => {
                        warn!(href = %action.href, error = %e, "could not open external link");
                        self.flash(format!("{}: {}", action.label, action.href));
                    }
                }
            }
            Shortcut::Link(action) => {
                info!(from = %self.route.current_path(), to = %action.href, "navigating");
                self.route.navigate(&action.href);
                self.flash(format!("Navigated to {}", action.href));
            }
        }
        self.focused_shortcut = None;
    }

    fn flash(&mut self, msg: impl Into<String>) {
        self.flash_message = Some((msg.into(), Instant::now()));
    }
}
