pub mod chat_panel;
pub mod footer;
pub mod input_bar;
pub mod page;
pub mod shortcut_bar;
pub mod theme;

use ratatui::{
    layout::{Constraint, Direction, Layout},
    Frame,
};

use crate::app::App;

pub fn render(f: &mut Frame, app: &App) {
    let size = f.area();

    if !app.widget.is_open() {
        let vertical = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(5), Constraint::Length(1)])
            .split(size);
        page::render(f, vertical[0], app);
        footer::render(f, vertical[1], app);
        return;
    }

    // Page header + chat + shortcuts + input + footer
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Min(8),
            Constraint::Length(2),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .split(size);

    page::render(f, vertical[0], app);
    chat_panel::render(f, vertical[1], app);
    shortcut_bar::render(f, vertical[2], app);
    input_bar::render(f, vertical[3], app);
    footer::render(f, vertical[4], app);
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use ratatui::{backend::TestBackend, Terminal};
    use tokio::sync::mpsc;

    use super::*;
    use crate::config::AppConfig;
    use crate::event::KeyAction;
    use crate::app::Action;
    use crate::responder::tests::MockResponder;
    use crate::responder::ChatReply;

    fn screen(app: &App) -> String {
        screen_sized(app, 100, 40)
    }

    fn screen_sized(app: &App, width: u16, height: u16) -> String {
        let backend = TestBackend::new(width, height);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| render(f, app)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|c| c.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn app() -> App {
        let (tx, _rx) = mpsc::unbounded_channel();
        let responder = MockResponder::replying(ChatReply::text("ok"));
        App::new(&AppConfig::default(), Arc::new(responder), tx)
    }

    #[tokio::test]
    async fn closed_shows_launcher() {
        let app = app();
        let text = screen(&app);
        assert!(text.contains("Press a to chat"));
        assert!(!text.contains("Practice Assistant"));
    }

    #[tokio::test]
    async fn open_shows_welcome_and_counter() {
        let mut app = app();
        app.update(Action::Key(KeyAction::Char('a')));
        app.update(Action::Key(KeyAction::Char('h')));
        let text = screen(&app);
        assert!(text.contains("Practice Assistant"));
        assert!(text.contains("practice assistant"));
        assert!(text.contains("Book appointment"));
        assert!(text.contains("1/500"));
    }

    #[tokio::test]
    async fn waiting_shows_typing_indicator_below_transcript() {
        let mut app = app();
        app.update(Action::Key(KeyAction::Char('a')));
        app.submit("What are your hours?");
        let text = screen(&app);
        assert!(text.contains("What are your hours?"));
        assert!(text.contains("assistant is typing"));
    }

    fn long_answer(tail: &str) -> String {
        format!("{}{tail}", "word ".repeat(120))
    }

    fn answer(app: &mut App, question: &str, reply: &str) {
        let turn = app.widget.begin_submit(question).unwrap();
        app.update(Action::AssistantReplied {
            ticket: turn.ticket,
            result: Ok(ChatReply::text(reply)),
        });
    }

    #[tokio::test]
    async fn wrapped_reply_scrolls_to_its_last_row() {
        let mut app = app();
        app.update(Action::Key(KeyAction::Char('a')));
        answer(&mut app, "Tell me about implants", &long_answer("NEWEST_TAIL_MARKER"));

        let text = screen_sized(&app, 60, 30);
        assert!(text.contains("NEWEST_TAIL_MARKER"), "newest reply cut off:\n{text}");
    }

    #[tokio::test]
    async fn typing_indicator_visible_after_long_transcript() {
        let mut app = app();
        app.update(Action::Key(KeyAction::Char('a')));
        answer(&mut app, "first", &long_answer("FIRST_END"));
        answer(&mut app, "second", &long_answer("SECOND_END"));
        app.widget.begin_submit("third").unwrap();

        let text = screen_sized(&app, 60, 30);
        assert!(text.contains("assistant is typing"), "indicator cut off:\n{text}");
        assert!(!text.contains("FIRST_END"));
    }

    #[tokio::test]
    async fn scrolling_back_reaches_the_welcome() {
        let mut app = app();
        app.update(Action::Key(KeyAction::Char('a')));
        answer(&mut app, "Tell me about implants", &long_answer("NEWEST_TAIL_MARKER"));
        app.scroll_back = 1_000;

        let text = screen_sized(&app, 60, 30);
        assert!(text.contains("practice assistant"));
        assert!(!text.contains("NEWEST_TAIL_MARKER"));
    }
}
