mod app;
mod cli;
mod config;
mod event;
mod logging;
mod model;
mod responder;
mod ui;
mod util;
mod widget;

use std::io;
use std::panic;
use std::sync::Arc;

use anyhow::Result;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::info;

use app::{Action, App};
use responder::http::HttpResponder;

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = config::load_config()?;

    match args.first().map(String::as_str) {
        Some("ask") => {
            logging::init_stderr_logging(&config.logging.level);
            return cli::handle_ask(&args[1..], &config).await;
        }
        Some("help") | Some("-h") | Some("--help") => {
            println!("{}", cli::USAGE);
            return Ok(());
        }
        Some(other) => {
            anyhow::bail!("Unknown command: {other}\n\n{}", cli::USAGE);
        }
        None => {}
    }

    let _log_guard = logging::init_file_logging(&config.logging.level)?;
    let responder = HttpResponder::from_config(&config.responder)?;
    info!(endpoint = responder.endpoint(), "starting practice assistant");

    // Set up action channel
    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<Action>();

    let mut app = App::new(&config, Arc::new(responder), action_tx.clone());

    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.hide_cursor()?;

    // Set up panic hook to restore terminal
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    // Spawn event reader
    let stop_events = CancellationToken::new();
    let event_tx = action_tx.clone();
    let event_stop = stop_events.clone();
    tokio::spawn(async move {
        event::run_event_loop(event_tx, event_stop).await;
    });

    // Main loop
    loop {
        terminal.draw(|f| ui::render(f, &app))?;

        if let Some(action) = action_rx.recv().await {
            app.update(action);
            if app.should_quit {
                break;
            }
        } else {
            break;
        }
    }

    stop_events.cancel();
    app.widget.shutdown();
    info!("practice assistant stopped");

    // Restore terminal
    terminal.show_cursor()?;
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;

    Ok(())
}
