//! TUI module
//!
//! Terminal user interface for dockhand, built with ratatui. The loop is a
//! plain reducer: every input, timer and Docker result arrives as an
//! [`Event`] on one channel, [`reduce`] applies it to the [`App`], and the
//! commands it returns are handed to the scheduler.

pub mod app;
pub mod constants;
pub mod keybindings;
mod theme;
pub mod views;

pub use app::{App, Event, reduce};
pub use theme::Theme;

use crate::config::Config;
use crate::docker::ResourceClient;
use crate::groups::GroupStore;
use crate::runtime::Scheduler;
use anyhow::Result;
use constants::INPUT_POLL_MS;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Run the TUI until the user quits
pub async fn run_tui(
    client: Arc<dyn ResourceClient>,
    store: Arc<GroupStore>,
    config: Config,
    theme: Theme,
) -> Result<()> {
    tracing::debug!("Initializing TUI");

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    if config.ui.enable_mouse {
        execute!(stdout, EnableMouseCapture)?;
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let enable_mouse = config.ui.enable_mouse;
    let (tx, mut rx) = mpsc::unbounded_channel();
    let scheduler = Scheduler::new(tx.clone());
    let input = spawn_input_reader(tx, scheduler.token().child_token());

    let mut app = App::new(client, store, config, theme);
    scheduler.spawn_all(app.initial_commands());

    tracing::debug!("TUI initialized, entering main loop");

    let result = loop {
        if let Err(e) = terminal.draw(|f| app.render(f)) {
            break Err(e.into());
        }
        let Some(event) = rx.recv().await else {
            tracing::warn!("event channel closed");
            break Ok(());
        };
        let commands = reduce(&mut app, event);
        scheduler.spawn_all(commands);
        if app.should_quit() {
            break Ok(());
        }
    };

    tracing::debug!("TUI shutting down");
    app.shutdown();
    scheduler.shutdown().await;
    report_late_outcomes(&mut app, &mut rx);
    if let Err(e) = input.await {
        tracing::warn!("input reader ended abnormally: {}", e);
    }

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    if enable_mouse {
        execute!(terminal.backend_mut(), DisableMouseCapture)?;
    }
    terminal.show_cursor()?;

    result
}

/// Workflows left running at quit finish during shutdown; log how they ended
fn report_late_outcomes(app: &mut App, rx: &mut mpsc::UnboundedReceiver<Event>) {
    while let Ok(event) = rx.try_recv() {
        if !matches!(event, Event::OperationFinished { .. } | Event::Recreated { .. }) {
            continue;
        }
        reduce(app, event);
        if let Some(status) = app.status() {
            tracing::info!(error = status.is_error, "after quit: {}", status.message);
        }
    }
}

/// Forward key presses and resizes until `token` is cancelled. crossterm's
/// reader blocks, so it polls on a blocking thread.
fn spawn_input_reader(
    tx: mpsc::UnboundedSender<Event>,
    token: CancellationToken,
) -> tokio::task::JoinHandle<()> {
    tokio::task::spawn_blocking(move || {
        while !token.is_cancelled() {
            match event::poll(Duration::from_millis(INPUT_POLL_MS)) {
                Ok(false) => continue,
                Ok(true) => {}
                Err(e) => {
                    tracing::warn!("failed to poll terminal input: {}", e);
                    break;
                }
            }
            let forwarded = match event::read() {
                Ok(event::Event::Key(key)) if key.kind == KeyEventKind::Press => {
                    tx.send(Event::Input(key))
                }
                Ok(event::Event::Resize(width, height)) => tx.send(Event::Resize(width, height)),
                Ok(_) => Ok(()),
                Err(e) => {
                    tracing::warn!("failed to read terminal input: {}", e);
                    break;
                }
            };
            if forwarded.is_err() {
                break;
            }
        }
        tracing::debug!("input reader stopped");
    })
}
