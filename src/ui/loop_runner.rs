//! Terminal setup and the select loop driving the feed screens.
//!
//! One task owns `App`. Key presses, page and vocabulary results from
//! spawned loads, shutdown signals and a 250ms tick are all funnelled
//! through the `select!` below, so state is only ever mutated here.

use crate::app::{App, AppEvent};
use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout};
use std::time::Duration;
use tokio::sync::mpsc;

use super::events::handle_app_event;
use super::helpers::dispatch_page;
use super::input::handle_input;
use super::render::{render, SPINNER_FRAMES};

type Tui = Terminal<CrosstermBackend<Stdout>>;

const TICK: Duration = Duration::from_millis(250);

/// What the loop should do after a key press.
pub enum Action {
    Continue,
    /// Leave the loop and give the terminal back.
    Quit,
}

/// Run the UI until the user quits or the process is signalled.
///
/// The start screen's first page is requested before anything is drawn,
/// so the first frame already shows the loading state.
pub async fn run(
    app: &mut App,
    event_tx: mpsc::Sender<AppEvent>,
    mut event_rx: mpsc::Receiver<AppEvent>,
) -> Result<()> {
    install_panic_hook();

    let mut terminal = setup_terminal().context("Failed to set up terminal")?;
    let mut input = EventStream::new();
    let mut ticker = tokio::time::interval(TICK);
    let mut shutdown = ShutdownSignals::new()?;

    let start = app.active;
    let first = app.active_screen_mut().mount();
    dispatch_page(app, start, first, &event_tx);

    loop {
        if app.needs_redraw {
            terminal.draw(|f| render(f, app))?;
            app.needs_redraw = false;
        }

        // Results that piled up during a burst of key repeats are applied
        // before the next key is read.
        while let Ok(event) = event_rx.try_recv() {
            handle_app_event(app, event);
            app.needs_redraw = true;
        }

        tokio::select! {
            biased;

            name = shutdown.recv() => {
                tracing::info!(signal = name, "Shutting down");
                break;
            }

            maybe_event = input.next() => {
                let Some(event) = maybe_event else { break };
                match event {
                    Ok(event) => {
                        if let Action::Quit = on_terminal_event(app, event, &event_tx) {
                            break;
                        }
                    }
                    Err(e) => tracing::warn!(error = %e, "Terminal event stream error"),
                }
            }

            Some(event) = event_rx.recv() => {
                handle_app_event(app, event);
                app.needs_redraw = true;
            }

            _ = ticker.tick() => on_tick(app),
        }
    }

    restore_terminal(terminal)?;
    Ok(())
}

fn on_terminal_event(app: &mut App, event: Event, tx: &mpsc::Sender<AppEvent>) -> Action {
    match event {
        // Terminals reporting key releases would otherwise move twice.
        Event::Key(key) if key.kind == KeyEventKind::Release => Action::Continue,
        Event::Key(key) => {
            app.needs_redraw = true;
            handle_input(app, key.code, key.modifiers, tx)
        }
        Event::Resize(..) => {
            app.needs_redraw = true;
            Action::Continue
        }
        _ => Action::Continue,
    }
}

/// Expire the status message and keep the spinner moving while loading.
fn on_tick(app: &mut App) {
    if app.clear_expired_status() {
        app.needs_redraw = true;
    }
    if app.is_busy() {
        app.spinner_frame = (app.spinner_frame + 1) % SPINNER_FRAMES;
        app.needs_redraw = true;
    }
}

/// SIGTERM/SIGINT delivered from outside the terminal. In raw mode Ctrl+C
/// arrives as a key instead and is handled by `handle_input`.
struct ShutdownSignals {
    #[cfg(unix)]
    term: tokio::signal::unix::Signal,
    #[cfg(unix)]
    int: tokio::signal::unix::Signal,
}

impl ShutdownSignals {
    #[cfg(unix)]
    fn new() -> Result<Self> {
        use tokio::signal::unix::{signal, SignalKind};
        Ok(Self {
            term: signal(SignalKind::terminate()).context("Failed to install SIGTERM handler")?,
            int: signal(SignalKind::interrupt()).context("Failed to install SIGINT handler")?,
        })
    }

    #[cfg(not(unix))]
    fn new() -> Result<Self> {
        Ok(Self {})
    }

    /// Resolves with the signal name once one arrives.
    #[cfg(unix)]
    async fn recv(&mut self) -> &'static str {
        tokio::select! {
            _ = self.term.recv() => "SIGTERM",
            _ = self.int.recv() => "SIGINT",
        }
    }

    #[cfg(not(unix))]
    async fn recv(&mut self) -> &'static str {
        std::future::pending().await
    }
}

/// Leave raw mode and the alternate screen before the panic message prints.
fn install_panic_hook() {
    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        previous(info);
    }));
}

fn setup_terminal() -> Result<Tui> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    Ok(Terminal::new(CrosstermBackend::new(stdout))?)
}

fn restore_terminal(mut terminal: Tui) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}
