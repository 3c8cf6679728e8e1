//! Aptime console entry point.

use aptime_core::RemoteData;
use aptime_tui::api_client::ApiClient;
use aptime_tui::config::TuiConfig;
use aptime_tui::error::TuiError;
use aptime_tui::events::TuiEvent;
use aptime_tui::logging::init_logging;
use aptime_tui::persistence;
use aptime_tui::state::App;
use aptime_tui::tasks::{spawn_command, Command};
use aptime_tui::views::render_view;
use crossterm::{
    event::{self, Event as CrosstermEvent},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

#[tokio::main]
async fn main() -> Result<(), TuiError> {
    let config = TuiConfig::load()?;
    init_logging(&config)?;
    let remote: Arc<dyn RemoteData> = Arc::new(ApiClient::new(&config)?);
    let mut app = App::new(config)?;
    match persistence::load(&app.config.persistence_path) {
        Ok(Some(state)) => app.restore(state),
        Ok(None) => {}
        Err(err) => tracing::warn!(error = %err, "ignoring unreadable saved state"),
    }

    let mut terminal = setup_terminal()?;
    let _guard = TerminalGuard;

    let (event_tx, mut event_rx) = mpsc::channel::<TuiEvent>(256);
    spawn_input_reader(event_tx.clone());

    let mut ticker = tokio::time::interval(app.config.tick_rate());

    loop {
        terminal.draw(|f| render_view(f, &app))?;

        tokio::select! {
            _ = ticker.tick() => {
                app.handle_event(TuiEvent::Tick);
            }
            Some(event) = event_rx.recv() => {
                if run_commands(&remote, &event_tx, app.handle_event(event)) {
                    break;
                }
            }
        }
    }

    if let Err(err) = persistence::save(&app.config.persistence_path, &app.persisted_state()) {
        tracing::warn!(error = %err, "failed to save state");
    }
    tracing::info!("exiting");

    Ok(())
}

/// Spawn background commands. Returns true when the app asked to quit.
fn run_commands(
    remote: &Arc<dyn RemoteData>,
    sender: &mpsc::Sender<TuiEvent>,
    commands: Vec<Command>,
) -> bool {
    let mut quit = false;
    for command in commands {
        if command == Command::Quit {
            quit = true;
            continue;
        }
        spawn_command(Arc::clone(remote), command, sender.clone());
    }
    quit
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>, TuiError> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    Ok(Terminal::new(backend)?)
}

struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let mut stdout = io::stdout();
        let _ = execute!(stdout, LeaveAlternateScreen);
    }
}

fn spawn_input_reader(sender: mpsc::Sender<TuiEvent>) {
    std::thread::spawn(move || loop {
        if let Ok(true) = event::poll(Duration::from_millis(200)) {
            if let Ok(evt) = event::read() {
                let sent = match evt {
                    CrosstermEvent::Key(key) => sender.blocking_send(TuiEvent::Input(key)),
                    CrosstermEvent::Resize(width, height) => {
                        sender.blocking_send(TuiEvent::Resize { width, height })
                    }
                    _ => Ok(()),
                };
                if sent.is_err() {
                    break;
                }
            }
        }
    });
}
