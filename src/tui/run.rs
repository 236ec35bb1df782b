//! TUI effects boundary: event loop, terminal lifecycle, key mapping and
//! effect execution.
//!
//! This is the only module with side effects. It wires the pure layers
//! (screens, launcher, view) to the real terminal via crossterm and ratatui.
//!
//! Architecture: one `tokio::select!` over two producers.
//! - crossterm's `EventStream`: keys, bracketed paste, resize
//! - an unbounded channel fed by spawned effect tasks
//!
//! Events are handled one at a time in arrival order; effects run
//! concurrently and never block input.

use std::io;
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{
    DisableBracketedPaste, EnableBracketedPaste, Event, EventStream, KeyCode, KeyEvent,
    KeyEventKind, KeyModifiers,
};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use futures::StreamExt;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use thiserror::Error;
use tokio::sync::mpsc;

use crate::api::{ApiError, SmsApi};

use super::input::{clean_paste, paste_request, Clipboard, SystemClipboard};
use super::launcher::Launcher;
use super::state::{Action, AppEvent, DashboardEvent, Effect, Exit, SendEvent, StartupEvent};
use super::view::render;

/// Startup animation interval.
pub const TICK_INTERVAL: Duration = Duration::from_millis(50);

#[derive(Debug, Error)]
pub enum RunError {
    #[error("terminal I/O error: {0}")]
    Io(#[from] io::Error),
}

// ============================================================================
// KEY MAPPING
// ============================================================================

/// What a key press asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyInput {
    Action(Action),
    /// Ctrl+V: read the clipboard.
    PasteRequest,
}

/// Map a crossterm key event to semantic input.
///
/// Only presses count; repeats and releases are dropped. Returns None for
/// keys that mean nothing anywhere.
pub fn map_key(key: KeyEvent) -> Option<KeyInput> {
    if key.kind != KeyEventKind::Press {
        return None;
    }

    // AltGr arrives as Ctrl+Alt on Windows and types a plain character.
    let chord = key.modifiers.contains(KeyModifiers::CONTROL)
        && !key.modifiers.contains(KeyModifiers::ALT);
    if chord {
        return match key.code {
            KeyCode::Char('c') => Some(KeyInput::Action(Action::Interrupt)),
            KeyCode::Char('v') => Some(KeyInput::PasteRequest),
            _ => None,
        };
    }

    let action = match key.code {
        KeyCode::Up => Action::Up,
        KeyCode::Down => Action::Down,
        KeyCode::Enter => Action::Enter,
        KeyCode::Backspace => Action::Backspace,
        KeyCode::Esc => Action::Escape,
        KeyCode::Char(c) => Action::Char(c),
        _ => return None,
    };
    Some(KeyInput::Action(action))
}

/// Turn a raw terminal event into an [`AppEvent`], reading the clipboard
/// when a paste is requested.
pub fn translate(event: Event, clipboard: &mut dyn Clipboard) -> Option<AppEvent> {
    match event {
        Event::Key(key) => match map_key(key)? {
            KeyInput::Action(action) => Some(AppEvent::Input(action)),
            KeyInput::PasteRequest => paste_request(clipboard).map(AppEvent::Input),
        },
        Event::Paste(text) if !clean_paste(&text).is_empty() => {
            Some(AppEvent::Input(Action::Paste(text)))
        }
        Event::Resize(width, height) => Some(AppEvent::Resize { width, height }),
        _ => None,
    }
}

// ============================================================================
// EFFECTS
// ============================================================================

fn no_client() -> ApiError {
    ApiError::Transport("no client configured".to_string())
}

/// Run one effect to completion and produce its tagged result event.
pub async fn execute(effect: Effect, api: Option<Arc<dyn SmsApi>>) -> AppEvent {
    match effect {
        Effect::Tick => {
            tokio::time::sleep(TICK_INTERVAL).await;
            AppEvent::Startup(StartupEvent::Tick)
        }
        Effect::FetchBalance => {
            let result = match api {
                Some(api) => api.balance().await,
                None => Err(no_client()),
            };
            AppEvent::Dashboard(DashboardEvent::Balance(result))
        }
        Effect::FetchLines => {
            let result = match api {
                Some(api) => api.lines().await,
                None => Err(no_client()),
            };
            AppEvent::Dashboard(DashboardEvent::Lines(result))
        }
        Effect::SubmitSend(request) => {
            let result = match api {
                Some(api) => api.send_bulk(&request).await,
                None => Err(no_client()),
            };
            AppEvent::Send(SendEvent::Delivered(result))
        }
    }
}

fn spawn_effect(
    effect: Effect,
    api: Option<Arc<dyn SmsApi>>,
    tx: &mpsc::UnboundedSender<AppEvent>,
) {
    let tx = tx.clone();
    tokio::spawn(async move {
        let event = execute(effect, api).await;
        // Receiver gone means the session is over.
        let _ = tx.send(event);
    });
}

// ============================================================================
// TERMINAL LIFECYCLE
// ============================================================================

fn setup_terminal() -> io::Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;
    io::stdout().execute(EnterAlternateScreen)?;
    io::stdout().execute(EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(io::stdout());
    Terminal::new(backend)
}

fn restore_terminal() -> io::Result<()> {
    io::stdout().execute(DisableBracketedPaste)?;
    io::stdout().execute(LeaveAlternateScreen)?;
    disable_raw_mode()
}

/// Install a panic hook that restores the terminal before printing the panic.
fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = restore_terminal();
        original_hook(panic_info);
    }));
}

// ============================================================================
// EVENT LOOP
// ============================================================================

/// Run the interactive session until a screen ends it.
pub async fn run(mut launcher: Launcher) -> Result<Exit, RunError> {
    install_panic_hook();
    let mut terminal = setup_terminal()?;

    let result = event_loop(&mut terminal, &mut launcher).await;

    restore_terminal()?;
    result
}

async fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    launcher: &mut Launcher,
) -> Result<Exit, RunError> {
    let (tx, mut rx) = mpsc::unbounded_channel::<AppEvent>();
    let mut events = EventStream::new();
    let mut clipboard = SystemClipboard::new();

    let (width, height) = crossterm::terminal::size()?;
    launcher.handle(AppEvent::Resize { width, height });
    for effect in launcher.init() {
        spawn_effect(effect, launcher.api(), &tx);
    }

    loop {
        terminal.draw(|frame| render(launcher.state(), frame))?;

        if let Some(exit) = launcher.exit() {
            return Ok(exit);
        }

        let event = tokio::select! {
            maybe_event = events.next() => match maybe_event {
                Some(Ok(event)) => translate(event, &mut clipboard),
                Some(Err(e)) => return Err(RunError::Io(e)),
                None => return Ok(Exit::Quit),
            },
            Some(event) = rx.recv() => Some(event),
        };

        let Some(event) = event else {
            continue;
        };

        for effect in launcher.handle(event) {
            tracing::debug!(?effect, "scheduling effect");
            spawn_effect(effect, launcher.api(), &tx);
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
