//! TUI state algebra: pure types, zero effects.
//!
//! These types define the whole interactive state space. Screens and the
//! launcher program against them; the runtime only moves them around.
//!
//! Design principle: every screen keeps its own record inside [`AppState`].
//! Only the one named by [`AppState::active`] is live. Dormant records keep
//! their last values (notably their size) until the launcher replaces them
//! with a fresh instance.

use crate::api::ApiError;
use crate::types::{BulkSendRequest, SendReceipt};

use super::configure::ConfigureState;
use super::dashboard::DashboardState;
use super::selector::SelectorState;
use super::send::SendState;
use super::startup::StartupState;

// ============================================================================
// APP EVENTS
// ============================================================================

/// Everything the launcher can be handed by the event loop.
///
/// Two producers feed the loop:
/// - The terminal (keys, paste, resize) via crossterm's `EventStream`
/// - Spawned effect tasks, each resolving to exactly one tagged result
///
/// Result variants are tagged with the screen that issued them, so a result
/// arriving after that screen was left is ignored by whoever is active now.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// A semantic key press (or paste) from the terminal.
    Input(Action),
    /// The terminal was resized.
    Resize { width: u16, height: u16 },
    /// Result for the startup screen.
    Startup(StartupEvent),
    /// Result for the dashboard.
    Dashboard(DashboardEvent),
    /// Result for the send wizard.
    Send(SendEvent),
}

/// Startup animation timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartupEvent {
    Tick,
}

/// One of the dashboard's two independent fetches finished.
#[derive(Debug, Clone, PartialEq)]
pub enum DashboardEvent {
    Balance(Result<f64, ApiError>),
    Lines(Result<Vec<i64>, ApiError>),
}

/// The bulk send issued by the send wizard finished.
#[derive(Debug, Clone, PartialEq)]
pub enum SendEvent {
    Delivered(Result<SendReceipt, ApiError>),
}

// ============================================================================
// ACTIONS
// ============================================================================

/// Semantic user input, decoupled from raw key events.
///
/// The runtime maps key presses to Actions. What an Action means is decided
/// per screen: `Char('q')` quits everywhere, `Char('j')` only moves on the
/// selector and is plain text inside a wizard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Arrow up.
    Up,
    /// Arrow down.
    Down,
    Enter,
    Backspace,
    Escape,
    /// Ctrl+C.
    Interrupt,
    /// A printable character.
    Char(char),
    /// Text from the clipboard or a bracketed paste, uncleaned.
    Paste(String),
}

impl Action {
    /// `q` or Ctrl+C.
    pub fn is_quit(&self) -> bool {
        matches!(self, Action::Char('q') | Action::Interrupt)
    }

    /// Quit keys plus Esc.
    pub fn is_cancel(&self) -> bool {
        self.is_quit() || *self == Action::Escape
    }
}

// ============================================================================
// EFFECTS
// ============================================================================

/// Asynchronous work requested by a screen.
///
/// Pure code never executes these; it only describes them. The runtime
/// spawns each one and feeds its single result back as an [`AppEvent`].
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Wait one animation interval, then deliver [`StartupEvent::Tick`].
    Tick,
    /// Fetch the credit balance for the dashboard.
    FetchBalance,
    /// Fetch the line list for the dashboard.
    FetchLines,
    /// Submit a bulk send for the send wizard.
    SubmitSend(BulkSendRequest),
}

// ============================================================================
// TRANSITIONS
// ============================================================================

/// Result of a pure screen update: the next state plus any pending effects.
#[derive(Debug, PartialEq)]
pub struct Transition<S> {
    pub screen: S,
    pub effects: Vec<Effect>,
}

impl<S> Transition<S> {
    /// New state, nothing to run.
    pub fn stay(screen: S) -> Self {
        Transition {
            screen,
            effects: Vec::new(),
        }
    }

    /// New state plus effects to schedule.
    pub fn with(screen: S, effects: Vec<Effect>) -> Self {
        Transition { screen, effects }
    }
}

// ============================================================================
// APPLICATION STATE
// ============================================================================

/// Terminal dimensions in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Size {
    pub width: u16,
    pub height: u16,
}

/// Which screen is live.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ScreenId {
    #[default]
    Startup,
    Selector,
    Configure,
    Send,
    Dashboard,
}

/// How the interactive session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
    /// The user quit.
    Quit,
    /// The user picked command-line mode; the host prints its help.
    Help,
}

/// Root of the interactive state. Owned exclusively by the launcher.
#[derive(Debug, Default)]
pub struct AppState {
    pub active: ScreenId,
    /// Set once the session is over.
    pub exit: Option<Exit>,
    /// Last known terminal size.
    pub size: Option<Size>,
    pub startup: StartupState,
    pub selector: SelectorState,
    pub configure: ConfigureState,
    pub send: SendState,
    pub dashboard: DashboardState,
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_state_starts_on_startup() {
        let state = AppState::default();
        assert_eq!(state.active, ScreenId::Startup);
        assert!(state.exit.is_none());
        assert!(state.size.is_none());
    }

    #[test]
    fn quit_keys_are_q_and_interrupt() {
        assert!(Action::Char('q').is_quit());
        assert!(Action::Interrupt.is_quit());
        assert!(!Action::Char('Q').is_quit());
        assert!(!Action::Escape.is_quit());
    }

    #[test]
    fn escape_cancels_but_does_not_quit() {
        assert!(Action::Escape.is_cancel());
        assert!(Action::Char('q').is_cancel());
        assert!(!Action::Enter.is_cancel());
    }

    #[test]
    fn transition_stay_has_no_effects() {
        let t = Transition::stay(3);
        assert_eq!(t.screen, 3);
        assert!(t.effects.is_empty());
    }

    #[test]
    fn transition_with_carries_effects() {
        let t = Transition::with((), vec![Effect::FetchBalance, Effect::FetchLines]);
        assert_eq!(t.effects, vec![Effect::FetchBalance, Effect::FetchLines]);
    }
}
