//! Startup animation: a timer-driven progress bar.

use super::state::{AppEvent, Effect, Size, StartupEvent, Transition};

/// Percentage added per tick.
const PROGRESS_STEP: u8 = 2;

/// Status captions, one per 25% band.
const CAPTIONS: [&str; 4] = [
    "Loading...",
    "Connecting to SMS.ir...",
    "Preparing user interface...",
    "Almost ready!",
];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StartupState {
    /// 0..=100.
    pub progress: u8,
    pub completed: bool,
    /// Quit pressed: the whole program ends.
    pub quitting: bool,
    pub size: Option<Size>,
}

/// Kick off the first tick.
pub fn init() -> Vec<Effect> {
    vec![Effect::Tick]
}

impl StartupState {
    /// Caption for the current progress band; the last one once completed.
    pub fn caption(&self) -> &'static str {
        if self.completed {
            return CAPTIONS[CAPTIONS.len() - 1];
        }
        CAPTIONS[(self.progress as usize / 25) % CAPTIONS.len()]
    }
}

pub fn update(mut state: StartupState, event: &AppEvent) -> Transition<StartupState> {
    if state.completed || state.quitting {
        return Transition::stay(state);
    }

    match event {
        AppEvent::Startup(StartupEvent::Tick) => {
            state.progress = state.progress.saturating_add(PROGRESS_STEP).min(100);
            if state.progress == 100 {
                state.completed = true;
                Transition::stay(state)
            } else {
                Transition::with(state, vec![Effect::Tick])
            }
        }
        AppEvent::Input(action) if action.is_cancel() => {
            state.quitting = true;
            Transition::stay(state)
        }
        _ => Transition::stay(state),
    }
}

// ============================================================================
// TESTS
// ============================================================================
