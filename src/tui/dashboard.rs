//! Live dashboard: credit balance and sending lines, fetched concurrently.
//!
//! The two fetches land in any order. The screen reads as loading until
//! both have arrived. The first failure wins: it sets the error banner and
//! any result arriving after it is dropped until the user refreshes.

use crate::api::ApiError;

use super::state::{Action, AppEvent, DashboardEvent, Effect, Size, Transition};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardState {
    pub credit: Option<f64>,
    pub lines: Option<Vec<i64>>,
    pub error: Option<ApiError>,
    /// True while a fetch round is outstanding.
    pub refreshing: bool,
    pub quitting: bool,
    pub size: Option<Size>,
}

/// Both fetches, issued together.
pub fn init() -> Vec<Effect> {
    vec![Effect::FetchBalance, Effect::FetchLines]
}

impl DashboardState {
    /// A dashboard about to issue its first fetches.
    pub fn loading() -> Self {
        DashboardState {
            refreshing: true,
            ..Default::default()
        }
    }

    fn settle(&mut self) {
        self.refreshing = self.error.is_none() && (self.credit.is_none() || self.lines.is_none());
    }

    fn fail(&mut self, error: &ApiError) {
        tracing::warn!(error = %error, "dashboard fetch failed");
        self.error = Some(error.clone());
        self.refreshing = false;
    }
}

pub fn update(mut state: DashboardState, event: &AppEvent) -> Transition<DashboardState> {
    if state.quitting {
        return Transition::stay(state);
    }

    match event {
        AppEvent::Dashboard(_) if state.error.is_some() => {
            tracing::debug!("dropping dashboard result after earlier failure");
        }
        AppEvent::Dashboard(DashboardEvent::Balance(result)) => match result {
            Ok(credit) => {
                state.credit = Some(*credit);
                state.settle();
            }
            Err(e) => state.fail(e),
        },
        AppEvent::Dashboard(DashboardEvent::Lines(result)) => match result {
            Ok(lines) => {
                state.lines = Some(lines.clone());
                state.settle();
            }
            Err(e) => state.fail(e),
        },
        AppEvent::Input(Action::Char('r')) => {
            state.credit = None;
            state.lines = None;
            state.error = None;
            state.refreshing = true;
            return Transition::with(state, init());
        }
        AppEvent::Input(action) if action.is_quit() => state.quitting = true,
        _ => {}
    }
    Transition::stay(state)
}

// ============================================================================
// TESTS
// ============================================================================
