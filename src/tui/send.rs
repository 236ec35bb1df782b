//! Send wizard: message, recipients, optional line, confirm, then the
//! remote send and its outcome.
//!
//! The wizard owns no client. Confirming emits [`Effect::SubmitSend`] and
//! waits for the matching [`SendEvent::Delivered`]; while that send is in
//! flight every key (quit included) is ignored.

use thiserror::Error;

use crate::api::ApiError;
use crate::types::{resolve_line, split_mobiles, BulkSendRequest, LineError, SendReceipt};

use super::input::Draft;
use super::state::{Action, AppEvent, Effect, SendEvent, Size, Transition};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SendStep {
    #[default]
    Message,
    Mobiles,
    Line,
    Confirm,
}

impl SendStep {
    pub const ALL: [SendStep; 4] = [
        SendStep::Message,
        SendStep::Mobiles,
        SendStep::Line,
        SendStep::Confirm,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SendStep::Message => "Message",
            SendStep::Mobiles => "Mobiles",
            SendStep::Line => "Line Number",
            SendStep::Confirm => "Confirm",
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

/// Why a send did not go through.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SendError {
    /// Rejected locally; nothing was sent.
    #[error(transparent)]
    Line(#[from] LineError),

    #[error(transparent)]
    Remote(#[from] ApiError),
}

/// Terminal result of the wizard.
#[derive(Debug, Clone, PartialEq)]
pub enum SendOutcome {
    Sent(SendReceipt),
    Failed(SendError),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SendState {
    pub message: Draft,
    pub mobiles: Draft,
    /// Empty means "use the configured line".
    pub line: Draft,
    pub step: SendStep,
    pub outcome: Option<SendOutcome>,
    pub in_flight: bool,
    pub quitting: bool,
    pub hint: Option<&'static str>,
    /// Line number from the credentials the wizard was opened with.
    pub default_line: String,
    pub size: Option<Size>,
}

impl SendState {
    pub fn new(default_line: impl Into<String>) -> Self {
        SendState {
            default_line: default_line.into(),
            ..Default::default()
        }
    }

    /// Line shown on the confirm step: typed, else configured, else "Not set".
    pub fn line_label(&self) -> &str {
        if !self.line.is_empty() {
            self.line.as_str()
        } else if !self.default_line.is_empty() {
            &self.default_line
        } else {
            "Not set"
        }
    }

    /// Recipients as they will be sent.
    pub fn recipients(&self) -> Vec<String> {
        split_mobiles(self.mobiles.as_str())
    }

    /// Build the request, or fail locally when no line can be resolved.
    pub fn request(&self) -> Result<BulkSendRequest, LineError> {
        let line = resolve_line(self.line.as_str(), &self.default_line)?;
        Ok(BulkSendRequest::new(
            line,
            self.message.as_str(),
            self.recipients(),
        ))
    }

    fn current_draft(&mut self) -> Option<&mut Draft> {
        match self.step {
            SendStep::Message => Some(&mut self.message),
            SendStep::Mobiles => Some(&mut self.mobiles),
            SendStep::Line => Some(&mut self.line),
            SendStep::Confirm => None,
        }
    }
}

pub fn update(mut state: SendState, event: &AppEvent) -> Transition<SendState> {
    if state.quitting {
        return Transition::stay(state);
    }

    match event {
        AppEvent::Send(SendEvent::Delivered(result)) => {
            if !state.in_flight {
                tracing::debug!("ignoring send result with no send in flight");
                return Transition::stay(state);
            }
            state.in_flight = false;
            state.outcome = Some(match result {
                Ok(receipt) => {
                    tracing::info!(pack_id = %receipt.pack_id, "send delivered");
                    SendOutcome::Sent(receipt.clone())
                }
                Err(e) => {
                    tracing::warn!(error = %e, "send failed");
                    SendOutcome::Failed(SendError::Remote(e.clone()))
                }
            });
            Transition::stay(state)
        }
        AppEvent::Input(action) => handle_input(state, action),
        _ => Transition::stay(state),
    }
}

fn handle_input(mut state: SendState, action: &Action) -> Transition<SendState> {
    if state.in_flight {
        return Transition::stay(state);
    }

    if state.outcome.is_some() {
        if action.is_cancel() {
            state.quitting = true;
        }
        return Transition::stay(state);
    }

    if action.is_cancel() {
        state.quitting = true;
        return Transition::stay(state);
    }

    match (state.step, action) {
        (SendStep::Message, Action::Enter) => {
            if state.message.is_empty() {
                state.hint = Some("Message cannot be empty");
            } else {
                state.step = SendStep::Mobiles;
                state.hint = None;
            }
        }
        (SendStep::Mobiles, Action::Enter) => {
            if state.mobiles.is_empty() {
                state.hint = Some("Enter at least one mobile number");
            } else {
                state.step = SendStep::Line;
                state.hint = None;
            }
        }
        (SendStep::Line, Action::Enter) => {
            let typed = state.line.as_str().trim();
            if !typed.is_empty() && typed.parse::<i64>().is_err() {
                state.hint = Some("Line number must be numeric");
            } else {
                state.step = SendStep::Confirm;
                state.hint = None;
            }
        }
        (SendStep::Confirm, Action::Enter) => match state.request() {
            Ok(request) => {
                state.in_flight = true;
                return Transition::with(state, vec![Effect::SubmitSend(request)]);
            }
            Err(e) => {
                tracing::warn!(error = %e, "send rejected before dispatch");
                state.outcome = Some(SendOutcome::Failed(SendError::Line(e)));
            }
        },
        (_, action) => {
            let edited = state.current_draft().is_some_and(|draft| draft.edit(action));
            if edited {
                state.hint = None;
            }
        }
    }
    Transition::stay(state)
}

// ============================================================================
// TESTS
// ============================================================================
