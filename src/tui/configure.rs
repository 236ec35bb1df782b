//! Configuration wizard: API key, then line number, then confirm.
//!
//! The wizard only collects text. Persisting it is the launcher's job once
//! `completed` is set.

use super::input::Draft;
use super::state::{Action, AppEvent, Size, Transition};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConfigStep {
    #[default]
    ApiKey,
    Line,
    Confirm,
}

impl ConfigStep {
    pub const ALL: [ConfigStep; 3] = [ConfigStep::ApiKey, ConfigStep::Line, ConfigStep::Confirm];

    pub fn label(self) -> &'static str {
        match self {
            ConfigStep::ApiKey => "API Key",
            ConfigStep::Line => "Line Number",
            ConfigStep::Confirm => "Confirm",
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigureState {
    pub api_key: Draft,
    pub line_number: Draft,
    pub step: ConfigStep,
    pub completed: bool,
    pub cancelled: bool,
    /// Inline validation message for the current step.
    pub hint: Option<&'static str>,
    pub size: Option<Size>,
}

impl ConfigureState {
    fn current_draft(&mut self) -> Option<&mut Draft> {
        match self.step {
            ConfigStep::ApiKey => Some(&mut self.api_key),
            ConfigStep::Line => Some(&mut self.line_number),
            ConfigStep::Confirm => None,
        }
    }
}

pub fn update(mut state: ConfigureState, event: &AppEvent) -> Transition<ConfigureState> {
    if state.completed || state.cancelled {
        return Transition::stay(state);
    }

    let AppEvent::Input(action) = event else {
        return Transition::stay(state);
    };

    if action.is_cancel() {
        state.cancelled = true;
        return Transition::stay(state);
    }

    match (state.step, action) {
        (ConfigStep::ApiKey, Action::Enter) => {
            if state.api_key.is_empty() {
                state.hint = Some("API key cannot be empty");
            } else {
                state.step = ConfigStep::Line;
                state.hint = None;
            }
        }
        (ConfigStep::Line, Action::Enter) => {
            if state.line_number.is_empty() {
                state.hint = Some("Line number cannot be empty");
            } else {
                state.step = ConfigStep::Confirm;
                state.hint = None;
            }
        }
        (ConfigStep::Confirm, Action::Enter) => state.completed = true,
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

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(mut state: ConfigureState, actions: impl IntoIterator<Item = Action>) -> ConfigureState {
        for action in actions {
            state = update(state, &AppEvent::Input(action)).screen;
        }
        state
    }

    fn typed(text: &str) -> Vec<Action> {
        text.chars().map(Action::Char).collect()
    }

    #[test]
    fn full_walkthrough_completes() {
        let mut actions = typed("abc123");
        actions.push(Action::Enter);
        actions.extend(typed("3000"));
        actions.push(Action::Enter);
        actions.push(Action::Enter);

        let state = feed(ConfigureState::default(), actions);

        assert!(state.completed);
        assert_eq!(state.api_key.as_str(), "abc123");
        assert_eq!(state.line_number.as_str(), "3000");
    }

    #[test]
    fn empty_step_blocks_with_hint() {
        let state = feed(ConfigureState::default(), [Action::Enter]);
        assert_eq!(state.step, ConfigStep::ApiKey);
        assert_eq!(state.hint, Some("API key cannot be empty"));

        let state = feed(state, [Action::Char('k')]);
        assert!(state.hint.is_none());
    }

    #[test]
    fn empty_line_blocks_confirm() {
        let mut actions = typed("key");
        actions.push(Action::Enter);
        actions.push(Action::Enter);
        let state = feed(ConfigureState::default(), actions);
        assert_eq!(state.step, ConfigStep::Line);
        assert_eq!(state.hint, Some("Line number cannot be empty"));
    }

    #[test]
    fn paste_overwrites_current_step_only() {
        let mut actions = typed("typed");
        actions.push(Action::Paste("pasted-key\r\n".into()));
        let state = feed(ConfigureState::default(), actions);
        assert_eq!(state.api_key.as_str(), "pasted-key");
        assert!(state.line_number.is_empty());
    }

    #[test]
    fn cancel_keys_cancel_at_any_step() {
        for action in [Action::Escape, Action::Char('q'), Action::Interrupt] {
            let mut actions = typed("key");
            actions.push(Action::Enter);
            actions.push(action);
            let state = feed(ConfigureState::default(), actions);
            assert!(state.cancelled);
            assert!(!state.completed);
        }
    }

    #[test]
    fn typing_on_confirm_changes_nothing() {
        let mut actions = typed("key");
        actions.push(Action::Enter);
        actions.extend(typed("1"));
        actions.push(Action::Enter);
        actions.extend(typed("zz"));
        let state = feed(ConfigureState::default(), actions);
        assert_eq!(state.step, ConfigStep::Confirm);
        assert_eq!(state.api_key.as_str(), "key");
        assert_eq!(state.line_number.as_str(), "1");
    }

    #[test]
    fn step_indices_follow_order() {
        let indices: Vec<usize> = ConfigStep::ALL.iter().map(|s| s.index()).collect();
        assert_eq!(indices, vec![0, 1, 2]);
    }
}
