//! Mode selector: a fixed menu navigated with arrows or j/k.

use super::state::{Action, AppEvent, Size, Transition};

/// One entry of the mode menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    Configure,
    Send,
    Dashboard,
    CommandLine,
}

impl Choice {
    /// Menu order.
    pub const ALL: [Choice; 4] = [
        Choice::Configure,
        Choice::Send,
        Choice::Dashboard,
        Choice::CommandLine,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Choice::Configure => "🔧 Configure API Key & Line Number",
            Choice::Send => "📤 Send SMS",
            Choice::Dashboard => "🎨 Interactive Dashboard",
            Choice::CommandLine => "💻 Command Line Mode",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Error,
}

/// One-line banner shown above the menu after returning to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
}

impl Notice {
    pub fn info(text: impl Into<String>) -> Self {
        Notice {
            kind: NoticeKind::Info,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Notice {
            kind: NoticeKind::Error,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorState {
    pub choices: Vec<Choice>,
    pub cursor: usize,
    /// Set by Enter; no further input is accepted afterwards.
    pub selected: Option<Choice>,
    pub quitting: bool,
    pub notice: Option<Notice>,
    pub size: Option<Size>,
}

impl Default for SelectorState {
    fn default() -> Self {
        SelectorState {
            choices: Choice::ALL.to_vec(),
            cursor: 0,
            selected: None,
            quitting: false,
            notice: None,
            size: None,
        }
    }
}

impl SelectorState {
    /// Fresh menu showing a banner.
    pub fn with_notice(notice: Option<Notice>) -> Self {
        SelectorState {
            notice,
            ..Default::default()
        }
    }
}

pub fn update(mut state: SelectorState, event: &AppEvent) -> Transition<SelectorState> {
    if state.selected.is_some() || state.quitting {
        return Transition::stay(state);
    }

    let AppEvent::Input(action) = event else {
        return Transition::stay(state);
    };

    match action {
        Action::Up | Action::Char('k') => {
            state.cursor = state.cursor.saturating_sub(1);
        }
        Action::Down | Action::Char('j') => {
            let last = state.choices.len().saturating_sub(1);
            state.cursor = (state.cursor + 1).min(last);
        }
        Action::Enter => {
            state.selected = state.choices.get(state.cursor).copied();
        }
        a if a.is_quit() => state.quitting = true,
        _ => {}
    }
    Transition::stay(state)
}

// ============================================================================
// TESTS
// ============================================================================
