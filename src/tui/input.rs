//! Text drafts and clipboard access shared by the wizards.
//!
//! A [`Draft`] is raw user text held by one wizard step. It is edited by
//! character (never by byte), and a paste replaces it wholesale with the
//! pasted text minus line breaks.
//!
//! The clipboard itself is an effect. It sits behind the [`Clipboard`] trait
//! so the runtime can read it and hand the wizards a plain
//! [`Action::Paste`].

use thiserror::Error;

use super::state::Action;

// ============================================================================
// DRAFT
// ============================================================================

/// Unvalidated text typed into one wizard step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Draft(String);

impl Draft {
    pub fn new(text: impl Into<String>) -> Self {
        Draft(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Append one character.
    pub fn push(&mut self, c: char) {
        self.0.push(c);
    }

    /// Drop the last character (a whole `char`, so multi-byte text stays valid).
    pub fn backspace(&mut self) {
        self.0.pop();
    }

    /// Overwrite with pasted text, line breaks removed.
    ///
    /// Interior and surrounding spaces are kept. Pasting nothing (or only
    /// line breaks) leaves the draft untouched.
    pub fn paste(&mut self, raw: &str) {
        let cleaned = clean_paste(raw);
        if !cleaned.is_empty() {
            self.0 = cleaned;
        }
    }

    /// Apply a text-editing action. Returns false for non-editing actions.
    pub fn edit(&mut self, action: &Action) -> bool {
        match action {
            Action::Char(c) => self.push(*c),
            Action::Backspace => self.backspace(),
            Action::Paste(text) => self.paste(text),
            _ => return false,
        }
        true
    }
}

/// Strip every `\n` and `\r`.
pub fn clean_paste(raw: &str) -> String {
    raw.chars().filter(|c| !matches!(c, '\n' | '\r')).collect()
}

// ============================================================================
// CLIPBOARD
// ============================================================================

/// Failure reading the system clipboard. Never fatal.
#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("clipboard unavailable: {0}")]
    Unavailable(String),

    #[error("failed to read clipboard: {0}")]
    Read(String),
}

/// Read access to a clipboard.
pub trait Clipboard {
    fn read_all(&mut self) -> Result<String, ClipboardError>;
}

/// The OS clipboard, opened on first use.
#[derive(Default)]
pub struct SystemClipboard {
    inner: Option<arboard::Clipboard>,
}

impl SystemClipboard {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Clipboard for SystemClipboard {
    fn read_all(&mut self) -> Result<String, ClipboardError> {
        let opened = match self.inner.take() {
            Some(clipboard) => clipboard,
            None => arboard::Clipboard::new()
                .map_err(|e| ClipboardError::Unavailable(e.to_string()))?,
        };
        self.inner
            .insert(opened)
            .get_text()
            .map_err(|e| ClipboardError::Read(e.to_string()))
    }
}

/// Turn a paste key press into an [`Action::Paste`].
///
/// Empty clipboards and read errors produce nothing; errors are logged.
pub fn paste_request(clipboard: &mut dyn Clipboard) -> Option<Action> {
    match clipboard.read_all() {
        Ok(text) if !clean_paste(&text).is_empty() => Some(Action::Paste(text)),
        Ok(_) => None,
        Err(e) => {
            tracing::warn!(error = %e, "paste skipped");
            None
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    struct FakeClipboard(Result<String, ()>);

    impl Clipboard for FakeClipboard {
        fn read_all(&mut self) -> Result<String, ClipboardError> {
            self.0
                .clone()
                .map_err(|_| ClipboardError::Read("no owner".into()))
        }
    }

    #[test]
    fn push_then_backspace_round_trips_multibyte_text() {
        let mut draft = Draft::new("سلام ");
        let before = draft.clone();
        for c in "héllo 👋".chars() {
            draft.push(c);
        }
        for _ in "héllo 👋".chars() {
            draft.backspace();
        }
        assert_eq!(draft, before);
    }

    #[test]
    fn backspace_on_empty_is_noop() {
        let mut draft = Draft::default();
        draft.backspace();
        assert!(draft.is_empty());
    }

    #[test]
    fn paste_strips_line_breaks_only() {
        let mut draft = Draft::new("old");
        draft.paste("A\nB\r\n");
        assert_eq!(draft.as_str(), "AB");

        draft.paste("  spaced  out ");
        assert_eq!(draft.as_str(), "  spaced  out ");
    }

    #[test]
    fn paste_of_only_newlines_keeps_draft() {
        let mut draft = Draft::new("keep");
        draft.paste("\r\n\n");
        assert_eq!(draft.as_str(), "keep");
    }

    #[test]
    fn edit_ignores_navigation() {
        let mut draft = Draft::new("x");
        assert!(!draft.edit(&Action::Enter));
        assert!(!draft.edit(&Action::Up));
        assert!(draft.edit(&Action::Char('y')));
        assert_eq!(draft.as_str(), "xy");
    }

    #[test]
    fn paste_request_wraps_clipboard_text() {
        let mut clipboard = FakeClipboard(Ok("0912\n".into()));
        assert_eq!(
            paste_request(&mut clipboard),
            Some(Action::Paste("0912\n".into()))
        );
    }

    #[test]
    fn paste_request_skips_errors_and_empty_text() {
        assert_eq!(paste_request(&mut FakeClipboard(Err(()))), None);
        assert_eq!(paste_request(&mut FakeClipboard(Ok(String::new()))), None);
        assert_eq!(paste_request(&mut FakeClipboard(Ok("\n".into()))), None);
    }
}
