//! TUI color semantics and style constants.
//!
//! Color semantics:
//! - Brand yellow: titles, the active choice, wizard boxes
//! - Red: errors and failed sends
//! - Green: success, the lines box
//! - Teal: captions and secondary hints
//! - Gray: instructions, placeholders, progress strip

use ratatui::style::{Color, Modifier, Style};

// ============================================================================
// PALETTE
// ============================================================================

pub const BRAND: Color = Color::Rgb(245, 158, 11);
pub const BRAND_LIGHT: Color = Color::Rgb(251, 191, 36);
pub const ACCENT: Color = Color::Rgb(255, 217, 61);
pub const WIZARD: Color = Color::Rgb(247, 189, 96);
pub const DANGER: Color = Color::Rgb(255, 107, 107);
pub const SAFE: Color = Color::Rgb(16, 185, 129);
pub const SAFE_DARK: Color = Color::Rgb(5, 150, 105);
pub const CAPTION: Color = Color::Rgb(149, 225, 211);
pub const MUTED: Color = Color::Rgb(156, 163, 175);
pub const SUBTLE: Color = Color::Rgb(107, 114, 128);

// ============================================================================
// SEMANTIC STYLES
// ============================================================================

/// Screen titles.
pub const STYLE_TITLE: Style = Style::new().fg(BRAND).add_modifier(Modifier::BOLD);

pub const STYLE_TAGLINE: Style = Style::new().fg(BRAND_LIGHT).add_modifier(Modifier::ITALIC);

/// Highlighted menu entry.
pub const STYLE_CURSOR: Style = Style::new().fg(BRAND).add_modifier(Modifier::BOLD);

pub const STYLE_CHOICE: Style = Style::new().fg(Color::Gray);

pub const STYLE_HELP: Style = Style::new().fg(SUBTLE);

/// Wizard headings and box borders.
pub const STYLE_WIZARD: Style = Style::new().fg(WIZARD).add_modifier(Modifier::BOLD);

/// Text the user typed.
pub const STYLE_INPUT: Style = Style::new().fg(Color::White).add_modifier(Modifier::BOLD);

pub const STYLE_PLACEHOLDER: Style = Style::new().fg(MUTED).add_modifier(Modifier::ITALIC);

pub const STYLE_INFO: Style = Style::new().fg(Color::White);

pub const STYLE_STEPS: Style = Style::new().fg(MUTED);

pub const STYLE_PROGRESS: Style = Style::new().fg(ACCENT);

pub const STYLE_CAPTION: Style = Style::new().fg(CAPTION);

pub const STYLE_DANGER: Style = Style::new().fg(DANGER).add_modifier(Modifier::BOLD);

pub const STYLE_SAFE: Style = Style::new().fg(SAFE);

pub const STYLE_SAFE_TITLE: Style = Style::new().fg(SAFE_DARK).add_modifier(Modifier::BOLD);

/// Big numbers (credit).
pub const STYLE_VALUE: Style = Style::new().fg(ACCENT).add_modifier(Modifier::BOLD);

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn semantic_styles_have_expected_colors() {
        assert_eq!(STYLE_TITLE.fg, Some(BRAND));
        assert_eq!(STYLE_DANGER.fg, Some(DANGER));
        assert_eq!(STYLE_SAFE.fg, Some(SAFE));
        assert_eq!(STYLE_CAPTION.fg, Some(CAPTION));
    }

    #[test]
    fn cursor_style_is_bold_brand() {
        assert_eq!(STYLE_CURSOR.fg, Some(BRAND));
        assert!(STYLE_CURSOR.add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn placeholders_are_italic() {
        assert!(STYLE_PLACEHOLDER.add_modifier.contains(Modifier::ITALIC));
    }
}
