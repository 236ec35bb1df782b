//! Pure rendering: map AppState to ratatui widget trees.
//!
//! Each screen has a dedicated render function and `render()` dispatches on
//! the active screen. Widget-building is pure (state in, widgets out); the
//! only effect is `Frame::render_widget()` writing to the terminal buffer.

use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Padding, Paragraph, Wrap};
use ratatui::Frame;

use crate::config::mask_secret;

use super::configure::{ConfigStep, ConfigureState};
use super::dashboard::DashboardState;
use super::input::Draft;
use super::selector::{NoticeKind, SelectorState};
use super::send::{SendOutcome, SendState, SendStep};
use super::startup::StartupState;
use super::state::{AppState, ScreenId, Size};
use super::theme;

const APP_TITLE: &str = "📱 SMS.ir CLI";
const TAGLINE: &str = "A simple message can connect worlds with a single command";

/// Cells in the startup progress bar.
const BAR_WIDTH: usize = 40;

/// Below this many rows the startup logo is skipped.
const LOGO_MIN_HEIGHT: u16 = 16;

const LOGO: [&str; 5] = [
    "╔══════════════════════════════════╗",
    "║        📱 SMS.ir CLI 📱          ║",
    "║                                  ║",
    "║    A simple message can ... 💬   ║",
    "╚══════════════════════════════════╝",
];

// ============================================================================
// DISPATCH
// ============================================================================

/// Render the active screen to the terminal frame.
pub fn render(state: &AppState, frame: &mut Frame) {
    let area = frame.area();
    match state.active {
        ScreenId::Startup => render_startup(&state.startup, frame, area),
        ScreenId::Selector => render_selector(&state.selector, frame, area),
        ScreenId::Configure => render_configure(&state.configure, frame, area),
        ScreenId::Send => render_send(&state.send, frame, area),
        ScreenId::Dashboard => render_dashboard(&state.dashboard, frame, area),
    }
}

// ============================================================================
// SHARED PIECES
// ============================================================================

/// `[████░░░░] 42%` for the given percentage.
pub fn progress_bar(percent: u8) -> String {
    let percent = percent.min(100) as usize;
    let filled = BAR_WIDTH * percent / 100;
    format!(
        "[{}{}] {}%",
        "█".repeat(filled),
        "░".repeat(BAR_WIDTH - filled),
        percent
    )
}

/// `✓ A → ✓ B → ○ C`: steps up to and including `current` are ticked.
pub fn step_strip(labels: &[&str], current: usize) -> String {
    labels
        .iter()
        .enumerate()
        .map(|(i, label)| {
            let mark = if i <= current { "✓" } else { "○" };
            format!("{} {}", mark, label)
        })
        .collect::<Vec<_>>()
        .join(" → ")
}

/// Horizontally centered box, four cells narrower than the terminal.
fn boxed_area(area: Rect, size: Option<Size>) -> Rect {
    let wanted = size.map_or(area.width, |s| s.width.saturating_sub(4));
    let width = wanted.min(area.width);
    Rect {
        x: area.x + (area.width - width) / 2,
        width,
        ..area
    }
}

fn rounded_box(border: Style) -> Block<'static> {
    Block::bordered()
        .border_type(BorderType::Rounded)
        .border_style(border)
        .padding(Padding::new(2, 2, 1, 1))
}

fn header(title: &str) -> Vec<Line<'static>> {
    vec![
        Line::from(Span::styled(title.to_string(), theme::STYLE_TITLE)),
        Line::from(Span::styled(TAGLINE, theme::STYLE_TAGLINE)),
    ]
}

fn draft_line(draft: &Draft, placeholder: &str) -> Line<'static> {
    if draft.is_empty() {
        Line::from(Span::styled(placeholder.to_string(), theme::STYLE_PLACEHOLDER))
    } else {
        Line::from(Span::styled(draft.as_str().to_string(), theme::STYLE_INPUT))
    }
}

fn hint_line(hint: Option<&str>) -> Line<'static> {
    match hint {
        Some(text) => Line::from(Span::styled(format!("⚠ {}", text), theme::STYLE_DANGER)),
        None => Line::from(""),
    }
}

/// Title strip, step strip, boxed body and instructions: the wizard frame.
fn render_wizard(
    title: &str,
    strip: String,
    body: Vec<Line<'static>>,
    instructions: &str,
    size: Option<Size>,
    frame: &mut Frame,
    area: Rect,
) {
    let chunks = Layout::vertical([
        Constraint::Length(2), // title
        Constraint::Length(2), // steps
        Constraint::Min(6),    // box
        Constraint::Length(1), // instructions
    ])
    .split(area);

    let title = Paragraph::new(Line::from(Span::styled(title.to_string(), theme::STYLE_WIZARD)))
        .centered();
    frame.render_widget(title, chunks[0]);

    let strip = Paragraph::new(Span::styled(strip, theme::STYLE_STEPS)).centered();
    frame.render_widget(strip, chunks[1]);

    let body = Paragraph::new(body)
        .block(rounded_box(Style::new().fg(theme::WIZARD)))
        .wrap(Wrap { trim: false });
    frame.render_widget(body, boxed_area(chunks[2], size));

    let help = Paragraph::new(Span::styled(instructions.to_string(), theme::STYLE_STEPS))
        .centered();
    frame.render_widget(help, chunks[3]);
}

// ============================================================================
// SCREEN: STARTUP
// ============================================================================

fn render_startup(state: &StartupState, frame: &mut Frame, area: Rect) {
    if state.quitting {
        frame.render_widget(Paragraph::new("Goodbye! 👋"), area);
        return;
    }

    let height = state.size.map_or(area.height, |s| s.height);
    let mut lines = Vec::new();

    if height >= LOGO_MIN_HEIGHT {
        lines.extend(
            LOGO.iter()
                .map(|row| Line::from(Span::styled(*row, theme::STYLE_TITLE))),
        );
        lines.push(Line::from(""));
    }

    lines.push(Line::from(Span::styled(TAGLINE, theme::STYLE_TAGLINE)));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        progress_bar(state.progress),
        theme::STYLE_PROGRESS,
    )));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(state.caption(), theme::STYLE_CAPTION)));

    let top = area.height.saturating_sub(lines.len() as u16) / 2;
    let body = Rect {
        y: area.y + top,
        height: area.height - top,
        ..area
    };
    frame.render_widget(Paragraph::new(lines).centered(), body);
}

// ============================================================================
// SCREEN: SELECTOR
// ============================================================================

fn render_selector(state: &SelectorState, frame: &mut Frame, area: Rect) {
    let mut lines = header(APP_TITLE);
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Use ↑/↓ or j/k to navigate • Press Enter to select • Press q or Ctrl+C to quit",
        theme::STYLE_HELP,
    )));
    lines.push(Line::from(""));

    if let Some(notice) = &state.notice {
        let style = match notice.kind {
            NoticeKind::Info => theme::STYLE_SAFE,
            NoticeKind::Error => theme::STYLE_DANGER,
        };
        lines.push(Line::from(Span::styled(notice.text.clone(), style)));
        lines.push(Line::from(""));
    }

    let mut choices = Vec::new();
    for (i, choice) in state.choices.iter().enumerate() {
        let (cursor, style) = if i == state.cursor {
            (">", theme::STYLE_CURSOR)
        } else {
            (" ", theme::STYLE_CHOICE)
        };
        choices.push(Line::from(Span::styled(
            format!("{} {}", cursor, choice.label()),
            style,
        )));
    }

    let chunks = Layout::vertical([
        Constraint::Length(lines.len() as u16),
        Constraint::Min(0),
    ])
    .split(area);

    frame.render_widget(Paragraph::new(lines).centered().wrap(Wrap { trim: false }), chunks[0]);
    frame.render_widget(Paragraph::new(choices), boxed_area(chunks[1], state.size));
}

// ============================================================================
// SCREEN: CONFIGURE
// ============================================================================

fn render_configure(state: &ConfigureState, frame: &mut Frame, area: Rect) {
    let labels: Vec<&str> = ConfigStep::ALL.iter().map(|s| s.label()).collect();
    let strip = step_strip(&labels, state.step.index());

    let body = match state.step {
        ConfigStep::ApiKey => vec![
            Line::from(Span::styled("Enter your SMS.ir API Key:", theme::STYLE_WIZARD)),
            Line::from(""),
            draft_line(&state.api_key, "Type here or press Ctrl+V to paste..."),
            Line::from(""),
            hint_line(state.hint),
        ],
        ConfigStep::Line => vec![
            Line::from(Span::styled("Enter your Line Number:", theme::STYLE_WIZARD)),
            Line::from(""),
            draft_line(&state.line_number, "Type here or press Ctrl+V to paste..."),
            Line::from(""),
            hint_line(state.hint),
        ],
        ConfigStep::Confirm => vec![
            Line::from(Span::styled("Confirm Configuration:", theme::STYLE_WIZARD)),
            Line::from(""),
            Line::from(Span::styled(
                format!("API Key: {}", mask_secret(state.api_key.as_str())),
                theme::STYLE_INFO,
            )),
            Line::from(Span::styled(
                format!("Line Number: {}", state.line_number.as_str()),
                theme::STYLE_INFO,
            )),
        ],
    };

    let instructions = match state.step {
        ConfigStep::Confirm => "Press Enter to save configuration • Press q or Ctrl+C to cancel",
        _ => "Type and press Enter to continue • Ctrl+V to paste • Esc to cancel",
    };

    render_wizard(
        "🔧 Configuration Setup",
        strip,
        body,
        instructions,
        state.size,
        frame,
        area,
    );
}

// ============================================================================
// SCREEN: SEND
// ============================================================================

fn render_send(state: &SendState, frame: &mut Frame, area: Rect) {
    if let Some(outcome) = &state.outcome {
        render_send_outcome(outcome, state.size, frame, area);
        return;
    }

    let labels: Vec<&str> = SendStep::ALL.iter().map(|s| s.label()).collect();
    let strip = step_strip(&labels, state.step.index());

    let body = match state.step {
        SendStep::Message => vec![
            Line::from(Span::styled("Enter your message text:", theme::STYLE_WIZARD)),
            Line::from(""),
            draft_line(&state.message, "Type here or press Ctrl+V to paste..."),
            Line::from(""),
            hint_line(state.hint),
        ],
        SendStep::Mobiles => vec![
            Line::from(Span::styled(
                "Enter mobile numbers (comma-separated):",
                theme::STYLE_WIZARD,
            )),
            Line::from(""),
            draft_line(&state.mobiles, "e.g., 09120000000,09121111111"),
            Line::from(""),
            hint_line(state.hint),
        ],
        SendStep::Line => {
            let title = if state.default_line.is_empty() {
                "Enter line number:".to_string()
            } else {
                format!("Enter line number (Press Enter to use: {}):", state.default_line)
            };
            vec![
                Line::from(Span::styled(title, theme::STYLE_WIZARD)),
                Line::from(""),
                draft_line(&state.line, "Leave empty to use configured line number"),
                Line::from(""),
                hint_line(state.hint),
            ]
        }
        SendStep::Confirm => {
            let mut body = vec![
                Line::from(Span::styled("Confirm and Send:", theme::STYLE_WIZARD)),
                Line::from(""),
                Line::from(Span::styled(
                    format!("Message: {}", state.message.as_str()),
                    theme::STYLE_INFO,
                )),
                Line::from(Span::styled(
                    format!("Mobiles: {}", state.recipients().join(", ")),
                    theme::STYLE_INFO,
                )),
                Line::from(Span::styled(
                    format!("Line Number: {}", state.line_label()),
                    theme::STYLE_INFO,
                )),
            ];
            if state.in_flight {
                body.push(Line::from(""));
                body.push(Line::from(Span::styled("Sending... ⏳", theme::STYLE_PROGRESS)));
            }
            body
        }
    };

    let instructions = match state.step {
        _ if state.in_flight => "Waiting for SMS.ir...",
        SendStep::Confirm => "Press Enter to send SMS • Press q or Ctrl+C to cancel",
        _ => "Type and press Enter to continue • Ctrl+V to paste • Esc to cancel",
    };

    render_wizard("📤 Send SMS", strip, body, instructions, state.size, frame, area);
}

fn render_send_outcome(outcome: &SendOutcome, size: Option<Size>, frame: &mut Frame, area: Rect) {
    let (border, lines) = match outcome {
        SendOutcome::Sent(receipt) => (
            Style::new().fg(theme::WIZARD),
            vec![
                Line::from(Span::styled("✅ SMS sent successfully!", theme::STYLE_WIZARD)),
                Line::from(""),
                Line::from(format!("📦 Pack ID: {}", receipt.pack_id)),
                Line::from(format!("💰 Cost: {:.2} SMS", receipt.cost)),
                Line::from(format!("📱 Message IDs: {:?}", receipt.message_ids)),
                Line::from(format!("📊 Total messages: {}", receipt.message_ids.len())),
                Line::from(""),
                Line::from("Press q or Ctrl+C to exit..."),
            ],
        ),
        SendOutcome::Failed(err) => (
            Style::new().fg(theme::DANGER),
            vec![
                Line::from(Span::styled("❌ Error sending SMS", theme::STYLE_DANGER)),
                Line::from(""),
                Line::from(format!("Error: {}", err)),
                Line::from(""),
                Line::from("Press q or Ctrl+C to exit..."),
            ],
        ),
    };

    let paragraph = Paragraph::new(lines)
        .style(theme::STYLE_INFO)
        .block(rounded_box(border))
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, boxed_area(area, size));
}

// ============================================================================
// SCREEN: DASHBOARD
// ============================================================================

fn render_dashboard(state: &DashboardState, frame: &mut Frame, area: Rect) {
    let chunks = Layout::vertical([
        Constraint::Length(3), // header
        Constraint::Min(0),    // content
        Constraint::Length(1), // instructions
    ])
    .split(area);

    frame.render_widget(
        Paragraph::new(header("📱 SMS.ir CLI Dashboard")).centered(),
        chunks[0],
    );
    frame.render_widget(
        Paragraph::new(Span::styled(
            "Commands: | r - Refresh data | q - Quit",
            theme::STYLE_CAPTION,
        ))
        .centered(),
        chunks[2],
    );

    let content = boxed_area(chunks[1], state.size);

    if let Some(err) = &state.error {
        let paragraph = Paragraph::new(Span::styled(format!("Error: {}", err), theme::STYLE_DANGER))
            .centered()
            .block(rounded_box(Style::new().fg(theme::DANGER)))
            .wrap(Wrap { trim: false });
        frame.render_widget(paragraph, content);
        return;
    }

    if state.refreshing {
        frame.render_widget(
            Paragraph::new(Span::styled("Loading... ⏳", theme::STYLE_PROGRESS)).centered(),
            content,
        );
        return;
    }

    let lines = state.lines.as_deref().unwrap_or_default();
    let boxes = Layout::vertical([
        Constraint::Length(6),
        Constraint::Length(lines.len().max(1) as u16 + 5),
        Constraint::Min(0),
    ])
    .split(content);

    let credit = Paragraph::new(vec![
        Line::from(Span::styled("💰 Current Credit", theme::STYLE_TITLE)),
        Line::from(Span::styled(
            format!("{:.2} SMS", state.credit.unwrap_or_default()),
            theme::STYLE_VALUE,
        )),
    ])
    .block(rounded_box(Style::new().fg(theme::BRAND)));
    frame.render_widget(credit, boxes[0]);

    let mut body = vec![Line::from(Span::styled(
        "📞 Available Lines",
        theme::STYLE_SAFE_TITLE,
    ))];
    if lines.is_empty() {
        body.push(Line::from(Span::styled("No lines found", theme::STYLE_CAPTION)));
    } else {
        body.extend(lines.iter().map(|line| Line::from(line.to_string())));
    }
    let lines_box = Paragraph::new(body).block(rounded_box(Style::new().fg(theme::SAFE)));
    frame.render_widget(lines_box, boxes[1]);
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiError;
    use crate::tui::selector::Notice;
    use crate::tui::send::SendError;
    use crate::types::{LineError, SendReceipt};
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn draw(state: &AppState, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal
            .draw(|frame| render(state, frame))
            .expect("render should not panic");
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol().to_string())
            .collect()
    }

    fn on(active: ScreenId) -> AppState {
        AppState {
            active,
            ..Default::default()
        }
    }

    #[test]
    fn progress_bar_fills_proportionally() {
        assert_eq!(progress_bar(0), format!("[{}] 0%", "░".repeat(40)));
        assert_eq!(progress_bar(50), format!("[{}{}] 50%", "█".repeat(20), "░".repeat(20)));
        assert_eq!(progress_bar(100), format!("[{}] 100%", "█".repeat(40)));
    }

    #[test]
    fn step_strip_ticks_through_current() {
        assert_eq!(
            step_strip(&["A", "B", "C"], 1),
            "✓ A → ✓ B → ○ C"
        );
    }

    #[test]
    fn startup_shows_caption_and_percentage() {
        let mut state = on(ScreenId::Startup);
        state.startup.progress = 30;
        let content = draw(&state, 80, 24);
        assert!(content.contains("30%"));
        assert!(content.contains("Connecting to SMS.ir..."));
    }

    #[test]
    fn startup_drops_logo_on_short_terminal() {
        let mut state = on(ScreenId::Startup);
        state.startup.size = Some(Size { width: 80, height: 10 });
        let content = draw(&state, 80, 10);
        assert!(!content.contains("╔"));
        assert!(content.contains("Loading..."));
    }

    #[test]
    fn selector_marks_cursor_and_notice() {
        let mut state = on(ScreenId::Selector);
        state.selector.cursor = 1;
        state.selector.notice = Some(Notice::error("Configuration incomplete"));
        let content = draw(&state, 100, 20);
        assert!(content.contains("> "));
        assert!(content.contains("Send SMS"));
        assert!(content.contains("Configuration incomplete"));
        assert!(content.contains("Interactive Dashboard"));
    }

    #[test]
    fn configure_confirm_masks_key() {
        let mut state = on(ScreenId::Configure);
        state.configure.api_key = Draft::new("abcdefghijklmnop");
        state.configure.line_number = Draft::new("3000");
        state.configure.step = ConfigStep::Confirm;
        let content = draw(&state, 80, 20);
        assert!(content.contains("abcd****mnop"));
        assert!(!content.contains("abcdefghijklmnop"));
        assert!(content.contains("Line Number: 3000"));
    }

    #[test]
    fn configure_shows_hint() {
        let mut state = on(ScreenId::Configure);
        state.configure.hint = Some("API key cannot be empty");
        let content = draw(&state, 80, 20);
        assert!(content.contains("API key cannot be empty"));
    }

    #[test]
    fn send_confirm_shows_resolved_line() {
        let mut state = on(ScreenId::Send);
        state.send = SendState::new("3000");
        state.send.message = Draft::new("hello");
        state.send.mobiles = Draft::new("0912, 0913");
        state.send.step = SendStep::Confirm;
        let content = draw(&state, 80, 20);
        assert!(content.contains("Line Number: 3000"));
        assert!(content.contains("Mobiles: 0912, 0913"));
    }

    #[test]
    fn send_success_shows_receipt() {
        let mut state = on(ScreenId::Send);
        state.send.outcome = Some(SendOutcome::Sent(SendReceipt {
            pack_id: "pack-9".into(),
            message_ids: vec![1, 2],
            cost: 2.0,
        }));
        let content = draw(&state, 80, 20);
        assert!(content.contains("pack-9"));
        assert!(content.contains("Total messages: 2"));
    }

    #[test]
    fn send_failure_shows_error() {
        let mut state = on(ScreenId::Send);
        state.send.outcome = Some(SendOutcome::Failed(SendError::Line(LineError::Missing)));
        let content = draw(&state, 80, 20);
        assert!(content.contains("Error sending SMS"));
        assert!(content.contains("line number is required"));
    }

    #[test]
    fn dashboard_loading_then_content() {
        let mut state = on(ScreenId::Dashboard);
        state.dashboard = DashboardState::loading();
        assert!(draw(&state, 80, 24).contains("Loading..."));

        state.dashboard.credit = Some(42.5);
        state.dashboard.lines = Some(vec![3000, 5000]);
        state.dashboard.refreshing = false;
        let content = draw(&state, 80, 24);
        assert!(content.contains("42.50 SMS"));
        assert!(content.contains("5000"));
    }

    #[test]
    fn dashboard_without_lines_says_so() {
        let mut state = on(ScreenId::Dashboard);
        state.dashboard.credit = Some(1.0);
        state.dashboard.lines = Some(Vec::new());
        assert!(draw(&state, 80, 24).contains("No lines found"));
    }

    #[test]
    fn dashboard_error_replaces_content() {
        let mut state = on(ScreenId::Dashboard);
        state.dashboard.credit = Some(42.5);
        state.dashboard.error = Some(ApiError::Server);
        let content = draw(&state, 80, 24);
        assert!(content.contains("server error"));
        assert!(!content.contains("42.50"));
    }

    #[test]
    fn every_screen_renders_in_a_tiny_terminal() {
        for active in [
            ScreenId::Startup,
            ScreenId::Selector,
            ScreenId::Configure,
            ScreenId::Send,
            ScreenId::Dashboard,
        ] {
            let mut state = on(active);
            state.size = Some(Size { width: 3, height: 2 });
            draw(&state, 3, 2);
        }
    }
}
