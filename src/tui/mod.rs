//! Interactive terminal UI.
//!
//! Organized along FP/Unix boundaries:
//! - `state`: pure data types (AppState, AppEvent, Action, Effect, Transition)
//! - `startup`, `selector`, `configure`, `send`, `dashboard`: one pure
//!   state machine per screen
//! - `launcher`: pure orchestration between screens
//! - `input`: text drafts and the clipboard seam
//! - `view` and `theme`: pure rendering
//! - `run`: effects (terminal, event loop, spawned remote calls)

pub mod configure;
pub mod dashboard;
pub mod input;
pub mod launcher;
pub mod run;
pub mod selector;
pub mod send;
pub mod startup;
pub mod state;
pub mod theme;
pub mod view;

pub use launcher::Launcher;
pub use run::{run, RunError};
pub use state::Exit;
