//! smsir: terminal client for the SMS.ir messaging API.

pub mod api;
pub mod config;
pub mod report;
pub mod tui;
pub mod types;
