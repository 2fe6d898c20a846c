// Terminal UI implementation using ratatui
// The pretty face of Internwatch

pub mod app;
pub mod runner;
pub mod ui;

pub use app::{App, InputMode, Notice, NoticeKind};
pub use runner::run_tui;
