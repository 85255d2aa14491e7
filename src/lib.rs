//! Pomodoro Clock - A session/break countdown clock for a browser UI
//!
//! The countdown itself lives in [`state::TimerEngine`], a plain state
//! machine. This crate wraps it with the pieces a host needs: a once-per-second
//! driver, alert playback, and an HTTP/SSE interface for the UI.

pub mod config;
pub mod state;
pub mod api;
pub mod services;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use state::{AppState, TimerEngine};
pub use api::create_router;
pub use utils::signals::shutdown_signal;
