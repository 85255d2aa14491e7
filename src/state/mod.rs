//! State management module
//!
//! This module contains the countdown engine and the shared host state around it.

pub mod timer_state;
pub mod engine;
pub mod app_state;

// Re-export main types
pub use timer_state::{Adjustment, Phase, TimerSnapshot, TimerState};
pub use engine::{TimerEngine, TimerEvent};
pub use app_state::{AppState, DriverState};
