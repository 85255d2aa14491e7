//! Background tasks module
//!
//! This module contains background tasks that run alongside the HTTP server.

pub mod ticker;
pub mod alert;

// Re-export main functions
pub use ticker::ticker_task;
pub use alert::alert_task;
