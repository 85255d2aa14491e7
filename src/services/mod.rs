//! External device integration module
//!
//! The clock never plays sound itself; this module hands alerts to an
//! external player process.

pub mod alert;

// Re-export main types
pub use alert::AlertPlayer;
