//! Timer state structure and the values derived from it

use std::f64::consts::PI;

use serde::Serialize;

pub const DEFAULT_SESSION_MINUTES: u32 = 25;
pub const DEFAULT_BREAK_MINUTES: u32 = 5;
pub const MIN_LENGTH_MINUTES: u32 = 1;
pub const MAX_LENGTH_MINUTES: u32 = 60;

/// Which half of the cycle is currently counting down
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Session,
    Break,
}

impl Phase {
    /// Label shown above the remaining time
    pub fn label(&self) -> &'static str {
        match self {
            Phase::Session => "Session",
            Phase::Break => "Break",
        }
    }

    pub fn other(&self) -> Phase {
        match self {
            Phase::Session => Phase::Break,
            Phase::Break => Phase::Session,
        }
    }
}

/// A one-minute step applied to a configured length
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Adjustment {
    Increment,
    Decrement,
}

impl Adjustment {
    /// Apply to `minutes`, returning `None` when the result leaves 1..=60
    pub fn apply(&self, minutes: u32) -> Option<u32> {
        let next = match self {
            Adjustment::Increment => minutes.checked_add(1)?,
            Adjustment::Decrement => minutes.checked_sub(1)?,
        };
        (MIN_LENGTH_MINUTES..=MAX_LENGTH_MINUTES)
            .contains(&next)
            .then_some(next)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Adjustment::Increment => "increment",
            Adjustment::Decrement => "decrement",
        }
    }
}

/// Complete state of the countdown clock
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerState {
    /// Configured break duration in minutes
    pub break_length: u32,
    /// Configured session duration in minutes
    pub session_length: u32,
    /// Remaining seconds in the current phase
    pub time_left_seconds: u32,
    pub phase: Phase,
    pub running: bool,
}

impl TimerState {
    /// Create the mount-time state: a stopped, full-length default session
    pub fn new() -> Self {
        Self {
            break_length: DEFAULT_BREAK_MINUTES,
            session_length: DEFAULT_SESSION_MINUTES,
            time_left_seconds: DEFAULT_SESSION_MINUTES * 60,
            phase: Phase::Session,
            running: false,
        }
    }

    /// Configured length of `phase` in seconds
    pub fn phase_length_seconds(&self, phase: Phase) -> u32 {
        match phase {
            Phase::Session => self.session_length * 60,
            Phase::Break => self.break_length * 60,
        }
    }

    /// Remaining time as `MM:SS`; minutes are not wrapped at 60
    pub fn formatted_time(&self) -> String {
        format_time(self.time_left_seconds)
    }

    /// Remaining share of the current phase, 1.0 at phase start and 0.0 at expiry
    pub fn progress_fraction(&self) -> f64 {
        let total = self.phase_length_seconds(self.phase);
        // Time left can exceed the phase length: a session shortened mid-run,
        // or a session adjusted during a paused break, reloads or keeps more
        // seconds than the current phase holds.
        (self.time_left_seconds as f64 / total as f64).min(1.0)
    }

    /// Rotation of the progress ring's pointer
    pub fn pointer_angle_degrees(&self) -> f64 {
        360.0 * self.progress_fraction()
    }

    /// Stroke offset of a progress ring drawn with the given radius
    pub fn dash_offset(&self, radius: f64) -> f64 {
        -2.0 * PI * radius * self.progress_fraction()
    }

    /// Build the render payload for this state
    pub fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot {
            break_length: self.break_length,
            session_length: self.session_length,
            time_left_seconds: self.time_left_seconds,
            phase: self.phase,
            phase_label: self.phase.label().to_string(),
            running: self.running,
            formatted_time: self.formatted_time(),
            progress_fraction: self.progress_fraction(),
            pointer_angle_degrees: self.pointer_angle_degrees(),
            control_label: if self.running { "Pause" } else { "Start" }.to_string(),
        }
    }
}

impl Default for TimerState {
    fn default() -> Self {
        Self::new()
    }
}

/// Everything a client needs to draw the clock
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimerSnapshot {
    pub break_length: u32,
    pub session_length: u32,
    pub time_left_seconds: u32,
    pub phase: Phase,
    pub phase_label: String,
    pub running: bool,
    pub formatted_time: String,
    pub progress_fraction: f64,
    pub pointer_angle_degrees: f64,
    /// Caption for the start/stop control
    pub control_label: String,
}

/// Render seconds as zero-padded `MM:SS`
pub fn format_time(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}
