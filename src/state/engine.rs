//! Countdown state machine
//!
//! The engine does no timing of its own. The host calls [`TimerEngine::tick`]
//! once per second while the clock is running and forwards the returned
//! [`TimerEvent`]s to whoever renders the clock or plays the alert.

use serde::Serialize;
use tracing::{debug, info};

use super::timer_state::{Adjustment, TimerSnapshot, TimerState};

/// Notification from the engine to its host
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum TimerEvent {
    /// Some field changed; re-render from the attached snapshot
    StateChanged(TimerSnapshot),
    /// The current phase ran out
    PlayAlert,
    /// Silence and rewind any alert in progress
    StopAlert,
}

impl TimerEvent {
    pub fn name(&self) -> &'static str {
        match self {
            TimerEvent::StateChanged(_) => "state_changed",
            TimerEvent::PlayAlert => "play_alert",
            TimerEvent::StopAlert => "stop_alert",
        }
    }
}

/// Owner of the single [`TimerState`]
#[derive(Debug, Default)]
pub struct TimerEngine {
    state: TimerState,
}

impl TimerEngine {
    pub fn new() -> Self {
        Self {
            state: TimerState::new(),
        }
    }

    pub fn state(&self) -> &TimerState {
        &self.state
    }

    pub fn is_running(&self) -> bool {
        self.state.running
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        self.state.snapshot()
    }

    pub fn formatted_time(&self) -> String {
        self.state.formatted_time()
    }

    pub fn progress_fraction(&self) -> f64 {
        self.state.progress_fraction()
    }

    /// Toggle between running and paused
    pub fn start_stop(&mut self) -> Vec<TimerEvent> {
        self.state.running = !self.state.running;
        info!(
            "Timer {} at {}",
            if self.state.running { "started" } else { "paused" },
            self.state.formatted_time()
        );
        vec![self.changed()]
    }

    /// Advance the countdown by one second.
    ///
    /// A tick that finds zero seconds left switches to the other phase and
    /// loads its full length instead of decrementing.
    pub fn tick(&mut self) -> Vec<TimerEvent> {
        if !self.state.running {
            debug!("Tick ignored while paused");
            return Vec::new();
        }

        if self.state.time_left_seconds == 0 {
            let next = self.state.phase.other();
            info!("{} expired, switching to {}", self.state.phase.label(), next.label());
            self.state.phase = next;
            self.state.time_left_seconds = self.state.phase_length_seconds(next);
            return vec![TimerEvent::PlayAlert, self.changed()];
        }

        self.state.time_left_seconds -= 1;
        debug!("Tick: {} left", self.state.formatted_time());
        vec![self.changed()]
    }

    /// Stop the clock and restore the default lengths
    pub fn reset(&mut self) -> Vec<TimerEvent> {
        self.state = TimerState::new();
        info!("Timer reset");
        vec![TimerEvent::StopAlert, self.changed()]
    }

    /// Change the break length by one minute within 1..=60.
    ///
    /// Never touches the remaining time, even during a paused break.
    pub fn adjust_break(&mut self, adjustment: Adjustment) -> Vec<TimerEvent> {
        let Some(length) = adjustment.apply(self.state.break_length) else {
            debug!("Break length {} out of range, ignoring", adjustment.as_str());
            return Vec::new();
        };

        self.state.break_length = length;
        debug!("Break length set to {}", length);
        vec![self.changed()]
    }

    /// Change the session length by one minute within 1..=60.
    ///
    /// While paused this also reloads the remaining time from the new session
    /// length, whichever phase is showing.
    pub fn adjust_session(&mut self, adjustment: Adjustment) -> Vec<TimerEvent> {
        let Some(length) = adjustment.apply(self.state.session_length) else {
            debug!("Session length {} out of range, ignoring", adjustment.as_str());
            return Vec::new();
        };

        self.state.session_length = length;
        if !self.state.running {
            self.state.time_left_seconds = length * 60;
        }
        debug!("Session length set to {}", length);
        vec![self.changed()]
    }

    fn changed(&self) -> TimerEvent {
        TimerEvent::StateChanged(self.state.snapshot())
    }

    #[cfg(test)]
    pub(crate) fn state_mut(&mut self) -> &mut TimerState {
        &mut self.state
    }
}
