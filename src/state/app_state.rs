//! Main application state management

use std::{
    sync::{Arc, Mutex},
    time::Instant,
};
use chrono::{DateTime, Utc};
use tokio::sync::{broadcast, watch};
use tracing::{debug, info};

use super::{Adjustment, TimerEngine, TimerEvent, TimerSnapshot};

/// What the periodic driver should currently be doing.
///
/// `generation` changes every time the driver must be re-armed, so a tick
/// from an earlier run can be recognised and dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DriverState {
    pub generation: u64,
    pub running: bool,
}

/// Shared host state around the single timer engine
#[derive(Debug)]
pub struct AppState {
    /// The countdown engine; every mutation goes through this lock
    pub engine: Arc<Mutex<TimerEngine>>,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    pub last_action: Arc<Mutex<Option<String>>>,
    pub last_action_time: Arc<Mutex<Option<DateTime<Utc>>>>,
    /// Channel for engine notifications
    pub event_tx: broadcast::Sender<TimerEvent>,
    /// Channel for driver control
    pub driver_tx: watch::Sender<DriverState>,
    /// Keep the receiver alive to prevent channel closure
    pub _driver_rx: watch::Receiver<DriverState>,
}

impl AppState {
    /// Create a new AppState with a stopped default timer
    pub fn new(port: u16, host: String) -> Self {
        let (event_tx, _) = broadcast::channel(100);
        let (driver_tx, driver_rx) = watch::channel(DriverState::default());

        Self {
            engine: Arc::new(Mutex::new(TimerEngine::new())),
            start_time: Instant::now(),
            port,
            host,
            last_action: Arc::new(Mutex::new(None)),
            last_action_time: Arc::new(Mutex::new(None)),
            event_tx,
            driver_tx,
            _driver_rx: driver_rx,
        }
    }

    /// Run an engine operation and publish what it produced.
    ///
    /// With `rearm_driver` set the driver generation is bumped, cancelling any
    /// interval installed for the previous state.
    fn apply<F>(&self, action: &str, rearm_driver: bool, operation: F) -> Result<TimerSnapshot, String>
    where
        F: FnOnce(&mut TimerEngine) -> Vec<TimerEvent>,
    {
        let mut engine = self.engine.lock()
            .map_err(|e| format!("Failed to lock timer engine: {}", e))?;

        let events = operation(&mut *engine);
        let snapshot = engine.snapshot();

        if rearm_driver {
            let running = snapshot.running;
            self.driver_tx.send_modify(|driver| {
                driver.generation += 1;
                driver.running = running;
            });
        }

        // Publish before unlocking so subscribers observe events in order
        self.publish(events);
        drop(engine);

        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }

        Ok(snapshot)
    }

    fn publish(&self, events: Vec<TimerEvent>) {
        for event in events {
            if let Err(e) = self.event_tx.send(event) {
                debug!("No listeners for {} event", e.0.name());
            }
        }
    }

    /// Toggle the countdown between running and paused
    pub fn start_stop(&self) -> Result<TimerSnapshot, String> {
        self.apply("start_stop", true, TimerEngine::start_stop)
    }

    /// Stop the countdown and restore default lengths
    pub fn reset(&self) -> Result<TimerSnapshot, String> {
        self.apply("reset", true, TimerEngine::reset)
    }

    /// Lengthen or shorten the break by one minute
    pub fn adjust_break(&self, adjustment: Adjustment) -> Result<TimerSnapshot, String> {
        info!("Adjusting break length: {}", adjustment.as_str());
        self.apply(
            &format!("break-{}", adjustment.as_str()),
            false,
            |engine| engine.adjust_break(adjustment),
        )
    }

    /// Lengthen or shorten the session by one minute
    pub fn adjust_session(&self, adjustment: Adjustment) -> Result<TimerSnapshot, String> {
        info!("Adjusting session length: {}", adjustment.as_str());
        self.apply(
            &format!("session-{}", adjustment.as_str()),
            false,
            |engine| engine.adjust_session(adjustment),
        )
    }

    /// Advance the countdown on behalf of the driver armed at `generation`.
    ///
    /// Returns `None` when the tick is stale or the timer is paused.
    pub fn tick(&self, generation: u64) -> Result<Option<TimerSnapshot>, String> {
        let mut engine = self.engine.lock()
            .map_err(|e| format!("Failed to lock timer engine: {}", e))?;

        let driver = *self.driver_tx.borrow();
        if driver.generation != generation || !engine.is_running() {
            debug!("Dropping stale tick from driver generation {}", generation);
            return Ok(None);
        }

        let events = engine.tick();
        let snapshot = engine.snapshot();
        self.publish(events);

        Ok(Some(snapshot))
    }

    /// Get the current render payload
    pub fn get_snapshot(&self) -> Result<TimerSnapshot, String> {
        self.engine.lock()
            .map(|engine| engine.snapshot())
            .map_err(|e| format!("Failed to lock timer engine: {}", e))
    }

    /// Subscribe to engine notifications
    pub fn subscribe(&self) -> broadcast::Receiver<TimerEvent> {
        self.event_tx.subscribe()
    }

    /// Receiver for the driver control channel
    pub fn driver_receiver(&self) -> watch::Receiver<DriverState> {
        self.driver_tx.subscribe()
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }
}
