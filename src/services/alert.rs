//! Alert sound playback through an external command

use tokio::process::{Child, Command};
use tracing::{debug, info, warn};

/// Plays the phase-expiry alert by running a user supplied command
#[derive(Debug, Default)]
pub struct AlertPlayer {
    program: Option<String>,
    args: Vec<String>,
    child: Option<Child>,
}

impl AlertPlayer {
    /// Create a player from a whitespace separated command line, e.g. `paplay beep.wav`
    pub fn new(command: Option<&str>) -> Self {
        let mut parts = command
            .unwrap_or_default()
            .split_whitespace()
            .map(str::to_string);

        Self {
            program: parts.next(),
            args: parts.collect(),
            child: None,
        }
    }

    /// Start the alert from the beginning, cutting off one already playing
    pub async fn play(&mut self) -> Result<(), String> {
        self.stop().await?;

        let Some(program) = &self.program else {
            info!("Alert: phase expired (no alert command configured)");
            return Ok(());
        };

        debug!("Spawning alert command: {} {:?}", program, self.args);
        let child = Command::new(program)
            .args(&self.args)
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| format!("Failed to execute alert command {}: {}", program, e))?;

        self.child = Some(child);
        Ok(())
    }

    /// Silence the alert so the next play starts over
    pub async fn stop(&mut self) -> Result<(), String> {
        let Some(mut child) = self.child.take() else {
            return Ok(());
        };

        match child.try_wait() {
            Ok(Some(status)) => {
                debug!("Alert command already finished ({})", status);
                Ok(())
            }
            Ok(None) => {
                child.kill().await
                    .map_err(|e| format!("Failed to stop alert command: {}", e))?;
                info!("Alert stopped");
                Ok(())
            }
            Err(e) => {
                warn!("Failed to poll alert command: {}", e);
                Ok(())
            }
        }
    }

    /// Whether an alert process is still running
    pub fn is_playing(&mut self) -> bool {
        match self.child.as_mut() {
            Some(child) => matches!(child.try_wait(), Ok(None)),
            None => false,
        }
    }
}
