//! Alert playback background task

use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{debug, error, info, warn};

use crate::{services::AlertPlayer, state::TimerEvent};

/// Background task that turns alert notifications into sound.
///
/// Runs until the event channel closes, i.e. the timer state is dropped.
pub async fn alert_task(mut event_rx: broadcast::Receiver<TimerEvent>, mut player: AlertPlayer) {
    info!("Starting alert task");

    loop {
        match event_rx.recv().await {
            Ok(TimerEvent::PlayAlert) => {
                if player.is_playing() {
                    debug!("Previous alert still playing, restarting it");
                }
                if let Err(e) = player.play().await {
                    error!("Failed to play alert: {}", e);
                }
            }
            Ok(TimerEvent::StopAlert) => {
                if let Err(e) = player.stop().await {
                    error!("Failed to stop alert: {}", e);
                }
            }
            Ok(TimerEvent::StateChanged(_)) => {}
            Err(RecvError::Lagged(skipped)) => {
                warn!("Alert task lagged behind by {} events", skipped);
            }
            Err(RecvError::Closed) => {
                info!("Event channel closed, stopping alert task");
                break;
            }
        }
    }

    if let Err(e) = player.stop().await {
        warn!("Failed to stop alert on shutdown: {}", e);
    }
}
