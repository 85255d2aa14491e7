//! Countdown driver background task

use std::{sync::Weak, time::Duration};
use tokio::time::{interval_at, Instant};
use tracing::{debug, error, info};

use crate::state::AppState;

/// Background task that ticks the timer once per `period` while it is running.
///
/// Every driver state change drops the current interval before a new one is
/// installed, so at most one interval ever feeds the engine. The task holds
/// the state weakly and exits once the last strong handle is dropped.
pub async fn ticker_task(state: Weak<AppState>, period: Duration) {
    let Some(mut driver_rx) = state.upgrade().map(|state| state.driver_receiver()) else {
        info!("Timer state already dropped, not starting ticker task");
        return;
    };

    info!("Starting ticker task ({}ms period)", period.as_millis());

    loop {
        let driver = *driver_rx.borrow_and_update();

        if driver.running {
            debug!("Arming driver generation {}", driver.generation);
            let mut interval = interval_at(Instant::now() + period, period);

            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        let Some(state) = state.upgrade() else {
                            info!("Timer state dropped, stopping ticker task");
                            return;
                        };
                        if let Err(e) = state.tick(driver.generation) {
                            error!("Failed to tick timer: {}", e);
                        }
                    }

                    changed = driver_rx.changed() => {
                        if changed.is_err() {
                            info!("Driver channel closed, stopping ticker task");
                            return;
                        }
                        debug!("Driver generation {} cancelled", driver.generation);
                        break;
                    }
                }
            }
        } else if driver_rx.changed().await.is_err() {
            info!("Driver channel closed, stopping ticker task");
            return;
        }
    }
}
