//! Pomodoro Clock - A session/break countdown clock for a browser UI
//!
//! This is the main entry point for the pomodoro-clock server.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use pomodoro_clock::{
    config::Config,
    state::AppState,
    api::create_router,
    services::AlertPlayer,
    tasks::{alert_task, ticker_task},
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("pomodoro_clock={},tower_http=info", config.log_level()))
        .init();

    info!("Starting pomodoro-clock server v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: host={}, port={}, tick={}ms, alert={}",
          config.host, config.port, config.tick_ms,
          config.alert_command.as_deref().unwrap_or("<none>"));

    // Create application state
    let state = Arc::new(AppState::new(config.port, config.host.clone()));

    // Start the countdown driver
    let ticker_state = Arc::downgrade(&state);
    let period = config.tick_period();
    tokio::spawn(async move {
        ticker_task(ticker_state, period).await;
    });

    // Start alert playback
    let event_rx = state.subscribe();
    let player = AlertPlayer::new(config.alert_command.as_deref());
    tokio::spawn(async move {
        alert_task(event_rx, player).await;
    });

    // Create HTTP router with all endpoints
    let app = create_router(state);

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /start_stop         - Start or pause the countdown");
    info!("  POST /reset              - Stop and restore default lengths");
    info!("  POST /break/increment    - Lengthen the break by a minute");
    info!("  POST /break/decrement    - Shorten the break by a minute");
    info!("  POST /session/increment  - Lengthen the session by a minute");
    info!("  POST /session/decrement  - Shorten the session by a minute");
    info!("  GET  /status             - Current clock and server status");
    info!("  GET  /events             - Server-Sent Events stream of clock changes");
    info!("  GET  /health             - Health check");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    info!("Server shutdown complete");
    Ok(())
}
