//! HTTP endpoint handlers

use std::sync::Arc;
use axum::{
    extract::State,
    http::StatusCode,
    response::{
        sse::{Event, KeepAlive, Sse},
        Json,
    },
};
use futures::stream::{self, Stream, StreamExt};
use tokio::sync::broadcast::error::RecvError;
use tracing::{error, info, warn};

use crate::state::{Adjustment, AppState, TimerEvent, TimerSnapshot};
use super::responses::{ApiResponse, StatusResponse, HealthResponse};

/// Turn an engine operation result into a control endpoint response
fn control_response(
    result: Result<TimerSnapshot, String>,
    message: &str,
) -> Result<Json<ApiResponse>, StatusCode> {
    match result {
        Ok(timer) => Ok(Json(ApiResponse::from_timer(message.to_string(), timer))),
        Err(e) => {
            error!("Failed to apply \"{}\": {}", message, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Handle POST /start_stop - Toggle running/paused
pub async fn start_stop_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    let result = state.start_stop();
    let message = match &result {
        Ok(timer) if timer.running => "Timer started",
        _ => "Timer paused",
    };
    info!("Start/stop endpoint called - {}", message);
    control_response(result, message)
}

/// Handle POST /reset - Stop the timer and restore defaults
pub async fn reset_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    info!("Reset endpoint called");
    control_response(state.reset(), "Timer reset")
}

/// Handle POST /break/increment
pub async fn break_increment_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    control_response(state.adjust_break(Adjustment::Increment), "Break length incremented")
}

/// Handle POST /break/decrement
pub async fn break_decrement_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    control_response(state.adjust_break(Adjustment::Decrement), "Break length decremented")
}

/// Handle POST /session/increment
pub async fn session_increment_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    control_response(state.adjust_session(Adjustment::Increment), "Session length incremented")
}

/// Handle POST /session/decrement
pub async fn session_decrement_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    control_response(state.adjust_session(Adjustment::Decrement), "Session length decremented")
}

/// Handle GET /status - Return the current clock and server status
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Result<Json<StatusResponse>, StatusCode> {
    let timer = match state.get_snapshot() {
        Ok(t) => t,
        Err(e) => {
            error!("Failed to get timer snapshot: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let (last_action, last_action_time) = state.get_last_action();

    Ok(Json(StatusResponse {
        timer,
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    }))
}

fn sse_event(event: &TimerEvent) -> Result<Event, axum::Error> {
    Event::default().event(event.name()).json_data(event)
}

/// Handle GET /events - Stream engine notifications as Server-Sent Events.
///
/// The stream opens with the current state so a client can render at once.
pub async fn events_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Sse<impl Stream<Item = Result<Event, axum::Error>>>, StatusCode> {
    // Subscribe before reading the snapshot so no change falls in between
    let event_rx = state.subscribe();
    let initial = match state.get_snapshot() {
        Ok(timer) => TimerEvent::StateChanged(timer),
        Err(e) => {
            error!("Failed to get timer snapshot: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    info!("Event stream client connected");

    let updates = stream::unfold(event_rx, |mut event_rx| async move {
        loop {
            match event_rx.recv().await {
                Ok(event) => return Some((sse_event(&event), event_rx)),
                Err(RecvError::Lagged(skipped)) => {
                    warn!("Event stream client lagged behind by {} events", skipped);
                }
                Err(RecvError::Closed) => return None,
            }
        }
    });

    let events = stream::once(async move { sse_event(&initial) }).chain(updates);
    Ok(Sse::new(events).keep_alive(KeepAlive::default()))
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
