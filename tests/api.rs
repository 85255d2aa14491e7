use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use pomodoro_clock::{create_router, AppState};

fn app() -> (Arc<AppState>, Router) {
    let state = Arc::new(AppState::new(20554, "127.0.0.1".to_string()));
    let router = create_router(Arc::clone(&state));
    (state, router)
}

async fn send(router: &Router, method: &str, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn health_reports_ok() {
    let (_, router) = app();
    let (status, body) = send(&router, "GET", "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn status_shows_default_clock() {
    let (_, router) = app();
    let (status, body) = send(&router, "GET", "/status").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["timer"]["formatted_time"], "25:00");
    assert_eq!(body["timer"]["phase"], "session");
    assert_eq!(body["timer"]["phase_label"], "Session");
    assert_eq!(body["timer"]["running"], false);
    assert_eq!(body["timer"]["break_length"], 5);
    assert_eq!(body["timer"]["session_length"], 25);
    assert_eq!(body["timer"]["progress_fraction"], 1.0);
    assert_eq!(body["port"], 20554);
    assert!(body["last_action"].is_null());
}

#[tokio::test]
async fn start_stop_toggles_running() {
    let (_, router) = app();

    let (status, body) = send(&router, "POST", "/start_stop").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "running");
    assert_eq!(body["timer"]["running"], true);
    assert_eq!(body["timer"]["control_label"], "Pause");

    let (_, body) = send(&router, "POST", "/start_stop").await;
    assert_eq!(body["status"], "paused");
    assert_eq!(body["timer"]["running"], false);
    assert_eq!(body["timer"]["time_left_seconds"], 1500);
}

#[tokio::test]
async fn session_adjustment_reloads_paused_clock() {
    let (_, router) = app();

    let (_, body) = send(&router, "POST", "/session/decrement").await;
    assert_eq!(body["timer"]["session_length"], 24);
    assert_eq!(body["timer"]["time_left_seconds"], 1440);
    assert_eq!(body["timer"]["formatted_time"], "24:00");

    let (_, body) = send(&router, "GET", "/status").await;
    assert_eq!(body["last_action"], "session-decrement");
}

#[tokio::test]
async fn break_adjustment_is_bounded() {
    let (_, router) = app();

    for _ in 0..10 {
        send(&router, "POST", "/break/decrement").await;
    }
    let (_, body) = send(&router, "GET", "/status").await;
    assert_eq!(body["timer"]["break_length"], 1);

    for _ in 0..70 {
        send(&router, "POST", "/break/increment").await;
    }
    let (_, body) = send(&router, "GET", "/status").await;
    assert_eq!(body["timer"]["break_length"], 60);
    assert_eq!(body["timer"]["time_left_seconds"], 1500);
}

#[tokio::test]
async fn reset_restores_defaults() {
    let (state, router) = app();

    send(&router, "POST", "/session/increment").await;
    send(&router, "POST", "/break/increment").await;
    send(&router, "POST", "/start_stop").await;
    state.tick(1).unwrap();

    let (status, body) = send(&router, "POST", "/reset").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "paused");
    assert_eq!(body["timer"]["break_length"], 5);
    assert_eq!(body["timer"]["session_length"], 25);
    assert_eq!(body["timer"]["time_left_seconds"], 1500);
    assert_eq!(body["timer"]["phase"], "session");
    assert_eq!(body["timer"]["running"], false);
}

#[tokio::test]
async fn unknown_route_is_not_found() {
    let (_, router) = app();
    let request = Request::builder()
        .uri("/pause")
        .body(Body::empty())
        .unwrap();

    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn events_stream_is_served() {
    let (_, router) = app();
    let request = Request::builder()
        .uri("/events")
        .body(Body::empty())
        .unwrap();

    let response = router.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["content-type"].to_str().unwrap(),
        "text/event-stream"
    );
}
