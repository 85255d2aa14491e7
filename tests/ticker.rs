use std::{sync::Arc, time::Duration};

use tokio::{task::JoinHandle, time::sleep};

use pomodoro_clock::{
    services::AlertPlayer,
    state::{AppState, Phase, TimerEvent},
    tasks::{alert_task, ticker_task},
};

fn spawn_ticker() -> (Arc<AppState>, JoinHandle<()>) {
    let state = Arc::new(AppState::new(20554, "127.0.0.1".to_string()));
    let handle = tokio::spawn(ticker_task(Arc::downgrade(&state), Duration::from_secs(1)));
    (state, handle)
}

#[tokio::test(start_paused = true)]
async fn counts_down_once_per_second_while_running() {
    let (state, _ticker) = spawn_ticker();

    state.start_stop().unwrap();
    sleep(Duration::from_millis(3500)).await;
    assert_eq!(state.get_snapshot().unwrap().time_left_seconds, 1497);

    state.start_stop().unwrap();
    sleep(Duration::from_secs(5)).await;
    assert_eq!(state.get_snapshot().unwrap().time_left_seconds, 1497);
}

#[tokio::test(start_paused = true)]
async fn restarting_does_not_double_tick() {
    let (state, _ticker) = spawn_ticker();

    state.start_stop().unwrap();
    sleep(Duration::from_millis(1500)).await;
    state.start_stop().unwrap();
    state.start_stop().unwrap();
    sleep(Duration::from_millis(2500)).await;

    // One tick before the restart, two after it
    assert_eq!(state.get_snapshot().unwrap().time_left_seconds, 1497);
}

#[tokio::test(start_paused = true)]
async fn reset_stops_the_driver() {
    let (state, _ticker) = spawn_ticker();

    state.start_stop().unwrap();
    sleep(Duration::from_millis(2500)).await;
    state.reset().unwrap();
    sleep(Duration::from_secs(10)).await;

    let snapshot = state.get_snapshot().unwrap();
    assert!(!snapshot.running);
    assert_eq!(snapshot.time_left_seconds, 1500);
}

#[tokio::test(start_paused = true)]
async fn phase_expiry_plays_alert_and_switches_to_break() {
    let (state, _ticker) = spawn_ticker();
    let mut events = state.subscribe();

    for _ in 0..24 {
        state.adjust_session(pomodoro_clock::state::Adjustment::Decrement).unwrap();
    }
    state.start_stop().unwrap();
    sleep(Duration::from_millis(61_500)).await;

    let snapshot = state.get_snapshot().unwrap();
    assert_eq!(snapshot.phase, Phase::Break);
    assert_eq!(snapshot.time_left_seconds, 300);

    let mut alerts = 0;
    while let Ok(event) = events.try_recv() {
        if event == TimerEvent::PlayAlert {
            alerts += 1;
        }
    }
    assert_eq!(alerts, 1);
}

#[tokio::test(start_paused = true)]
async fn alert_task_survives_alert_cycle() {
    let (state, _ticker) = spawn_ticker();
    let handle = tokio::spawn(alert_task(state.subscribe(), AlertPlayer::new(None)));

    state.start_stop().unwrap();
    sleep(Duration::from_secs(3)).await;
    state.reset().unwrap();
    sleep(Duration::from_secs(1)).await;

    assert!(!handle.is_finished());
}

#[tokio::test(start_paused = true)]
async fn dropping_state_stops_running_driver() {
    let (state, ticker) = spawn_ticker();
    let engine = Arc::downgrade(&state.engine);

    state.start_stop().unwrap();
    sleep(Duration::from_millis(1500)).await;
    drop(state);
    sleep(Duration::from_secs(5)).await;

    assert!(ticker.is_finished());
    assert!(engine.upgrade().is_none());
}

#[tokio::test(start_paused = true)]
async fn dropping_state_stops_idle_driver() {
    let (state, ticker) = spawn_ticker();
    sleep(Duration::from_millis(100)).await;

    drop(state);
    sleep(Duration::from_millis(100)).await;

    assert!(ticker.is_finished());
}

#[tokio::test(start_paused = true)]
async fn dropping_state_stops_alert_task() {
    let state = Arc::new(AppState::new(20554, "127.0.0.1".to_string()));
    let handle = tokio::spawn(alert_task(state.subscribe(), AlertPlayer::new(None)));
    sleep(Duration::from_millis(100)).await;

    drop(state);
    sleep(Duration::from_millis(100)).await;

    assert!(handle.is_finished());
}
