//! End-to-end smoke tests for the full telebridged stack.
//!
//! Each test feeds raw bus messages through the real decode → ingest path
//! (no broker), then exercises the HTTP layer of the resulting engine via
//! `tower::ServiceExt::oneshot` — no TCP port is bound. Outbound commands
//! land in a recording publisher instead of a broker.

use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use tokio::sync::mpsc;
use tower::ServiceExt;

use telebridge_adapter_http_axum::router;
use telebridge_adapter_http_axum::state::AppState;
use telebridge_adapter_mqtt::topic;
use telebridge_adapter_storage_json::JsonSnapshotStore;
use telebridge_app::pipeline::{checkpoint, ingest};
use telebridge_app::ports::CommandPublisher;
use telebridge_app::registry::DeviceRegistry;
use telebridge_app::services::command_dispatcher::CommandDispatcher;
use telebridge_app::services::device_query::DeviceQuery;
use telebridge_domain::error::BridgeError;

/// Captures outbound publishes instead of talking to a broker.
#[derive(Default)]
struct RecordingPublisher {
    published: Mutex<Vec<(String, serde_json::Value)>>,
}

impl CommandPublisher for RecordingPublisher {
    async fn publish(&self, topic: &str, payload: Vec<u8>) -> Result<(), BridgeError> {
        let body = serde_json::from_slice(&payload).expect("published payloads are JSON");
        self.published
            .lock()
            .unwrap()
            .push((topic.to_string(), body));
        Ok(())
    }
}

struct TestApp {
    app: axum::Router,
    registry: Arc<DeviceRegistry>,
    publisher: Arc<RecordingPublisher>,
}

/// Run raw `(topic, payload)` bus messages through decode → ingest, then
/// build the fully-wired router over the resulting registry.
async fn app_after_bus(messages: &[(&str, &str)]) -> TestApp {
    let registry = Arc::new(DeviceRegistry::new());
    let (tx, rx) = mpsc::channel(64);
    let ingest_task = tokio::spawn(ingest::run(rx, Arc::clone(&registry)));

    for (topic_name, payload) in messages {
        let event = topic::decode(topic_name, payload.as_bytes())
            .expect("test payload should decode")
            .expect("test topic should be recognized");
        tx.send(event).await.unwrap();
    }
    drop(tx);
    ingest_task.await.unwrap();

    let publisher = Arc::new(RecordingPublisher::default());
    let state = AppState::new(
        DeviceQuery::new(Arc::clone(&registry)),
        CommandDispatcher::new(Arc::clone(&registry), Arc::clone(&publisher)),
    );

    TestApp {
        app: router::build(state),
        registry,
        publisher,
    }
}

async fn get_json(app: &axum::Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, body)
}

async fn post_json(
    app: &axum::Router,
    uri: &str,
    body: serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, body)
}

const D1_DISCOVERY: (&str, &str) = (
    "global/discovery",
    r#"{"id": "d1", "firmware": "1.0.0", "capabilities": ["relay"], "channels": 2}"#,
);

// ---------------------------------------------------------------------------
// Health check
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_return_ok_when_health_check_called() {
    let harness = app_after_bus(&[]).await;

    let response = harness
        .app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

// ---------------------------------------------------------------------------
// Discovery and polling
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_expose_discovered_device_with_all_false_channels() {
    let harness = app_after_bus(&[D1_DISCOVERY]).await;

    let (status, body) = get_json(&harness.app, "/devices").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["d1"]["channelStates"], serde_json::json!([false, false]));
    assert_eq!(body["d1"]["channelCount"], 2);
    assert_eq!(body["d1"]["status"], "online");
    assert_eq!(body["d1"]["firmware"], "1.0.0");
    assert!(body["d1"]["telemetry"].is_null());
}

#[tokio::test]
async fn should_serve_single_device_by_id() {
    let harness = app_after_bus(&[D1_DISCOVERY]).await;

    let (status, body) = get_json(&harness.app, "/devices/d1").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], "d1");
}

#[tokio::test]
async fn should_ignore_bus_traffic_for_undiscovered_devices() {
    let harness = app_after_bus(&[
        ("ghost/status", r#"{"status": "online"}"#),
        ("ghost/telemetry", r#"{"temperature": 20.0}"#),
    ])
    .await;

    let (status, body) = get_json(&harness.app, "/devices").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::json!({}));
}

#[tokio::test]
async fn should_filter_devices_by_status() {
    let harness = app_after_bus(&[
        D1_DISCOVERY,
        (
            "global/discovery",
            r#"{"id": "d2", "channels": 0, "capabilities": []}"#,
        ),
        ("d2/status", r#"{"status": "offline"}"#),
    ])
    .await;

    let (status, body) = get_json(&harness.app, "/devices?status=offline").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_object().unwrap().len(), 1);
    assert_eq!(body["d2"]["status"], "offline");
}

// ---------------------------------------------------------------------------
// Telemetry reconciliation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_overwrite_channel_states_from_telemetry() {
    let harness = app_after_bus(&[
        D1_DISCOVERY,
        (
            "d1/telemetry",
            r#"{"temperature": 21.5, "battery": 3, "channelStates": [true, false]}"#,
        ),
    ])
    .await;

    let (_, body) = get_json(&harness.app, "/devices").await;

    assert_eq!(body["d1"]["channelStates"], serde_json::json!([true, false]));
    assert_eq!(body["d1"]["telemetry"]["temperature"], 21.5);
    assert_eq!(body["d1"]["telemetryHistory"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn should_keep_only_last_ten_telemetry_snapshots() {
    let mut messages = vec![D1_DISCOVERY];
    let payloads: Vec<String> = (0..11)
        .map(|i| format!(r#"{{"temperature": {i}}}"#))
        .collect();
    for payload in &payloads {
        messages.push(("d1/telemetry", payload.as_str()));
    }
    let harness = app_after_bus(&messages).await;

    let (_, body) = get_json(&harness.app, "/devices").await;

    let history = body["d1"]["telemetryHistory"].as_array().unwrap();
    assert_eq!(history.len(), 10);
    // The first snapshot (temperature 0) was evicted.
    assert_eq!(history[0]["temperature"], 1);
    assert_eq!(history[9]["temperature"], 10);
    assert_eq!(body["d1"]["telemetry"]["temperature"], 10);
}

#[tokio::test]
async fn should_reset_device_on_rediscovery() {
    let harness = app_after_bus(&[
        D1_DISCOVERY,
        (
            "d1/telemetry",
            r#"{"temperature": 25.0, "channelStates": [true, true]}"#,
        ),
        D1_DISCOVERY,
    ])
    .await;

    let (_, body) = get_json(&harness.app, "/devices").await;

    assert_eq!(body["d1"]["channelStates"], serde_json::json!([false, false]));
    assert_eq!(body["d1"]["telemetryHistory"], serde_json::json!([]));
    assert!(body["d1"]["telemetry"].is_null());
}

#[tokio::test]
async fn should_apply_command_echo_from_bus() {
    let harness = app_after_bus(&[
        D1_DISCOVERY,
        (
            "d1/commands",
            r#"{"action": "toggleChannel", "channel": 0, "state": true}"#,
        ),
    ])
    .await;

    let (_, body) = get_json(&harness.app, "/devices").await;

    assert_eq!(body["d1"]["channelStates"], serde_json::json!([true, false]));
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_dispatch_toggle_with_optimistic_update() {
    let harness = app_after_bus(&[
        D1_DISCOVERY,
        (
            "d1/telemetry",
            r#"{"temperature": 21.0, "channelStates": [true, false]}"#,
        ),
    ])
    .await;

    let (status, body) = post_json(
        &harness.app,
        "/devices/d1/commands",
        serde_json::json!({"action": "toggleChannel", "channel": 1, "state": true}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::json!({"success": true}));

    // Optimistic update is visible before any bus echo arrives.
    let (_, devices) = get_json(&harness.app, "/devices").await;
    assert_eq!(
        devices["d1"]["channelStates"],
        serde_json::json!([true, true])
    );

    // The command itself went out on the device's command topic.
    let published = harness.publisher.published.lock().unwrap();
    assert_eq!(published.len(), 1);
    assert_eq!(published[0].0, "d1/commands");
    assert_eq!(published[0].1["action"], "toggleChannel");
}

#[tokio::test]
async fn should_return_not_found_for_unknown_device_dispatch() {
    let harness = app_after_bus(&[]).await;

    let (status, body) = post_json(
        &harness.app,
        "/devices/unknown-device/commands",
        serde_json::json!({"action": "reboot"}),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());
    assert!(harness.publisher.published.lock().unwrap().is_empty());
    assert!(harness.registry.snapshot().await.is_empty());
}

#[tokio::test]
async fn should_reject_unknown_command_action() {
    let harness = app_after_bus(&[D1_DISCOVERY]).await;

    let (status, _) = post_json(
        &harness.app,
        "/devices/d1/commands",
        serde_json::json!({"action": "self_destruct"}),
    )
    .await;

    assert!(status.is_client_error());
    assert!(harness.publisher.published.lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_report_aggregate_outcome_for_bulk_dispatch() {
    let harness = app_after_bus(&[
        D1_DISCOVERY,
        (
            "global/discovery",
            r#"{"id": "d2", "channels": 0, "capabilities": []}"#,
        ),
    ])
    .await;

    let (status, body) = post_json(
        &harness.app,
        "/devices/commands",
        serde_json::json!({
            "devices": ["d1", "ghost", "d2"],
            "command": {"action": "reboot"}
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        serde_json::json!({"success": false, "dispatched": 2, "failed": 1})
    );
    assert_eq!(harness.publisher.published.lock().unwrap().len(), 2);
}

// ---------------------------------------------------------------------------
// Persistence
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_restore_identical_registry_from_checkpoint() {
    let harness = app_after_bus(&[
        D1_DISCOVERY,
        (
            "d1/telemetry",
            r#"{"temperature": 21.5, "channelStates": [true, false]}"#,
        ),
        ("d1/status", r#"{"status": "offline"}"#),
    ])
    .await;

    let dir = tempfile::tempdir().unwrap();
    let store = JsonSnapshotStore::new(dir.path().join("state.json"));
    checkpoint::save_now(&harness.registry, &store).await.unwrap();

    let fresh = DeviceRegistry::new();
    checkpoint::restore(&fresh, &store).await;

    assert_eq!(fresh.snapshot().await, harness.registry.snapshot().await);
}

#[tokio::test]
async fn should_start_empty_when_checkpoint_is_corrupt() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");
    tokio::fs::write(&path, b"{ definitely not json")
        .await
        .unwrap();

    let registry = DeviceRegistry::new();
    checkpoint::restore(&registry, &JsonSnapshotStore::new(path)).await;

    assert!(registry.snapshot().await.is_empty());
}
