//! HTTP contract of the `serve` router, exercised over a real socket.

use std::sync::Arc;

use crate::serve::{AppState, router};
use pinpoint_core::{
    CoordinateStore, IngestionPipeline, MemoryCoordinateStore, NoopSink, QueryEngine,
    test_support::{FailingStore, RecordingSink},
};
use rstest::rstest;
use serde_json::{Value, json};
use tokio::net::TcpListener;

/// Serve `state` on an ephemeral port and return its base URL.
async fn spawn_server(state: AppState) -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let address = listener.local_addr().expect("local address");
    tokio::spawn(async move {
        axum::serve(listener, router(state))
            .await
            .expect("server runs");
    });
    format!("http://{address}")
}

fn memory_state() -> (Arc<MemoryCoordinateStore>, Arc<RecordingSink>, AppState) {
    let store = Arc::new(MemoryCoordinateStore::default());
    let sink = Arc::new(RecordingSink::default());
    let state = AppState::new(
        IngestionPipeline::new(store.clone(), sink.clone()),
        QueryEngine::new(store.clone()),
    );
    (store, sink, state)
}

async fn post_webhook(base: &str, body: reqwest::Body) -> (u16, Value) {
    let response = reqwest::Client::new()
        .post(format!("{base}/webhook"))
        .header("content-type", "application/json")
        .body(body)
        .send()
        .await
        .expect("webhook request");
    let status = response.status().as_u16();
    let payload = response.json().await.expect("JSON reply");
    (status, payload)
}

#[rstest]
#[tokio::test]
async fn webhook_stores_and_announces() {
    let (store, sink, state) = memory_state();
    let base = spawn_server(state).await;
    let body = json!({
        "embeds": [{
            "description": "Coords: X: -187677, Y: -47, Z: 159415",
            "timestamp": "2025-05-01T10:00:00Z"
        }]
    });

    let (status, reply) = post_webhook(&base, body.to_string().into()).await;

    assert_eq!(status, 200);
    assert_eq!(
        reply,
        json!({"success": true, "id": 1, "coords": {"x": -187_677, "y": -47, "z": 159_415}})
    );
    assert_eq!(store.count().expect("count"), 1);
    assert_eq!(sink.delivered().len(), 1);
}

#[rstest]
#[case(json!({"embeds": []}).to_string(), "No embeds found")]
#[case(json!({"embeds": [{"description": "hello"}]}).to_string(), "Could not parse coordinates")]
#[case("{not json".to_owned(), "Invalid JSON payload")]
#[tokio::test]
async fn webhook_rejects_unusable_payloads(#[case] body: String, #[case] error: &str) {
    let (store, sink, state) = memory_state();
    let base = spawn_server(state).await;

    let (status, reply) = post_webhook(&base, body.into()).await;

    assert_eq!(status, 400);
    assert_eq!(reply, json!({ "error": error }));
    assert_eq!(store.count().expect("count"), 0);
    assert!(sink.delivered().is_empty());
}

#[rstest]
#[tokio::test]
async fn health_reports_record_count() {
    let (store, _sink, state) = memory_state();
    store
        .insert(super::helpers::ping(1, 2, 3))
        .expect("seed insert");
    let base = spawn_server(state).await;

    let response = reqwest::get(format!("{base}/")).await.expect("health request");

    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.expect("JSON body");
    assert_eq!(body, json!({"status": "online", "coords_logged": 1}));
}

#[rstest]
#[tokio::test]
async fn store_failures_are_server_errors() {
    let store = Arc::new(FailingStore);
    let state = AppState::new(
        IngestionPipeline::new(store.clone(), Arc::new(NoopSink)),
        QueryEngine::new(store),
    );
    let base = spawn_server(state).await;

    let health = reqwest::get(format!("{base}/")).await.expect("health request");
    assert_eq!(health.status().as_u16(), 500);

    let body = json!({"embeds": [{"description": "X: 1 Y: 2 Z: 3"}]}).to_string();
    let (status, reply) = post_webhook(&base, body.into()).await;
    assert_eq!(status, 500);
    assert_eq!(reply, json!({"error": "Internal server error"}));
}
