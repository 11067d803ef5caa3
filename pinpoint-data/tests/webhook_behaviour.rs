//! Behavioural tests for the webhook contract.

use std::{cell::RefCell, sync::Arc};

use pinpoint_core::{
    CoordinateStore, IngestionPipeline, MemoryCoordinateStore, NoopSink,
    test_support::FailingStore,
};
use pinpoint_data::{WebhookBody, WebhookPayload, WebhookReply, handle_webhook};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};

/// Shared state for webhook scenarios.
struct WebhookWorld {
    store: RefCell<Option<Arc<dyn CoordinateStore>>>,
    reply: RefCell<Option<WebhookReply>>,
}

impl WebhookWorld {
    fn store(&self) -> Arc<dyn CoordinateStore> {
        self.store
            .borrow()
            .clone()
            .expect("store should be initialised by a given step")
    }

    fn post(&self, payload: WebhookPayload) {
        let pipeline = IngestionPipeline::new(self.store(), Arc::new(NoopSink));
        self.reply.replace(Some(handle_webhook(&pipeline, payload)));
    }

    fn reply(&self) -> WebhookReply {
        self.reply
            .borrow()
            .clone()
            .expect("a webhook should have been posted")
    }
}

#[fixture]
fn world() -> WebhookWorld {
    WebhookWorld {
        store: RefCell::new(None),
        reply: RefCell::new(None),
    }
}

#[given("an empty coordinate log")]
fn given_empty_log(world: &WebhookWorld) {
    world
        .store
        .replace(Some(Arc::new(MemoryCoordinateStore::default())));
}

#[given("a coordinate log whose storage is failing")]
fn given_failing_log(world: &WebhookWorld) {
    world.store.replace(Some(Arc::new(FailingStore)));
}

#[when("a webhook arrives describing \"{description}\"")]
fn webhook_with_description(world: &WebhookWorld, description: String) {
    world.post(WebhookPayload::single(description, None));
}

#[when("a webhook arrives without embeds")]
fn webhook_without_embeds(world: &WebhookWorld) {
    world.post(WebhookPayload { embeds: Some(Vec::new()) });
}

#[then("the webhook reply status is {status}")]
fn reply_status(world: &WebhookWorld, status: u16) {
    assert_eq!(world.reply().status.status_code(), status);
}

#[then("the reply reports coordinate {id} at {x}, {y}, {z}")]
fn reply_reports(world: &WebhookWorld, id: u64, x: i64, y: i64, z: i64) {
    let body = serde_json::to_value(world.reply().body).expect("serialise reply");
    assert_eq!(
        body,
        serde_json::json!({"success": true, "id": id, "coords": {"x": x, "y": y, "z": z}})
    );
}

#[then("the reply error is \"{message}\"")]
fn reply_error(world: &WebhookWorld, message: String) {
    assert_eq!(world.reply().body, WebhookBody::Error { error: message });
}

#[then("the log holds {count} coordinates")]
fn log_holds(world: &WebhookWorld, count: u64) {
    assert_eq!(world.store().count().expect("count"), count);
}

#[scenario(path = "tests/features/webhook_ingestion.feature", index = 0)]
fn well_formed_ping(world: WebhookWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/webhook_ingestion.feature", index = 1)]
fn ping_without_embeds(world: WebhookWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/webhook_ingestion.feature", index = 2)]
fn ping_with_unusable_text(world: WebhookWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/webhook_ingestion.feature", index = 3)]
fn broken_store(world: WebhookWorld) {
    let _ = world;
}
