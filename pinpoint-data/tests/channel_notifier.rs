//! HTTP contract tests for [`ChannelNotifier`] against a mock chat API.

use std::time::Duration;

use chrono::Utc;
use pinpoint_core::{Coordinate, NewCoordinate, NotificationError, NotificationSink};
use pinpoint_data::{ChannelNotifier, ChannelNotifierConfig};
use serde_json::json;
use tokio::runtime::Handle;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_partial_json, header, method, path},
};

fn coordinate() -> Coordinate {
    NewCoordinate::new(10, 64, -20, "Coords: X: 10, Y: 64, Z: -20", Utc::now())
        .into_coordinate(7, Utc::now())
}

fn notifier(server: &MockServer) -> ChannelNotifier {
    let config = ChannelNotifierConfig::new("secret-token", "1234")
        .with_api_base(server.uri())
        .with_timeout(Duration::from_secs(2));
    ChannelNotifier::new(config, Handle::current()).expect("notifier builds")
}

#[tokio::test]
async fn posts_announcement_with_bot_authorisation() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/channels/1234/messages"))
        .and(header("authorization", "Bot secret-token"))
        .and(body_partial_json(json!({
            "embeds": [{
                "title": "New Coordinate Logged",
                "description": "**Coords:** `10, 64, -20`",
                "footer": {"text": "ID: #7 \u{2022} Sent by Glazed"}
            }]
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    notifier(&server)
        .send(&coordinate())
        .await
        .expect("announcement accepted");
}

#[tokio::test]
async fn reports_rejected_announcements() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(403).set_body_string("Missing Access"))
        .mount(&server)
        .await;

    let error = notifier(&server)
        .send(&coordinate())
        .await
        .expect_err("forbidden channel");

    assert_eq!(
        error,
        NotificationError::Rejected {
            status: 403,
            body: "Missing Access".to_owned(),
        }
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn deliver_returns_before_the_request_completes() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(200)))
        .mount(&server)
        .await;
    let sink = notifier(&server);

    sink.deliver(&coordinate()).expect("delivery is handed off");

    let mut received = 0;
    for _ in 0..50 {
        received = server
            .received_requests()
            .await
            .map_or(0, |requests| requests.len());
        if received > 0 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    assert_eq!(received, 1);
}
