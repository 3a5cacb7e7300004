//! Integration tests for the live WebSocket channel.

use std::time::Duration;

use futures_util::StreamExt;
use serde_json::Value;
use tokio_tungstenite::tungstenite::Message;

use metrics_hub::broadcast::LiveEvent;

mod common;

fn delta(name: &str, value: f64) -> LiveEvent {
    LiveEvent::MetricUpdated {
        name: name.to_string(),
        value,
        timestamp_ms: 0,
    }
}

async fn wait_for_subscribers(hub: &common::TestHub, expected: usize) {
    for _ in 0..100 {
        if hub.broadcaster.subscriber_count() == expected {
            return;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!(
        "subscriber count never reached {} (now {})",
        expected,
        hub.broadcaster.subscriber_count()
    );
}

/// Read frames until one carries the given metric name.
async fn next_named_event<S>(ws: &mut S, name: &str) -> Value
where
    S: StreamExt<Item = Result<Message, tokio_tungstenite::tungstenite::Error>> + Unpin,
{
    loop {
        let message = tokio::time::timeout(Duration::from_secs(2), ws.next())
            .await
            .expect("timed out waiting for event")
            .expect("socket closed")
            .expect("socket error");
        if let Message::Text(text) = message {
            let json: Value = serde_json::from_str(text.as_str()).unwrap();
            if json["data"]["name"] == name {
                return json;
            }
        }
    }
}

#[tokio::test]
async fn test_subscriber_receives_published_event() {
    let hub = common::start_hub(Vec::new(), Duration::from_secs(1)).await;
    let (mut ws, _) = tokio_tungstenite::connect_async(format!("ws://{}/live", hub.addr))
        .await
        .unwrap();
    wait_for_subscribers(&hub, 1).await;

    hub.broadcaster.publish(delta("test_metric", 12.0));

    let json = next_named_event(&mut ws, "test_metric").await;
    assert_eq!(json["event"], "MetricUpdated");
    assert_eq!(json["data"]["value"], 12.0);
}

#[tokio::test]
async fn test_events_arrive_in_publish_order() {
    let hub = common::start_hub(Vec::new(), Duration::from_secs(1)).await;
    let (mut ws, _) = tokio_tungstenite::connect_async(format!("ws://{}/live", hub.addr))
        .await
        .unwrap();
    wait_for_subscribers(&hub, 1).await;

    for i in 0..5 {
        hub.broadcaster.publish(delta("seq", i as f64));
    }

    for expected in 0..5 {
        let json = next_named_event(&mut ws, "seq").await;
        assert_eq!(json["data"]["value"], expected as f64);
    }
}

#[tokio::test]
async fn test_client_disconnect_unsubscribes() {
    let hub = common::start_hub(Vec::new(), Duration::from_secs(1)).await;
    let (mut ws, _) = tokio_tungstenite::connect_async(format!("ws://{}/live", hub.addr))
        .await
        .unwrap();
    wait_for_subscribers(&hub, 1).await;

    ws.close(None).await.unwrap();

    // The pump notices the close and drops its subscription.
    wait_for_subscribers(&hub, 0).await;

    // Publishing afterwards is a no-op, not an error.
    hub.broadcaster.publish(delta("after_close", 1.0));
    assert_eq!(hub.broadcaster.subscriber_count(), 0);
}

#[tokio::test]
async fn test_remaining_subscribers_unaffected_by_closed_peer() {
    let hub = common::start_hub(Vec::new(), Duration::from_secs(1)).await;
    let (mut first, _) = tokio_tungstenite::connect_async(format!("ws://{}/live", hub.addr))
        .await
        .unwrap();
    let (second, _) = tokio_tungstenite::connect_async(format!("ws://{}/live", hub.addr))
        .await
        .unwrap();
    let (mut third, _) = tokio_tungstenite::connect_async(format!("ws://{}/live", hub.addr))
        .await
        .unwrap();
    wait_for_subscribers(&hub, 3).await;

    drop(second); // closed externally, without a close handshake

    hub.broadcaster.publish(delta("survivors", 2.0));

    let json = next_named_event(&mut first, "survivors").await;
    assert_eq!(json["data"]["value"], 2.0);
    let json = next_named_event(&mut third, "survivors").await;
    assert_eq!(json["data"]["value"], 2.0);
}
