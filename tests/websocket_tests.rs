//! WebSocket stream integration tests
//!
//! Each test binds a real listener on localhost and talks to `/v1/ws` with a
//! tokio-tungstenite client.

use std::sync::Arc;
use std::time::Duration;

use futures::{SinkExt, StreamExt};
use serde_json::{json, Value};
use tokio::net::TcpStream;
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};

use build_events::{start_server, Event, EventHub, ServerHandle, Status};

const TIMEOUT: Duration = Duration::from_secs(5);

type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

async fn connect(handle: &ServerHandle) -> Client {
    let url = format!("ws://{}/v1/ws", handle.local_addr().unwrap());
    let (client, _) = connect_async(url).await.unwrap();
    client
}

/// Next text message as JSON, skipping control frames
async fn next_json(client: &mut Client) -> Value {
    loop {
        let msg = tokio::time::timeout(TIMEOUT, client.next())
            .await
            .expect("message in time")
            .expect("socket still open")
            .unwrap();
        if let Message::Text(text) = msg {
            return serde_json::from_str(&text).unwrap();
        }
    }
}

async fn wait_for_no_subscribers(hub: &EventHub) {
    tokio::time::timeout(TIMEOUT, async {
        while hub.subscriber_count() > 0 {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("subscriber released");
}

#[tokio::test]
async fn test_ws_replays_history_then_streams_live() {
    let hub = Arc::new(EventHub::new());
    hub.handle(Event::build("web", Status::InProgress));

    let mut handle = start_server(Arc::clone(&hub), Some("127.0.0.1:0"))
        .await
        .unwrap();
    let mut client = connect(&handle).await;

    let connected = next_json(&mut client).await;
    assert_eq!(connected, json!({"type": "connected", "history_len": 1}));

    let replayed = next_json(&mut client).await;
    assert_eq!(replayed["type"], "log_entry");
    assert_eq!(replayed["sequence_id"], 0);
    assert_eq!(replayed["entry"], "Build started for artifact web");

    hub.handle(Event::build("web", Status::Complete));

    let live = next_json(&mut client).await;
    assert_eq!(live["type"], "log_entry");
    assert_eq!(live["sequence_id"], 1);
    assert_eq!(live["kind"], "build");
    assert_eq!(live["entry"], "Build completed for artifact web");

    client.close(None).await.unwrap();
    handle.stop().await.unwrap();
}

#[tokio::test]
async fn test_ws_close_releases_subscription() {
    let hub = Arc::new(EventHub::new());
    let mut handle = start_server(Arc::clone(&hub), Some("127.0.0.1:0"))
        .await
        .unwrap();

    let mut client = connect(&handle).await;
    assert_eq!(next_json(&mut client).await["type"], "connected");
    assert_eq!(hub.subscriber_count(), 1);

    client.close(None).await.unwrap();
    wait_for_no_subscribers(&hub).await;

    // Later entries have nobody to go to
    hub.handle(Event::deploy(Status::Complete));
    assert_eq!(hub.log_len(), 1);

    handle.stop().await.unwrap();
}

#[tokio::test]
async fn test_ws_ping_gets_pong() {
    let hub = Arc::new(EventHub::new());
    let mut handle = start_server(Arc::clone(&hub), Some("127.0.0.1:0"))
        .await
        .unwrap();

    let mut client = connect(&handle).await;
    assert_eq!(next_json(&mut client).await["type"], "connected");

    client
        .send(Message::Text(r#"{"type":"ping"}"#.to_string()))
        .await
        .unwrap();
    assert_eq!(next_json(&mut client).await, json!({"type": "pong"}));

    client.close(None).await.unwrap();
    handle.stop().await.unwrap();
}

#[tokio::test]
async fn test_ws_slow_client_gets_dropped_error() {
    let hub = Arc::new(EventHub::new().with_subscriber_buffer(1));
    let mut handle = start_server(Arc::clone(&hub), Some("127.0.0.1:0"))
        .await
        .unwrap();

    let mut client = connect(&handle).await;
    assert_eq!(
        next_json(&mut client).await,
        json!({"type": "connected", "history_len": 0})
    );

    // The connection task cannot run while these land, so its buffer overflows
    for _ in 0..10 {
        hub.handle(Event::deploy(Status::InProgress));
    }
    assert_eq!(hub.subscriber_count(), 0);
    assert_eq!(hub.log_len(), 10);

    let buffered = next_json(&mut client).await;
    assert_eq!(buffered["type"], "log_entry");
    assert_eq!(buffered["sequence_id"], 0);

    let error = next_json(&mut client).await;
    assert_eq!(error["type"], "error");
    assert_eq!(error["code"], "dropped");

    handle.stop().await.unwrap();
}

#[tokio::test]
async fn test_stop_closes_ws_clients() {
    let hub = Arc::new(EventHub::new());
    let mut handle = start_server(Arc::clone(&hub), Some("127.0.0.1:0"))
        .await
        .unwrap();

    let mut client = connect(&handle).await;
    assert_eq!(next_json(&mut client).await["type"], "connected");

    tokio::time::timeout(TIMEOUT * 2, handle.stop())
        .await
        .expect("stop returns with a client attached")
        .unwrap();

    wait_for_no_subscribers(&hub).await;
}
