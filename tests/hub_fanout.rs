//! Integration tests driving the connection hub through its public API.
//!
//! Connections are represented by raw handle/queue pairs, the same shape
//! the WebSocket layer registers, so fan-out behavior is observable
//! without sockets.

#![allow(clippy::panic)]

use std::time::Duration;

use chrono::Utc;
use tokio::sync::mpsc;
use tokio::time::timeout;

use feedcast::domain::FeedId;
use feedcast::ws::{ConnectionHandle, ConnectionId, Hub, PushMessage};

const RECV_TIMEOUT: Duration = Duration::from_secs(1);

fn push_message(title: &str) -> PushMessage {
    PushMessage::FeedCreated {
        id: FeedId::new(),
        title: title.to_string(),
        description: "d".to_string(),
        created_at: Utc::now(),
    }
}

fn connection(capacity: usize) -> (ConnectionHandle, mpsc::Receiver<String>) {
    let (tx, rx) = mpsc::channel(capacity);
    (ConnectionHandle::new(ConnectionId::new(), tx), rx)
}

async fn recv_message(rx: &mut mpsc::Receiver<String>) -> PushMessage {
    let Ok(Some(frame)) = timeout(RECV_TIMEOUT, rx.recv()).await else {
        panic!("no frame within timeout");
    };
    let Ok(message) = serde_json::from_str::<PushMessage>(&frame) else {
        panic!("frame was not a valid push message: {frame}");
    };
    message
}

fn title_of(message: &PushMessage) -> &str {
    match message {
        PushMessage::FeedCreated { title, .. } => title,
    }
}

fn spawn_hub(queue_capacity: usize) -> Hub {
    let (hub, dispatcher) = Hub::new(queue_capacity);
    tokio::spawn(dispatcher.run());
    hub
}

#[tokio::test]
async fn broadcast_reaches_every_registered_connection() {
    let hub = spawn_hub(8);
    let (a, mut rx_a) = connection(8);
    let (b, mut rx_b) = connection(8);
    let (c, mut rx_c) = connection(8);
    hub.register(a).await;
    hub.register(b).await;
    hub.register(c).await;

    hub.broadcast(push_message("m"), None).await;

    for rx in [&mut rx_a, &mut rx_b, &mut rx_c] {
        let message = recv_message(rx).await;
        assert_eq!(title_of(&message), "m");
    }
}

#[tokio::test]
async fn excluded_connection_does_not_receive() {
    let hub = spawn_hub(8);
    let (a, mut rx_a) = connection(8);
    let (b, mut rx_b) = connection(8);
    let (c, mut rx_c) = connection(8);
    let excluded = b.id();
    hub.register(a).await;
    hub.register(b).await;
    hub.register(c).await;

    hub.broadcast(push_message("m1"), Some(excluded)).await;
    hub.broadcast(push_message("m2"), None).await;

    assert_eq!(title_of(&recv_message(&mut rx_a).await), "m1");
    assert_eq!(title_of(&recv_message(&mut rx_c).await), "m1");
    // The excluded connection's first observed frame is the second
    // broadcast, proving the first never reached its queue.
    assert_eq!(title_of(&recv_message(&mut rx_b).await), "m2");
}

#[tokio::test]
async fn sequential_broadcasts_arrive_in_order() {
    let hub = spawn_hub(8);
    let (a, mut rx_a) = connection(8);
    let (b, mut rx_b) = connection(8);
    hub.register(a).await;
    hub.register(b).await;

    hub.broadcast(push_message("m1"), None).await;
    hub.broadcast(push_message("m2"), None).await;

    for rx in [&mut rx_a, &mut rx_b] {
        assert_eq!(title_of(&recv_message(rx).await), "m1");
        assert_eq!(title_of(&recv_message(rx).await), "m2");
    }
}

#[tokio::test]
async fn slow_connection_is_evicted_without_stalling_the_rest() {
    let hub = spawn_hub(8);
    // The slow connection can hold exactly one undrained frame.
    let (slow, mut slow_rx) = connection(1);
    let (fast_a, mut fast_a_rx) = connection(8);
    let (fast_b, mut fast_b_rx) = connection(8);
    hub.register(slow).await;
    hub.register(fast_a).await;
    hub.register(fast_b).await;

    // First broadcast fills the slow queue; the second overflows it and
    // triggers eviction.
    hub.broadcast(push_message("m1"), None).await;
    hub.broadcast(push_message("m2"), None).await;

    for rx in [&mut fast_a_rx, &mut fast_b_rx] {
        assert_eq!(title_of(&recv_message(rx).await), "m1");
        assert_eq!(title_of(&recv_message(rx).await), "m2");
    }

    // The evicted connection drains its single enqueued frame, then
    // observes its queue closing once the hub drops its handle.
    assert_eq!(title_of(&recv_message(&mut slow_rx).await), "m1");
    let Ok(end) = timeout(RECV_TIMEOUT, slow_rx.recv()).await else {
        panic!("evicted queue did not close");
    };
    assert!(end.is_none());

    // Later broadcasts still reach the healthy connections.
    hub.broadcast(push_message("m3"), None).await;
    assert_eq!(title_of(&recv_message(&mut fast_a_rx).await), "m3");
    assert_eq!(title_of(&recv_message(&mut fast_b_rx).await), "m3");
}

#[tokio::test]
async fn unregister_is_idempotent() {
    let hub = spawn_hub(8);
    let (a, mut rx_a) = connection(8);
    let (b, mut rx_b) = connection(8);
    let gone = a.id();
    hub.register(a).await;
    hub.register(b).await;

    hub.unregister(gone).await;
    hub.unregister(gone).await;

    hub.broadcast(push_message("m"), None).await;

    assert_eq!(title_of(&recv_message(&mut rx_b).await), "m");
    // The unregistered connection's queue closed instead of receiving.
    let Ok(end) = timeout(RECV_TIMEOUT, rx_a.recv()).await else {
        panic!("unregistered queue did not close");
    };
    assert!(end.is_none());
}

#[tokio::test]
async fn push_frame_decodes_to_the_broadcast_message() {
    let hub = spawn_hub(8);
    let (a, mut rx_a) = connection(8);
    hub.register(a).await;

    let sent = push_message("exact");
    hub.broadcast(sent.clone(), None).await;

    let received = recv_message(&mut rx_a).await;
    assert_eq!(received, sent);
}
