//! End-to-end provider tests against a scripted channel server
//!
//! Exercises the full inbound path (frame → raw event → classification →
//! store → toast duration) and the outbound ack path over a real
//! WebSocket.

use creator_notify::{
    NotificationProvider, RealtimeConfig, Subject, SubjectKind,
};
use futures::{SinkExt, StreamExt};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio_tungstenite::accept_async;
use tokio_tungstenite::tungstenite::Message;

/// A scripted notification channel server
///
/// On every connection it pushes the given event frames, answers "ping"
/// with "pong", and records everything else it receives.
struct ScriptedChannelServer {
    addr: SocketAddr,
    received: Arc<Mutex<Vec<String>>>,
}

impl ScriptedChannelServer {
    async fn start(push_on_connect: Vec<String>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let received = Arc::new(Mutex::new(Vec::new()));
        let received_clone = Arc::clone(&received);

        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let push = push_on_connect.clone();
                let received = Arc::clone(&received_clone);

                tokio::spawn(async move {
                    let ws_stream = match accept_async(stream).await {
                        Ok(ws) => ws,
                        Err(_) => return,
                    };
                    let (mut write, mut read) = ws_stream.split();

                    for frame in push {
                        if write.send(Message::Text(frame)).await.is_err() {
                            return;
                        }
                    }

                    while let Some(Ok(msg)) = read.next().await {
                        if let Message::Text(text) = msg {
                            if text == "ping" {
                                if write.send(Message::Text("pong".to_string())).await.is_err() {
                                    break;
                                }
                            } else {
                                received.lock().unwrap().push(text);
                            }
                        }
                    }
                });
            }
        });

        Self { addr, received }
    }

    fn origin(&self) -> String {
        format!("http://{}", self.addr)
    }

    fn received(&self) -> Vec<String> {
        self.received.lock().unwrap().clone()
    }
}

fn test_config(origin: String) -> RealtimeConfig {
    RealtimeConfig::default()
        .with_service_origin(origin)
        .with_heartbeat_interval_secs(1)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_events_flow_into_the_store() {
    let server = ScriptedChannelServer::start(vec![
        r#"{"type": "connected", "data": {"message": "Live updates enabled"}}"#.to_string(),
        r#"{"type": "proposal_approved", "data": {"message": "Your proposal was approved", "project_id": "p1"}}"#.to_string(),
    ])
    .await;

    let provider = NotificationProvider::new(
        Subject::new(SubjectKind::Creator, "c42"),
        test_config(server.origin()),
    );
    provider.open();

    tokio::time::sleep(Duration::from_millis(700)).await;
    assert!(provider.connected());

    let notifications = provider.notifications();
    assert_eq!(notifications.len(), 2);
    assert_eq!(provider.unread_count(), 2);

    // Newest first: the approval was pushed after the welcome
    assert_eq!(notifications[0].title, "Proposal Approved");
    assert_eq!(
        notifications[0].message.as_deref(),
        Some("Your proposal was approved")
    );
    assert_eq!(notifications[1].title, "Connected");

    provider.close().await;
    assert!(!provider.connected());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_liveness_responses_create_no_notifications() {
    let server = ScriptedChannelServer::start(vec![]).await;

    let provider = NotificationProvider::new(
        Subject::new(SubjectKind::Creator, "c42"),
        test_config(server.origin()),
    );
    provider.open();

    // Long enough for at least one probe/response round trip
    tokio::time::sleep(Duration::from_millis(1600)).await;
    assert!(provider.connected(), "Heartbeating must keep the session up");

    assert!(
        provider.notifications().is_empty(),
        "The pong token must never surface as a notification"
    );
    assert_eq!(provider.unread_count(), 0);

    provider.close().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_malformed_frames_are_dropped_not_fatal() {
    let server = ScriptedChannelServer::start(vec![
        "this is not json".to_string(),
        r#"{"type": "system_alert", "data": {"message": "Scheduled maintenance"}}"#.to_string(),
    ])
    .await;

    let provider = NotificationProvider::new(
        Subject::new(SubjectKind::Admin, "ops-1"),
        test_config(server.origin()),
    );
    provider.open();

    tokio::time::sleep(Duration::from_millis(700)).await;
    assert!(provider.connected(), "A malformed frame must not kill the session");

    let notifications = provider.notifications();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].title, "System Alert");

    provider.close().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_ack_reaches_the_server() {
    let server = ScriptedChannelServer::start(vec![
        r#"{"type": "elite_inquiry_received", "data": {"message": "New inquiry"}}"#.to_string(),
    ])
    .await;

    let provider = NotificationProvider::new(
        Subject::new(SubjectKind::Creator, "c42"),
        test_config(server.origin()),
    );
    provider.open();

    tokio::time::sleep(Duration::from_millis(700)).await;
    let notifications = provider.notifications();
    assert_eq!(notifications.len(), 1);

    let id = notifications[0].id.clone();
    provider.send_ack(&id);
    provider.mark_read(&id);

    tokio::time::sleep(Duration::from_millis(500)).await;
    assert_eq!(provider.unread_count(), 0);
    assert!(
        server.received().contains(&format!("ack:{}", id)),
        "Ack frame must arrive with the fixed ack:<id> shape"
    );

    provider.close().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_close_is_idempotent() {
    let server = ScriptedChannelServer::start(vec![]).await;

    let provider = NotificationProvider::new(
        Subject::new(SubjectKind::Creator, "c42"),
        test_config(server.origin()),
    );
    provider.open();
    tokio::time::sleep(Duration::from_millis(400)).await;

    provider.close().await;
    provider.close().await; // second close is a no-op
    assert!(!provider.connected());
}
