//! Tests for StateBroadcaster
//!
//! Verifies the empty-set skip, per-cycle delivery guarantees, removal of
//! failed subscribers, duplicate registration, and the state-query failure
//! policy.

use super::*;

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use robot_link::{LinkError, SystemState};

/// Counting state source; optionally fails the first query.
struct ScriptedSource {
    queries: AtomicUsize,
    fail_next: AtomicBool,
}

impl ScriptedSource {
    fn new() -> Self {
        Self {
            queries: AtomicUsize::new(0),
            fail_next: AtomicBool::new(false),
        }
    }

    fn failing_once() -> Self {
        let source = Self::new();
        source.fail_next.store(true, Ordering::SeqCst);
        source
    }

    fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CobotData for ScriptedSource {
    async fn request_data(&self) -> Result<SystemState, LinkError> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(LinkError::Disconnected);
        }
        Ok(SystemState {
            jnt_ang: [0.0; 6],
            jnt_ref: [0.0; 6],
            tcp_ref: [400.0, 0.0, 300.0, 0.0, 0.0, 0.0],
            tcp_pos: [400.0, 0.0, 300.0, 0.0, 0.0, 0.0],
            is_freedrive_mode: false,
            real_vs_simulation_mode: 1,
        })
    }
}

fn broadcaster_with_source() -> (Arc<ScriptedSource>, StateBroadcaster) {
    let source = Arc::new(ScriptedSource::new());
    let broadcaster = StateBroadcaster::new(source.clone(), Duration::from_millis(200));
    (source, broadcaster)
}

#[tokio::test]
async fn empty_set_skips_the_state_query() {
    let (source, broadcaster) = broadcaster_with_source();

    let attempts = broadcaster.broadcast_once().await;

    assert_eq!(attempts, 0);
    assert_eq!(source.query_count(), 0);
}

#[tokio::test]
async fn all_subscribers_receive_the_same_snapshot() {
    let (source, broadcaster) = broadcaster_with_source();
    let mut rx_a = broadcaster.register(Uuid::new_v4()).await;
    let mut rx_b = broadcaster.register(Uuid::new_v4()).await;

    let attempts = broadcaster.broadcast_once().await;

    assert_eq!(attempts, 2);
    assert_eq!(source.query_count(), 1);

    let msg_a = rx_a.recv().await.unwrap();
    let msg_b = rx_b.recv().await.unwrap();
    assert_eq!(msg_a, msg_b);

    let value: serde_json::Value = serde_json::from_str(&msg_a).unwrap();
    assert_eq!(value["jnt_ang"].as_array().unwrap().len(), 6);
    assert_eq!(value["real_vs_simulation"], "Sim");
}

#[tokio::test]
async fn failed_subscriber_is_removed_without_affecting_peers() {
    let (_, broadcaster) = broadcaster_with_source();
    let dead_id = Uuid::new_v4();
    let rx_dead = broadcaster.register(dead_id).await;
    let mut rx_live = broadcaster.register(Uuid::new_v4()).await;

    // Simulate a closed connection: the receiving side goes away.
    drop(rx_dead);

    // Cycle K: both targets are attempted, the live one still gets its copy.
    let attempts = broadcaster.broadcast_once().await;
    assert_eq!(attempts, 2);
    assert!(rx_live.recv().await.is_some());

    // Cycle K+1 starts without the dead subscriber.
    assert_eq!(broadcaster.subscriber_count().await, 1);
    let attempts = broadcaster.broadcast_once().await;
    assert_eq!(attempts, 1);
}

#[tokio::test]
async fn duplicate_registration_supersedes() {
    let (_, broadcaster) = broadcaster_with_source();
    let id = Uuid::new_v4();

    let mut rx_old = broadcaster.register(id).await;
    let mut rx_new = broadcaster.register(id).await;

    assert_eq!(broadcaster.subscriber_count().await, 1);

    let attempts = broadcaster.broadcast_once().await;
    assert_eq!(attempts, 1);
    assert!(rx_new.recv().await.is_some());
    // The superseded delivery path is closed, not a second target.
    assert!(rx_old.recv().await.is_none());
}

#[tokio::test]
async fn unregister_is_idempotent() {
    let (_, broadcaster) = broadcaster_with_source();
    let id = Uuid::new_v4();
    let _rx = broadcaster.register(id).await;

    broadcaster.unregister(Uuid::new_v4()).await;
    assert_eq!(broadcaster.subscriber_count().await, 1);

    broadcaster.unregister(id).await;
    broadcaster.unregister(id).await;
    assert_eq!(broadcaster.subscriber_count().await, 0);
}

#[tokio::test]
async fn query_failure_skips_the_cycle_and_retries() {
    let source = Arc::new(ScriptedSource::failing_once());
    let broadcaster = StateBroadcaster::new(source.clone(), Duration::from_millis(200));
    let mut rx = broadcaster.register(Uuid::new_v4()).await;

    // Failed query: no delivery, subscriber stays registered.
    assert_eq!(broadcaster.broadcast_once().await, 0);
    assert_eq!(broadcaster.subscriber_count().await, 1);

    // Next cycle succeeds.
    assert_eq!(broadcaster.broadcast_once().await, 1);
    assert!(rx.recv().await.is_some());
    assert_eq!(source.query_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn loop_stays_idle_without_subscribers() {
    let (source, broadcaster) = broadcaster_with_source();
    let broadcaster = Arc::new(broadcaster);
    tokio::spawn(broadcaster.clone().run());

    // A full second of idle loop: zero state queries.
    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(source.query_count(), 0);

    // Register one subscriber: within one period it receives one message.
    let mut rx = broadcaster.register(Uuid::new_v4()).await;
    tokio::time::sleep(Duration::from_millis(250)).await;
    assert!(rx.recv().await.is_some());
    assert!(source.query_count() >= 1);
}
