//! Periodic state broadcaster.
//!
//! Polls the robot's data channel at a fixed cadence and fans each sampled
//! snapshot out to every active WebSocket subscriber. Polling is skipped
//! entirely while nobody is subscribed, so an idle relay puts no load on
//! the controller.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use robot_link::{CobotData, StateSnapshot};
use tokio::sync::{mpsc, RwLock};
use uuid::Uuid;

#[cfg(test)]
mod tests;

pub type SubscriberId = Uuid;

/// Owns the active subscriber set and the poll-and-fan-out loop.
///
/// The set is the only shared mutable state: the accept path inserts, the
/// broadcast path removes on delivery failure. Both go through the same
/// `RwLock`, so a cycle never iterates a set that is being mutated.
pub struct StateBroadcaster {
    subscribers: RwLock<HashMap<SubscriberId, mpsc::UnboundedSender<String>>>,
    data_source: Arc<dyn CobotData>,
    period: Duration,
}

impl StateBroadcaster {
    pub fn new(data_source: Arc<dyn CobotData>, period: Duration) -> Self {
        Self {
            subscribers: RwLock::new(HashMap::new()),
            data_source,
            period,
        }
    }

    /// Add a subscriber and hand back its delivery channel.
    ///
    /// Registering an id that is already present supersedes the previous
    /// registration: the old sender is dropped, so the old delivery path
    /// closes and exactly one logical target remains per identity.
    pub async fn register(&self, id: SubscriberId) -> mpsc::UnboundedReceiver<String> {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut subscribers = self.subscribers.write().await;
        if subscribers.insert(id, tx).is_some() {
            tracing::debug!("Subscriber {} re-registered, superseding", id);
        }
        rx
    }

    /// Remove a subscriber. A no-op when the id is not in the set.
    pub async fn unregister(&self, id: SubscriberId) {
        let mut subscribers = self.subscribers.write().await;
        subscribers.remove(&id);
    }

    pub async fn subscriber_count(&self) -> usize {
        self.subscribers.read().await.len()
    }

    /// One broadcast cycle. Returns the number of delivery attempts.
    ///
    /// Skips the state query when the set is empty. A state-query failure
    /// skips the cycle with a warning; the loop retries next period rather
    /// than terminating and silently stopping all delivery.
    pub async fn broadcast_once(&self) -> usize {
        if self.subscribers.read().await.is_empty() {
            return 0;
        }

        let state = match self.data_source.request_data().await {
            Ok(state) => state,
            Err(e) => {
                tracing::warn!("State query failed, skipping cycle: {}", e);
                return 0;
            }
        };

        let snapshot = StateSnapshot::from(&state);
        let message = match serde_json::to_string(&snapshot) {
            Ok(json) => json,
            Err(e) => {
                tracing::error!("Failed to serialize state snapshot: {}", e);
                return 0;
            }
        };

        // Deliver the same serialized snapshot to every current subscriber.
        // Failures are collected and resolved after the pass so one dead
        // connection never blocks delivery to the rest.
        let mut failed = Vec::new();
        let attempts;
        {
            let subscribers = self.subscribers.read().await;
            attempts = subscribers.len();
            for (id, tx) in subscribers.iter() {
                if tx.send(message.clone()).is_err() {
                    failed.push(*id);
                }
            }
        }

        if !failed.is_empty() {
            let mut subscribers = self.subscribers.write().await;
            for id in failed {
                if subscribers.remove(&id).is_some() {
                    tracing::warn!(
                        "Dropping subscriber {} after failed delivery (remaining: {})",
                        id,
                        subscribers.len()
                    );
                }
            }
        }

        attempts
    }

    /// The broadcast loop. Runs for the lifetime of the process; the cadence
    /// is fixed regardless of how long poll plus delivery took.
    pub async fn run(self: Arc<Self>) {
        let mut interval = tokio::time::interval(self.period);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            interval.tick().await;
            self.broadcast_once().await;
        }
    }
}
