/**
 * Session Broadcaster
 *
 * Fans an event out to every connection currently subscribed to a session.
 * Each connection holds the receiving end of its own unbounded FIFO channel;
 * because all broadcasts for a session are submitted from the session's
 * single-writer command loop, every receiver observes events in submission
 * order.
 *
 * A send failure means the peer is gone. The broadcaster never lets one
 * dead peer block delivery to the others: it reports the dead user ids so
 * the session actor can perform the implicit leave.
 */
use std::collections::HashMap;

use tokio::sync::mpsc;

use crate::shared::event::SessionEvent;

/// Outcome of one broadcast call
#[derive(Debug, Default)]
pub struct BroadcastOutcome {
    /// How many connections the event was delivered to
    pub delivered: usize,
    /// Connections whose channel was closed (peer gone)
    pub dead: Vec<String>,
}

/// Per-session subscriber list keyed by user id
///
/// Each subscriber is one live connection; a user reconnecting replaces its
/// subscription, and the connection id distinguishes the replacement from
/// the stale connection it displaced.
#[derive(Debug, Default)]
pub struct SessionBroadcaster {
    subscribers: HashMap<String, Subscription>,
}

#[derive(Debug)]
struct Subscription {
    connection_id: String,
    sender: mpsc::UnboundedSender<SessionEvent>,
}

impl SessionBroadcaster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a connection, returning the receiving end of its stream
    ///
    /// An existing subscription for the same user is replaced (reconnect);
    /// the displaced sender is dropped, which ends the old stream.
    pub fn subscribe(
        &mut self,
        user_id: impl Into<String>,
        connection_id: impl Into<String>,
    ) -> mpsc::UnboundedReceiver<SessionEvent> {
        let (sender, receiver) = mpsc::unbounded_channel();
        self.subscribers.insert(
            user_id.into(),
            Subscription {
                connection_id: connection_id.into(),
                sender,
            },
        );
        receiver
    }

    /// Remove a connection if `connection_id` still identifies it
    ///
    /// Returns false when the user has no subscription or has already been
    /// replaced by a newer connection; stale disconnects are ignored.
    pub fn unsubscribe(&mut self, user_id: &str, connection_id: &str) -> bool {
        match self.subscribers.get(user_id) {
            Some(subscription) if subscription.connection_id == connection_id => {
                self.subscribers.remove(user_id);
                true
            }
            _ => false,
        }
    }

    /// Remove a connection unconditionally (used for implicit leaves)
    pub fn remove(&mut self, user_id: &str) -> bool {
        self.subscribers.remove(user_id).is_some()
    }

    /// Whether the given connection is still the live one for its user
    pub fn is_current(&self, user_id: &str, connection_id: &str) -> bool {
        self.subscribers
            .get(user_id)
            .map(|s| s.connection_id == connection_id)
            .unwrap_or(false)
    }

    /// Deliver an event to every subscriber except `exclude_user_id`
    ///
    /// Delivery to healthy peers always proceeds; peers whose channel is
    /// closed are collected in the outcome for the caller to deregister.
    pub fn broadcast(
        &mut self,
        event: &SessionEvent,
        exclude_user_id: Option<&str>,
    ) -> BroadcastOutcome {
        let mut outcome = BroadcastOutcome::default();

        for (user_id, subscription) in &self.subscribers {
            if exclude_user_id == Some(user_id.as_str()) {
                continue;
            }
            if subscription.sender.send(event.clone()).is_ok() {
                outcome.delivered += 1;
            } else {
                outcome.dead.push(user_id.clone());
            }
        }

        for user_id in &outcome.dead {
            self.subscribers.remove(user_id);
        }

        if !outcome.dead.is_empty() {
            tracing::debug!(
                "[Broadcast] Pruned {} dead subscriber(s): {:?}",
                outcome.dead.len(),
                outcome.dead
            );
        }

        outcome
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}
