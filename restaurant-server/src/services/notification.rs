//! Notification Bus
//!
//! Fans every published [`Notification`] out to all currently registered
//! connections. Connections live in a `DashMap` keyed by a process-unique
//! id, each with its own unbounded channel, so subscribe, unsubscribe and
//! publish may run concurrently from any task.
//!
//! Guarantees:
//! - each connection receives each event at most once, in the order a
//!   single publisher published them
//! - a connection registered after a publish never sees that event
//! - no acknowledgement, no replay, no per-client filtering

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use shared::Notification;
use tokio::sync::mpsc;

/// Receiving side of one connection
#[derive(Debug)]
pub struct Subscription {
    pub id: u64,
    pub receiver: mpsc::UnboundedReceiver<Arc<Notification>>,
}

#[derive(Debug, Default)]
struct Registry {
    connections: DashMap<u64, mpsc::UnboundedSender<Arc<Notification>>>,
    next_id: AtomicU64,
}

/// 通知总线
///
/// Cheap to clone; clones share one connection registry.
#[derive(Debug, Clone, Default)]
pub struct NotificationBus {
    registry: Arc<Registry>,
}

impl NotificationBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new connection
    pub fn subscribe(&self) -> Subscription {
        let id = self.registry.next_id.fetch_add(1, Ordering::Relaxed);
        let (tx, receiver) = mpsc::unbounded_channel();
        self.registry.connections.insert(id, tx);
        tracing::debug!(connection_id = id, "Notification subscriber registered");
        Subscription { id, receiver }
    }

    /// Remove a connection; unknown ids are ignored
    pub fn unsubscribe(&self, id: u64) {
        if self.registry.connections.remove(&id).is_some() {
            tracing::debug!(connection_id = id, "Notification subscriber removed");
        }
    }

    /// Number of open connections
    pub fn connection_count(&self) -> usize {
        self.registry.connections.len()
    }

    /// Deliver `event` to every open connection; returns how many received it
    ///
    /// Connections whose receiver is gone are pruned.
    pub fn publish(&self, event: Notification) -> usize {
        let kind = event.kind();
        let event = Arc::new(event);

        let mut delivered = 0;
        let mut closed = Vec::new();
        for entry in self.registry.connections.iter() {
            if entry.value().send(Arc::clone(&event)).is_ok() {
                delivered += 1;
            } else {
                closed.push(*entry.key());
            }
        }

        // Removal must happen after the iteration releases its shard locks
        for id in closed {
            self.registry.connections.remove(&id);
        }

        tracing::debug!(event = kind, delivered, "Notification published");
        delivered
    }
}
