//! Live broadcast registry for streaming subscribers.
//!
//! Each subscriber owns a bounded channel registered under a
//! [`SubscriberId`]. Publishing pushes the line into every registered channel
//! without waiting; a subscriber whose channel is closed or full is dropped
//! from the registry and the rest still receive the line. Nothing is
//! buffered for future subscribers: registration only sees lines published
//! after it.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::debug;

use crate::settings::DEFAULT_SUBSCRIBER_BUFFER;

/// Identifies one registered subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriberId(u64);

impl fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub-{}", self.0)
    }
}

struct Inner {
    next_id: AtomicU64,
    capacity: usize,
    subscribers: Mutex<HashMap<SubscriberId, mpsc::Sender<Arc<str>>>>,
}

impl Inner {
    fn subscribers(&self) -> MutexGuard<'_, HashMap<SubscriberId, mpsc::Sender<Arc<str>>>> {
        // The map stays consistent even if a holder panicked.
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn remove(&self, id: SubscriberId) -> bool {
        let removed = self.subscribers().remove(&id).is_some();
        if removed {
            debug!(subscriber = %id, "Subscriber unregistered");
        }
        removed
    }
}

/// In-memory set of live subscribers.
///
/// Cheap to clone; clones share the same subscriber set.
#[derive(Clone)]
pub struct BroadcastRegistry {
    inner: Arc<Inner>,
}

impl BroadcastRegistry {
    /// Create a registry whose subscribers may each hold up to `capacity`
    /// undelivered lines.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Arc::new(Inner {
                next_id: AtomicU64::new(1),
                capacity: capacity.max(1),
                subscribers: Mutex::new(HashMap::new()),
            }),
        }
    }

    /// Create a registry with the default per-subscriber capacity.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(DEFAULT_SUBSCRIBER_BUFFER)
    }

    /// Register a new live output channel.
    ///
    /// The returned [`Subscription`] unregisters itself when dropped, so a
    /// closed connection cleans up without any action from publishers.
    pub fn subscribe(&self) -> Subscription {
        let id = SubscriberId(self.inner.next_id.fetch_add(1, Ordering::Relaxed));
        let (sender, receiver) = mpsc::channel(self.inner.capacity);
        self.inner.subscribers().insert(id, sender);
        debug!(subscriber = %id, "Subscriber registered");

        Subscription {
            id,
            receiver,
            registry: Arc::clone(&self.inner),
        }
    }

    /// Remove a subscriber. Unknown or already removed ids are a no-op.
    ///
    /// Returns whether a subscriber was actually removed.
    pub fn unsubscribe(&self, id: SubscriberId) -> bool {
        self.inner.remove(id)
    }

    /// Deliver `line` to every currently registered subscriber.
    ///
    /// Delivery is best-effort per subscriber: one that has gone away or
    /// stopped draining its channel is removed, and never affects the others
    /// or the caller. Returns the number of subscribers that received the line.
    pub fn publish(&self, line: &str) -> usize {
        let line: Arc<str> = Arc::from(line);
        let mut subscribers = self.inner.subscribers();

        let mut delivered = 0;
        let mut failed = Vec::new();
        for (id, sender) in subscribers.iter() {
            match sender.try_send(Arc::clone(&line)) {
                Ok(()) => delivered += 1,
                Err(TrySendError::Closed(_)) => failed.push((*id, "closed")),
                Err(TrySendError::Full(_)) => failed.push((*id, "lagging")),
            }
        }

        for (id, reason) in failed {
            subscribers.remove(&id);
            debug!(subscriber = %id, reason, "Dropped subscriber during publish");
        }
        drop(subscribers);

        debug!(delivered, "Published log line");
        delivered
    }

    /// Number of currently registered subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers().len()
    }

    /// Whether `id` is still registered.
    pub fn contains(&self, id: SubscriberId) -> bool {
        self.inner.subscribers().contains_key(&id)
    }
}

impl Default for BroadcastRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl fmt::Debug for BroadcastRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BroadcastRegistry")
            .field("subscribers", &self.subscriber_count())
            .finish_non_exhaustive()
    }
}

/// Receiving end of one live subscription.
///
/// Dropping it unregisters the subscriber.
pub struct Subscription {
    id: SubscriberId,
    receiver: mpsc::Receiver<Arc<str>>,
    registry: Arc<Inner>,
}

impl Subscription {
    pub const fn id(&self) -> SubscriberId {
        self.id
    }

    /// Wait for the next published line.
    ///
    /// Returns `None` once the subscriber has been removed from the registry
    /// and every line delivered before that has been read.
    pub async fn recv(&mut self) -> Option<Arc<str>> {
        self.receiver.recv().await
    }

    /// Take an already delivered line without waiting.
    pub fn try_recv(&mut self) -> Option<Arc<str>> {
        self.receiver.try_recv().ok()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.registry.remove(self.id);
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}
