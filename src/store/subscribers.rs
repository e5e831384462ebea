use std::sync::{Arc, Weak};

use parking_lot::RwLock;

use crate::state::StateMap;

/// A callback invoked with the full state after every intercepted write.
pub type Subscriber = Arc<dyn Fn(&StateMap) + Send + Sync>;

/// Ordered subscriber list. Insertion order is invocation order.
#[derive(Default)]
pub(crate) struct Subscribers {
    next_id: usize,
    entries: Vec<(usize, Subscriber)>,
}

impl Subscribers {
    pub(crate) fn push(&mut self, subscriber: Subscriber) -> usize {
        let id = self.next_id;
        self.next_id += 1;
        self.entries.push((id, subscriber));
        id
    }

    pub(crate) fn remove(&mut self, id: usize) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry, _)| *entry != id);
        self.entries.len() != before
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    /// Clone the callbacks out so they can run without the lock held.
    pub(crate) fn snapshot(&self) -> Vec<Subscriber> {
        self.entries.iter().map(|(_, s)| Arc::clone(s)).collect()
    }
}

/// RAII guard for a subscriber registered with [`Store::watch`](crate::Store::watch).
///
/// Dropping the guard removes the subscriber. The guard does not keep the
/// store alive.
#[must_use = "dropping the guard unsubscribes immediately"]
pub struct SubscriptionGuard {
    id: usize,
    registry: Weak<RwLock<Subscribers>>,
}

impl SubscriptionGuard {
    pub(crate) fn new(id: usize, registry: &Arc<RwLock<Subscribers>>) -> Self {
        Self {
            id,
            registry: Arc::downgrade(registry),
        }
    }
}

impl Drop for SubscriptionGuard {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.write().remove(self.id);
        }
    }
}
