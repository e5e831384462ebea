use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use serde_json::Value;

use super::config::{Action, Mutation, StoreConfig};
use super::status::Status;
use super::subscribers::{Subscriber, Subscribers, SubscriptionGuard};
use crate::error::StoreError;
use crate::state::{ObservedState, StateMap};

/// An observable state container.
///
/// State changes through named mutations, named actions orchestrate commits,
/// and every intercepted write is delivered to the subscribers in the order
/// they subscribed. Cloning a store is cheap and yields a handle to the same
/// state, which is how async actions carry it into spawned tasks.
pub struct Store {
    actions: Arc<HashMap<String, Action>>,
    mutations: Arc<HashMap<String, Mutation>>,
    state: Arc<RwLock<ObservedState>>,
    status: Arc<RwLock<Status>>,
    subscribers: Arc<RwLock<Subscribers>>,
}

impl Store {
    /// Create a store from its configuration.
    pub fn new(config: StoreConfig) -> Self {
        let StoreConfig {
            actions,
            mutations,
            initial_state,
        } = config;

        Self {
            actions: Arc::new(actions),
            mutations: Arc::new(mutations),
            state: Arc::new(RwLock::new(ObservedState::new(initial_state))),
            status: Arc::new(RwLock::new(Status::Resting)),
            subscribers: Arc::new(RwLock::new(Subscribers::default())),
        }
    }

    /// Run the named action with `payload`.
    ///
    /// Returns `false` (and logs an error) when no such action exists.
    /// Otherwise returns `true` as soon as the action function returns; work
    /// the action spawns is not awaited.
    pub fn dispatch(&self, name: &str, payload: impl Into<Option<Value>>) -> bool {
        match self.try_dispatch(name, payload) {
            Ok(()) => true,
            Err(err) => {
                tracing::error!(action = name, "{err}");
                false
            }
        }
    }

    /// Like [`dispatch`](Self::dispatch), but hands back the lookup failure.
    pub fn try_dispatch(
        &self,
        name: &str,
        payload: impl Into<Option<Value>>,
    ) -> Result<(), StoreError> {
        let action = self
            .actions
            .get(name)
            .cloned()
            .ok_or_else(|| StoreError::UnknownAction(name.to_owned()))?;

        let _span = tracing::debug_span!("action", action = name).entered();
        self.set_status(Status::Action);
        action(self, payload.into());
        Ok(())
    }

    /// Run the named mutation and install its result as the new state.
    ///
    /// The replacement is an intercepted write: subscribers are notified and
    /// the status returns to [`Status::Resting`]. Returns `false` (and logs a
    /// warning) when no such mutation exists.
    ///
    /// The mutation runs under the state's write lock, so concurrent commits
    /// are applied one after another and none is lost. A mutation must not
    /// call back into the store.
    pub fn commit(&self, name: &str, payload: impl Into<Option<Value>>) -> bool {
        match self.try_commit(name, payload) {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(mutation = name, "{err}");
                false
            }
        }
    }

    /// Like [`commit`](Self::commit), but hands back the lookup failure.
    pub fn try_commit(
        &self,
        name: &str,
        payload: impl Into<Option<Value>>,
    ) -> Result<(), StoreError> {
        let mutation = self
            .mutations
            .get(name)
            .cloned()
            .ok_or_else(|| StoreError::UnknownMutation(name.to_owned()))?;

        tracing::debug!(mutation = name, "committing");
        self.set_status(Status::Mutation);

        {
            let mut state = self.state.write();
            // Cloned rather than taken so a panicking mutation leaves the
            // state intact.
            let next = mutation(state.as_map().clone(), payload.into());
            state.replace(next);
        }
        self.intercept();
        Ok(())
    }

    /// Call every subscriber, in subscription order, with `data`.
    ///
    /// Returns `false` when nobody is subscribed. A panicking subscriber is
    /// not caught and stops the remaining notifications.
    pub fn process_callbacks(&self, data: &StateMap) -> bool {
        let subscribers = self.subscribers.read().snapshot();
        if subscribers.is_empty() {
            return false;
        }

        tracing::trace!(subscribers = subscribers.len(), "notifying subscribers");
        for subscriber in &subscribers {
            subscriber(data);
        }
        true
    }

    /// Subscribe to state changes for the lifetime of the store.
    ///
    /// Always succeeds; the typed signature rules out non-callables.
    pub fn subscribe<F>(&self, callback: F) -> bool
    where
        F: Fn(&StateMap) + Send + Sync + 'static,
    {
        self.subscribers.write().push(Arc::new(callback));
        true
    }

    /// Subscribe with a dynamically typed candidate.
    ///
    /// Accepts a [`Subscriber`] or a `Box<dyn Fn(&StateMap) + Send + Sync>`.
    /// Anything else is logged and rejected with `false`.
    pub fn subscribe_dyn(&self, candidate: Box<dyn Any + Send + Sync>) -> bool {
        let subscriber: Subscriber = match candidate.downcast::<Subscriber>() {
            Ok(subscriber) => *subscriber,
            Err(other) => match other.downcast::<Box<dyn Fn(&StateMap) + Send + Sync>>() {
                Ok(boxed) => Arc::from(*boxed),
                Err(_) => {
                    tracing::error!("{}", StoreError::InvalidSubscriber);
                    return false;
                }
            },
        };

        self.subscribers.write().push(subscriber);
        true
    }

    /// Subscribe until the returned guard is dropped.
    pub fn watch<F>(&self, callback: F) -> SubscriptionGuard
    where
        F: Fn(&StateMap) + Send + Sync + 'static,
    {
        let id = self.subscribers.write().push(Arc::new(callback));
        SubscriptionGuard::new(id, &self.subscribers)
    }

    /// Write a top-level key. Subscribers are notified before this returns.
    pub fn set(&self, key: impl Into<String>, value: impl Into<Value>) -> bool {
        let key = key.into();
        tracing::trace!(key = %key, "state write");
        self.state.write().set(key, value.into());
        self.intercept();
        true
    }

    /// Delete a top-level key without notifying anyone.
    pub fn remove(&self, key: &str) -> Option<Value> {
        self.state.write().remove(key)
    }

    /// Get a clone of the current state.
    pub fn state(&self) -> StateMap {
        self.state.read().as_map().clone()
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.state.read().get(key).cloned()
    }

    /// Read state without cloning it.
    ///
    /// The state is locked for the duration of `f`; do not write to the
    /// store from inside it.
    pub fn read<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&StateMap) -> R,
    {
        let state = self.state.read();
        f(state.as_map())
    }

    pub fn status(&self) -> Status {
        *self.status.read()
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.read().len()
    }

    pub fn has_action(&self, name: &str) -> bool {
        self.actions.contains_key(name)
    }

    pub fn has_mutation(&self, name: &str) -> bool {
        self.mutations.contains_key(name)
    }

    fn set_status(&self, status: Status) {
        *self.status.write() = status;
    }

    /// Deliver the current state to every subscriber, then rest.
    ///
    /// The state is re-read before each subscriber whenever an earlier one
    /// wrote to the store, so nobody is handed a state that has already been
    /// replaced.
    fn intercept(&self) {
        let subscribers = self.subscribers.read().snapshot();
        if !subscribers.is_empty() {
            tracing::trace!(subscribers = subscribers.len(), "notifying subscribers");
            let mut current: Option<(u64, StateMap)> = None;
            for subscriber in &subscribers {
                let snapshot = {
                    let state = self.state.read();
                    match current.take() {
                        Some((revision, map)) if revision == state.revision() => (revision, map),
                        _ => (state.revision(), state.as_map().clone()),
                    }
                };
                subscriber(&snapshot.1);
                current = Some(snapshot);
            }
        }
        self.set_status(Status::Resting);
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new(StoreConfig::default())
    }
}

impl Clone for Store {
    fn clone(&self) -> Self {
        Self {
            actions: Arc::clone(&self.actions),
            mutations: Arc::clone(&self.mutations),
            state: Arc::clone(&self.state),
            status: Arc::clone(&self.status),
            subscribers: Arc::clone(&self.subscribers),
        }
    }
}

impl fmt::Debug for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("state", &*self.state.read())
            .field("status", &self.status())
            .field("subscribers", &self.subscriber_count())
            .finish_non_exhaustive()
    }
}
