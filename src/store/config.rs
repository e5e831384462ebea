use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use super::Store;
use crate::error::StoreError;
use crate::state::StateMap;

/// A named action: receives the store and an optional payload.
///
/// Actions are expected to call [`Store::commit`], either inline or later from
/// a spawned task holding a cloned store.
pub type Action = Arc<dyn Fn(&Store, Option<Value>) + Send + Sync>;

/// A named mutation: maps the current state and a payload to the next state.
pub type Mutation = Arc<dyn Fn(StateMap, Option<Value>) -> StateMap + Send + Sync>;

/// Construction options for a [`Store`].
///
/// Every option is optional; an empty config builds a store with no actions,
/// no mutations and an empty state.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use vessel::{Store, StoreConfig};
///
/// let config = StoreConfig::new()
///     .mutation("increment", |mut state, payload| {
///         let by = payload.and_then(|p| p.as_i64()).unwrap_or(1);
///         let count = state.get("count").and_then(|c| c.as_i64()).unwrap_or(0);
///         state.insert("count".into(), json!(count + by));
///         state
///     })
///     .action("increment", |store, payload| {
///         store.commit("increment", payload);
///     })
///     .initial_state_value(json!({ "count": 0 }))
///     .unwrap();
///
/// let store = Store::new(config);
/// assert!(store.dispatch("increment", json!(2)));
/// assert_eq!(store.get("count"), Some(json!(2)));
/// ```
#[derive(Clone, Default)]
pub struct StoreConfig {
    pub(crate) actions: HashMap<String, Action>,
    pub(crate) mutations: HashMap<String, Mutation>,
    pub(crate) initial_state: StateMap,
}

impl StoreConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an action under `name`, replacing any previous one.
    pub fn action<F>(mut self, name: impl Into<String>, action: F) -> Self
    where
        F: Fn(&Store, Option<Value>) + Send + Sync + 'static,
    {
        self.actions.insert(name.into(), Arc::new(action));
        self
    }

    /// Register a mutation under `name`, replacing any previous one.
    pub fn mutation<F>(mut self, name: impl Into<String>, mutation: F) -> Self
    where
        F: Fn(StateMap, Option<Value>) -> StateMap + Send + Sync + 'static,
    {
        self.mutations.insert(name.into(), Arc::new(mutation));
        self
    }

    pub fn initial_state(mut self, state: StateMap) -> Self {
        self.initial_state = state;
        self
    }

    /// Use a JSON value as the initial state. Only objects are accepted.
    pub fn initial_state_value(self, value: Value) -> Result<Self, StoreError> {
        match value {
            Value::Object(map) => Ok(self.initial_state(map)),
            other => Err(StoreError::InvalidInitialState(json_type(&other))),
        }
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

impl fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut actions: Vec<_> = self.actions.keys().collect();
        actions.sort();
        let mut mutations: Vec<_> = self.mutations.keys().collect();
        mutations.sort();
        f.debug_struct("StoreConfig")
            .field("actions", &actions)
            .field("mutations", &mutations)
            .field("initial_state", &self.initial_state)
            .finish()
    }
}
