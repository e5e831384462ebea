use serde_json::{Map, Value};

/// The state object held by a store: string keys to arbitrary JSON values.
pub type StateMap = Map<String, Value>;

/// A state map whose top-level writes are counted.
///
/// Every `set` or `replace` bumps the revision, which the owning store uses
/// to hand subscribers the state as it is when each one runs. Deletions are
/// not intercepted, and neither is anything below the top level.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct ObservedState {
    map: StateMap,
    revision: u64,
}

impl ObservedState {
    pub(crate) fn new(map: StateMap) -> Self {
        Self { map, revision: 0 }
    }

    pub(crate) fn get(&self, key: &str) -> Option<&Value> {
        self.map.get(key)
    }

    pub(crate) fn as_map(&self) -> &StateMap {
        &self.map
    }

    pub(crate) fn revision(&self) -> u64 {
        self.revision
    }

    pub(crate) fn set(&mut self, key: String, value: Value) {
        self.map.insert(key, value);
        self.revision += 1;
    }

    /// Swap in a whole new map. The wrapper stays in place, so writes after a
    /// replacement are intercepted like any other.
    pub(crate) fn replace(&mut self, map: StateMap) {
        self.map = map;
        self.revision += 1;
    }

    /// Delete a key. Not intercepted, but still counted so a fan-out in
    /// progress picks up the change.
    pub(crate) fn remove(&mut self, key: &str) -> Option<Value> {
        let removed = self.map.remove(key);
        if removed.is_some() {
            self.revision += 1;
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn state(value: Value) -> ObservedState {
        match value {
            Value::Object(map) => ObservedState::new(map),
            _ => panic!("test state must be an object"),
        }
    }

    #[test]
    fn set_bumps_the_revision() {
        let mut s = state(json!({ "a": 1, "b": 2 }));
        s.set("a".into(), json!(10));
        assert_eq!(Value::Object(s.as_map().clone()), json!({ "a": 10, "b": 2 }));
        assert_eq!(s.get("a"), Some(&json!(10)));
        assert_eq!(s.revision(), 1);
    }

    #[test]
    fn replace_keeps_interception() {
        let mut s = state(json!({ "count": 0 }));
        s.replace(state(json!({ "count": 3 })).map);
        s.set("count".into(), json!(99));
        assert_eq!(s.get("count"), Some(&json!(99)));
        assert_eq!(s.revision(), 2);
    }

    #[test]
    fn remove_is_silent() {
        let mut s = state(json!({ "gone": true }));
        assert_eq!(s.remove("gone"), Some(json!(true)));
        assert!(s.as_map().is_empty());
        assert_eq!(s.remove("gone"), None);
        assert_eq!(s.revision(), 1);
    }
}
