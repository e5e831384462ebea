use std::fmt;

use serde::Serialize;

/// The phase the store last entered.
///
/// Purely diagnostic: nothing in the store gates on it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// No dispatch or commit in flight; set after every intercepted write.
    #[default]
    Resting,
    /// An action was dispatched and has not produced a write yet.
    Action,
    /// A mutation is computing the next state.
    Mutation,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Resting => "resting",
            Status::Action => "action",
            Status::Mutation => "mutation",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
