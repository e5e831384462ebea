//! Error types for store lookups and configuration.

/// Error produced when the store cannot resolve or accept something it was
/// handed.
///
/// The boolean operations on [`Store`](crate::Store) log these through
/// `tracing` and return `false`; the `try_*` variants hand them back.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// No action is registered under this name.
    #[error("action \"{0}\" doesn't exist")]
    UnknownAction(String),

    /// No mutation is registered under this name.
    #[error("mutation \"{0}\" doesn't exist")]
    UnknownMutation(String),

    /// A dynamically typed subscriber candidate was not a callback.
    ///
    /// Only reachable through [`Store::subscribe_dyn`](crate::Store::subscribe_dyn);
    /// the typed `subscribe` path rejects non-callables at compile time.
    #[error("you can only subscribe to store changes with a valid function")]
    InvalidSubscriber,

    /// The initial state was a JSON value other than an object.
    ///
    /// Carries the JSON type that was supplied instead.
    #[error("initial state must be a JSON object, got {0}")]
    InvalidInitialState(&'static str),
}
