//! The store: action and mutation dispatch over observed state.
//!
//! Actions orchestrate, mutations compute the next state, and every
//! intercepted write fans out to subscribers.

mod config;
mod status;
mod store;
mod subscribers;

pub use config::{Action, Mutation, StoreConfig};
pub use status::Status;
pub use store::Store;
pub use subscribers::{Subscriber, SubscriptionGuard};
