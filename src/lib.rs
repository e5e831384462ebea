//! # Vessel
//!
//! A minimal observable state container for Rust.
//!
//! A [`Store`] holds a flat JSON state object and changes it in three ways:
//!
//! ## Mutations
//!
//! Named functions that take the current state and a payload and return the
//! next state. Run them with [`Store::commit`].
//!
//! ## Actions
//!
//! Named functions that receive the store and a payload and are expected to
//! commit mutations, either inline or later from spawned async work. Run them
//! with [`Store::dispatch`].
//!
//! ## Direct writes
//!
//! [`Store::set`] writes a single top-level key.
//!
//! Every write is intercepted and delivered to subscribers in subscription
//! order before the writing call returns. Lookups of unknown actions or
//! mutations are reported through `tracing` and signalled by a `false` return.
//!
//! ```
//! use std::sync::atomic::{AtomicI64, Ordering};
//! use std::sync::Arc;
//!
//! use serde_json::json;
//! use vessel::{Store, StoreConfig};
//!
//! let store = Store::new(
//!     StoreConfig::new()
//!         .mutation("rename", |mut state, payload| {
//!             state.insert("name".into(), payload.unwrap_or_default());
//!             state
//!         })
//!         .action("rename", |store, payload| {
//!             store.commit("rename", payload);
//!         }),
//! );
//!
//! let writes = Arc::new(AtomicI64::new(0));
//! let counter = writes.clone();
//! store.subscribe(move |_state| {
//!     counter.fetch_add(1, Ordering::SeqCst);
//! });
//!
//! assert!(store.dispatch("rename", json!("vessel")));
//! assert!(!store.dispatch("missing", None));
//! assert_eq!(store.get("name"), Some(json!("vessel")));
//! assert_eq!(writes.load(Ordering::SeqCst), 1);
//! ```

pub mod error;
mod state;
pub mod store;

// Re-export main types for convenience
pub use error::StoreError;
pub use state::StateMap;
pub use store::{Action, Mutation, Status, Store, StoreConfig, Subscriber, SubscriptionGuard};
