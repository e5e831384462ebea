//! The observed state container.
//!
//! State is a flat JSON object. Writes go through explicit methods so the
//! store can intercept them and notify subscribers.

mod observed;

pub(crate) use observed::ObservedState;
pub use observed::StateMap;
