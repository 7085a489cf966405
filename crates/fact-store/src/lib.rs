//! Fact Store
//!
//! Holds the symbolic key/value observations collected during one diagnosis
//! session. Keys are unique; declaring a key again replaces its value.

mod store;

pub use store::{Fact, FactStore};
