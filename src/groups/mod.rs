//! Persisted user-defined container groups

pub mod store;

pub use store::{GroupStore, GroupStoreError};
