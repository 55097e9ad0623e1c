//! # Storage
//!
//! Persistent preference stores.

pub mod redb_store;

pub use redb_store::RedbPreferenceStore;
