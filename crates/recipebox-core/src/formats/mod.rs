//! # Formats
//!
//! Byte-level encodings of persisted preference entries.
//! File and database I/O live in `storage` and in the app layer.

pub mod persistence;

pub use persistence::{
    EntryHeader, EntryKind, favorites_from_bytes, favorites_to_bytes, ratings_from_bytes,
    ratings_from_raw, ratings_to_bytes,
};
