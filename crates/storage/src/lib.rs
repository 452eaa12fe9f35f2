//! Storage abstraction and implementations for Fynkr.
//!
//! This crate provides the key/value persistence trait the dashboard saves
//! through, a JSON-file backend, an in-memory backend, and typed helpers
//! that encode collections under their canonical keys.

#![warn(missing_docs)]

pub mod trait_;
pub mod json_storage;
pub mod memory;
pub mod collections;

pub use trait_::{KvStore, StorageError, Result};
pub use json_storage::JsonFileStore;
pub use memory::MemoryStore;
pub use collections::{keys, load_collection, load_document, save_collection, save_document};
