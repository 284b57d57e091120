//! Key-value persistence port for the grocer catalog.
//!
//! The catalog core never talks to a storage technology directly. It is handed
//! something implementing [`KeyValueStore`] and reads or writes whole slots
//! through it, with automatic JSON serialization.
//!
//! - [`MemoryStore`] - in-process map, for tests and embedding
//! - [`FileStore`] - one file per key under a directory
//! - [`VersionedSlot`] - a single document with optimistic concurrency
//!
//! # Example
//!
//! ```rust,ignore
//! use grocer_store::{MemoryStore, Store};
//!
//! let store = Store::new(MemoryStore::new());
//!
//! // Store a value
//! store.set("catalog:default:overlay", &document)?;
//!
//! // Retrieve a value
//! let document: Option<OverlayDocument> = store.get("catalog:default:overlay")?;
//!
//! // Delete a value
//! store.delete("catalog:default:overlay")?;
//! ```

mod error;
mod file;
mod kv;
mod versioned;

pub use error::StoreError;
pub use file::FileStore;
pub use kv::{KeyValueStore, MemoryStore, Store};
pub use versioned::{CorruptPolicy, Versioned, VersionedSlot};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{
        CorruptPolicy, FileStore, KeyValueStore, MemoryStore, Store, StoreError, Versioned,
        VersionedSlot,
    };
}
