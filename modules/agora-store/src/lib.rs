//! Durable local persistence for the catalog.
//!
//! A `CatalogStore` holds the in-memory collections and writes them through
//! a `StorageBackend` — a small key-value seam with a file-backed
//! implementation for real use and an in-memory one for tests. The write
//! path is defensive: backup before overwrite, verify after write, restore
//! on failure, and a bounded trim-and-retry recovery when the backend
//! reports its capacity exceeded.

mod autosave;
mod backend;
mod catalog;
mod seed;

pub use autosave::spawn_autosave;
pub use backend::{FileBackend, MemoryBackend, StorageBackend, StorageError};
pub use catalog::{slots, CatalogStore};
pub use seed::{bootstrap, HttpSeedSource, SeedSource};
