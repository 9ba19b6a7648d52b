//! Collaborator boundaries for the photoquest core: the document store,
//! the read-through cache, and external photo storage.
//!
//! The services in `photoquest-service` are written entirely against the
//! traits in this crate. The `memory` module provides the in-memory
//! implementations used by unit and integration tests.

pub mod error;
pub mod memory;
pub mod traits;

pub use error::{CacheError, PhotoStorageError, StoreError};
pub use traits::{CacheService, DocumentStore, PhotoStorage};
