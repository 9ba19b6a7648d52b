//! Errors surfaced by the collaborator boundaries.

use photoquest_core::types::EntityId;

/// Document store failure.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: EntityId },

    /// The persisted entity was modified since it was loaded. Writes carry
    /// the version they were read at; a mismatch rejects the write.
    #[error("Version conflict persisting {entity} with id {id}")]
    VersionConflict { entity: &'static str, id: EntityId },

    #[error("Store backend error: {0}")]
    Backend(String),
}

/// Cache invalidation failure. Always non-fatal to the calling mutation;
/// callers log it and continue.
#[derive(Debug, thiserror::Error)]
#[error("Cache backend error: {0}")]
pub struct CacheError(pub String);

/// External photo storage failure.
#[derive(Debug, thiserror::Error)]
#[error("Photo storage error: {0}")]
pub struct PhotoStorageError(pub String);
