//! Trait contracts consumed by the services.

use async_trait::async_trait;

use photoquest_core::cache_key::CacheKey;
use photoquest_core::quest::{Photo, Quest};
use photoquest_core::types::EntityId;
use photoquest_core::user::User;

use crate::error::{CacheError, PhotoStorageError, StoreError};

/// Generic document store. Relationship resolution is materialized before
/// entities reach the core: a loaded [`Quest`] already carries its photos,
/// a loaded [`User`] its participations.
///
/// Persists are versioned: implementations compare the entity's `version`
/// field against the stored one and reject stale writes with
/// [`StoreError::VersionConflict`], bumping the stored version on success.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn find_quest(&self, id: EntityId) -> Result<Option<Quest>, StoreError>;

    async fn find_user(&self, id: EntityId) -> Result<Option<User>, StoreError>;

    /// Every user holding a participation that references the quest,
    /// the author included.
    async fn find_participants(&self, quest_id: EntityId) -> Result<Vec<User>, StoreError>;

    async fn persist_quest(&self, quest: &Quest) -> Result<(), StoreError>;

    async fn persist_user(&self, user: &User) -> Result<(), StoreError>;

    async fn remove_quest(&self, id: EntityId) -> Result<(), StoreError>;
}

/// Read-through cache. Invalidation is best-effort: implementations may
/// fail, but callers never let that fail the mutation that triggered it.
#[async_trait]
pub trait CacheService: Send + Sync {
    async fn invalidate(&self, key: CacheKey) -> Result<(), CacheError>;
}

/// External photo file storage. Save and delete are atomic from the core's
/// point of view.
#[async_trait]
pub trait PhotoStorage: Send + Sync {
    async fn save_photos(&self, photos: &[Photo]) -> Result<(), PhotoStorageError>;

    async fn delete_photos(&self, photos: &[Photo]) -> Result<(), PhotoStorageError>;
}
