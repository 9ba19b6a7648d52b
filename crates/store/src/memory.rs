//! In-memory collaborator implementations.
//!
//! Backing store for unit and integration tests: a versioned map-based
//! document store, a cache that records every invalidation, and a photo
//! storage that records saves and deletes. The cache and photo storage can
//! be switched into a failing mode to exercise partial-failure paths.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, RwLock};

use async_trait::async_trait;

use photoquest_core::cache_key::CacheKey;
use photoquest_core::quest::{Photo, Quest};
use photoquest_core::types::EntityId;
use photoquest_core::user::User;

use crate::error::{CacheError, PhotoStorageError, StoreError};
use crate::traits::{CacheService, DocumentStore, PhotoStorage};

/* --------------------------------------------------------------------------
MemoryStore
-------------------------------------------------------------------------- */

/// Map-backed document store with optimistic versioned writes.
#[derive(Default)]
pub struct MemoryStore {
    quests: RwLock<BTreeMap<EntityId, Quest>>,
    users: RwLock<BTreeMap<EntityId, User>>,
    /// User ids whose next persist is forced to fail.
    failing_user_persists: Mutex<Vec<EntityId>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a fixture entity verbatim, bypassing the version check.
    pub fn seed_quest(&self, quest: &Quest) {
        self.quests
            .write()
            .unwrap()
            .insert(quest.id, quest.clone());
    }

    /// Insert a fixture entity verbatim, bypassing the version check.
    pub fn seed_user(&self, user: &User) {
        self.users.write().unwrap().insert(user.id, user.clone());
    }

    /// Force the next persist of the given user to fail with a backend
    /// error. Used to exercise mid-cascade aborts.
    pub fn fail_next_persist_of_user(&self, id: EntityId) {
        self.failing_user_persists.lock().unwrap().push(id);
    }
}

fn check_version(stored: u64, incoming: u64, entity: &'static str, id: EntityId) -> Result<(), StoreError> {
    if stored != incoming {
        return Err(StoreError::VersionConflict { entity, id });
    }
    Ok(())
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn find_quest(&self, id: EntityId) -> Result<Option<Quest>, StoreError> {
        Ok(self.quests.read().unwrap().get(&id).cloned())
    }

    async fn find_user(&self, id: EntityId) -> Result<Option<User>, StoreError> {
        Ok(self.users.read().unwrap().get(&id).cloned())
    }

    async fn find_participants(&self, quest_id: EntityId) -> Result<Vec<User>, StoreError> {
        Ok(self
            .users
            .read()
            .unwrap()
            .values()
            .filter(|user| user.quests.iter().any(|p| p.quest == quest_id))
            .cloned()
            .collect())
    }

    async fn persist_quest(&self, quest: &Quest) -> Result<(), StoreError> {
        let mut quests = self.quests.write().unwrap();
        if let Some(stored) = quests.get(&quest.id) {
            check_version(stored.version, quest.version, "Quest", quest.id)?;
        }
        let mut committed = quest.clone();
        committed.version += 1;
        quests.insert(committed.id, committed);
        Ok(())
    }

    async fn persist_user(&self, user: &User) -> Result<(), StoreError> {
        {
            let mut failing = self.failing_user_persists.lock().unwrap();
            if let Some(pos) = failing.iter().position(|id| *id == user.id) {
                failing.remove(pos);
                return Err(StoreError::Backend("injected persist failure".to_string()));
            }
        }
        let mut users = self.users.write().unwrap();
        if let Some(stored) = users.get(&user.id) {
            check_version(stored.version, user.version, "User", user.id)?;
        }
        let mut committed = user.clone();
        committed.version += 1;
        users.insert(committed.id, committed);
        Ok(())
    }

    async fn remove_quest(&self, id: EntityId) -> Result<(), StoreError> {
        self.quests.write().unwrap().remove(&id);
        Ok(())
    }
}

/* --------------------------------------------------------------------------
MemoryCache
-------------------------------------------------------------------------- */

/// Cache that records every invalidation it receives.
#[derive(Default)]
pub struct MemoryCache {
    invalidated: Mutex<Vec<CacheKey>>,
    failing: AtomicBool,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent invalidation fail.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn invalidations(&self) -> Vec<CacheKey> {
        self.invalidated.lock().unwrap().clone()
    }

    pub fn was_invalidated(&self, key: &CacheKey) -> bool {
        self.invalidated.lock().unwrap().contains(key)
    }

    pub fn clear(&self) {
        self.invalidated.lock().unwrap().clear();
    }
}

#[async_trait]
impl CacheService for MemoryCache {
    async fn invalidate(&self, key: CacheKey) -> Result<(), CacheError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(CacheError("injected cache failure".to_string()));
        }
        self.invalidated.lock().unwrap().push(key);
        Ok(())
    }
}

/* --------------------------------------------------------------------------
MemoryPhotoStorage
-------------------------------------------------------------------------- */

/// Photo storage that records the urls it was asked to save and delete,
/// and the order of the calls themselves.
#[derive(Default)]
pub struct MemoryPhotoStorage {
    saved: Mutex<Vec<String>>,
    deleted: Mutex<Vec<String>>,
    calls: Mutex<Vec<&'static str>>,
    fail_saves: AtomicBool,
    fail_deletes: AtomicBool,
}

impl MemoryPhotoStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_fail_saves(&self, failing: bool) {
        self.fail_saves.store(failing, Ordering::SeqCst);
    }

    pub fn set_fail_deletes(&self, failing: bool) {
        self.fail_deletes.store(failing, Ordering::SeqCst);
    }

    pub fn saved_urls(&self) -> Vec<String> {
        self.saved.lock().unwrap().clone()
    }

    pub fn deleted_urls(&self) -> Vec<String> {
        self.deleted.lock().unwrap().clone()
    }

    /// Call sequence, `"delete_photos"` / `"save_photos"` per invocation.
    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl PhotoStorage for MemoryPhotoStorage {
    async fn save_photos(&self, photos: &[Photo]) -> Result<(), PhotoStorageError> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(PhotoStorageError("injected save failure".to_string()));
        }
        self.calls.lock().unwrap().push("save_photos");
        let mut saved = self.saved.lock().unwrap();
        saved.extend(photos.iter().map(|p| p.url.clone()));
        Ok(())
    }

    async fn delete_photos(&self, photos: &[Photo]) -> Result<(), PhotoStorageError> {
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(PhotoStorageError("injected delete failure".to_string()));
        }
        self.calls.lock().unwrap().push("delete_photos");
        let mut deleted = self.deleted.lock().unwrap();
        deleted.extend(photos.iter().map(|p| p.url.clone()));
        Ok(())
    }
}

/* --------------------------------------------------------------------------
Tests
-------------------------------------------------------------------------- */
