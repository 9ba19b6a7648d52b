#![allow(dead_code)]

use std::sync::Arc;

use photoquest_core::geo::GeoPoint;
use photoquest_core::photo_diff::PhotoBlock;
use photoquest_core::quest::{Photo, Quest};
use photoquest_core::types::EntityId;
use photoquest_core::user::User;
use photoquest_service::{
    LikeRegistry, ProgressPolicy, ProgressTracker, QuestEditor, QuestLifecycle,
};
use photoquest_store::memory::{MemoryCache, MemoryPhotoStorage, MemoryStore};
use photoquest_store::DocumentStore;

/// All collaborators wired together for one test scenario.
pub struct World {
    pub store: Arc<MemoryStore>,
    pub cache: Arc<MemoryCache>,
    pub photos: Arc<MemoryPhotoStorage>,
}

/// Route service logs through the test harness; safe to call repeatedly.
fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

impl World {
    pub fn new() -> Self {
        init_tracing();
        World {
            store: Arc::new(MemoryStore::new()),
            cache: Arc::new(MemoryCache::new()),
            photos: Arc::new(MemoryPhotoStorage::new()),
        }
    }

    pub fn editor(&self) -> QuestEditor {
        QuestEditor::new(self.store.clone(), self.cache.clone(), self.photos.clone())
    }

    pub fn tracker(&self) -> ProgressTracker {
        ProgressTracker::new(self.store.clone(), self.cache.clone())
    }

    pub fn legacy_tracker(&self) -> ProgressTracker {
        ProgressTracker::with_policy(self.store.clone(), self.cache.clone(), ProgressPolicy::Legacy)
    }

    pub fn likes(&self) -> LikeRegistry {
        LikeRegistry::new(self.store.clone(), self.cache.clone())
    }

    pub fn lifecycle(&self) -> QuestLifecycle {
        QuestLifecycle::new(self.store.clone(), self.cache.clone(), self.photos.clone())
    }

    /// Load the current stored quest, panicking if absent.
    pub async fn quest(&self, id: EntityId) -> Quest {
        self.store.find_quest(id).await.unwrap().unwrap()
    }

    /// Load the current stored user, panicking if absent.
    pub async fn user(&self, id: EntityId) -> User {
        self.store.find_user(id).await.unwrap().unwrap()
    }
}

/// A published quest with one geotagged photo per position, seeded into
/// nothing (callers seed it into the world's store themselves).
pub fn published_quest(author: &User, positions: &[(f64, f64)]) -> Quest {
    let mut quest = Quest::draft(author.id, "City walk", "A walk around the center");
    for (index, (lat, lng)) in positions.iter().enumerate() {
        quest.photos.push(Photo::at(
            format!("photo-{index}.jpg"),
            GeoPoint::new(*lat, *lng),
        ));
    }
    quest.is_published = true;
    quest
}

pub fn photo_block(location: &str, url: &str) -> PhotoBlock {
    PhotoBlock {
        edited: true,
        deleted: false,
        location: Some(location.to_string()),
        url: Some(url.to_string()),
    }
}

pub fn deleted_block(location: &str) -> PhotoBlock {
    PhotoBlock {
        edited: true,
        deleted: true,
        location: Some(location.to_string()),
        url: None,
    }
}
