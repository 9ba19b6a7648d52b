//! Quest joining and geo-gated photo check-ins.

use std::sync::Arc;

use photoquest_core::cache_key::{CacheKey, CacheNamespace};
use photoquest_core::geo::{self, GeoPoint, CHECK_RADIUS_METERS};
use photoquest_core::progress::PROGRESS_COMPLETE;
use photoquest_core::quest::Quest;
use photoquest_core::user::{Participation, User};
use photoquest_store::{CacheService, DocumentStore, StoreError};

use crate::caching;

/// Duplicate-check policy for photo check-ins.
///
/// `Strict` rejects re-checking a photo the user already verified.
/// `Legacy` reproduces the historical behavior where repeat checks
/// accumulate and can push progress past 100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProgressPolicy {
    #[default]
    Strict,
    Legacy,
}

#[derive(Debug, thiserror::Error)]
pub enum JoinError {
    #[error("Authors cannot join their own quest")]
    IsAuthor,

    #[error("Cannot join an unpublished quest")]
    NotPublished,

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, thiserror::Error)]
pub enum CheckError {
    #[error("Quest has no photo at index {index}")]
    PhotoNotFound { index: usize },

    #[error("Authors cannot check photos on their own quest")]
    IsAuthor,

    #[error("Claimed position is {distance_meters:.0} m away, beyond the check radius")]
    TooFar { distance_meters: f64 },

    #[error("Photo already checked for this quest")]
    AlreadyChecked,

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result of an accepted check-in.
#[derive(Debug, Clone, Copy)]
pub struct CheckOutcome {
    pub progress: u8,
    pub completed: bool,
}

/// Tracks a user's participation in quests: joining, and advancing
/// progress by verifying photos in person.
pub struct ProgressTracker {
    store: Arc<dyn DocumentStore>,
    cache: Arc<dyn CacheService>,
    policy: ProgressPolicy,
}

impl ProgressTracker {
    pub fn new(store: Arc<dyn DocumentStore>, cache: Arc<dyn CacheService>) -> Self {
        Self::with_policy(store, cache, ProgressPolicy::default())
    }

    pub fn with_policy(
        store: Arc<dyn DocumentStore>,
        cache: Arc<dyn CacheService>,
        policy: ProgressPolicy,
    ) -> Self {
        ProgressTracker {
            store,
            cache,
            policy,
        }
    }

    /// Register the user as a participant of a published quest.
    ///
    /// Joining a quest the user already participates in is a no-op, not an
    /// error.
    pub async fn join_quest(&self, user: &mut User, quest: &Quest) -> Result<(), JoinError> {
        if quest.is_authored_by(user.id) {
            return Err(JoinError::IsAuthor);
        }
        if !quest.is_published {
            return Err(JoinError::NotPublished);
        }
        if user.participation(quest.id).is_some() {
            return Ok(());
        }

        user.quests.push(Participation::joined(quest.id));
        self.store.persist_user(user).await?;

        caching::invalidate(&*self.cache, CacheKey::user(user.id)).await;
        caching::invalidate(&*self.cache, CacheKey::my_quests_active(user.id)).await;
        caching::invalidate(&*self.cache, CacheKey::my_quests_finished(user.id)).await;

        tracing::info!(user_id = %user.id, quest_id = %quest.id, "User joined quest");
        Ok(())
    }

    /// Verify the user's claimed position against the quest's photo at
    /// `photo_index` and advance their participation.
    ///
    /// On acceptance the quest's rating is bumped and persisted, then the
    /// user's participation record is created or advanced and the user is
    /// persisted with a rating bump. The quest-list caches are invalidated
    /// globally on every accepted check (the legacy contract of the quest
    /// lists), and the user's own active/finished lists when the check
    /// completes the quest.
    ///
    /// The two persists are independent writes with no shared transaction:
    /// a user-persist failure leaves the quest's rating bump committed.
    pub async fn check_photo(
        &self,
        user: &mut User,
        quest: &mut Quest,
        photo_index: usize,
        claimed: GeoPoint,
    ) -> Result<CheckOutcome, CheckError> {
        let photo = quest
            .photos
            .get(photo_index)
            .cloned()
            .ok_or(CheckError::PhotoNotFound { index: photo_index })?;
        if quest.is_authored_by(user.id) {
            return Err(CheckError::IsAuthor);
        }

        let distance_meters = geo::distance_meters(claimed, photo.geo_position);
        if distance_meters > CHECK_RADIUS_METERS {
            return Err(CheckError::TooFar { distance_meters });
        }

        if self.policy == ProgressPolicy::Strict {
            let already = user
                .participation(quest.id)
                .is_some_and(|p| p.check_photos.contains(&photo.id));
            if already {
                return Err(CheckError::AlreadyChecked);
            }
        }

        quest.rating += 1;
        self.store.persist_quest(quest).await?;
        caching::invalidate(&*self.cache, CacheKey::global(CacheNamespace::MyQuestsActive)).await;
        caching::invalidate(
            &*self.cache,
            CacheKey::global(CacheNamespace::MyQuestsFinished),
        )
        .await;

        let photo_count = quest.photos.len();
        let progress = match user.participation_mut(quest.id) {
            Some(participation) => participation.record_check(photo.id, photo_count),
            None => {
                // First check also joins the quest.
                let mut participation = Participation::joined(quest.id);
                let progress = participation.record_check(photo.id, photo_count);
                user.quests.push(participation);
                progress
            }
        };
        let completed = progress >= PROGRESS_COMPLETE;
        if completed {
            caching::invalidate(&*self.cache, CacheKey::my_quests_active(user.id)).await;
            caching::invalidate(&*self.cache, CacheKey::my_quests_finished(user.id)).await;
        }

        user.rating += 1;
        self.store.persist_user(user).await?;
        caching::invalidate(&*self.cache, CacheKey::user(user.id)).await;

        tracing::info!(
            user_id = %user.id,
            quest_id = %quest.id,
            photo_index,
            progress,
            completed,
            "Photo check accepted"
        );
        Ok(CheckOutcome {
            progress,
            completed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use photoquest_core::quest::Photo;
    use photoquest_store::memory::{MemoryCache, MemoryStore};

    fn published_quest(author: &User) -> Quest {
        let mut quest = Quest::draft(author.id, "City walk", "");
        quest
            .photos
            .push(Photo::at("a.jpg", GeoPoint::new(10.0, 10.0)));
        quest
            .photos
            .push(Photo::at("b.jpg", GeoPoint::new(20.0, 20.0)));
        quest.is_published = true;
        quest
    }

    fn tracker(store: &Arc<MemoryStore>, cache: &Arc<MemoryCache>) -> ProgressTracker {
        ProgressTracker::new(store.clone(), cache.clone())
    }

    #[tokio::test]
    async fn test_author_cannot_join_own_quest() {
        let store = Arc::new(MemoryStore::new());
        let cache = Arc::new(MemoryCache::new());
        let mut author = User::new("alice");
        let quest = published_quest(&author);

        let result = tracker(&store, &cache)
            .join_quest(&mut author, &quest)
            .await;
        assert_matches!(result, Err(JoinError::IsAuthor));
    }

    #[tokio::test]
    async fn test_cannot_join_draft_quest() {
        let store = Arc::new(MemoryStore::new());
        let cache = Arc::new(MemoryCache::new());
        let author = User::new("alice");
        let mut quest = published_quest(&author);
        quest.is_published = false;
        let mut user = User::new("bob");

        let result = tracker(&store, &cache).join_quest(&mut user, &quest).await;
        assert_matches!(result, Err(JoinError::NotPublished));
    }

    #[tokio::test]
    async fn test_duplicate_join_is_a_noop() {
        let store = Arc::new(MemoryStore::new());
        let cache = Arc::new(MemoryCache::new());
        let author = User::new("alice");
        let quest = published_quest(&author);
        let mut user = User::new("bob");
        store.seed_user(&user);

        let tracker = tracker(&store, &cache);
        tracker.join_quest(&mut user, &quest).await.unwrap();

        let mut reloaded = store.find_user(user.id).await.unwrap().unwrap();
        tracker.join_quest(&mut reloaded, &quest).await.unwrap();
        assert_eq!(reloaded.quests.len(), 1);
    }

    #[tokio::test]
    async fn test_author_cannot_check_own_photos() {
        let store = Arc::new(MemoryStore::new());
        let cache = Arc::new(MemoryCache::new());
        let mut author = User::new("alice");
        let mut quest = published_quest(&author);

        let result = tracker(&store, &cache)
            .check_photo(&mut author, &mut quest, 0, GeoPoint::new(10.0, 10.0))
            .await;
        assert_matches!(result, Err(CheckError::IsAuthor));
    }

    #[tokio::test]
    async fn test_check_out_of_bounds_photo() {
        let store = Arc::new(MemoryStore::new());
        let cache = Arc::new(MemoryCache::new());
        let author = User::new("alice");
        let mut quest = published_quest(&author);
        let mut user = User::new("bob");

        let result = tracker(&store, &cache)
            .check_photo(&mut user, &mut quest, 5, GeoPoint::new(10.0, 10.0))
            .await;
        assert_matches!(result, Err(CheckError::PhotoNotFound { index: 5 }));
    }

    #[tokio::test]
    async fn test_too_far_check_mutates_nothing() {
        let store = Arc::new(MemoryStore::new());
        let cache = Arc::new(MemoryCache::new());
        let author = User::new("alice");
        let mut quest = published_quest(&author);
        store.seed_quest(&quest);
        let mut user = User::new("bob");
        store.seed_user(&user);

        // ~10 km north of photo A.
        let result = tracker(&store, &cache)
            .check_photo(&mut user, &mut quest, 0, GeoPoint::new(10.09, 10.0))
            .await;
        assert_matches!(result, Err(CheckError::TooFar { .. }));

        let stored_quest = store.find_quest(quest.id).await.unwrap().unwrap();
        let stored_user = store.find_user(user.id).await.unwrap().unwrap();
        assert_eq!(stored_quest.rating, 0);
        assert_eq!(stored_user.rating, 0);
        assert!(stored_user.quests.is_empty());
        assert!(cache.invalidations().is_empty());
    }

    #[tokio::test]
    async fn test_strict_policy_rejects_duplicate_check() {
        let store = Arc::new(MemoryStore::new());
        let cache = Arc::new(MemoryCache::new());
        let author = User::new("alice");
        let quest = published_quest(&author);
        store.seed_quest(&quest);
        let user = User::new("bob");
        store.seed_user(&user);

        let tracker = tracker(&store, &cache);
        let mut u = store.find_user(user.id).await.unwrap().unwrap();
        let mut q = store.find_quest(quest.id).await.unwrap().unwrap();
        tracker
            .check_photo(&mut u, &mut q, 0, GeoPoint::new(10.0, 10.0))
            .await
            .unwrap();

        let mut u = store.find_user(user.id).await.unwrap().unwrap();
        let mut q = store.find_quest(quest.id).await.unwrap().unwrap();
        let result = tracker
            .check_photo(&mut u, &mut q, 0, GeoPoint::new(10.0, 10.0))
            .await;
        assert_matches!(result, Err(CheckError::AlreadyChecked));
    }

    #[tokio::test]
    async fn test_legacy_policy_lets_duplicates_inflate_progress() {
        let store = Arc::new(MemoryStore::new());
        let cache = Arc::new(MemoryCache::new());
        let author = User::new("alice");
        let quest = published_quest(&author);
        store.seed_quest(&quest);
        let user = User::new("bob");
        store.seed_user(&user);

        let tracker =
            ProgressTracker::with_policy(store.clone(), cache.clone(), ProgressPolicy::Legacy);
        for expected in [50u8, 100, 150] {
            let mut u = store.find_user(user.id).await.unwrap().unwrap();
            let mut q = store.find_quest(quest.id).await.unwrap().unwrap();
            let outcome = tracker
                .check_photo(&mut u, &mut q, 0, GeoPoint::new(10.0, 10.0))
                .await
                .unwrap();
            assert_eq!(outcome.progress, expected);
        }
    }
}
