//! At-most-once like/unlike toggling between users and quests.

use std::sync::Arc;

use photoquest_core::cache_key::CacheKey;
use photoquest_core::quest::Quest;
use photoquest_core::user::User;
use photoquest_store::{CacheService, DocumentStore, StoreError};

use crate::caching;

#[derive(Debug, thiserror::Error)]
pub enum LikeError {
    #[error("Quest already liked by this user")]
    AlreadyLiked,

    #[error("Quest is not liked by this user")]
    NotLiked,

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Maintains the user-to-quest like relationship and the quest's like and
/// rating counters.
///
/// Both operations are two-phase: the user write commits before the quest
/// write, with no rollback. A quest-persist failure surfaces as an error
/// while the user-side change stays committed.
pub struct LikeRegistry {
    store: Arc<dyn DocumentStore>,
    cache: Arc<dyn CacheService>,
}

impl LikeRegistry {
    pub fn new(store: Arc<dyn DocumentStore>, cache: Arc<dyn CacheService>) -> Self {
        LikeRegistry { store, cache }
    }

    /// Record a like. At most one like per (user, quest) pair.
    pub async fn like(&self, user: &mut User, quest: &mut Quest) -> Result<(), LikeError> {
        if user.likes(quest.id) {
            return Err(LikeError::AlreadyLiked);
        }

        user.like_quests.push(quest.id);
        self.store.persist_user(user).await?;
        caching::invalidate(&*self.cache, CacheKey::user(user.id)).await;

        quest.likes_count += 1;
        quest.rating += 1;
        self.store.persist_quest(quest).await?;
        caching::invalidate(&*self.cache, CacheKey::quest_detail(quest.id)).await;

        tracing::info!(user_id = %user.id, quest_id = %quest.id, "Quest liked");
        Ok(())
    }

    /// Withdraw a like previously recorded with [`LikeRegistry::like`].
    pub async fn unlike(&self, user: &mut User, quest: &mut Quest) -> Result<(), LikeError> {
        let Some(position) = user.like_quests.iter().position(|id| *id == quest.id) else {
            return Err(LikeError::NotLiked);
        };

        user.like_quests.remove(position);
        self.store.persist_user(user).await?;
        caching::invalidate(&*self.cache, CacheKey::user(user.id)).await;

        quest.likes_count -= 1;
        quest.rating -= 1;
        self.store.persist_quest(quest).await?;
        caching::invalidate(&*self.cache, CacheKey::quest_detail(quest.id)).await;

        tracing::info!(user_id = %user.id, quest_id = %quest.id, "Quest unliked");
        Ok(())
    }
}
