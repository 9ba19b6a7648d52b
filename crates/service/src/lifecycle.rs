//! Quest removal: the cross-entity detach cascade.

use std::fmt;
use std::sync::Arc;

use photoquest_core::cache_key::CacheKey;
use photoquest_core::quest::Quest;
use photoquest_core::user::User;
use photoquest_store::{
    CacheService, DocumentStore, PhotoStorage, PhotoStorageError, StoreError,
};

use crate::caching;

/// The ordered stages of quest removal. Each stage's success is a
/// precondition for the next; a failure aborts the cascade with the
/// failing stage reported and earlier stages left committed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveStage {
    /// Drop the quest from every referencing user's participation list.
    DetachParticipants,
    /// Delete the quest's photos from external storage.
    DeletePhotos,
    /// Drop the quest from the author's own participation list.
    DetachAuthor,
    /// Delete the quest record itself.
    DeleteQuest,
}

impl fmt::Display for RemoveStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RemoveStage::DetachParticipants => "detach-participants",
            RemoveStage::DeletePhotos => "delete-photos",
            RemoveStage::DetachAuthor => "detach-author",
            RemoveStage::DeleteQuest => "delete-quest",
        };
        f.write_str(name)
    }
}

/// Failure inside one removal stage.
#[derive(Debug, thiserror::Error)]
pub enum CascadeError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Photos(#[from] PhotoStorageError),
}

#[derive(Debug, thiserror::Error)]
pub enum RemoveError {
    #[error("Only the quest's author may remove it")]
    NotAuthor,

    #[error("Quest removal failed at stage '{stage}'")]
    Stage {
        stage: RemoveStage,
        #[source]
        source: CascadeError,
    },
}

/// Orchestrates quest removal so that no user is left holding a dangling
/// participation.
pub struct QuestLifecycle {
    store: Arc<dyn DocumentStore>,
    cache: Arc<dyn CacheService>,
    photos: Arc<dyn PhotoStorage>,
}

impl QuestLifecycle {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        cache: Arc<dyn CacheService>,
        photos: Arc<dyn PhotoStorage>,
    ) -> Self {
        QuestLifecycle {
            store,
            cache,
            photos,
        }
    }

    /// Remove a quest and every reference to it, in strict stage order.
    pub async fn remove(&self, quest: &Quest, requester: &User) -> Result<(), RemoveError> {
        if !quest.is_authored_by(requester.id) {
            return Err(RemoveError::NotAuthor);
        }

        self.detach_participants(quest)
            .await
            .map_err(|source| RemoveError::Stage {
                stage: RemoveStage::DetachParticipants,
                source,
            })?;

        self.photos
            .delete_photos(&quest.photos)
            .await
            .map_err(|err| RemoveError::Stage {
                stage: RemoveStage::DeletePhotos,
                source: err.into(),
            })?;

        self.detach_author(quest)
            .await
            .map_err(|source| RemoveError::Stage {
                stage: RemoveStage::DetachAuthor,
                source,
            })?;

        self.delete_quest(quest)
            .await
            .map_err(|source| RemoveError::Stage {
                stage: RemoveStage::DeleteQuest,
                source,
            })?;

        tracing::info!(quest_id = %quest.id, author_id = %quest.author, "Quest removed");
        Ok(())
    }

    /// Stage 1: detach from every referencing user. A persist failure for
    /// one user aborts the scan; users already persisted stay detached.
    async fn detach_participants(&self, quest: &Quest) -> Result<(), CascadeError> {
        let participants = self.store.find_participants(quest.id).await?;
        for mut user in participants {
            if !user.detach_quest(quest.id) {
                continue;
            }
            self.store.persist_user(&user).await?;
            caching::invalidate(&*self.cache, CacheKey::user(user.id)).await;
            caching::invalidate(&*self.cache, CacheKey::my_quests_active(user.id)).await;
            caching::invalidate(&*self.cache, CacheKey::my_quests_finished(user.id)).await;
        }
        Ok(())
    }

    /// Stage 3: detach from the author's own record. Stage 1 usually
    /// already covered the author; this stage is the backstop for a record
    /// the scan missed. A missing author is nothing to detach.
    async fn detach_author(&self, quest: &Quest) -> Result<(), CascadeError> {
        let Some(mut author) = self.store.find_user(quest.author).await? else {
            return Ok(());
        };
        if author.detach_quest(quest.id) {
            self.store.persist_user(&author).await?;
            caching::invalidate(&*self.cache, CacheKey::user(author.id)).await;
        }
        Ok(())
    }

    /// Stage 4: drop the quest record and its cached views.
    async fn delete_quest(&self, quest: &Quest) -> Result<(), CascadeError> {
        self.store.remove_quest(quest.id).await?;
        caching::invalidate(&*self.cache, CacheKey::my_quests_created(quest.author)).await;
        caching::invalidate(&*self.cache, CacheKey::quest_detail(quest.id)).await;
        Ok(())
    }
}
