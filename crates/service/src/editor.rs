//! Quest creation and edit application.

use std::sync::Arc;

use photoquest_core::cache_key::CacheKey;
use photoquest_core::photo_diff::{self, PhotoBlock, PhotoDiffError};
use photoquest_core::quest::Quest;
use photoquest_core::user::{Participation, User};
use photoquest_store::{
    CacheService, DocumentStore, PhotoStorage, PhotoStorageError, StoreError,
};

use crate::caching;

/// An author-submitted quest edit: metadata, the ordered per-photo block
/// list, and the publish flag.
#[derive(Debug, Clone, Default)]
pub struct QuestSubmission {
    pub title: String,
    pub description: String,
    pub photo_blocks: Vec<PhotoBlock>,
    /// Request the draft-to-published transition. Irreversible once granted.
    pub publish: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum EditError {
    #[error("Only the quest's author may edit it")]
    NotAuthor,

    #[error("A quest must have a title")]
    MissingTitle,

    #[error(transparent)]
    BadLocation(#[from] PhotoDiffError),

    #[error("Cannot publish: {count} photo(s) have no geolocation")]
    MissingGeolocation { count: usize },

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    PhotoStorage(#[from] PhotoStorageError),
}

/// Applies author-submitted edits to a quest: photo diffs, metadata, and
/// the publish transition.
pub struct QuestEditor {
    store: Arc<dyn DocumentStore>,
    cache: Arc<dyn CacheService>,
    photos: Arc<dyn PhotoStorage>,
}

impl QuestEditor {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        cache: Arc<dyn CacheService>,
        photos: Arc<dyn PhotoStorage>,
    ) -> Self {
        QuestEditor {
            store,
            cache,
            photos,
        }
    }

    /// Create a draft quest from a submission and register the author's
    /// participation.
    pub async fn create_quest(
        &self,
        author: &mut User,
        submission: &QuestSubmission,
    ) -> Result<Quest, EditError> {
        let mut quest = Quest::draft(author.id, "", "");
        self.apply_edit(&mut quest, author, submission).await?;

        author.quests.push(Participation::authored(quest.id));
        self.store.persist_user(author).await?;
        caching::invalidate(&*self.cache, CacheKey::user(author.id)).await;

        tracing::info!(
            quest_id = %quest.id,
            author_id = %author.id,
            "Quest created"
        );
        Ok(quest)
    }

    /// Apply a submission to a quest.
    ///
    /// Authorization and validation run before any mutation: a non-author
    /// editor, a missing title, a malformed photo location, or a publish
    /// request with ungeotagged photos all abort with nothing changed.
    ///
    /// On success the side effects run in order: external photo deletions
    /// first (freeing slots), then photo saves, then the quest persist,
    /// then cache invalidation for the author's created-quests list and
    /// the quest detail view.
    pub async fn apply_edit(
        &self,
        quest: &mut Quest,
        editor: &User,
        submission: &QuestSubmission,
    ) -> Result<(), EditError> {
        if !quest.is_authored_by(editor.id) {
            return Err(EditError::NotAuthor);
        }
        if submission.title.trim().is_empty() {
            return Err(EditError::MissingTitle);
        }

        let diff = photo_diff::plan(&quest.photos, &submission.photo_blocks)?;

        if submission.publish {
            let missing = diff
                .final_photos
                .iter()
                .filter(|p| !p.geo_position.is_set())
                .count();
            if missing > 0 {
                return Err(EditError::MissingGeolocation { count: missing });
            }
        }

        self.photos.delete_photos(&diff.to_delete).await?;
        self.photos.save_photos(&diff.final_photos).await?;

        quest.photos = diff.final_photos;
        quest.title = submission.title.clone();
        quest.description = submission.description.clone();
        if submission.publish {
            quest.is_published = true;
        }
        self.store.persist_quest(quest).await?;

        caching::invalidate(&*self.cache, CacheKey::my_quests_created(quest.author)).await;
        caching::invalidate(&*self.cache, CacheKey::quest_detail(quest.id)).await;

        tracing::info!(
            quest_id = %quest.id,
            photo_count = quest.photos.len(),
            published = quest.is_published,
            "Quest edit applied"
        );
        Ok(())
    }
}
