//! User entity and per-quest participation records.

use serde::{Deserialize, Serialize};

use crate::progress::{progress_percent, PROGRESS_COMPLETE};
use crate::types::{new_entity_id, EntityId};

/// A user's relationship to one quest: authoring it, or progressing
/// through its checkpoints.
///
/// There is exactly one participation per (user, quest) pair. For the
/// author's own record `progress` is unused; authors do not complete their
/// own quests through check-ins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Participation {
    pub quest: EntityId,
    pub is_author: bool,
    /// Derived share of the quest's photos this user has verified, 0-100.
    pub progress: u8,
    /// Photo ids verified in person, in check order.
    pub check_photos: Vec<EntityId>,
}

impl Participation {
    /// An authoring record for a freshly created quest.
    pub fn authored(quest: EntityId) -> Self {
        Participation {
            quest,
            is_author: true,
            progress: 0,
            check_photos: Vec::new(),
        }
    }

    /// A joining record with no checks yet.
    pub fn joined(quest: EntityId) -> Self {
        Participation {
            quest,
            is_author: false,
            progress: 0,
            check_photos: Vec::new(),
        }
    }

    /// Record a verified photo and recompute progress against the quest's
    /// current photo count. Returns the new progress value.
    pub fn record_check(&mut self, photo: EntityId, quest_photo_count: usize) -> u8 {
        self.check_photos.push(photo);
        self.progress = progress_percent(self.check_photos.len(), quest_photo_count);
        self.progress
    }

    pub fn is_complete(&self) -> bool {
        self.progress >= PROGRESS_COMPLETE
    }
}

/// A participant or author. `quests` holds one participation per quest the
/// user authored or joined; `like_quests` holds the quest ids the user has
/// liked, with at-most-once semantics enforced by the like registry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: EntityId,
    pub name: String,
    /// Bumped on every successful photo check.
    pub rating: i64,
    pub quests: Vec<Participation>,
    pub like_quests: Vec<EntityId>,
    /// Optimistic-concurrency token, compared and bumped by the store on
    /// every persist.
    #[serde(default)]
    pub version: u64,
}

impl User {
    pub fn new(name: impl Into<String>) -> Self {
        User {
            id: new_entity_id(),
            name: name.into(),
            rating: 0,
            quests: Vec::new(),
            like_quests: Vec::new(),
            version: 0,
        }
    }

    /// The user's participation in the given quest, if any.
    pub fn participation(&self, quest_id: EntityId) -> Option<&Participation> {
        self.quests.iter().find(|p| p.quest == quest_id)
    }

    pub fn participation_mut(&mut self, quest_id: EntityId) -> Option<&mut Participation> {
        self.quests.iter_mut().find(|p| p.quest == quest_id)
    }

    /// Drop any participation referencing the given quest. Returns whether
    /// a record was removed.
    pub fn detach_quest(&mut self, quest_id: EntityId) -> bool {
        let before = self.quests.len();
        self.quests.retain(|p| p.quest != quest_id);
        self.quests.len() != before
    }

    pub fn likes(&self, quest_id: EntityId) -> bool {
        self.like_quests.contains(&quest_id)
    }
}
