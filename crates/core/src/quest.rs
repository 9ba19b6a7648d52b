//! Quest and photo entities.

use serde::{Deserialize, Serialize};

use crate::geo::GeoPoint;
use crate::types::{new_entity_id, EntityId, Timestamp};

/// A geotagged photograph owned by exactly one quest.
///
/// Photos are created, relocated, and deleted only through the editor's
/// diff application; they are never shared between quests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Photo {
    pub id: EntityId,
    pub url: String,
    /// Stored position; [`GeoPoint::UNSET`] until the author drops a pin.
    #[serde(default)]
    pub geo_position: GeoPoint,
}

impl Photo {
    /// A new photo with no geolocation recorded yet.
    pub fn new(url: impl Into<String>) -> Self {
        Photo {
            id: new_entity_id(),
            url: url.into(),
            geo_position: GeoPoint::UNSET,
        }
    }

    /// A new photo pinned at the given position.
    pub fn at(url: impl Into<String>, position: GeoPoint) -> Self {
        Photo {
            id: new_entity_id(),
            url: url.into(),
            geo_position: position,
        }
    }
}

/// An author-owned collection of geotagged photo checkpoints.
///
/// Lifecycle: created as a draft, edited through the quest editor, published
/// once every photo carries a geolocation (irreversible), and finally removed
/// through the lifecycle cascade which detaches it from every participant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quest {
    pub id: EntityId,
    pub title: String,
    pub description: String,
    /// Owning user.
    pub author: EntityId,
    /// Ordered checkpoint sequence.
    pub photos: Vec<Photo>,
    pub is_published: bool,
    /// Popularity score, bumped by likes and successful check-ins.
    pub rating: i64,
    pub likes_count: i64,
    /// Optimistic-concurrency token, compared and bumped by the store on
    /// every persist.
    #[serde(default)]
    pub version: u64,
    pub created_at: Timestamp,
}

impl Quest {
    /// A fresh unpublished quest with no photos.
    pub fn draft(author: EntityId, title: impl Into<String>, description: impl Into<String>) -> Self {
        Quest {
            id: new_entity_id(),
            title: title.into(),
            description: description.into(),
            author,
            photos: Vec::new(),
            is_published: false,
            rating: 0,
            likes_count: 0,
            version: 0,
            created_at: chrono::Utc::now(),
        }
    }

    /// Whether the given user authored this quest.
    pub fn is_authored_by(&self, user_id: EntityId) -> bool {
        self.author == user_id
    }

    /// Photos still carrying the unset-geolocation sentinel. Publishing is
    /// gated on this being empty.
    pub fn photos_missing_geolocation(&self) -> impl Iterator<Item = &Photo> {
        self.photos.iter().filter(|p| !p.geo_position.is_set())
    }

    /// Position of a photo id in the ordered photo sequence.
    pub fn photo_index(&self, photo_id: EntityId) -> Option<usize> {
        self.photos.iter().position(|p| p.id == photo_id)
    }
}
