//! Photo-diff planning for quest edits.
//!
//! An edit submission carries one block per photo slot in the editor UI, in
//! order. Blocks the author never touched are skipped entirely; touched
//! blocks either relocate an existing photo, delete it, or describe a new
//! one to append. Planning is side-effect free: the caller applies the
//! resulting [`PhotoDiff`] to storage and to the quest.
//!
//! Block-to-slot correspondence: block `i` addresses the quest's `i`-th
//! photo when `i` is within the current photo sequence; blocks past the end
//! describe new photos. Deleting a slot shifts later photos down in the
//! rebuilt sequence, never during iteration.

use serde::{Deserialize, Serialize};

use crate::geo::GeoPoint;
use crate::quest::Photo;

/// One per-photo block of an edit submission.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PhotoBlock {
    /// Whether the author touched this block at all. Untouched blocks are
    /// no-ops regardless of their other fields.
    pub edited: bool,
    pub deleted: bool,
    /// `"lat, lng"` as submitted by the editor form.
    pub location: Option<String>,
    /// Source url for a freshly described photo.
    pub url: Option<String>,
}

/// The planned outcome of applying a block list to a photo sequence.
#[derive(Debug, Clone)]
pub struct PhotoDiff {
    /// The rebuilt ordered photo sequence: retained photos (with location
    /// updates applied) followed by appended ones.
    pub final_photos: Vec<Photo>,
    /// Photos to hand to external deletion, in block order. Includes
    /// detached deletes: blocks marked deleted that never mapped to a slot
    /// still route their described photo through the delete path.
    pub to_delete: Vec<Photo>,
}

#[derive(Debug, thiserror::Error)]
pub enum PhotoDiffError {
    #[error("Malformed location '{0}'. Expected 'lat, lng' with two numeric components")]
    BadLocation(String),

    #[error("Photo block {0} was edited but carries no location")]
    MissingLocation(usize),
}

/// Parse a `"lat, lng"` pair. Exactly two numeric comma-separated
/// components are required.
pub fn parse_location(raw: &str) -> Result<GeoPoint, PhotoDiffError> {
    let parts: Vec<&str> = raw.split(',').map(str::trim).collect();
    if parts.len() != 2 {
        return Err(PhotoDiffError::BadLocation(raw.to_string()));
    }
    let lat: f64 = parts[0]
        .parse()
        .map_err(|_| PhotoDiffError::BadLocation(raw.to_string()))?;
    let lng: f64 = parts[1]
        .parse()
        .map_err(|_| PhotoDiffError::BadLocation(raw.to_string()))?;
    Ok(GeoPoint::new(lat, lng))
}

/// What happens to one existing photo slot.
#[derive(Debug, Clone, Copy)]
enum SlotPlan {
    Keep,
    Relocate(GeoPoint),
    Delete,
}

/// Plan the diff of `blocks` against the current `existing` sequence.
///
/// Pass 1 validates every edited block's location and assigns each block a
/// slot action by original index; pass 2 rebuilds the final ordered
/// sequence. Any malformed location fails the whole plan before anything
/// is produced.
pub fn plan(existing: &[Photo], blocks: &[PhotoBlock]) -> Result<PhotoDiff, PhotoDiffError> {
    // Pass 1: parse locations and assign slot actions.
    let mut slots = vec![SlotPlan::Keep; existing.len()];
    let mut appended: Vec<Photo> = Vec::new();
    let mut to_delete: Vec<Photo> = Vec::new();

    for (index, block) in blocks.iter().enumerate() {
        if !block.edited {
            continue;
        }
        let raw = block
            .location
            .as_deref()
            .ok_or(PhotoDiffError::MissingLocation(index))?;
        let position = parse_location(raw)?;

        if index < existing.len() {
            if block.deleted {
                slots[index] = SlotPlan::Delete;
                to_delete.push(existing[index].clone());
            } else {
                slots[index] = SlotPlan::Relocate(position);
            }
        } else {
            let photo = Photo::at(block.url.clone().unwrap_or_default(), position);
            if block.deleted {
                // Never attached to the quest, but still routed through the
                // delete path for storage symmetry.
                to_delete.push(photo);
            } else {
                appended.push(photo);
            }
        }
    }

    // Pass 2: rebuild the ordered sequence.
    let mut final_photos: Vec<Photo> = Vec::with_capacity(existing.len() + appended.len());
    for (photo, slot) in existing.iter().zip(&slots) {
        match slot {
            SlotPlan::Keep => final_photos.push(photo.clone()),
            SlotPlan::Relocate(position) => {
                let mut updated = photo.clone();
                updated.geo_position = *position;
                final_photos.push(updated);
            }
            SlotPlan::Delete => {}
        }
    }
    final_photos.extend(appended);

    Ok(PhotoDiff {
        final_photos,
        to_delete,
    })
}
