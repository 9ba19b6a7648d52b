//! Shared primitive type aliases.

/// All entity identities are UUIDs assigned at creation time.
pub type EntityId = uuid::Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Generate a fresh entity id.
pub fn new_entity_id() -> EntityId {
    uuid::Uuid::new_v4()
}
