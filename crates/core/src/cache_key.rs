//! Typed cache keys for the read-through cache collaborator.
//!
//! Every mutating operation invalidates cached views by key. Keys are a
//! namespace plus an optional entity scope; rendering is centralized here so
//! no two call sites can drift into colliding ad-hoc strings.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::EntityId;

/// Cached view families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CacheNamespace {
    /// A user's profile view, including their participations.
    User,
    /// A user's in-progress quest list.
    MyQuestsActive,
    /// A user's completed quest list.
    MyQuestsFinished,
    /// A user's authored quest list.
    MyQuestsCreated,
    /// A quest's detail view.
    QuestDetail,
}

impl CacheNamespace {
    fn as_str(self) -> &'static str {
        match self {
            CacheNamespace::User => "user",
            CacheNamespace::MyQuestsActive => "my-quests-active",
            CacheNamespace::MyQuestsFinished => "my-quests-finished",
            CacheNamespace::MyQuestsCreated => "my-quests-created",
            CacheNamespace::QuestDetail => "quest",
        }
    }
}

/// A cache key: namespace plus optional entity scope.
///
/// An entity-less key addresses the whole namespace; only the
/// active/finished quest-list namespaces are ever invalidated globally
/// (the legacy check-in path does so).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CacheKey {
    pub namespace: CacheNamespace,
    pub entity: Option<EntityId>,
}

impl CacheKey {
    pub fn scoped(namespace: CacheNamespace, entity: EntityId) -> Self {
        CacheKey {
            namespace,
            entity: Some(entity),
        }
    }

    pub fn global(namespace: CacheNamespace) -> Self {
        CacheKey {
            namespace,
            entity: None,
        }
    }

    pub fn user(user_id: EntityId) -> Self {
        Self::scoped(CacheNamespace::User, user_id)
    }

    pub fn quest_detail(quest_id: EntityId) -> Self {
        Self::scoped(CacheNamespace::QuestDetail, quest_id)
    }

    pub fn my_quests_active(user_id: EntityId) -> Self {
        Self::scoped(CacheNamespace::MyQuestsActive, user_id)
    }

    pub fn my_quests_finished(user_id: EntityId) -> Self {
        Self::scoped(CacheNamespace::MyQuestsFinished, user_id)
    }

    pub fn my_quests_created(user_id: EntityId) -> Self {
        Self::scoped(CacheNamespace::MyQuestsCreated, user_id)
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.entity {
            Some(id) => write!(f, "{}:{}", self.namespace.as_str(), id),
            None => write!(f, "{}", self.namespace.as_str()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::new_entity_id;

    #[test]
    fn test_scoped_key_rendering() {
        let id = new_entity_id();
        let key = CacheKey::user(id);
        assert_eq!(key.to_string(), format!("user:{id}"));
    }

    #[test]
    fn test_global_key_rendering() {
        let key = CacheKey::global(CacheNamespace::MyQuestsActive);
        assert_eq!(key.to_string(), "my-quests-active");
    }

    #[test]
    fn test_distinct_namespaces_never_collide() {
        let id = new_entity_id();
        let keys = [
            CacheKey::user(id),
            CacheKey::quest_detail(id),
            CacheKey::my_quests_active(id),
            CacheKey::my_quests_finished(id),
            CacheKey::my_quests_created(id),
        ];
        for (i, a) in keys.iter().enumerate() {
            for b in keys.iter().skip(i + 1) {
                assert_ne!(a.to_string(), b.to_string());
            }
        }
    }
}
