//! Pure domain logic for photoquest: entities, geolocation verification,
//! photo-diff planning, progress math, and typed cache keys.
//!
//! This crate performs no I/O. Persistence, caching, and photo storage are
//! trait collaborators defined in `photoquest-store` and driven by
//! `photoquest-service`.

pub mod cache_key;
pub mod geo;
pub mod photo_diff;
pub mod progress;
pub mod quest;
pub mod types;
pub mod user;
