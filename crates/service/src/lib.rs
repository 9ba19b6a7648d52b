//! Orchestrating services for the photoquest core.
//!
//! Each service wires the pure logic in `photoquest-core` to the
//! collaborator traits in `photoquest-store`:
//!
//! - [`editor::QuestEditor`] — quest creation and edit application, photo
//!   diffs, publish gating.
//! - [`progress::ProgressTracker`] — joining quests and geo-gated photo
//!   check-ins.
//! - [`likes::LikeRegistry`] — at-most-once like/unlike toggling.
//! - [`lifecycle::QuestLifecycle`] — the quest removal cascade.
//!
//! All mutating operations invalidate the relevant cached views on commit;
//! invalidation failures are logged and never fail the mutation.

mod caching;
pub mod editor;
pub mod lifecycle;
pub mod likes;
pub mod progress;

pub use editor::{EditError, QuestEditor, QuestSubmission};
pub use lifecycle::{QuestLifecycle, RemoveError, RemoveStage};
pub use likes::{LikeError, LikeRegistry};
pub use progress::{CheckError, CheckOutcome, JoinError, ProgressPolicy, ProgressTracker};
