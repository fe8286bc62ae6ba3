//! Records - the entities held by the stores.
//!
//! Each entity comes as three types:
//!
//! - the record itself, as stored and returned by reads
//! - a draft, the creation payload (no Id; timestamps optional)
//! - a patch, the partial update (every mutable field optional; never an Id)
//!
//! Applying a patch is a shallow merge: present fields overwrite, absent
//! fields are preserved.

mod blog;
mod review;
mod user;
mod validation;
mod video;

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Serialize};

use crate::access::{has_access, AccessLevels, Grade};

pub use blog::{BlogPost, BlogPostDraft, BlogPostPatch};
pub use review::{Review, ReviewDraft, ReviewPatch};
pub use user::{User, UserDraft, UserPatch};
pub use validation::{
    ValidationError, DEFAULT_IMAGE_URL, EXCERPT_CHARS, REVIEW_MAX_CHARS,
};
pub use video::{CurriculumSubmission, Lesson, Video, VideoCategory, VideoDraft, VideoPatch};

/// Record identifier. Unique within one collection only.
pub type Id = u64;

/// Where a store puts newly created records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Most-recent-first.
    Front,
    Back,
}

/// Trait for types that can be held by an entity store.
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Collection name, used in errors and logs.
    const COLLECTION: &'static str;

    /// Where `create` inserts new records.
    const PLACEMENT: Placement = Placement::Front;

    type Draft: Send;
    type Patch: Send;

    fn id(&self) -> Id;

    /// Build the stored record from a draft, with the Id assigned by the store.
    /// `now` stamps any timestamp the draft leaves empty.
    fn from_draft(id: Id, draft: Self::Draft, now: DateTime<Utc>) -> Self;

    /// Shallow-merge `patch` over this record.
    fn apply(&mut self, patch: Self::Patch);
}

/// Content carrying access levels.
pub trait Gated {
    fn access_levels(&self) -> &AccessLevels;

    fn is_visible_to(&self, grade: Grade) -> bool {
        has_access(grade, self.access_levels())
    }
}

/// Overwrite `slot` when the patch carries a value.
pub(crate) fn merge<T>(slot: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *slot = value;
    }
}

/// Next Id for a collection: one past the largest existing Id, or 1.
/// `None` once the largest Id is `Id::MAX`.
pub(crate) fn next_id<'a, R: Record>(records: impl IntoIterator<Item = &'a R>) -> Option<Id> {
    records.into_iter().map(Record::id).max().unwrap_or(0).checked_add(1)
}
