//! Access model - grades, content gates and the single visibility predicate.
//!
//! Every place that decides whether a viewer may see a content item goes
//! through [`has_access`]. Management rights live in [`policy`].
//!
//! ## Example
//!
//! ```
//! use gated_content::access::{has_access, AccessLevel, AccessLevels, Grade};
//!
//! let gate: AccessLevels = [AccessLevel::Member].into();
//! assert!(has_access(Grade::Member, &gate));
//! assert!(has_access(Grade::Both, &gate));
//! assert!(!has_access(Grade::Free, &gate));
//! ```

mod grade;
pub mod policy;

pub use grade::{AccessLevel, AccessLevels, Grade, UnknownGrade};
pub use policy::{can_manage, can_see_hidden_reviews, ContentKind};

/// Decide whether a viewer of `grade` may see content gated by `levels`.
///
/// - ungated content (no levels) is visible to everyone
/// - `admin` sees everything
/// - `both` sees anything gated to at least one of free, member or master
/// - every other grade needs its own level listed
pub fn has_access(grade: Grade, levels: &AccessLevels) -> bool {
    if levels.is_empty() {
        return true;
    }

    match grade {
        Grade::Admin => true,
        Grade::Both => levels.intersects(&AccessLevel::CONSUMER_TIERS),
        other => other
            .as_access_level()
            .map(|level| levels.contains(level))
            .unwrap_or(false),
    }
}
