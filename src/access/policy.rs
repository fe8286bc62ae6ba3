//! Edit-permission policy.
//!
//! Who may create, edit and delete each kind of content. This is static
//! policy data and deliberately independent of [`has_access`](super::has_access):
//! being able to watch a video says nothing about being able to manage it.

use std::fmt;

use super::Grade;
use crate::model::VideoCategory;

/// A kind of managed content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentKind {
    MembershipVideo,
    MasterVideo,
    Insight,
    ReviewModeration,
    UserAdministration,
}

impl ContentKind {
    pub const ALL: [ContentKind; 5] = [
        ContentKind::MembershipVideo,
        ContentKind::MasterVideo,
        ContentKind::Insight,
        ContentKind::ReviewModeration,
        ContentKind::UserAdministration,
    ];

    pub fn for_category(category: VideoCategory) -> Self {
        match category {
            VideoCategory::Membership => ContentKind::MembershipVideo,
            VideoCategory::Master => ContentKind::MasterVideo,
        }
    }

    /// Grades allowed to manage this kind of content.
    pub fn managers(&self) -> &'static [Grade] {
        match self {
            ContentKind::MembershipVideo => &[Grade::Admin, Grade::Member, Grade::Both],
            ContentKind::MasterVideo => &[Grade::Admin, Grade::Master, Grade::Both],
            ContentKind::Insight
            | ContentKind::ReviewModeration
            | ContentKind::UserAdministration => &[Grade::Admin],
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ContentKind::MembershipVideo => "membership video",
            ContentKind::MasterVideo => "master video",
            ContentKind::Insight => "insight",
            ContentKind::ReviewModeration => "review moderation",
            ContentKind::UserAdministration => "user administration",
        };
        f.write_str(name)
    }
}

/// Whether `grade` may create, edit or delete content of `kind`.
pub fn can_manage(grade: Grade, kind: ContentKind) -> bool {
    kind.managers().contains(&grade)
}

/// Hidden reviews are only listed for moderators.
pub fn can_see_hidden_reviews(grade: Grade) -> bool {
    can_manage(grade, ContentKind::ReviewModeration)
}
