//! Platform - the stores bundled with the operations pages perform on them.
//!
//! A [`Platform`] is constructed once and passed to whatever needs it; clones
//! share every store. Operations that depend on who is asking take the
//! viewer's [`Grade`] and check it against the access predicate or the edit
//! policy before touching a store.

mod admin;
mod catalog;
mod insights;
mod reviews;

use tracing::debug;

use crate::access::{can_manage, ContentKind, Grade};
use crate::config::{ConfigError, PlatformConfig};
use crate::model::{Gated, Id, ValidationError};
use crate::store::{fixtures, BlogStore, Latency, ReviewStore, StoreError, UserStore, VideoStore};

pub use admin::{DashboardStats, RECENT_WINDOW_DAYS};
pub use catalog::{
    group_by_topic, select_featured, FeaturedContent, PartitionStats, TopicGroup, VideoDetail,
    FEATURED_VIDEOS, RECENT_POSTS,
};
pub use insights::{reading_minutes, InsightStats, WORDS_PER_MINUTE};
pub use reviews::ReviewStats;

#[derive(Debug, thiserror::Error)]
pub enum PlatformError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// A detail lookup found nothing.
    #[error("{collection} {id} not found")]
    NotFound { collection: &'static str, id: Id },
    /// The viewer's grade does not open this item.
    #[error("no access to {collection} {id}")]
    AccessDenied { collection: &'static str, id: Id },
    /// The viewer's grade may not manage this kind of content.
    #[error("{grade} may not manage {kind}")]
    Forbidden { grade: Grade, kind: ContentKind },
}

/// A content item paired with whether the viewer may open it.
#[derive(Debug, Clone, PartialEq)]
pub struct Visible<T> {
    pub item: T,
    pub accessible: bool,
}

impl<T: Gated> Visible<T> {
    pub fn for_viewer(item: T, grade: Grade) -> Self {
        let accessible = item.is_visible_to(grade);
        Self { item, accessible }
    }
}

#[derive(Clone)]
pub struct Platform {
    users: UserStore,
    videos: VideoStore,
    posts: BlogStore,
    reviews: ReviewStore,
}

impl Platform {
    /// Build the stores described by `config`.
    pub fn new(config: &PlatformConfig) -> Result<Self, PlatformError> {
        config.validate()?;
        let latency = config.latency.to_latency();
        if config.seed_fixtures {
            debug!("seeding stores from bundled fixtures");
            Ok(Self::from_stores(
                fixtures::user_store(latency)?,
                fixtures::video_store(latency)?,
                fixtures::blog_store(latency)?,
                fixtures::review_store(latency)?,
            ))
        } else {
            Ok(Self::empty(latency))
        }
    }

    /// Empty stores sharing one latency setting.
    pub fn empty(latency: Latency) -> Self {
        Self::from_stores(
            UserStore::new(latency),
            VideoStore::new(latency),
            BlogStore::new(latency),
            ReviewStore::new(latency),
        )
    }

    pub fn from_stores(
        users: UserStore,
        videos: VideoStore,
        posts: BlogStore,
        reviews: ReviewStore,
    ) -> Self {
        Self {
            users,
            videos,
            posts,
            reviews,
        }
    }

    pub fn users(&self) -> &UserStore {
        &self.users
    }

    pub fn videos(&self) -> &VideoStore {
        &self.videos
    }

    pub fn posts(&self) -> &BlogStore {
        &self.posts
    }

    pub fn reviews(&self) -> &ReviewStore {
        &self.reviews
    }
}

fn authorize(grade: Grade, kind: ContentKind) -> Result<(), PlatformError> {
    if can_manage(grade, kind) {
        Ok(())
    } else {
        debug!(%grade, %kind, "management denied");
        Err(PlatformError::Forbidden { grade, kind })
    }
}

/// Resolve a detail lookup: absent is `NotFound`, gated is `AccessDenied`.
fn open<T: Gated>(
    found: Option<T>,
    grade: Grade,
    collection: &'static str,
    id: Id,
) -> Result<T, PlatformError> {
    let item = found.ok_or(PlatformError::NotFound { collection, id })?;
    if !item.is_visible_to(grade) {
        debug!(%grade, collection, id, "access denied");
        return Err(PlatformError::AccessDenied { collection, id });
    }
    Ok(item)
}

/// `total / count` rounded half up; an empty set averages to zero.
fn rounded_average(total: u64, count: usize) -> u64 {
    let count = count.max(1) as u64;
    total.saturating_mul(2).saturating_add(count) / (count * 2)
}
