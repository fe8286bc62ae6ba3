use chrono::{DateTime, Datelike, Utc};
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::info;

use super::{authorize, open, rounded_average, Platform, PlatformError, Visible};
use crate::access::{ContentKind, Grade};
use crate::model::{BlogPost, BlogPostDraft, BlogPostPatch, Id, Record};

/// Reading speed behind the estimated reading time.
pub const WORDS_PER_MINUTE: u64 = 200;

/// Whole minutes to read `content`, rounded up.
pub fn reading_minutes(content: &str) -> u64 {
    let words = content.split_whitespace().count() as u64;
    words.div_ceil(WORDS_PER_MINUTE)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InsightStats {
    pub total_posts: usize,
    /// Published in the UTC calendar month of `now`.
    pub published_this_month: usize,
    pub avg_reading_minutes: u64,
}

impl InsightStats {
    pub fn compute(posts: &[BlogPost], now: DateTime<Utc>) -> Self {
        let minutes: u64 = posts.iter().map(|p| reading_minutes(&p.content)).sum();
        Self {
            total_posts: posts.len(),
            published_this_month: posts
                .iter()
                .filter(|p| {
                    p.published_at.year() == now.year() && p.published_at.month() == now.month()
                })
                .count(),
            avg_reading_minutes: rounded_average(minutes, posts.len()),
        }
    }
}

impl Platform {
    /// Every post, each tagged with whether `grade` may open it.
    pub async fn list_posts(
        &self,
        grade: Grade,
        cancel: &CancellationToken,
    ) -> Result<Vec<Visible<BlogPost>>, PlatformError> {
        let posts = self.posts.get_all(cancel).await?;
        Ok(posts
            .into_iter()
            .map(|p| Visible::for_viewer(p, grade))
            .collect())
    }

    pub async fn insight_stats(
        &self,
        now: DateTime<Utc>,
        cancel: &CancellationToken,
    ) -> Result<InsightStats, PlatformError> {
        let posts = self.posts.get_all(cancel).await?;
        Ok(InsightStats::compute(&posts, now))
    }

    /// Load a post for reading, re-checking access.
    pub async fn load_post(
        &self,
        grade: Grade,
        id: Id,
        cancel: &CancellationToken,
    ) -> Result<BlogPost, PlatformError> {
        let found = self.posts.get_by_id(id, cancel).await?;
        open(found, grade, BlogPost::COLLECTION, id)
    }

    pub async fn publish_post(
        &self,
        grade: Grade,
        draft: BlogPostDraft,
        cancel: &CancellationToken,
    ) -> Result<BlogPost, PlatformError> {
        authorize(grade, ContentKind::Insight)?;
        let post = self.posts.create(draft.validate()?, cancel).await?;
        info!(%grade, id = post.id, "post published");
        Ok(post)
    }

    /// Replace a post's editable fields with a validated draft.
    /// The publication date is kept.
    pub async fn edit_post(
        &self,
        grade: Grade,
        id: Id,
        draft: BlogPostDraft,
        cancel: &CancellationToken,
    ) -> Result<BlogPost, PlatformError> {
        authorize(grade, ContentKind::Insight)?;
        let patch: BlogPostPatch = draft.validate()?.into();
        let post = self.posts.update(id, patch, cancel).await?;
        info!(%grade, id, "post edited");
        Ok(post)
    }

    pub async fn delete_post(
        &self,
        grade: Grade,
        id: Id,
        cancel: &CancellationToken,
    ) -> Result<bool, PlatformError> {
        authorize(grade, ContentKind::Insight)?;
        let deleted = self.posts.delete(id, cancel).await?;
        info!(%grade, id, "post deleted");
        Ok(deleted)
    }
}
