use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::info;

use super::{authorize, rounded_average, Platform, PlatformError};
use crate::access::{can_see_hidden_reviews, ContentKind, Grade};
use crate::model::{Id, Record, Review, ReviewDraft, ReviewPatch};

/// Figures shown above the review list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewStats {
    pub total_reviews: usize,
    /// Written on the same UTC calendar day as `now`.
    pub written_today: usize,
    pub avg_likes: u64,
}

impl ReviewStats {
    /// Figures over the reviews a viewer sees.
    pub fn compute(reviews: &[Review], now: DateTime<Utc>) -> Self {
        let today = now.date_naive();
        let likes: u64 = reviews.iter().map(|r| u64::from(r.likes)).sum();
        Self {
            total_reviews: reviews.len(),
            written_today: reviews
                .iter()
                .filter(|r| r.created_at.date_naive() == today)
                .count(),
            avg_likes: rounded_average(likes, reviews.len()),
        }
    }
}

impl Platform {
    /// Reviews as `grade` sees them: moderators get hidden ones too.
    pub async fn visible_reviews(
        &self,
        grade: Grade,
        cancel: &CancellationToken,
    ) -> Result<Vec<Review>, PlatformError> {
        let mut reviews = self.reviews.get_all(cancel).await?;
        if !can_see_hidden_reviews(grade) {
            reviews.retain(|r| !r.is_hidden);
        }
        Ok(reviews)
    }

    pub async fn review_stats(
        &self,
        grade: Grade,
        now: DateTime<Utc>,
        cancel: &CancellationToken,
    ) -> Result<ReviewStats, PlatformError> {
        let reviews = self.visible_reviews(grade, cancel).await?;
        Ok(ReviewStats::compute(&reviews, now))
    }

    /// Post a review under `user_name`, stamped with the author's grade.
    pub async fn submit_review(
        &self,
        grade: Grade,
        user_name: &str,
        content: &str,
        cancel: &CancellationToken,
    ) -> Result<Review, PlatformError> {
        let draft = ReviewDraft::new(content, user_name, grade)?;
        let review = self.reviews.create(draft, cancel).await?;
        info!(%grade, id = review.id, "review submitted");
        Ok(review)
    }

    /// Replace a review's text. Open to every grade, but a hidden review is
    /// only reachable for moderators.
    pub async fn edit_review(
        &self,
        grade: Grade,
        id: Id,
        content: &str,
        cancel: &CancellationToken,
    ) -> Result<Review, PlatformError> {
        let patch = ReviewPatch::content(content)?;
        let review = self
            .update_visible_review(grade, id, move |_| patch, cancel)
            .await?;
        info!(%grade, id, "review edited");
        Ok(review)
    }

    /// Hide a visible review or reveal a hidden one.
    pub async fn toggle_review_hidden(
        &self,
        grade: Grade,
        id: Id,
        cancel: &CancellationToken,
    ) -> Result<Review, PlatformError> {
        authorize(grade, ContentKind::ReviewModeration)?;
        let review = self
            .reviews
            .update_with(
                id,
                |r| ReviewPatch {
                    is_hidden: Some(!r.is_hidden),
                    ..ReviewPatch::default()
                },
                cancel,
            )
            .await?;
        info!(%grade, id, hidden = review.is_hidden, "review visibility toggled");
        Ok(review)
    }

    pub async fn delete_review(
        &self,
        grade: Grade,
        id: Id,
        cancel: &CancellationToken,
    ) -> Result<bool, PlatformError> {
        authorize(grade, ContentKind::ReviewModeration)?;
        let deleted = self.reviews.delete(id, cancel).await?;
        info!(%grade, id, "review deleted");
        Ok(deleted)
    }

    pub async fn like_review(
        &self,
        grade: Grade,
        id: Id,
        cancel: &CancellationToken,
    ) -> Result<Review, PlatformError> {
        self.update_visible_review(
            grade,
            id,
            |r| ReviewPatch {
                likes: Some(r.likes.saturating_add(1)),
                ..ReviewPatch::default()
            },
            cancel,
        )
        .await
    }

    /// Apply a patch to a review `grade` can see. The visibility check runs
    /// under the write lock; a hidden review gets an empty patch and reads as
    /// missing.
    async fn update_visible_review<F>(
        &self,
        grade: Grade,
        id: Id,
        make_patch: F,
        cancel: &CancellationToken,
    ) -> Result<Review, PlatformError>
    where
        F: FnOnce(&Review) -> ReviewPatch + Send,
    {
        let moderator = can_see_hidden_reviews(grade);
        let review = self
            .reviews
            .update_with(
                id,
                |r| {
                    if r.is_hidden && !moderator {
                        ReviewPatch::default()
                    } else {
                        make_patch(r)
                    }
                },
                cancel,
            )
            .await?;
        if review.is_hidden && !moderator {
            return Err(PlatformError::NotFound {
                collection: Review::COLLECTION,
                id,
            });
        }
        Ok(review)
    }
}
