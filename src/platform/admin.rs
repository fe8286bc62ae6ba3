use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::info;

use super::{authorize, Platform, PlatformError};
use crate::access::{ContentKind, Grade};
use crate::model::{BlogPost, Id, User, UserPatch, Video};

/// How far back "recent activity" reaches.
pub const RECENT_WINDOW_DAYS: i64 = 7;

/// Admin dashboard figures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    pub total_users: usize,
    pub total_videos: usize,
    pub total_posts: usize,
    pub total_reviews: usize,
    /// Every grade is present, zero when nobody holds it.
    pub users_by_grade: BTreeMap<Grade, usize>,
    pub new_users: usize,
    pub new_videos: usize,
    pub new_posts: usize,
}

impl DashboardStats {
    pub fn compute(
        users: &[User],
        videos: &[Video],
        posts: &[BlogPost],
        total_reviews: usize,
        now: DateTime<Utc>,
    ) -> Self {
        let since = now - Duration::days(RECENT_WINDOW_DAYS);
        let recent = |at: &DateTime<Utc>| *at > since;

        let mut users_by_grade: BTreeMap<Grade, usize> =
            Grade::ALL.iter().map(|g| (*g, 0)).collect();
        for user in users {
            *users_by_grade.entry(user.grade).or_default() += 1;
        }

        Self {
            total_users: users.len(),
            total_videos: videos.len(),
            total_posts: posts.len(),
            total_reviews,
            users_by_grade,
            new_users: users.iter().filter(|u| recent(&u.joined_at)).count(),
            new_videos: videos.iter().filter(|v| recent(&v.created_at)).count(),
            new_posts: posts.iter().filter(|p| recent(&p.published_at)).count(),
        }
    }
}

impl Platform {
    pub async fn dashboard(
        &self,
        grade: Grade,
        now: DateTime<Utc>,
        cancel: &CancellationToken,
    ) -> Result<DashboardStats, PlatformError> {
        authorize(grade, ContentKind::UserAdministration)?;
        let (users, membership, master, posts, reviews) = tokio::try_join!(
            self.users.get_all(cancel),
            self.videos.get_membership_videos(cancel),
            self.videos.get_master_videos(cancel),
            self.posts.get_all(cancel),
            self.reviews.get_all(cancel),
        )?;

        let videos: Vec<Video> = membership.into_iter().chain(master).collect();
        Ok(DashboardStats::compute(
            &users,
            &videos,
            &posts,
            reviews.len(),
            now,
        ))
    }

    pub async fn list_users(
        &self,
        grade: Grade,
        cancel: &CancellationToken,
    ) -> Result<Vec<User>, PlatformError> {
        authorize(grade, ContentKind::UserAdministration)?;
        Ok(self.users.get_all(cancel).await?)
    }

    pub async fn change_user_grade(
        &self,
        grade: Grade,
        user_id: Id,
        new_grade: Grade,
        cancel: &CancellationToken,
    ) -> Result<User, PlatformError> {
        authorize(grade, ContentKind::UserAdministration)?;
        let user = self
            .users
            .update(user_id, UserPatch::grade(new_grade), cancel)
            .await?;
        info!(%grade, user_id, %new_grade, "user grade changed");
        Ok(user)
    }
}
