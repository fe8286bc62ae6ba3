use chrono::Utc;
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::info;

use super::{authorize, open, Platform, PlatformError, Visible};
use crate::access::{ContentKind, Grade};
use crate::model::{
    BlogPost, CurriculumSubmission, Id, Record, ValidationError, Video, VideoCategory, VideoPatch,
};

/// Slots on the featured shelf.
pub const FEATURED_VIDEOS: usize = 4;
pub const RECENT_POSTS: usize = 3;

#[derive(Debug, Clone, PartialEq)]
pub struct FeaturedContent {
    pub videos: Vec<Visible<Video>>,
    pub posts: Vec<Visible<BlogPost>>,
}

/// One topic of a curriculum with its lessons in store order.
#[derive(Debug, Clone, PartialEq)]
pub struct TopicGroup {
    pub topic: String,
    pub lessons: Vec<Visible<Video>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VideoDetail {
    pub video: Video,
    /// The rest of the video's partition.
    pub related: Vec<Video>,
}

/// Figures shown above a partition's video grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PartitionStats {
    pub category: VideoCategory,
    pub total_videos: usize,
    pub pinned_videos: usize,
}

impl PartitionStats {
    pub fn compute(category: VideoCategory, videos: &[Video]) -> Self {
        Self {
            category,
            total_videos: videos.len(),
            pinned_videos: videos.iter().filter(|v| v.is_pinned).count(),
        }
    }
}

/// Pinned videos first, then the newest unpinned ones, up to `limit`.
pub fn select_featured(videos: impl IntoIterator<Item = Video>, limit: usize) -> Vec<Video> {
    let (pinned, mut rest): (Vec<Video>, Vec<Video>) =
        videos.into_iter().partition(|v| v.is_pinned);

    let mut featured: Vec<Video> = pinned.into_iter().take(limit).collect();
    rest.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    let room = limit - featured.len();
    featured.extend(rest.into_iter().take(room));
    featured
}

/// Group videos by topic, topics in first-seen order.
pub fn group_by_topic(videos: impl IntoIterator<Item = Video>) -> Vec<(String, Vec<Video>)> {
    let mut groups: Vec<(String, Vec<Video>)> = Vec::new();
    for video in videos {
        match groups.iter_mut().find(|(topic, _)| *topic == video.topic) {
            Some((_, lessons)) => lessons.push(video),
            None => groups.push((video.topic.clone(), vec![video])),
        }
    }
    groups
}

impl Platform {
    /// The home shelf: featured videos from both partitions and the latest posts.
    pub async fn featured_content(
        &self,
        grade: Grade,
        cancel: &CancellationToken,
    ) -> Result<FeaturedContent, PlatformError> {
        let (membership, master, posts) = tokio::try_join!(
            self.videos.get_membership_videos(cancel),
            self.videos.get_master_videos(cancel),
            self.posts.get_all(cancel),
        )?;

        let videos = select_featured(membership.into_iter().chain(master), FEATURED_VIDEOS)
            .into_iter()
            .map(|v| Visible::for_viewer(v, grade))
            .collect();
        let posts = posts
            .into_iter()
            .take(RECENT_POSTS)
            .map(|p| Visible::for_viewer(p, grade))
            .collect();

        Ok(FeaturedContent { videos, posts })
    }

    /// One partition laid out by topic, each lesson tagged with access.
    pub async fn curriculum(
        &self,
        grade: Grade,
        category: VideoCategory,
        cancel: &CancellationToken,
    ) -> Result<Vec<TopicGroup>, PlatformError> {
        let videos = self.videos.get_partition(category, cancel).await?;
        Ok(group_by_topic(videos)
            .into_iter()
            .map(|(topic, lessons)| TopicGroup {
                topic,
                lessons: lessons
                    .into_iter()
                    .map(|v| Visible::for_viewer(v, grade))
                    .collect(),
            })
            .collect())
    }

    pub async fn partition_stats(
        &self,
        category: VideoCategory,
        cancel: &CancellationToken,
    ) -> Result<PartitionStats, PlatformError> {
        let videos = self.videos.get_partition(category, cancel).await?;
        Ok(PartitionStats::compute(category, &videos))
    }

    /// Load a video for playback, re-checking access.
    pub async fn load_video(
        &self,
        grade: Grade,
        id: Id,
        cancel: &CancellationToken,
    ) -> Result<VideoDetail, PlatformError> {
        let found = self.videos.get_by_id(id, cancel).await?;
        let video = open(found, grade, Video::COLLECTION, id)?;

        let related = self
            .videos
            .get_partition(video.category, cancel)
            .await?
            .into_iter()
            .filter(|v| v.id != video.id)
            .collect();

        Ok(VideoDetail { video, related })
    }

    /// Create every lesson of a curriculum, all or nothing.
    pub async fn submit_curriculum(
        &self,
        grade: Grade,
        category: VideoCategory,
        submission: CurriculumSubmission,
        cancel: &CancellationToken,
    ) -> Result<Vec<Video>, PlatformError> {
        authorize(grade, ContentKind::for_category(category))?;
        let drafts = submission.into_drafts(category, Utc::now())?;
        let created = self.videos.create_curriculum(drafts, cancel).await?;
        info!(%grade, %category, count = created.len(), "curriculum submitted");
        Ok(created)
    }

    pub async fn edit_video(
        &self,
        grade: Grade,
        id: Id,
        patch: VideoPatch,
        cancel: &CancellationToken,
    ) -> Result<Video, PlatformError> {
        self.managed_video(grade, id, cancel).await?;
        if let Some(target) = patch.category {
            authorize(grade, ContentKind::for_category(target))?;
        }
        if patch.access_levels.as_ref().is_some_and(|levels| levels.is_empty()) {
            return Err(ValidationError::NoAccessLevels.into());
        }

        let video = self.videos.update(id, patch, cancel).await?;
        info!(%grade, id, "video edited");
        Ok(video)
    }

    /// Flip the pinned flag.
    pub async fn toggle_pin(
        &self,
        grade: Grade,
        id: Id,
        cancel: &CancellationToken,
    ) -> Result<Video, PlatformError> {
        self.managed_video(grade, id, cancel).await?;
        let video = self
            .videos
            .update_with(id, |v| VideoPatch::pinned(!v.is_pinned), cancel)
            .await?;
        info!(%grade, id, pinned = video.is_pinned, "video pin toggled");
        Ok(video)
    }

    pub async fn delete_video(
        &self,
        grade: Grade,
        id: Id,
        cancel: &CancellationToken,
    ) -> Result<bool, PlatformError> {
        self.managed_video(grade, id, cancel).await?;
        let deleted = self.videos.delete(id, cancel).await?;
        info!(%grade, id, "video deleted");
        Ok(deleted)
    }

    /// Fetch a video and check `grade` may manage its partition.
    async fn managed_video(
        &self,
        grade: Grade,
        id: Id,
        cancel: &CancellationToken,
    ) -> Result<Video, PlatformError> {
        let video = self
            .videos
            .get_by_id(id, cancel)
            .await?
            .ok_or(PlatformError::NotFound {
                collection: Video::COLLECTION,
                id,
            })?;
        authorize(grade, ContentKind::for_category(video.category))?;
        Ok(video)
    }
}
