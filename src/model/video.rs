use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::validation::{or_default, require, require_gate};
use super::{merge, Gated, Id, Record, ValidationError, DEFAULT_IMAGE_URL};
use crate::access::AccessLevels;

/// Which partition of the video store holds a video.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoCategory {
    Membership,
    Master,
}

impl VideoCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            VideoCategory::Membership => "membership",
            VideoCategory::Master => "master",
        }
    }
}

impl fmt::Display for VideoCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    #[serde(rename = "Id")]
    pub id: Id,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub thumbnail_url: String,
    pub video_url: String,
    pub topic: String,
    pub category: VideoCategory,
    #[serde(default)]
    pub access_levels: AccessLevels,
    #[serde(default)]
    pub is_pinned: bool,
    pub created_at: DateTime<Utc>,
}

impl Gated for Video {
    fn access_levels(&self) -> &AccessLevels {
        &self.access_levels
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VideoDraft {
    pub title: String,
    pub description: String,
    pub thumbnail_url: String,
    pub video_url: String,
    pub topic: String,
    /// Selects the partition the video lands in.
    pub category: VideoCategory,
    pub access_levels: AccessLevels,
    pub is_pinned: bool,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct VideoPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub thumbnail_url: Option<String>,
    pub video_url: Option<String>,
    pub topic: Option<String>,
    /// Moves the video to the other partition when it differs.
    pub category: Option<VideoCategory>,
    pub access_levels: Option<AccessLevels>,
    pub is_pinned: Option<bool>,
}

impl VideoPatch {
    pub fn pinned(is_pinned: bool) -> Self {
        Self {
            is_pinned: Some(is_pinned),
            ..Self::default()
        }
    }
}

impl Record for Video {
    const COLLECTION: &'static str = "videos";

    type Draft = VideoDraft;
    type Patch = VideoPatch;

    fn id(&self) -> Id {
        self.id
    }

    fn from_draft(id: Id, draft: VideoDraft, now: DateTime<Utc>) -> Self {
        Video {
            id,
            title: draft.title,
            description: draft.description,
            thumbnail_url: draft.thumbnail_url,
            video_url: draft.video_url,
            topic: draft.topic,
            category: draft.category,
            access_levels: draft.access_levels,
            is_pinned: draft.is_pinned,
            created_at: draft.created_at.unwrap_or(now),
        }
    }

    fn apply(&mut self, patch: VideoPatch) {
        merge(&mut self.title, patch.title);
        merge(&mut self.description, patch.description);
        merge(&mut self.thumbnail_url, patch.thumbnail_url);
        merge(&mut self.video_url, patch.video_url);
        merge(&mut self.topic, patch.topic);
        merge(&mut self.category, patch.category);
        merge(&mut self.access_levels, patch.access_levels);
        merge(&mut self.is_pinned, patch.is_pinned);
    }
}

/// One lesson of a curriculum submission.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Lesson {
    pub title: String,
    pub video_url: String,
    pub description: String,
}

impl Lesson {
    pub fn new(title: impl Into<String>, video_url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            video_url: video_url.into(),
            description: String::new(),
        }
    }

    fn is_complete(&self) -> bool {
        !self.title.trim().is_empty() && !self.video_url.trim().is_empty()
    }
}

/// A topic with its lessons, submitted in one go.
///
/// Every lesson becomes one video sharing the topic, thumbnail, gate and pin
/// state of the submission.
#[derive(Debug, Clone, PartialEq)]
pub struct CurriculumSubmission {
    pub title: String,
    pub topic: String,
    pub description: String,
    pub thumbnail_url: Option<String>,
    pub access_levels: AccessLevels,
    pub is_pinned: bool,
    pub lessons: Vec<Lesson>,
}

impl CurriculumSubmission {
    /// Validate and expand into one draft per complete lesson.
    ///
    /// Lessons missing a title or url are skipped; at least one must remain.
    pub fn into_drafts(
        self,
        category: VideoCategory,
        now: DateTime<Utc>,
    ) -> Result<Vec<VideoDraft>, ValidationError> {
        require(&self.title, ValidationError::MissingTitle)?;
        require(&self.topic, ValidationError::MissingTopic)?;
        require_gate(&self.access_levels)?;

        let lessons: Vec<Lesson> = self.lessons.into_iter().filter(Lesson::is_complete).collect();
        if lessons.is_empty() {
            return Err(ValidationError::NoLessons);
        }

        let thumbnail_url = or_default(self.thumbnail_url, || DEFAULT_IMAGE_URL.to_string());

        Ok(lessons
            .into_iter()
            .map(|lesson| VideoDraft {
                title: lesson.title,
                description: lesson.description,
                thumbnail_url: thumbnail_url.clone(),
                video_url: lesson.video_url,
                topic: self.topic.clone(),
                category,
                access_levels: self.access_levels.clone(),
                is_pinned: self.is_pinned,
                created_at: Some(now),
            })
            .collect())
    }
}
