use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{merge, Id, Record, ValidationError, REVIEW_MAX_CHARS};
use crate::access::Grade;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    #[serde(rename = "Id")]
    pub id: Id,
    pub content: String,
    pub user_name: String,
    pub user_grade: Grade,
    #[serde(default)]
    pub is_hidden: bool,
    #[serde(default)]
    pub likes: u32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReviewDraft {
    pub content: String,
    pub user_name: String,
    pub user_grade: Grade,
    pub created_at: Option<DateTime<Utc>>,
}

impl ReviewDraft {
    /// A fresh, visible review with no likes. Content is trimmed and checked
    /// against the length limit.
    pub fn new(
        content: &str,
        user_name: impl Into<String>,
        user_grade: Grade,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            content: check_content(content)?,
            user_name: user_name.into(),
            user_grade,
            created_at: None,
        })
    }
}

/// Trim review text and enforce the length limit.
pub(crate) fn check_content(content: &str) -> Result<String, ValidationError> {
    let content = content.trim();
    if content.is_empty() {
        return Err(ValidationError::MissingContent);
    }
    let len = content.chars().count();
    if len > REVIEW_MAX_CHARS {
        return Err(ValidationError::TooLong {
            len,
            max: REVIEW_MAX_CHARS,
        });
    }
    Ok(content.to_string())
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReviewPatch {
    pub content: Option<String>,
    pub is_hidden: Option<bool>,
    pub likes: Option<u32>,
}

impl ReviewPatch {
    pub fn content(content: &str) -> Result<Self, ValidationError> {
        Ok(Self {
            content: Some(check_content(content)?),
            ..Self::default()
        })
    }
}

impl Record for Review {
    const COLLECTION: &'static str = "reviews";

    type Draft = ReviewDraft;
    type Patch = ReviewPatch;

    fn id(&self) -> Id {
        self.id
    }

    fn from_draft(id: Id, draft: ReviewDraft, now: DateTime<Utc>) -> Self {
        Review {
            id,
            content: draft.content,
            user_name: draft.user_name,
            user_grade: draft.user_grade,
            is_hidden: false,
            likes: 0,
            created_at: draft.created_at.unwrap_or(now),
        }
    }

    fn apply(&mut self, patch: ReviewPatch) {
        merge(&mut self.content, patch.content);
        merge(&mut self.is_hidden, patch.is_hidden);
        merge(&mut self.likes, patch.likes);
    }
}
