use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::validation::{or_default, require, require_gate};
use super::{merge, Gated, Id, Record, ValidationError, DEFAULT_IMAGE_URL, EXCERPT_CHARS};
use crate::access::AccessLevels;

/// An "insight" post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPost {
    #[serde(rename = "Id")]
    pub id: Id,
    pub title: String,
    #[serde(default)]
    pub excerpt: String,
    pub content: String,
    #[serde(default)]
    pub featured_image: String,
    #[serde(default)]
    pub access_levels: AccessLevels,
    pub published_at: DateTime<Utc>,
}

impl Gated for BlogPost {
    fn access_levels(&self) -> &AccessLevels {
        &self.access_levels
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BlogPostDraft {
    pub title: String,
    /// Derived from the content when blank.
    pub excerpt: Option<String>,
    pub content: String,
    pub featured_image: Option<String>,
    pub access_levels: AccessLevels,
    pub published_at: Option<DateTime<Utc>>,
}

impl BlogPostDraft {
    /// Check required fields and fill in the excerpt and image defaults.
    pub fn validate(self) -> Result<Self, ValidationError> {
        require(&self.title, ValidationError::MissingTitle)?;
        require(&self.content, ValidationError::MissingContent)?;
        require_gate(&self.access_levels)?;

        let content = self.content;
        let excerpt = or_default(self.excerpt, || derive_excerpt(&content));
        let featured_image = or_default(self.featured_image, || DEFAULT_IMAGE_URL.to_string());

        Ok(BlogPostDraft {
            title: self.title,
            excerpt: Some(excerpt),
            content,
            featured_image: Some(featured_image),
            access_levels: self.access_levels,
            published_at: self.published_at,
        })
    }
}

fn derive_excerpt(content: &str) -> String {
    let mut excerpt: String = content.chars().take(EXCERPT_CHARS).collect();
    excerpt.push_str("...");
    excerpt
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BlogPostPatch {
    pub title: Option<String>,
    pub excerpt: Option<String>,
    pub content: Option<String>,
    pub featured_image: Option<String>,
    pub access_levels: Option<AccessLevels>,
}

impl From<BlogPostDraft> for BlogPostPatch {
    fn from(draft: BlogPostDraft) -> Self {
        BlogPostPatch {
            title: Some(draft.title),
            excerpt: draft.excerpt,
            content: Some(draft.content),
            featured_image: draft.featured_image,
            access_levels: Some(draft.access_levels),
        }
    }
}

impl Record for BlogPost {
    const COLLECTION: &'static str = "blog_posts";

    type Draft = BlogPostDraft;
    type Patch = BlogPostPatch;

    fn id(&self) -> Id {
        self.id
    }

    fn from_draft(id: Id, draft: BlogPostDraft, now: DateTime<Utc>) -> Self {
        BlogPost {
            id,
            title: draft.title,
            excerpt: draft.excerpt.unwrap_or_default(),
            content: draft.content,
            featured_image: draft.featured_image.unwrap_or_default(),
            access_levels: draft.access_levels,
            published_at: draft.published_at.unwrap_or(now),
        }
    }

    fn apply(&mut self, patch: BlogPostPatch) {
        merge(&mut self.title, patch.title);
        merge(&mut self.excerpt, patch.excerpt);
        merge(&mut self.content, patch.content);
        merge(&mut self.featured_image, patch.featured_image);
        merge(&mut self.access_levels, patch.access_levels);
    }
}
