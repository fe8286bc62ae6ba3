use crate::access::AccessLevels;

/// Fallback image for videos and posts submitted without one.
pub const DEFAULT_IMAGE_URL: &str = "https://images.unsplash.com/photo-1516321318423-f06f85e504b3?ixlib=rb-4.0.3&auto=format&fit=crop&w=1200&q=80";

/// Characters of content used for a derived excerpt.
pub const EXCERPT_CHARS: usize = 150;

pub const REVIEW_MAX_CHARS: usize = 500;

/// A submission rejected before it reaches a store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("title is required")]
    MissingTitle,
    #[error("topic is required")]
    MissingTopic,
    #[error("content is required")]
    MissingContent,
    #[error("at least one access level is required")]
    NoAccessLevels,
    #[error("at least one lesson with a title and video url is required")]
    NoLessons,
    #[error("content is {len} characters, the limit is {max}")]
    TooLong { len: usize, max: usize },
}

pub(crate) fn require(value: &str, err: ValidationError) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(err)
    } else {
        Ok(())
    }
}

pub(crate) fn require_gate(levels: &AccessLevels) -> Result<(), ValidationError> {
    if levels.is_empty() {
        Err(ValidationError::NoAccessLevels)
    } else {
        Ok(())
    }
}

/// Trimmed value, or `fallback` when blank.
pub(crate) fn or_default(value: Option<String>, fallback: impl FnOnce() -> String) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v.trim().to_string(),
        _ => fallback(),
    }
}
