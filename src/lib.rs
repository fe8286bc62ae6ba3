//! Grade-gated content platform core.
//!
//! - [`access`]: grades, access levels, the [`has_access`] predicate and the
//!   edit policy
//! - [`model`]: user, video, blog post and review records with their draft
//!   and patch types
//! - [`store`]: latency-simulating in-memory CRUD stores
//! - [`platform`]: the stores bundled with the composed operations pages run
//! - [`config`]: latency and seeding settings

pub mod access;
pub mod config;
pub mod model;
pub mod platform;
pub mod store;

pub use access::{has_access, AccessLevel, AccessLevels, ContentKind, Grade};
pub use config::{ConfigError, LatencyConfig, PlatformConfig};
pub use model::{
    BlogPost, BlogPostDraft, BlogPostPatch, CurriculumSubmission, Gated, Id, Lesson, Record,
    Review, ReviewDraft, ReviewPatch, User, UserDraft, UserPatch, ValidationError, Video,
    VideoCategory, VideoDraft, VideoPatch,
};
pub use platform::{
    DashboardStats, FeaturedContent, InsightStats, PartitionStats, Platform, PlatformError,
    ReviewStats, TopicGroup, VideoDetail, Visible,
};
pub use store::{
    BlogStore, EntityStore, Latency, ReviewStore, StoreError, UserStore, VideoStore,
};

// Re-export the token type every store call takes
pub use tokio_util::sync::CancellationToken;
