//! Stores - latency-simulating in-memory CRUD services.
//!
//! Each store owns its collection behind an `Arc<RwLock<..>>`; clones share
//! state, so a store is constructed once and handed to every consumer.
//! Every call takes a [`CancellationToken`](tokio_util::sync::CancellationToken),
//! waits a randomized [`Latency`], then performs its read or mutation in one
//! synchronous step under the lock.
//!
//! ## Example
//!
//! ```ignore
//! use gated_content::store::{Latency, UserStore};
//! use gated_content::model::UserDraft;
//! use gated_content::access::Grade;
//! use tokio_util::sync::CancellationToken;
//!
//! let cancel = CancellationToken::new();
//! let users = UserStore::new(Latency::default());
//! let kim = users.create(UserDraft::new("kim", "kim@example.com", Grade::Free), &cancel).await?;
//! assert_eq!(users.get_by_id(kim.id, &cancel).await?, Some(kim));
//! ```

mod entity_store;
pub mod fixtures;
mod latency;
mod shared;
mod video_store;

use crate::model::{BlogPost, Id, Review, User};

pub use entity_store::EntityStore;
pub use latency::Latency;
pub use video_store::VideoStore;

pub type UserStore = EntityStore<User>;
pub type BlogStore = EntityStore<BlogPost>;
pub type ReviewStore = EntityStore<Review>;

/// Error type for store operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// Update or delete target is absent.
    #[error("{collection} record {id} not found")]
    NotFound { collection: &'static str, id: Id },
    /// The caller's token fired before the call resolved. Nothing was applied.
    #[error("store call cancelled")]
    Cancelled,
    /// The collection already holds `Id::MAX`; no larger Id is left.
    #[error("{collection} has no Ids left")]
    IdsExhausted { collection: &'static str },
    #[error("store lock poisoned during {0}")]
    LockPoisoned(&'static str),
    /// Bundled fixture data failed to parse.
    #[error("fixture {name} is invalid: {message}")]
    Fixture { name: &'static str, message: String },
}
