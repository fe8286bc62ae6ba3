use chrono::Utc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::shared::Shared;
use super::{Latency, StoreError};
use crate::model::{next_id, Id, Record, Video, VideoCategory, VideoDraft, VideoPatch};

/// The two physical video collections.
///
/// Both live behind one lock so cross-partition Id assignment and
/// partition moves are atomic.
#[derive(Debug, Default)]
struct Partitions {
    membership: Vec<Video>,
    master: Vec<Video>,
}

impl Partitions {
    fn get(&self, category: VideoCategory) -> &Vec<Video> {
        match category {
            VideoCategory::Membership => &self.membership,
            VideoCategory::Master => &self.master,
        }
    }

    fn get_mut(&mut self, category: VideoCategory) -> &mut Vec<Video> {
        match category {
            VideoCategory::Membership => &mut self.membership,
            VideoCategory::Master => &mut self.master,
        }
    }

    /// Membership first, then master.
    fn locate(&self, id: Id) -> Option<(VideoCategory, usize)> {
        [VideoCategory::Membership, VideoCategory::Master]
            .into_iter()
            .find_map(|category| {
                self.get(category)
                    .iter()
                    .position(|v| v.id == id)
                    .map(|index| (category, index))
            })
    }

    /// First of `count` consecutive free Ids, if all of them fit in `Id`.
    fn reserve(&self, count: usize) -> Result<Id, StoreError> {
        let exhausted = StoreError::IdsExhausted {
            collection: Video::COLLECTION,
        };
        let first = next_id(self.membership.iter().chain(self.master.iter()))
            .ok_or_else(|| exhausted.clone())?;
        let span = Id::try_from(count.saturating_sub(1)).map_err(|_| exhausted.clone())?;
        first.checked_add(span).ok_or(exhausted)?;
        Ok(first)
    }

    fn insert(&mut self, id: Id, draft: VideoDraft, now: chrono::DateTime<Utc>) -> Video {
        let video = Video::from_draft(id, draft, now);
        self.get_mut(video.category).insert(0, video.clone());
        video
    }
}

/// Video store split into membership and master partitions.
///
/// Lookups by Id span both partitions. Ids are unique across both.
#[derive(Clone)]
pub struct VideoStore {
    partitions: Shared<Partitions>,
    latency: Latency,
}

impl Default for VideoStore {
    fn default() -> Self {
        Self::new(Latency::default())
    }
}

impl VideoStore {
    pub fn new(latency: Latency) -> Self {
        Self::with_records(Vec::new(), Vec::new(), latency)
    }

    /// Seed both partitions. Records are kept in the partition they are
    /// given in, whatever their `category` field says.
    pub fn with_records(membership: Vec<Video>, master: Vec<Video>, latency: Latency) -> Self {
        Self {
            partitions: Shared::new(Partitions { membership, master }),
            latency,
        }
    }

    pub fn latency(&self) -> Latency {
        self.latency
    }

    /// Number of videos in one partition, without simulated latency.
    pub fn len(&self, category: VideoCategory) -> Result<usize, StoreError> {
        self.partitions.read(|p| p.get(category).len())
    }

    pub async fn get_membership_videos(
        &self,
        cancel: &CancellationToken,
    ) -> Result<Vec<Video>, StoreError> {
        self.get_partition(VideoCategory::Membership, cancel).await
    }

    pub async fn get_master_videos(
        &self,
        cancel: &CancellationToken,
    ) -> Result<Vec<Video>, StoreError> {
        self.get_partition(VideoCategory::Master, cancel).await
    }

    /// All videos of one partition, as a detached copy.
    pub async fn get_partition(
        &self,
        category: VideoCategory,
        cancel: &CancellationToken,
    ) -> Result<Vec<Video>, StoreError> {
        self.latency.wait(cancel).await?;
        let videos = self.partitions.read(|p| p.get(category).clone())?;
        debug!(collection = Video::COLLECTION, %category, count = videos.len(), "listed videos");
        Ok(videos)
    }

    /// Find a video in either partition.
    pub async fn get_by_id(
        &self,
        id: Id,
        cancel: &CancellationToken,
    ) -> Result<Option<Video>, StoreError> {
        self.latency.wait(cancel).await?;
        let found = self.partitions.read(|p| {
            p.locate(id)
                .map(|(category, index)| p.get(category)[index].clone())
        })?;
        debug!(collection = Video::COLLECTION, id, found = found.is_some(), "looked up video");
        Ok(found)
    }

    /// Insert a video at the front of the partition named by its category.
    pub async fn create(
        &self,
        draft: VideoDraft,
        cancel: &CancellationToken,
    ) -> Result<Video, StoreError> {
        self.latency.wait(cancel).await?;
        let now = Utc::now();
        let video = self.partitions.write(|p| {
            let id = p.reserve(1)?;
            Ok::<_, StoreError>(p.insert(id, draft, now))
        })??;
        debug!(collection = Video::COLLECTION, id = video.id, category = %video.category, "created video");
        Ok(video)
    }

    /// Create every draft or none of them.
    ///
    /// One latency wait, then all inserts under a single write lock, so the
    /// videos get consecutive Ids and no reader sees a partial curriculum.
    /// Drafts are inserted in order, each at the front of its partition.
    pub async fn create_curriculum(
        &self,
        drafts: Vec<VideoDraft>,
        cancel: &CancellationToken,
    ) -> Result<Vec<Video>, StoreError> {
        self.latency.wait(cancel).await?;
        let now = Utc::now();
        let created = self.partitions.write(|p| {
            let first = p.reserve(drafts.len())?;
            Ok::<_, StoreError>(
                drafts
                    .into_iter()
                    .zip(0..)
                    .map(|(draft, offset)| p.insert(first + offset, draft, now))
                    .collect::<Vec<_>>(),
            )
        })??;
        debug!(collection = Video::COLLECTION, count = created.len(), "created curriculum");
        Ok(created)
    }

    /// Shallow-merge `patch` over a video, searching membership first.
    ///
    /// A patch that changes the category moves the video to the front of the
    /// other partition.
    pub async fn update(
        &self,
        id: Id,
        patch: VideoPatch,
        cancel: &CancellationToken,
    ) -> Result<Video, StoreError> {
        self.update_with(id, move |_| patch, cancel).await
    }

    /// Update with a patch computed from the current video under the lock.
    pub async fn update_with<F>(
        &self,
        id: Id,
        make_patch: F,
        cancel: &CancellationToken,
    ) -> Result<Video, StoreError>
    where
        F: FnOnce(&Video) -> VideoPatch + Send,
    {
        self.latency.wait(cancel).await?;
        let updated = self.partitions.write(|p| {
            let (category, index) = p.locate(id)?;
            let partition = p.get_mut(category);
            let patch = make_patch(&partition[index]);
            partition[index].apply(patch);

            let video = partition[index].clone();
            if video.category != category {
                partition.remove(index);
                p.get_mut(video.category).insert(0, video.clone());
            }
            Some(video)
        })?;

        match updated {
            Some(video) => {
                debug!(collection = Video::COLLECTION, id, category = %video.category, "updated video");
                Ok(video)
            }
            None => Err(not_found(id, "update")),
        }
    }

    /// Remove a video, searching membership first.
    pub async fn delete(&self, id: Id, cancel: &CancellationToken) -> Result<bool, StoreError> {
        self.latency.wait(cancel).await?;
        let removed = self.partitions.write(|p| {
            let (category, index) = p.locate(id)?;
            Some(p.get_mut(category).remove(index))
        })?;

        match removed {
            Some(_) => {
                debug!(collection = Video::COLLECTION, id, "deleted video");
                Ok(true)
            }
            None => Err(not_found(id, "delete")),
        }
    }
}

fn not_found(id: Id, operation: &'static str) -> StoreError {
    warn!(collection = Video::COLLECTION, id, operation, "video not found");
    StoreError::NotFound {
        collection: Video::COLLECTION,
        id,
    }
}
