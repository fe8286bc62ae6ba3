use chrono::Utc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::shared::Shared;
use super::{Latency, StoreError};
use crate::model::{next_id, Id, Placement, Record};

/// In-memory CRUD service over one collection of `R`.
///
/// Clone-friendly: clones share the same collection.
pub struct EntityStore<R> {
    records: Shared<Vec<R>>,
    latency: Latency,
}

impl<R> Clone for EntityStore<R> {
    fn clone(&self) -> Self {
        Self {
            records: self.records.clone(),
            latency: self.latency,
        }
    }
}

impl<R: Record> Default for EntityStore<R> {
    fn default() -> Self {
        Self::new(Latency::default())
    }
}

impl<R: Record> EntityStore<R> {
    /// Create an empty store.
    pub fn new(latency: Latency) -> Self {
        Self::with_records(Vec::new(), latency)
    }

    /// Create a store seeded with `records`, kept in the given order.
    pub fn with_records(records: Vec<R>, latency: Latency) -> Self {
        Self {
            records: Shared::new(records),
            latency,
        }
    }

    pub fn latency(&self) -> Latency {
        self.latency
    }

    /// Number of records, without simulated latency.
    pub fn len(&self) -> Result<usize, StoreError> {
        self.records.read(|records| records.len())
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        self.records.read(|records| records.is_empty())
    }

    /// Every record, as a copy detached from the store.
    pub async fn get_all(&self, cancel: &CancellationToken) -> Result<Vec<R>, StoreError> {
        self.latency.wait(cancel).await?;
        let records = self.records.read(|records| records.clone())?;
        debug!(collection = R::COLLECTION, count = records.len(), "listed records");
        Ok(records)
    }

    /// The record with `id`, or `None`.
    pub async fn get_by_id(&self, id: Id, cancel: &CancellationToken) -> Result<Option<R>, StoreError> {
        self.latency.wait(cancel).await?;
        let found = self
            .records
            .read(|records| records.iter().find(|r| r.id() == id).cloned())?;
        debug!(collection = R::COLLECTION, id, found = found.is_some(), "looked up record");
        Ok(found)
    }

    /// Insert a new record with the next free Id.
    pub async fn create(&self, draft: R::Draft, cancel: &CancellationToken) -> Result<R, StoreError> {
        self.latency.wait(cancel).await?;
        let now = Utc::now();
        let created = self.records.write(|records| {
            let id = next_id(records.iter()).ok_or(StoreError::IdsExhausted {
                collection: R::COLLECTION,
            })?;
            let record = R::from_draft(id, draft, now);
            match R::PLACEMENT {
                Placement::Front => records.insert(0, record.clone()),
                Placement::Back => records.push(record.clone()),
            }
            Ok::<_, StoreError>(record)
        })??;
        debug!(collection = R::COLLECTION, id = created.id(), "created record");
        Ok(created)
    }

    /// Shallow-merge `patch` over the record with `id`.
    pub async fn update(
        &self,
        id: Id,
        patch: R::Patch,
        cancel: &CancellationToken,
    ) -> Result<R, StoreError> {
        self.update_with(id, move |_| patch, cancel).await
    }

    /// Like [`update`](Self::update), but the patch is computed from the
    /// current record under the write lock, so read-modify-write changes
    /// such as toggles and counters cannot interleave.
    pub async fn update_with<F>(
        &self,
        id: Id,
        make_patch: F,
        cancel: &CancellationToken,
    ) -> Result<R, StoreError>
    where
        F: FnOnce(&R) -> R::Patch + Send,
    {
        self.latency.wait(cancel).await?;
        let updated = self.records.write(|records| {
            let record = records.iter_mut().find(|r| r.id() == id)?;
            let patch = make_patch(&*record);
            record.apply(patch);
            Some(record.clone())
        })?;

        match updated {
            Some(record) => {
                debug!(collection = R::COLLECTION, id, "updated record");
                Ok(record)
            }
            None => Err(not_found::<R>(id, "update")),
        }
    }

    /// Remove the record with `id`.
    pub async fn delete(&self, id: Id, cancel: &CancellationToken) -> Result<bool, StoreError> {
        self.latency.wait(cancel).await?;
        let removed = self.records.write(|records| {
            let index = records.iter().position(|r| r.id() == id)?;
            Some(records.remove(index))
        })?;

        match removed {
            Some(_) => {
                debug!(collection = R::COLLECTION, id, "deleted record");
                Ok(true)
            }
            None => Err(not_found::<R>(id, "delete")),
        }
    }
}

fn not_found<R: Record>(id: Id, operation: &'static str) -> StoreError {
    warn!(collection = R::COLLECTION, id, operation, "record not found");
    StoreError::NotFound {
        collection: R::COLLECTION,
        id,
    }
}
