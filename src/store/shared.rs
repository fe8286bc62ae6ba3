use std::sync::{Arc, RwLock};

use super::StoreError;

/// Shared handle to a store's backing state.
///
/// Guards never escape the closures, so no lock is held across an `.await`.
pub(crate) struct Shared<T> {
    inner: Arc<RwLock<T>>,
}

impl<T> Clone for Shared<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> Shared<T> {
    pub(crate) fn new(state: T) -> Self {
        Self {
            inner: Arc::new(RwLock::new(state)),
        }
    }

    pub(crate) fn read<O>(&self, f: impl FnOnce(&T) -> O) -> Result<O, StoreError> {
        let guard = self
            .inner
            .read()
            .map_err(|_| StoreError::LockPoisoned("read"))?;
        Ok(f(&guard))
    }

    pub(crate) fn write<O>(&self, f: impl FnOnce(&mut T) -> O) -> Result<O, StoreError> {
        let mut guard = self
            .inner
            .write()
            .map_err(|_| StoreError::LockPoisoned("write"))?;
        Ok(f(&mut guard))
    }
}
