//! Thread-safe handle around a [`ProfileStore`].
//!
//! All mutations run under one mutex, so "read state → compute next state →
//! persist" can never interleave between tasks.

use std::sync::{Arc, Mutex, MutexGuard};

use super::errors::ProfileError;
use super::store::ProfileStore;
use super::types::AvatarState;

#[derive(Clone)]
pub struct SharedProfileStore {
    inner: Arc<Mutex<ProfileStore>>,
}

impl SharedProfileStore {
    pub fn new(store: ProfileStore) -> Self {
        Self {
            inner: Arc::new(Mutex::new(store)),
        }
    }

    /// Run `op` with exclusive access to the store.
    pub fn with<R>(&self, op: impl FnOnce(&mut ProfileStore) -> Result<R, ProfileError>) -> Result<R, ProfileError> {
        let mut guard = self.lock();
        op(&mut guard)
    }

    pub fn snapshot(&self) -> Option<AvatarState> {
        self.lock().snapshot()
    }

    fn lock(&self) -> MutexGuard<'_, ProfileStore> {
        // A panic inside `op` happens before commit, so the store behind a
        // poisoned lock still holds the last committed state.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
