//! # Lock Coordinator
//!
//! A named-mutex registry that serializes mutations sharing a [`ParentKey`].
//!
//! Several children of one remote container (routes tables of one hub, captures
//! of one watcher) are written through the container, so two concurrent writes
//! would race on the server. The coordinator hands out one mutex per key:
//!
//! - Acquiring a key blocks until the current holder releases it.
//! - Distinct keys never block each other.
//! - The registry entry lives while any task holds or waits for the key and is
//!   removed on the last release.
//! - Release happens in [`Drop`], so error, cancellation and panic paths all
//!   unlock. Release itself cannot be cancelled.
//!
//! No fairness is promised; waiters are woken in whatever order tokio chooses.
//! An operation never holds two keys at once. Should that change, acquire in
//! [`ParentKey`]'s `Ord` order.
//!
//! The coordinator is a plain value passed around in an `Arc`, not a global.

use crate::framework::error::ReconcileError;
use crate::framework::identity::ParentKey;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use tokio_util::sync::CancellationToken;
use tracing::trace;

struct Entry {
    mutex: Arc<AsyncMutex<()>>,
    /// Holders plus waiters.
    refs: usize,
}

#[derive(Default)]
pub struct LockCoordinator {
    entries: Mutex<HashMap<ParentKey, Entry>>,
}

impl LockCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Blocks until `key` is free, then holds it until the returned lock drops.
    pub async fn acquire(self: &Arc<Self>, key: &ParentKey) -> ScopedLock {
        let claim = self.claim(key);
        let guard = claim.mutex.clone().lock_owned().await;
        claim.into_lock(guard)
    }

    /// Like [`acquire`](Self::acquire), but gives up when `cancel` fires.
    ///
    /// A cancelled wait holds nothing and releases nothing.
    pub async fn acquire_cancellable(
        self: &Arc<Self>,
        key: &ParentKey,
        cancel: &CancellationToken,
    ) -> Result<ScopedLock, ReconcileError> {
        let claim = self.claim(key);
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                trace!(%key, "Lock wait cancelled");
                Err(ReconcileError::Cancelled {
                    operation: "lock",
                    id: key.to_string(),
                })
            }
            guard = claim.mutex.clone().lock_owned() => Ok(claim.into_lock(guard)),
        }
    }

    /// Number of keys currently held or waited on.
    pub fn active_keys(&self) -> usize {
        self.entries().len()
    }

    pub fn is_active(&self, key: &ParentKey) -> bool {
        self.entries().contains_key(key)
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<ParentKey, Entry>> {
        // The map is consistent after every statement, so a poisoned lock is still usable.
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn claim(self: &Arc<Self>, key: &ParentKey) -> Claim {
        let mut entries = self.entries();
        let entry = entries.entry(key.clone()).or_insert_with(|| Entry {
            mutex: Arc::new(AsyncMutex::new(())),
            refs: 0,
        });
        entry.refs += 1;
        trace!(%key, refs = entry.refs, "Lock claimed");
        Claim {
            coordinator: Arc::clone(self),
            key: key.clone(),
            mutex: Arc::clone(&entry.mutex),
            live: true,
        }
    }

    fn unclaim(&self, key: &ParentKey) {
        let mut entries = self.entries();
        if let Some(entry) = entries.get_mut(key) {
            entry.refs -= 1;
            trace!(%key, refs = entry.refs, "Lock unclaimed");
            if entry.refs == 0 {
                entries.remove(key);
            }
        }
    }
}

/// A registered interest in a key. Dropping it before the mutex is won
/// (e.g. a cancelled wait) removes the interest again.
struct Claim {
    coordinator: Arc<LockCoordinator>,
    key: ParentKey,
    mutex: Arc<AsyncMutex<()>>,
    live: bool,
}

impl Claim {
    fn into_lock(mut self, guard: OwnedMutexGuard<()>) -> ScopedLock {
        self.live = false;
        ScopedLock {
            guard: Some(guard),
            coordinator: Arc::clone(&self.coordinator),
            key: self.key.clone(),
        }
    }
}

impl Drop for Claim {
    fn drop(&mut self) {
        if self.live {
            self.coordinator.unclaim(&self.key);
        }
    }
}

/// Holds a parent key until dropped.
pub struct ScopedLock {
    guard: Option<OwnedMutexGuard<()>>,
    coordinator: Arc<LockCoordinator>,
    key: ParentKey,
}

impl ScopedLock {
    pub fn key(&self) -> &ParentKey {
        &self.key
    }

    /// Releases the key now. Equivalent to dropping the lock.
    pub fn release(self) {
        drop(self);
    }
}

impl Drop for ScopedLock {
    fn drop(&mut self) {
        // Unlock before unclaiming so a waiter never observes a removed entry it still needs.
        drop(self.guard.take());
        self.coordinator.unclaim(&self.key);
        trace!(key = %self.key, "Lock released");
    }
}

impl std::fmt::Debug for ScopedLock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScopedLock").field("key", &self.key).finish()
    }
}
