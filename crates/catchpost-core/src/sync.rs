//! Per-user mutual exclusion.
//!
//! Every read-modify-write of a user's draft happens under that user's
//! lock, whether it comes from the user's own wizard events or from a
//! moderator's decision about the user's submission. Events for different
//! users never contend.

use std::sync::Arc;

use catchpost_types::ids::UserId;
use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Registry of per-user async mutexes, shared by the wizard and the
/// moderation coordinator.
///
/// An entry lives only while someone holds or waits for it; the last guard
/// to drop removes it.
#[derive(Default)]
pub struct UserLocks {
    locks: DashMap<UserId, Arc<Mutex<()>>>,
}

/// Held lock for one user. Dropping it releases the lock and prunes the
/// registry entry when nobody else is queued on it.
pub struct UserGuard<'a> {
    registry: &'a UserLocks,
    user_id: UserId,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for UserGuard<'_> {
    fn drop(&mut self) {
        self.guard.take();
        // Clones are handed out under the shard lock, so a count of one
        // means no other task holds or awaits this mutex.
        self.registry
            .locks
            .remove_if(&self.user_id, |_, lock| Arc::strong_count(lock) == 1);
    }
}

impl UserLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for and take the lock for `user_id`.
    pub async fn acquire(&self, user_id: UserId) -> UserGuard<'_> {
        let lock = self
            .locks
            .entry(user_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .value()
            .clone();
        let guard = lock.lock_owned().await;
        UserGuard {
            registry: self,
            user_id,
            guard: Some(guard),
        }
    }

    /// Number of users currently holding or waiting for a lock.
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}

impl std::fmt::Debug for UserLocks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserLocks")
            .field("users", &self.locks.len())
            .finish()
    }
}
