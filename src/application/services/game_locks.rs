//! Per-game write locks shared by every service that mutates or deletes games.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::OwnedMutexGuard;

use crate::domain::ids::ExternalKey;

type Slot = Arc<tokio::sync::Mutex<()>>;

/// Registry of one async mutex per game.
///
/// Guess submission, removal and stale sweeps against one game run one at a
/// time; different games never contend. An entry lives only while some task
/// holds or waits for it.
#[derive(Clone, Default)]
pub struct GameLocks {
    slots: Arc<Mutex<HashMap<ExternalKey, Slot>>>,
}

impl GameLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits for exclusive access to the game with `key`.
    ///
    /// Access lasts until the returned guard is dropped. Dropping the future
    /// while it waits gives up the place in line without leaving an entry
    /// behind.
    pub async fn lock(&self, key: ExternalKey) -> GameLockGuard {
        let slot = {
            let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(slots.entry(key).or_default())
        };

        let mut guard = GameLockGuard {
            locks: self.clone(),
            key,
            waiting: Some(Arc::clone(&slot)),
            held: None,
        };
        guard.held = Some(slot.lock_owned().await);
        guard.waiting = None;
        guard
    }

    /// Number of games currently locked or waited on.
    pub fn len(&self) -> usize {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn release(&self, key: ExternalKey) {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        if slots.get(&key).is_some_and(|slot| Arc::strong_count(slot) == 1) {
            slots.remove(&key);
        }
    }
}

/// Exclusive access to one game, released on drop.
pub struct GameLockGuard {
    locks: GameLocks,
    key: ExternalKey,
    waiting: Option<Slot>,
    held: Option<OwnedMutexGuard<()>>,
}

impl Drop for GameLockGuard {
    fn drop(&mut self) {
        self.held.take();
        self.waiting.take();
        self.locks.release(self.key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_entry_removed_after_guard_drops() {
        let locks = GameLocks::new();
        let key = ExternalKey::new();

        let guard = locks.lock(key).await;
        assert_eq!(locks.len(), 1);

        drop(guard);
        assert!(locks.is_empty());
    }

    #[tokio::test]
    async fn test_second_locker_waits_for_first() {
        let locks = GameLocks::new();
        let key = ExternalKey::new();
        let guard = locks.lock(key).await;

        let blocked = tokio::time::timeout(Duration::from_millis(20), locks.lock(key)).await;
        assert!(blocked.is_err());

        // Another game is unaffected.
        let other = tokio::time::timeout(Duration::from_millis(20), locks.lock(ExternalKey::new()))
            .await;
        assert!(other.is_ok());
        drop(other);

        drop(guard);
        let acquired = tokio::time::timeout(Duration::from_millis(20), locks.lock(key)).await;
        assert!(acquired.is_ok());
        drop(acquired);
        assert!(locks.is_empty());
    }

    #[tokio::test]
    async fn test_cancelled_waiter_leaves_no_entry() {
        let locks = GameLocks::new();
        let key = ExternalKey::new();
        let guard = locks.lock(key).await;

        let waiter = {
            let locks = locks.clone();
            tokio::spawn(async move {
                let _guard = locks.lock(key).await;
            })
        };
        tokio::task::yield_now().await;
        waiter.abort();
        assert!(waiter.await.unwrap_err().is_cancelled());

        drop(guard);
        assert!(locks.is_empty());
    }
}
