//! In-memory lock store
//!
//! `DashMap<String, Instant>` keyed by lock key, value is the expiry
//! deadline. The entry API holds the shard lock across the liveness check
//! and the insert, making acquisition atomic.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use super::store::{LockError, LockStore};

/// In-process try-lock table.
#[derive(Default)]
pub struct MemoryLockStore {
    locks: DashMap<String, Instant>,
}

impl MemoryLockStore {
    pub fn new() -> Self {
        Self {
            locks: DashMap::new(),
        }
    }
}

#[async_trait]
impl LockStore for MemoryLockStore {
    async fn try_acquire(&self, key: &str, ttl: Duration) -> Result<bool, LockError> {
        let now = Instant::now();
        match self.locks.entry(key.to_string()) {
            Entry::Occupied(mut held) => {
                if *held.get() <= now {
                    // Expired record is not live: reclaim it.
                    held.insert(now + ttl);
                    Ok(true)
                } else {
                    Ok(false)
                }
            }
            Entry::Vacant(slot) => {
                slot.insert(now + ttl);
                Ok(true)
            }
        }
    }

    async fn release(&self, key: &str) -> Result<(), LockError> {
        self.locks.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TTL: Duration = Duration::from_secs(30);

    #[tokio::test]
    async fn test_try_acquire_then_contend() {
        let store = MemoryLockStore::new();

        assert!(store.try_acquire("transfer:1:2", TTL).await.unwrap());
        assert!(!store.try_acquire("transfer:1:2", TTL).await.unwrap());

        // A different key is unaffected
        assert!(store.try_acquire("transfer:2:1", TTL).await.unwrap());
    }

    #[tokio::test]
    async fn test_release_reopens_key() {
        let store = MemoryLockStore::new();

        assert!(store.try_acquire("transfer:1:2", TTL).await.unwrap());
        store.release("transfer:1:2").await.unwrap();
        assert!(store.try_acquire("transfer:1:2", TTL).await.unwrap());
    }

    #[tokio::test]
    async fn test_release_is_idempotent() {
        let store = MemoryLockStore::new();

        // Absent key: no-op, not an error
        store.release("transfer:1:2").await.unwrap();

        assert!(store.try_acquire("transfer:1:2", TTL).await.unwrap());
        store.release("transfer:1:2").await.unwrap();
        store.release("transfer:1:2").await.unwrap();
    }

    #[tokio::test]
    async fn test_expired_lock_is_reclaimable() {
        let store = MemoryLockStore::new();

        assert!(
            store
                .try_acquire("transfer:1:2", Duration::from_millis(20))
                .await
                .unwrap()
        );
        assert!(!store.try_acquire("transfer:1:2", TTL).await.unwrap());

        tokio::time::sleep(Duration::from_millis(40)).await;

        // Holder never released; TTL expiry makes the key live again.
        assert!(store.try_acquire("transfer:1:2", TTL).await.unwrap());
    }
}
