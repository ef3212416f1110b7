//! Lock store trait and error type

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

/// Lock store failure. Contention is not an error - `try_acquire` reports
/// it as `Ok(false)`.
#[derive(Error, Debug)]
pub enum LockError {
    #[error("lock store error: {0}")]
    Database(#[from] sqlx::Error),
}

/// TTL-bounded try-lock keyed by an opaque string.
#[async_trait]
pub trait LockStore: Send + Sync {
    /// Attempt to create a lock record for `key` with the given `ttl`.
    ///
    /// Succeeds only if no live (non-expired) record for `key` exists, in
    /// which case the record is created atomically. Never blocks on
    /// contention - returns `Ok(false)` immediately.
    async fn try_acquire(&self, key: &str, ttl: Duration) -> Result<bool, LockError>;

    /// Delete the lock record for `key` unconditionally.
    ///
    /// Idempotent: releasing an absent or already-expired key is a no-op.
    async fn release(&self, key: &str) -> Result<(), LockError>;
}
