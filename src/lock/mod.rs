//! Lock Coordinator
//!
//! A distributed, TTL-bounded, non-blocking mutual-exclusion primitive
//! keyed by an opaque string.
//!
//! # Semantics
//!
//! - `try_acquire` is a try-lock: it succeeds only if no live record exists
//!   for the key, and fails fast on contention. Callers never queue.
//! - `release` is an unconditional, idempotent delete.
//! - Expiry is enforced by the lock store's own data (an expired record is
//!   not live), so a crashed holder's lock disappears after at most `ttl`
//!   without anyone polling for it.
//!
//! Any key-value store offering atomic set-if-absent-with-expiry can back
//! the trait; [`PgLockStore`] does it with one upsert statement and
//! [`MemoryLockStore`] with a shard-locked map entry.

pub mod memory;
pub mod pg;
pub mod store;

pub use memory::MemoryLockStore;
pub use pg::PgLockStore;
pub use store::{LockError, LockStore};
