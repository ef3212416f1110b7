//! Ledger Store
//!
//! Account balances and the atomic primitives that mutate them.
//!
//! Every balance mutation is a single conditional statement executed by the
//! backing store (`UPDATE ... WHERE` on PostgreSQL, a shard-locked entry on
//! the in-memory store). This gives compare-and-swap semantics without row
//! locks: transfers touching disjoint account pairs never contend here, and
//! a decrement can never drive a balance negative because the sufficiency
//! check and the write are one indivisible operation.

pub mod memory;
pub mod models;
pub mod pg;
pub mod store;

pub use memory::MemoryLedgerStore;
pub use models::Account;
pub use pg::PgLedgerStore;
pub use store::{LedgerStore, StoreError};
