//! Transfer Orchestrator
//!
//! Composes the lock coordinator and the ledger store into the two-account
//! debit/credit protocol.
//!
//! # Protocol
//!
//! ```text
//! try_acquire(key) ──▶ conditional_withdraw(from) ──▶ deposit(to) ──▶ OK
//!       │                        │                        │
//!    Conflict            InsufficientFunds         RecipientMissing
//!                                                  (source restored)
//! ```
//!
//! The lock key is the ordered pair `transfer:{from}:{to}`, so two transfers
//! with the same ordered pair are mutually exclusive while the reversed pair
//! is not - balance correctness for that case rests on the ledger store's
//! conditional primitives, not on the lock.
//!
//! # Safety Invariants
//!
//! 1. **Release on every exit**: once acquired, the lock is released on
//!    success and on every failure path, including infrastructure errors.
//! 2. **All-or-nothing**: a failed deposit triggers a compensating deposit
//!    back to the source, so money never leaves one account without
//!    reaching the other from the caller's perspective.
//! 3. **No mutation before the lock**: a `Conflict` outcome means nothing
//!    was touched.

pub mod error;
pub mod service;

pub use error::TransferError;
pub use service::{TransferConfig, TransferService};
