//! Ledger store trait and error type

use async_trait::async_trait;
use rust_decimal::Decimal;
use thiserror::Error;

use super::models::Account;

/// Ledger store failure.
///
/// Only true infrastructure faults surface here; business outcomes
/// (insufficient funds, missing account) are reported through affected-row
/// counts so the caller can react without exception-style control flow.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Atomic balance primitives over accounts.
///
/// Implementations must guarantee that `conditional_withdraw`, `deposit`
/// and `accrue` each execute as one indivisible operation against the
/// account row: no read-then-write window, and conflicting writes to the
/// same account are serialized by the store itself even when no
/// application-level lock is held.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Provision an account for `owner_id` with `balance = initial_deposit`.
    async fn create(&self, owner_id: i64, initial_deposit: Decimal) -> Result<Account, StoreError>;

    /// Read one account by its owner.
    async fn get_by_owner(&self, owner_id: i64) -> Result<Option<Account>, StoreError>;

    /// Decrement the owner's balance by `amount` only if the current
    /// balance covers it.
    ///
    /// Returns rows affected: 1 if applied, 0 if the account is missing or
    /// underfunded. The two zero cases are deliberately indistinguishable;
    /// callers use this primitive as the funds-adequacy check.
    async fn conditional_withdraw(
        &self,
        owner_id: i64,
        amount: Decimal,
    ) -> Result<u64, StoreError>;

    /// Increment the owner's balance by `amount`.
    ///
    /// Returns rows affected: 0 means no account exists for `owner_id`.
    async fn deposit(&self, owner_id: i64, amount: Decimal) -> Result<u64, StoreError>;

    /// Full snapshot of all accounts, read committed at call time. Not
    /// transactionally consistent with in-flight transfers.
    async fn list_all(&self) -> Result<Vec<Account>, StoreError>;

    /// Unconditional overwrite of the account's mutable fields.
    async fn save(&self, account: &Account) -> Result<(), StoreError>;

    /// Apply one accrual step as a single conditional statement:
    /// `balance = min(balance * rate, initial_deposit * cap_factor)`.
    ///
    /// Returns rows affected (0 if the account is missing). Being a single
    /// statement, the step cannot lose a concurrent transfer's update the
    /// way a read-modify-write through `save` would.
    async fn accrue(
        &self,
        owner_id: i64,
        rate: Decimal,
        cap_factor: Decimal,
    ) -> Result<u64, StoreError>;
}
