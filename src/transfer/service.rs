//! Transfer service
//!
//! Drives the lock -> withdraw -> deposit protocol and guarantees lock
//! release on every exit path.

use std::sync::Arc;
use std::time::Duration;

use rust_decimal::Decimal;
use tracing::{debug, error, info, warn};

use super::error::TransferError;
use crate::ledger::LedgerStore;
use crate::lock::LockStore;

/// Transfer orchestration settings.
#[derive(Debug, Clone)]
pub struct TransferConfig {
    /// Lock lifetime. A holder that dies mid-transfer stops blocking the
    /// pair after at most this long.
    pub lock_ttl: Duration,
}

impl Default for TransferConfig {
    fn default() -> Self {
        Self {
            lock_ttl: Duration::from_secs(30),
        }
    }
}

/// Orchestrates two-account transfers over a [`LedgerStore`] and a
/// [`LockStore`]. Owns neither balances nor lock records - it only
/// sequences calls into both.
pub struct TransferService {
    ledger: Arc<dyn LedgerStore>,
    locks: Arc<dyn LockStore>,
    config: TransferConfig,
}

impl TransferService {
    pub fn new(ledger: Arc<dyn LedgerStore>, locks: Arc<dyn LockStore>) -> Self {
        Self::with_config(ledger, locks, TransferConfig::default())
    }

    pub fn with_config(
        ledger: Arc<dyn LedgerStore>,
        locks: Arc<dyn LockStore>,
        config: TransferConfig,
    ) -> Self {
        Self {
            ledger,
            locks,
            config,
        }
    }

    /// Lock key for a transfer. Ordered: `(A,B)` and `(B,A)` are distinct
    /// keys, so opposite-direction transfers do not exclude each other.
    pub fn lock_key(from_owner: i64, to_owner: i64) -> String {
        format!("transfer:{}:{}", from_owner, to_owner)
    }

    /// Move `amount` from `from_owner`'s account to `to_owner`'s account.
    ///
    /// Returns `Ok(())` when both balances reflect the transfer. Every
    /// other outcome is a [`TransferError`] variant; for all of them the
    /// source balance equals its value before the attempt.
    pub async fn transfer(
        &self,
        from_owner: i64,
        to_owner: i64,
        amount: Decimal,
    ) -> Result<(), TransferError> {
        if amount <= Decimal::ZERO {
            return Err(TransferError::InvalidAmount);
        }
        if from_owner == to_owner {
            return Err(TransferError::SameAccount);
        }

        let key = Self::lock_key(from_owner, to_owner);
        if !self.locks.try_acquire(&key, self.config.lock_ttl).await? {
            debug!(key = %key, "Pair already locked, failing fast");
            return Err(TransferError::Conflict);
        }

        // Lock held from here on. Run the balance protocol, then release
        // no matter how it ended - a holder that dies before this point is
        // covered by the TTL.
        let outcome = self.debit_credit(from_owner, to_owner, amount).await;

        if let Err(e) = self.locks.release(&key).await {
            warn!(key = %key, error = %e, "Lock release failed, TTL will reclaim the key");
        }

        outcome
    }

    async fn debit_credit(
        &self,
        from_owner: i64,
        to_owner: i64,
        amount: Decimal,
    ) -> Result<(), TransferError> {
        if self
            .ledger
            .conditional_withdraw(from_owner, amount)
            .await?
            == 0
        {
            debug!(from_owner, amount = %amount, "Withdraw not applied");
            return Err(TransferError::InsufficientFunds);
        }

        if self.ledger.deposit(to_owner, amount).await? == 0 {
            // The withdraw already landed; put it back before surfacing.
            self.restore_source(from_owner, amount).await?;
            return Err(TransferError::RecipientMissing);
        }

        info!(from_owner, to_owner, amount = %amount, "Transfer committed");
        Ok(())
    }

    /// Compensating deposit after a failed credit.
    async fn restore_source(&self, from_owner: i64, amount: Decimal) -> Result<(), TransferError> {
        match self.ledger.deposit(from_owner, amount).await {
            Ok(_) => {
                debug!(from_owner, amount = %amount, "Source balance restored");
                Ok(())
            }
            Err(e) => {
                error!(
                    from_owner,
                    amount = %amount,
                    error = %e,
                    "Compensating deposit failed, source balance NOT restored"
                );
                Err(e.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::MemoryLedgerStore;
    use crate::lock::MemoryLockStore;

    struct TestHarness {
        service: TransferService,
        ledger: Arc<MemoryLedgerStore>,
        locks: Arc<MemoryLockStore>,
    }

    impl TestHarness {
        fn new() -> Self {
            let ledger = Arc::new(MemoryLedgerStore::new());
            let locks = Arc::new(MemoryLockStore::new());
            let service = TransferService::new(ledger.clone(), locks.clone());
            Self {
                service,
                ledger,
                locks,
            }
        }

        async fn balance_of(&self, owner_id: i64) -> Decimal {
            self.ledger
                .get_by_owner(owner_id)
                .await
                .unwrap()
                .unwrap()
                .balance
        }
    }

    #[tokio::test]
    async fn test_transfer_success() {
        let h = TestHarness::new();
        h.ledger.create(1, Decimal::from(100)).await.unwrap();
        h.ledger.create(2, Decimal::from(100)).await.unwrap();

        h.service
            .transfer(1, 2, Decimal::from(40))
            .await
            .unwrap();

        assert_eq!(h.balance_of(1).await, Decimal::from(60));
        assert_eq!(h.balance_of(2).await, Decimal::from(140));
    }

    #[tokio::test]
    async fn test_full_balance_transfer_leaves_source_at_zero() {
        let h = TestHarness::new();
        h.ledger.create(1, Decimal::from(100)).await.unwrap();
        h.ledger.create(2, Decimal::from(0)).await.unwrap();

        h.service
            .transfer(1, 2, Decimal::from(100))
            .await
            .unwrap();

        assert_eq!(h.balance_of(1).await, Decimal::ZERO);
        assert_eq!(h.balance_of(2).await, Decimal::from(100));
    }

    #[tokio::test]
    async fn test_insufficient_funds_leaves_balances_untouched() {
        let h = TestHarness::new();
        h.ledger.create(1, Decimal::from(50)).await.unwrap();
        h.ledger.create(2, Decimal::from(10)).await.unwrap();

        let result = h.service.transfer(1, 2, Decimal::from(100)).await;
        assert!(matches!(result, Err(TransferError::InsufficientFunds)));

        assert_eq!(h.balance_of(1).await, Decimal::from(50));
        assert_eq!(h.balance_of(2).await, Decimal::from(10));

        // Lock was released on the failure path
        assert!(
            h.locks
                .try_acquire(&TransferService::lock_key(1, 2), Duration::from_secs(30))
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn test_missing_recipient_rolls_back_withdraw() {
        let h = TestHarness::new();
        h.ledger.create(1, Decimal::from(100)).await.unwrap();

        let result = h.service.transfer(1, 42, Decimal::from(30)).await;
        assert!(matches!(result, Err(TransferError::RecipientMissing)));

        // Source balance equals its value before the attempt
        assert_eq!(h.balance_of(1).await, Decimal::from(100));
    }

    #[tokio::test]
    async fn test_held_lock_yields_conflict_without_mutation() {
        let h = TestHarness::new();
        h.ledger.create(1, Decimal::from(100)).await.unwrap();
        h.ledger.create(2, Decimal::from(100)).await.unwrap();

        let key = TransferService::lock_key(1, 2);
        assert!(
            h.locks
                .try_acquire(&key, Duration::from_secs(30))
                .await
                .unwrap()
        );

        let result = h.service.transfer(1, 2, Decimal::from(40)).await;
        assert!(matches!(result, Err(TransferError::Conflict)));

        // The other party's lock is untouched and no balance moved
        assert!(!h.locks.try_acquire(&key, Duration::from_secs(30)).await.unwrap());
        assert_eq!(h.balance_of(1).await, Decimal::from(100));
        assert_eq!(h.balance_of(2).await, Decimal::from(100));
    }

    #[tokio::test]
    async fn test_reversed_pair_is_not_excluded() {
        let h = TestHarness::new();
        h.ledger.create(1, Decimal::from(100)).await.unwrap();
        h.ledger.create(2, Decimal::from(100)).await.unwrap();

        // Hold the A->B lock; B->A uses a distinct key and proceeds.
        assert!(
            h.locks
                .try_acquire(&TransferService::lock_key(1, 2), Duration::from_secs(30))
                .await
                .unwrap()
        );

        h.service
            .transfer(2, 1, Decimal::from(25))
            .await
            .unwrap();

        assert_eq!(h.balance_of(1).await, Decimal::from(125));
        assert_eq!(h.balance_of(2).await, Decimal::from(75));
    }

    #[tokio::test]
    async fn test_validation_rejects_before_locking() {
        let h = TestHarness::new();
        h.ledger.create(1, Decimal::from(100)).await.unwrap();

        let result = h.service.transfer(1, 2, Decimal::ZERO).await;
        assert!(matches!(result, Err(TransferError::InvalidAmount)));

        let result = h.service.transfer(1, 2, Decimal::from(-5)).await;
        assert!(matches!(result, Err(TransferError::InvalidAmount)));

        let result = h.service.transfer(1, 1, Decimal::from(5)).await;
        assert!(matches!(result, Err(TransferError::SameAccount)));

        // No lock record was ever created
        assert!(
            h.locks
                .try_acquire(&TransferService::lock_key(1, 2), Duration::from_secs(30))
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn test_lock_released_after_success() {
        let h = TestHarness::new();
        h.ledger.create(1, Decimal::from(100)).await.unwrap();
        h.ledger.create(2, Decimal::from(100)).await.unwrap();

        h.service.transfer(1, 2, Decimal::from(10)).await.unwrap();
        h.service.transfer(1, 2, Decimal::from(10)).await.unwrap();

        assert_eq!(h.balance_of(1).await, Decimal::from(80));
        assert_eq!(h.balance_of(2).await, Decimal::from(120));
    }

    #[tokio::test]
    async fn test_lock_key_is_ordered() {
        assert_eq!(TransferService::lock_key(1, 2), "transfer:1:2");
        assert_eq!(TransferService::lock_key(2, 1), "transfer:2:1");
        assert_ne!(
            TransferService::lock_key(1, 2),
            TransferService::lock_key(2, 1)
        );
    }
}
