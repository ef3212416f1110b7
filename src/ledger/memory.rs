//! In-memory ledger store
//!
//! `DashMap`-backed implementation of [`LedgerStore`]. Each primitive runs
//! under the shard write lock for the account's entry, which gives the same
//! per-account atomicity the SQL statements give on PostgreSQL. Used for
//! embedding and throughout the test suite.

use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;
use rust_decimal::Decimal;

use super::models::Account;
use super::store::{LedgerStore, StoreError};

/// In-process account store keyed by owner id.
#[derive(Default)]
pub struct MemoryLedgerStore {
    accounts: DashMap<i64, Account>,
    next_account_id: AtomicI64,
}

impl MemoryLedgerStore {
    pub fn new() -> Self {
        Self {
            accounts: DashMap::new(),
            next_account_id: AtomicI64::new(1),
        }
    }
}

#[async_trait]
impl LedgerStore for MemoryLedgerStore {
    async fn create(&self, owner_id: i64, initial_deposit: Decimal) -> Result<Account, StoreError> {
        let account_id = self.next_account_id.fetch_add(1, Ordering::SeqCst);
        let account = Account::new(account_id, owner_id, initial_deposit);
        self.accounts.insert(owner_id, account.clone());
        Ok(account)
    }

    async fn get_by_owner(&self, owner_id: i64) -> Result<Option<Account>, StoreError> {
        Ok(self.accounts.get(&owner_id).map(|a| a.clone()))
    }

    async fn conditional_withdraw(
        &self,
        owner_id: i64,
        amount: Decimal,
    ) -> Result<u64, StoreError> {
        // get_mut holds the shard lock: check and decrement are indivisible.
        match self.accounts.get_mut(&owner_id) {
            Some(mut account) if account.balance >= amount => {
                account.balance -= amount;
                Ok(1)
            }
            _ => Ok(0),
        }
    }

    async fn deposit(&self, owner_id: i64, amount: Decimal) -> Result<u64, StoreError> {
        match self.accounts.get_mut(&owner_id) {
            Some(mut account) => {
                account.balance += amount;
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn list_all(&self) -> Result<Vec<Account>, StoreError> {
        Ok(self.accounts.iter().map(|a| a.clone()).collect())
    }

    async fn save(&self, account: &Account) -> Result<(), StoreError> {
        if let Some(mut existing) = self.accounts.get_mut(&account.owner_id) {
            existing.balance = account.balance;
        }
        Ok(())
    }

    async fn accrue(
        &self,
        owner_id: i64,
        rate: Decimal,
        cap_factor: Decimal,
    ) -> Result<u64, StoreError> {
        match self.accounts.get_mut(&owner_id) {
            Some(mut account) => {
                let ceiling = account.initial_deposit * cap_factor;
                let grown = account.balance * rate;
                account.balance = if grown > ceiling { ceiling } else { grown };
                Ok(1)
            }
            None => Ok(0),
        }
    }
}
