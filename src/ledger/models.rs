//! Account model

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A balance-bearing account, one per owner.
///
/// `balance` is only ever mutated through [`super::LedgerStore`] primitives.
/// `initial_deposit` is fixed at creation and defines the accrual ceiling
/// (`initial_deposit * cap_factor`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Account {
    pub account_id: i64,
    pub owner_id: i64,
    pub balance: Decimal,
    pub initial_deposit: Decimal,
    pub created_at: DateTime<Utc>,
}

impl Account {
    /// Build a fresh account whose balance equals its initial deposit.
    pub fn new(account_id: i64, owner_id: i64, initial_deposit: Decimal) -> Self {
        Self {
            account_id,
            owner_id,
            balance: initial_deposit,
            initial_deposit,
            created_at: Utc::now(),
        }
    }
}
