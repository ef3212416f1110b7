//! Interest Accrual Sweeper
//!
//! Periodic task that grows every account's balance by a fixed rate,
//! bounded by a ceiling derived from the initial deposit:
//! `balance = min(balance * 1.10, initial_deposit * 2.07)`.
//!
//! The sweeper takes no transfer lock. Each account's update is pushed
//! down to the store as one conditional multiply-and-cap statement
//! ([`LedgerStore::accrue`]), so a transfer landing between the snapshot
//! read and the accrual write is not lost - the statement recomputes from
//! the row's current balance.

use std::sync::Arc;
use std::time::Duration;

use rust_decimal::Decimal;
use tracing::{debug, error, info};

use crate::ledger::{LedgerStore, StoreError};

/// Accrual policy and schedule.
#[derive(Debug, Clone)]
pub struct SweeperConfig {
    /// Time between sweep ticks.
    pub interval: Duration,
    /// Per-tick growth multiplier.
    pub growth_rate: Decimal,
    /// Ceiling multiplier over the initial deposit.
    pub cap_factor: Decimal,
}

impl Default for SweeperConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(30),
            growth_rate: Decimal::new(110, 2), // 1.10
            cap_factor: Decimal::new(207, 2),  // 2.07
        }
    }
}

/// Periodic capped-interest task over a [`LedgerStore`].
pub struct InterestSweeper {
    ledger: Arc<dyn LedgerStore>,
    config: SweeperConfig,
}

impl InterestSweeper {
    pub fn new(ledger: Arc<dyn LedgerStore>) -> Self {
        Self::with_config(ledger, SweeperConfig::default())
    }

    pub fn with_config(ledger: Arc<dyn LedgerStore>, config: SweeperConfig) -> Self {
        Self { ledger, config }
    }

    /// Run the sweep loop forever on its own timer.
    pub async fn run(&self) -> ! {
        info!(
            interval_secs = self.config.interval.as_secs(),
            growth_rate = %self.config.growth_rate,
            cap_factor = %self.config.cap_factor,
            "Starting interest sweeper"
        );

        loop {
            if let Err(e) = self.sweep_once().await {
                error!(error = %e, "Interest sweep failed");
            }

            tokio::time::sleep(self.config.interval).await;
        }
    }

    /// Run a single sweep tick. Returns the number of accounts accrued.
    pub async fn sweep_once(&self) -> Result<usize, StoreError> {
        let accounts = self.ledger.list_all().await?;

        let mut applied = 0usize;
        for account in &accounts {
            applied += self
                .ledger
                .accrue(
                    account.owner_id,
                    self.config.growth_rate,
                    self.config.cap_factor,
                )
                .await? as usize;
        }

        debug!(accounts = accounts.len(), applied, "Interest sweep complete");
        Ok(applied)
    }
}
