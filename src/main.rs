//! ledgerd - accrual daemon entry point
//!
//! Wires config, logging and the PostgreSQL stores, then runs the interest
//! sweeper until shutdown. The transfer engine itself is a library surface
//! ([`ledgerd::TransferService`]) embedded by the (external) API layer.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tracing::info;

use ledgerd::config::AppConfig;
use ledgerd::db::Database;
use ledgerd::ledger::{LedgerStore, PgLedgerStore};
use ledgerd::logging::init_logging;
use ledgerd::sweeper::{InterestSweeper, SweeperConfig};

fn get_env() -> String {
    let args: Vec<String> = std::env::args().collect();
    for i in 0..args.len() {
        if (args[i] == "--env" || args[i] == "-e") && i + 1 < args.len() {
            return args[i + 1].clone();
        }
    }
    "dev".to_string()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env = get_env();
    let config = AppConfig::load(&env);
    let _guard = init_logging(&config);

    info!(env = %env, version = env!("CARGO_PKG_VERSION"), "Starting ledgerd");

    let postgres_url = config
        .postgres_url
        .clone()
        .context("postgres_url must be set in config")?;

    let db = Database::connect(&postgres_url).await?;
    db.init_schema().await?;

    let ledger: Arc<dyn LedgerStore> = Arc::new(PgLedgerStore::new(db.pool().clone()));

    let sweeper = InterestSweeper::with_config(
        ledger,
        SweeperConfig {
            interval: Duration::from_secs(config.sweeper.interval_secs),
            ..SweeperConfig::default()
        },
    );

    tokio::select! {
        _ = sweeper.run() => {}
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received");
        }
    }

    Ok(())
}
