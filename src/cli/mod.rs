mod chat;
mod inventory;
mod shopping;

use std::sync::Arc;

use anyhow::Result;
use pantry::config::Config;
use pantry_db::{ReconcileReport, SqliteStore, Store};
use pantry_inventory::InventoryReconciler;
use pantry_shared::{Clock, SystemClock, parse_quantity};
use pantry_shopping::ShoppingList;
use time::Date;

pub use chat::{chat, say};
pub use inventory::{add, expiring, find, list, remove, stats};
pub use shopping::{ShoppingCommand, shopping};

/// Everything a command needs, opened against a reconciled database.
pub struct App {
    pub config: Config,
    pub report: ReconcileReport,
    pub reconciler: InventoryReconciler,
    pub shopping: ShoppingList,
}

impl App {
    pub async fn open(config: Config) -> Result<Self> {
        let pool =
            pantry::create_pool(&config.database.url, config.database.max_connections).await?;
        let store: Arc<dyn Store> = Arc::new(SqliteStore(pool));

        let report = store
            .reconcile_schema(config.migration.allow_destructive_header_rewrite)
            .await?;
        for (table, outcome) in &report {
            tracing::info!(table, ?outcome, "Reconciled table");
        }

        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let reconciler = InventoryReconciler::new(
            store.clone(),
            clock.clone(),
            config.inventory.reconciler_options(),
        );
        let shopping = ShoppingList::new(store, clock);

        Ok(Self {
            config,
            report,
            reconciler,
            shopping,
        })
    }
}

pub fn parse_amount(value: &str) -> Result<f64, String> {
    parse_quantity(value).ok_or_else(|| format!("'{value}' is not a quantity"))
}

pub fn parse_expiry(value: &str) -> Result<Date, String> {
    pantry_shared::parse_date(value).ok_or_else(|| format!("'{value}' is not a YYYY-MM-DD date"))
}
