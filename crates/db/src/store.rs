use async_trait::async_trait;
use pantry_shared::{InventoryItem, LogEntry, LogRow, ProductRow, Result, ShoppingItem, ShoppingRow};
use time::PrimitiveDateTime;

use crate::ReconcileReport;

/// Write to one product row, committed together with its log entry.
#[derive(Debug, Clone, Copy)]
pub enum ProductChange<'a> {
    Append(&'a InventoryItem),
    SetQuantity { row_id: i64, quantity: f64 },
    Delete { row_id: i64 },
}

/// Row-table abstraction the inventory core runs against.
///
/// Scans always return rows in stable storage order. Row ids are only
/// meaningful to the store that produced them.
#[async_trait]
pub trait Store: Send + Sync {
    async fn reconcile_schema(&self, allow_destructive: bool) -> Result<ReconcileReport>;

    async fn product_rows(&self, user_id: &str) -> Result<Vec<ProductRow>>;
    async fn append_product(&self, item: &InventoryItem) -> Result<i64>;
    async fn update_product_quantity(&self, row_id: i64, quantity: f64) -> Result<()>;
    async fn delete_product(&self, row_id: i64) -> Result<()>;

    /// Apply `change` and append `entry` atomically: either both land or neither does.
    async fn record_product_change(
        &self,
        change: ProductChange<'_>,
        entry: &LogEntry,
    ) -> Result<()>;

    async fn append_log(&self, entry: &LogEntry) -> Result<()>;
    async fn log_rows(&self, user_id: &str, since: PrimitiveDateTime) -> Result<Vec<LogRow>>;

    async fn shopping_rows(&self, user_id: &str) -> Result<Vec<ShoppingRow>>;
    async fn append_shopping(&self, item: &ShoppingItem) -> Result<i64>;
    async fn delete_shopping(&self, row_id: i64) -> Result<()>;
}
