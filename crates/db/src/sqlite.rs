use async_trait::async_trait;
use pantry_shared::{
    InventoryItem, LogEntry, LogRow, ProductRow, Result, ShoppingItem, ShoppingRow,
    format_quantity, format_timestamp,
};
use sea_query::{Expr, ExprTrait, Order, Query, SqliteQueryBuilder};
use sea_query_sqlx::{SqlxBinder, SqlxValues};
use sqlx::SqlitePool;
use time::PrimitiveDateTime;

use crate::{
    ProductChange, ReconcileReport, Store, reconcile,
    table::{Logs, Products, Shopping},
};

/// [`Store`] backed by the three SQLite row tables.
#[derive(Clone)]
pub struct SqliteStore(pub SqlitePool);

fn rowid() -> Expr {
    Expr::cust("rowid")
}

fn insert_product(item: &InventoryItem) -> (String, SqlxValues) {
    Query::insert()
        .into_table(Products::Table)
        .columns([
            Products::UserId,
            Products::ProductName,
            Products::Quantity,
            Products::Unit,
            Products::ExpiryDate,
            Products::AddedDate,
        ])
        .values_panic(item.cells().map(Into::into))
        .build_sqlx(SqliteQueryBuilder)
}

fn update_product_quantity(row_id: i64, quantity: f64) -> (String, SqlxValues) {
    Query::update()
        .table(Products::Table)
        .value(Products::Quantity, format_quantity(quantity))
        .and_where(rowid().eq(row_id))
        .build_sqlx(SqliteQueryBuilder)
}

fn delete_product(row_id: i64) -> (String, SqlxValues) {
    Query::delete()
        .from_table(Products::Table)
        .and_where(rowid().eq(row_id))
        .build_sqlx(SqliteQueryBuilder)
}

fn insert_log(entry: &LogEntry) -> (String, SqlxValues) {
    Query::insert()
        .into_table(Logs::Table)
        .columns([
            Logs::UserId,
            Logs::ProductName,
            Logs::DeltaQty,
            Logs::Unit,
            Logs::Action,
            Logs::Timestamp,
        ])
        .values_panic(entry.cells().map(Into::into))
        .build_sqlx(SqliteQueryBuilder)
}

#[async_trait]
impl Store for SqliteStore {
    async fn reconcile_schema(&self, allow_destructive: bool) -> Result<ReconcileReport> {
        reconcile(&self.0, allow_destructive).await
    }

    async fn product_rows(&self, user_id: &str) -> Result<Vec<ProductRow>> {
        let statment = Query::select()
            .expr(rowid())
            .columns([
                Products::UserId,
                Products::ProductName,
                Products::Quantity,
                Products::Unit,
                Products::ExpiryDate,
                Products::AddedDate,
            ])
            .from(Products::Table)
            .and_where(Expr::col(Products::UserId).eq(user_id))
            .order_by_expr(rowid(), Order::Asc)
            .to_owned();

        let (sql, values) = statment.build_sqlx(SqliteQueryBuilder);

        Ok(sqlx::query_as_with::<_, ProductRow, _>(&sql, values)
            .fetch_all(&self.0)
            .await?)
    }

    async fn append_product(&self, item: &InventoryItem) -> Result<i64> {
        let (sql, values) = insert_product(item);
        let result = sqlx::query_with(&sql, values).execute(&self.0).await?;

        Ok(result.last_insert_rowid())
    }

    async fn update_product_quantity(&self, row_id: i64, quantity: f64) -> Result<()> {
        let (sql, values) = update_product_quantity(row_id, quantity);
        let result = sqlx::query_with(&sql, values).execute(&self.0).await?;

        if result.rows_affected() == 0 {
            tracing::warn!(row_id, "Product row vanished before quantity update");
        }

        Ok(())
    }

    async fn delete_product(&self, row_id: i64) -> Result<()> {
        let (sql, values) = delete_product(row_id);
        let result = sqlx::query_with(&sql, values).execute(&self.0).await?;

        if result.rows_affected() == 0 {
            tracing::warn!(row_id, "Product row already deleted");
        }

        Ok(())
    }

    async fn record_product_change(
        &self,
        change: ProductChange<'_>,
        entry: &LogEntry,
    ) -> Result<()> {
        let (sql, values) = match change {
            ProductChange::Append(item) => insert_product(item),
            ProductChange::SetQuantity { row_id, quantity } => {
                update_product_quantity(row_id, quantity)
            }
            ProductChange::Delete { row_id } => delete_product(row_id),
        };

        let mut tx = self.0.begin().await?;

        let result = sqlx::query_with(&sql, values).execute(&mut *tx).await?;
        if result.rows_affected() == 0 {
            tracing::warn!(?change, "Product row changed before the write");
        }

        let (sql, values) = insert_log(entry);
        sqlx::query_with(&sql, values).execute(&mut *tx).await?;

        tx.commit().await?;

        Ok(())
    }

    async fn append_log(&self, entry: &LogEntry) -> Result<()> {
        let (sql, values) = insert_log(entry);
        sqlx::query_with(&sql, values).execute(&self.0).await?;

        Ok(())
    }

    async fn log_rows(&self, user_id: &str, since: PrimitiveDateTime) -> Result<Vec<LogRow>> {
        // Timestamps are zero-padded text, so lexical order is chronological.
        let statment = Query::select()
            .expr(rowid())
            .columns([
                Logs::UserId,
                Logs::ProductName,
                Logs::DeltaQty,
                Logs::Unit,
                Logs::Action,
                Logs::Timestamp,
            ])
            .from(Logs::Table)
            .and_where(Expr::col(Logs::UserId).eq(user_id))
            .and_where(Expr::col(Logs::Timestamp).gte(format_timestamp(since)))
            .order_by_expr(rowid(), Order::Asc)
            .to_owned();

        let (sql, values) = statment.build_sqlx(SqliteQueryBuilder);

        Ok(sqlx::query_as_with::<_, LogRow, _>(&sql, values)
            .fetch_all(&self.0)
            .await?)
    }

    async fn shopping_rows(&self, user_id: &str) -> Result<Vec<ShoppingRow>> {
        let statment = Query::select()
            .expr(rowid())
            .columns([
                Shopping::UserId,
                Shopping::Item,
                Shopping::Quantity,
                Shopping::Unit,
                Shopping::Note,
                Shopping::AddedDate,
            ])
            .from(Shopping::Table)
            .and_where(Expr::col(Shopping::UserId).eq(user_id))
            .order_by_expr(rowid(), Order::Asc)
            .to_owned();

        let (sql, values) = statment.build_sqlx(SqliteQueryBuilder);

        Ok(sqlx::query_as_with::<_, ShoppingRow, _>(&sql, values)
            .fetch_all(&self.0)
            .await?)
    }

    async fn append_shopping(&self, item: &ShoppingItem) -> Result<i64> {
        let statment = Query::insert()
            .into_table(Shopping::Table)
            .columns([
                Shopping::UserId,
                Shopping::Item,
                Shopping::Quantity,
                Shopping::Unit,
                Shopping::Note,
                Shopping::AddedDate,
            ])
            .values_panic(item.cells().map(Into::into))
            .to_owned();

        let (sql, values) = statment.build_sqlx(SqliteQueryBuilder);
        let result = sqlx::query_with(&sql, values).execute(&self.0).await?;

        Ok(result.last_insert_rowid())
    }

    async fn delete_shopping(&self, row_id: i64) -> Result<()> {
        let statment = Query::delete()
            .from_table(Shopping::Table)
            .and_where(rowid().eq(row_id))
            .to_owned();

        let (sql, values) = statment.build_sqlx(SqliteQueryBuilder);
        sqlx::query_with(&sql, values).execute(&self.0).await?;

        Ok(())
    }
}
