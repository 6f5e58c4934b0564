use sea_query::{
    ColumnDef, Iden, Index, IndexCreateStatement, SqliteQueryBuilder, Table, TableCreateStatement,
};
use sqlx::SqlitePool;

use crate::table::{Logs, Products, Shopping};

/// Expected layout of one row table plus the legacy header names that map onto it.
pub struct TableSchema {
    pub name: &'static str,
    pub columns: &'static [&'static str],
    /// `(legacy header, canonical column)` pairs accepted when rebuilding a table.
    pub aliases: &'static [(&'static str, &'static str)],
    create: fn() -> TableCreateStatement,
    index: fn() -> IndexCreateStatement,
}

impl TableSchema {
    pub fn create_statement(&self) -> String {
        (self.create)().to_string(SqliteQueryBuilder)
    }

    pub fn index_statement(&self) -> String {
        (self.index)().to_string(SqliteQueryBuilder)
    }

    /// Header equality is case-insensitive and ignores surrounding whitespace.
    pub fn matches(&self, header: &[String]) -> bool {
        header.len() == self.columns.len()
            && header
                .iter()
                .zip(self.columns)
                .all(|(found, expected)| found.trim().eq_ignore_ascii_case(expected))
    }

    /// Find the header column holding `column`, directly or through a legacy alias.
    pub fn source_for<'a>(&self, header: &'a [String], column: &str) -> Option<&'a str> {
        let direct = header
            .iter()
            .find(|found| found.trim().eq_ignore_ascii_case(column));

        direct
            .or_else(|| {
                header.iter().find(|found| {
                    self.aliases.iter().any(|(legacy, canonical)| {
                        *canonical == column && found.trim().eq_ignore_ascii_case(legacy)
                    })
                })
            })
            .map(String::as_str)
    }
}

pub const PRODUCTS: TableSchema = TableSchema {
    name: "products",
    columns: &[
        "user_id",
        "product_name",
        "quantity",
        "unit",
        "expiry_date",
        "added_date",
    ],
    aliases: &[
        ("name", "product_name"),
        ("product", "product_name"),
        ("qty", "quantity"),
        ("expiry", "expiry_date"),
        ("added", "added_date"),
    ],
    create: create_products,
    index: index_products,
};

pub const LOGS: TableSchema = TableSchema {
    name: "logs",
    columns: &[
        "user_id",
        "product_name",
        "delta_qty",
        "unit",
        "action",
        "timestamp",
    ],
    aliases: &[
        ("name", "product_name"),
        ("product", "product_name"),
        ("delta", "delta_qty"),
        ("qty", "delta_qty"),
        ("date", "timestamp"),
        ("created_at", "timestamp"),
    ],
    create: create_logs,
    index: index_logs,
};

pub const SHOPPING: TableSchema = TableSchema {
    name: "shopping",
    columns: &["user_id", "item", "quantity", "unit", "note", "added_date"],
    aliases: &[
        ("name", "item"),
        ("product_name", "item"),
        ("qty", "quantity"),
        ("added", "added_date"),
    ],
    create: create_shopping,
    index: index_shopping,
};

pub const ALL_TABLES: [&TableSchema; 3] = [&PRODUCTS, &LOGS, &SHOPPING];

fn text(column: impl Iden + 'static) -> ColumnDef {
    ColumnDef::new(column).text().not_null().default("").to_owned()
}

fn create_products() -> TableCreateStatement {
    Table::create()
        .table(Products::Table)
        .if_not_exists()
        .col(text(Products::UserId))
        .col(text(Products::ProductName))
        .col(text(Products::Quantity))
        .col(text(Products::Unit))
        .col(text(Products::ExpiryDate))
        .col(text(Products::AddedDate))
        .to_owned()
}

fn index_products() -> IndexCreateStatement {
    Index::create()
        .if_not_exists()
        .name("idx_products_user_id")
        .table(Products::Table)
        .col(Products::UserId)
        .to_owned()
}

fn create_logs() -> TableCreateStatement {
    Table::create()
        .table(Logs::Table)
        .if_not_exists()
        .col(text(Logs::UserId))
        .col(text(Logs::ProductName))
        .col(text(Logs::DeltaQty))
        .col(text(Logs::Unit))
        .col(text(Logs::Action))
        .col(text(Logs::Timestamp))
        .to_owned()
}

fn index_logs() -> IndexCreateStatement {
    Index::create()
        .if_not_exists()
        .name("idx_logs_user_id")
        .table(Logs::Table)
        .col(Logs::UserId)
        .to_owned()
}

fn create_shopping() -> TableCreateStatement {
    Table::create()
        .table(Shopping::Table)
        .if_not_exists()
        .col(text(Shopping::UserId))
        .col(text(Shopping::Item))
        .col(text(Shopping::Quantity))
        .col(text(Shopping::Unit))
        .col(text(Shopping::Note))
        .col(text(Shopping::AddedDate))
        .to_owned()
}

fn index_shopping() -> IndexCreateStatement {
    Index::create()
        .if_not_exists()
        .name("idx_shopping_user_id")
        .table(Shopping::Table)
        .col(Shopping::UserId)
        .to_owned()
}

/// What startup reconciliation did to one table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reconciled {
    Created,
    Unchanged,
    /// Header mismatched on an empty table; dropped and created again.
    Recreated,
    /// Header mismatched on a table with data; rows were copied column by column.
    Rebuilt { dropped_columns: Vec<String> },
}

pub type ReconcileReport = Vec<(&'static str, Reconciled)>;

/// Ensure every table exists with the exact expected column order.
///
/// A mismatched header on a table that holds rows is only rewritten when
/// `allow_destructive` is set; otherwise startup fails with
/// [`pantry_shared::Error::SchemaMismatch`].
pub async fn reconcile(
    pool: &SqlitePool,
    allow_destructive: bool,
) -> pantry_shared::Result<ReconcileReport> {
    let mut report = Vec::with_capacity(ALL_TABLES.len());
    for schema in ALL_TABLES {
        let outcome = reconcile_table(pool, schema, allow_destructive).await?;
        tracing::debug!(table = schema.name, ?outcome, "Table reconciled");
        report.push((schema.name, outcome));
    }

    Ok(report)
}

pub async fn reconcile_table(
    pool: &SqlitePool,
    schema: &TableSchema,
    allow_destructive: bool,
) -> pantry_shared::Result<Reconciled> {
    let header = header(pool, schema.name).await?;

    if header.is_empty() {
        create(pool, schema).await?;
        tracing::info!(table = schema.name, "Created table");
        return Ok(Reconciled::Created);
    }

    if schema.matches(&header) {
        sqlx::query(&schema.index_statement()).execute(pool).await?;
        return Ok(Reconciled::Unchanged);
    }

    let rows: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", quote(schema.name)))
        .fetch_one(pool)
        .await?;

    if rows == 0 {
        tracing::warn!(
            table = schema.name,
            ?header,
            "Header mismatch on empty table, recreating"
        );
        sqlx::query(&format!("DROP TABLE {}", quote(schema.name)))
            .execute(pool)
            .await?;
        create(pool, schema).await?;
        return Ok(Reconciled::Recreated);
    }

    if !allow_destructive {
        return Err(pantry_shared::Error::SchemaMismatch {
            table: schema.name.to_owned(),
            found: header,
            expected: schema.columns.iter().map(|c| (*c).to_owned()).collect(),
        });
    }

    let dropped_columns = rebuild(pool, schema, &header).await?;
    tracing::warn!(
        table = schema.name,
        rows,
        ?dropped_columns,
        "Rewrote mismatched header, legacy columns not in the schema were discarded"
    );

    Ok(Reconciled::Rebuilt { dropped_columns })
}

/// Column names of `table` in declaration order. Empty when the table does not exist.
pub async fn header(pool: &SqlitePool, table: &str) -> pantry_shared::Result<Vec<String>> {
    Ok(
        sqlx::query_scalar("SELECT name FROM pragma_table_info(?1) ORDER BY cid")
            .bind(table)
            .fetch_all(pool)
            .await?,
    )
}

async fn create(pool: &SqlitePool, schema: &TableSchema) -> pantry_shared::Result<()> {
    sqlx::query(&schema.create_statement()).execute(pool).await?;
    sqlx::query(&schema.index_statement()).execute(pool).await?;

    Ok(())
}

async fn rebuild(
    pool: &SqlitePool,
    schema: &TableSchema,
    header: &[String],
) -> pantry_shared::Result<Vec<String>> {
    let legacy = format!("{}_legacy", schema.name);
    let mut used = Vec::new();
    let sources = schema
        .columns
        .iter()
        .map(|column| match schema.source_for(header, column) {
            Some(source) => {
                used.push(source.to_owned());
                format!("CAST(COALESCE({}, '') AS TEXT)", quote(source))
            }
            None => "''".to_owned(),
        })
        .collect::<Vec<_>>()
        .join(", ");

    let mut tx = pool.begin().await?;

    sqlx::query(&format!(
        "ALTER TABLE {} RENAME TO {}",
        quote(schema.name),
        quote(&legacy)
    ))
    .execute(&mut *tx)
    .await?;

    sqlx::query(&schema.create_statement())
        .execute(&mut *tx)
        .await?;

    sqlx::query(&format!(
        "INSERT INTO {} ({}) SELECT {} FROM {} ORDER BY rowid",
        quote(schema.name),
        schema.columns.join(", "),
        sources,
        quote(&legacy)
    ))
    .execute(&mut *tx)
    .await?;

    sqlx::query(&format!("DROP TABLE {}", quote(&legacy)))
        .execute(&mut *tx)
        .await?;

    sqlx::query(&schema.index_statement())
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    Ok(header
        .iter()
        .filter(|column| !used.contains(column))
        .cloned()
        .collect())
}

fn quote(identifier: &str) -> String {
    format!("\"{}\"", identifier.replace('"', "\"\""))
}
