mod schema;
mod sqlite;
mod store;
pub mod table;

pub use schema::{
    ALL_TABLES, LOGS, PRODUCTS, ReconcileReport, Reconciled, SHOPPING, TableSchema, header,
    reconcile, reconcile_table,
};
pub use sqlite::SqliteStore;
pub use store::{ProductChange, Store};
