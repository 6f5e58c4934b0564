use std::{path::PathBuf, str::FromStr};

use pantry_db::{SqliteStore, Store};
use sqlx::{SqlitePool, sqlite::SqliteConnectOptions};

pub async fn setup_test_pool(path: PathBuf) -> anyhow::Result<SqlitePool> {
    let opts = SqliteConnectOptions::from_str(&format!("sqlite:{}", path.to_str().unwrap()))?
        .create_if_missing(true);

    Ok(SqlitePool::connect_with(opts).await?)
}

#[allow(dead_code)]
pub async fn setup_test_store(path: PathBuf) -> anyhow::Result<SqliteStore> {
    let store = SqliteStore(setup_test_pool(path).await?);
    store.reconcile_schema(false).await?;

    Ok(store)
}
