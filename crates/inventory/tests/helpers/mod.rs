use std::{path::PathBuf, str::FromStr, sync::Arc};

use pantry_db::{SqliteStore, Store};
use pantry_inventory::{InventoryReconciler, ReconcilerOptions};
use pantry_shared::{FixedClock, ProductRow};
use sqlx::{SqlitePool, sqlite::SqliteConnectOptions};
use time::macros::datetime;

pub struct TestState {
    pub store: SqliteStore,
    pub reconciler: InventoryReconciler,
}

pub async fn setup_test_state(path: PathBuf) -> anyhow::Result<TestState> {
    setup_test_state_with(path, ReconcilerOptions::default()).await
}

pub async fn setup_test_state_with(
    path: PathBuf,
    options: ReconcilerOptions,
) -> anyhow::Result<TestState> {
    let opts = SqliteConnectOptions::from_str(&format!("sqlite:{}", path.to_str().unwrap()))?
        .create_if_missing(true);
    let store = SqliteStore(SqlitePool::connect_with(opts).await?);
    store.reconcile_schema(false).await?;

    let reconciler = InventoryReconciler::new(
        Arc::new(store.clone()),
        Arc::new(FixedClock(datetime!(2024-03-10 12:00:00))),
        options,
    );

    Ok(TestState { store, reconciler })
}

#[allow(dead_code)]
pub async fn rows(state: &TestState, user_id: &str) -> anyhow::Result<Vec<ProductRow>> {
    Ok(state.store.product_rows(user_id).await?)
}
