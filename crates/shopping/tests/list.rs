use std::sync::Arc;

use pantry_db::{SqliteStore, Store};
use pantry_shared::FixedClock;
use pantry_shopping::ShoppingList;
use sqlx::sqlite::SqlitePoolOptions;
use time::macros::{date, datetime};

async fn setup_test_list() -> anyhow::Result<ShoppingList> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect(":memory:")
        .await?;
    let store = SqliteStore(pool);
    store.reconcile_schema(false).await?;

    Ok(ShoppingList::new(
        Arc::new(store),
        Arc::new(FixedClock(datetime!(2024-03-10 08:00:00))),
    ))
}

#[tokio::test]
async fn test_add_and_list_keeps_duplicates() -> anyhow::Result<()> {
    let list = setup_test_list().await?;

    list.add("u1", " Eggs ", 10.0, "pcs", "").await?;
    list.add("u1", "eggs", 6.0, "pcs", "for cake").await?;
    list.add("u2", "bread", 1.0, "", "").await?;

    let items = list.list("u1").await?;
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].item, "Eggs");
    assert_eq!(items[0].added_date, Some(date!(2024 - 03 - 10)));
    assert_eq!(items[1].note, "for cake");
    assert_eq!(items[1].quantity, Some(6.0));

    Ok(())
}

#[tokio::test]
async fn test_add_keeps_units_as_given() -> anyhow::Result<()> {
    let list = setup_test_list().await?;

    list.add("u1", "milk", 1.0, "l", "").await?;

    let items = list.list("u1").await?;
    assert_eq!(items[0].quantity, Some(1.0));
    assert_eq!(items[0].unit, "l");

    Ok(())
}

#[tokio::test]
async fn test_remove_first_substring_match() -> anyhow::Result<()> {
    let list = setup_test_list().await?;

    list.add("u1", "Green apples", 1.0, "kg", "").await?;
    list.add("u1", "apple juice", 1.0, "l", "").await?;

    let removed = list.remove("u1", "APPLE").await?;
    assert_eq!(removed.map(|v| v.item), Some("Green apples".to_owned()));

    let items = list.list("u1").await?;
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].item, "apple juice");

    assert!(list.remove("u1", "caviar").await?.is_none());
    assert!(list.remove("u1", "  ").await?.is_none());
    assert!(list.remove("u2", "apple").await?.is_none());
    assert_eq!(list.list("u1").await?.len(), 1);

    Ok(())
}

#[tokio::test]
async fn test_add_requires_item() -> anyhow::Result<()> {
    let list = setup_test_list().await?;

    assert!(list.add("u1", "   ", 1.0, "pcs", "").await.is_err());
    assert!(list.list("u1").await?.is_empty());

    Ok(())
}
