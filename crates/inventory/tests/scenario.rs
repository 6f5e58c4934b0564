use pantry_inventory::{
    Action, CategoryTag, NonPositiveAdd, Outcome, ReconcilerOptions, ShelfLife, product_line,
};
use pantry_shared::LogAction;
use temp_dir::TempDir;
use time::macros::{date, datetime};

mod helpers;

#[tokio::test]
pub async fn test_milk_bought_and_used_up() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = helpers::setup_test_state(dir.child("db.sqlite3")).await?;

    let bought = state
        .reconciler
        .apply("U", "milk", 1.0, "l", Action::Add)
        .await?;
    assert!(bought.to_string().contains("1l milk"));

    let rows = helpers::rows(&state, "U").await?;
    assert_eq!(
        (
            rows[0].user_id.as_str(),
            rows[0].product_name.as_str(),
            rows[0].quantity.as_str(),
            rows[0].unit.as_str()
        ),
        ("U", "milk", "1000", "ml")
    );

    let used = state
        .reconciler
        .apply("U", "milk", 500.0, "ml", Action::Remove)
        .await?;
    assert_eq!(used.quantity_after(), Some(500.0));
    assert!(used.to_string().contains("Remaining: 500ml"));

    let used_up = state
        .reconciler
        .apply("U", "milk", 500.0, "ml", Action::Remove)
        .await?;
    assert!(matches!(used_up, Outcome::Depleted { .. }));
    assert_eq!(used_up.to_string(), "milk ran out, removed from list");
    assert!(helpers::rows(&state, "U").await?.is_empty());

    let stats = state
        .reconciler
        .log()
        .consumption_stats("U", datetime!(2024-03-03 00:00:00))
        .await?;
    assert_eq!(stats.consumed[0].total, 1000.0);
    assert_eq!(stats.added[0].total, 1000.0);

    let entries = state
        .reconciler
        .log()
        .query("U", datetime!(2024-03-03 00:00:00))
        .await?;
    assert_eq!(
        entries
            .iter()
            .map(|e| (e.delta_qty, e.action))
            .collect::<Vec<_>>(),
        vec![
            (1000.0, LogAction::Add),
            (-500.0, LogAction::Remove),
            (-500.0, LogAction::Remove)
        ]
    );

    Ok(())
}

#[tokio::test]
pub async fn test_list_find_and_expiring() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = helpers::setup_test_state(dir.child("db.sqlite3")).await?;
    let reconciler = &state.reconciler;

    reconciler
        .add_product("u1", "milk", 1.0, "l", Some(date!(2024 - 03 - 11)), None)
        .await?;
    reconciler
        .add_product("u1", "fish fingers", 10.0, "pcs", None, None)
        .await?;
    reconciler
        .add_product(
            "u1",
            "berries",
            300.0,
            "g",
            Some(date!(2024 - 03 - 08)),
            Some(CategoryTag::FrozenRaw),
        )
        .await?;
    reconciler
        .add_product("u1", "cheese", 200.0, "g", Some(date!(2024 - 04 - 01)), None)
        .await?;

    let all = reconciler.list_products("u1", None).await?;
    assert_eq!(
        all.iter().map(product_line).collect::<Vec<_>>(),
        [
            "• 1000ml milk (until 2024-03-11)",
            "• 10pcs [FROZEN] fish fingers",
            "• 300g [FROZEN] berries (until 2024-03-08)",
            "• 200g cheese (until 2024-04-01)",
        ]
    );

    let frozen = reconciler
        .list_products("u1", Some(CategoryTag::FrozenRaw))
        .await?;
    assert_eq!(frozen.len(), 2);

    let found = reconciler.find_products("u1", "Fish").await?;
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].name, "[FROZEN] fish fingers");
    assert!(reconciler.find_products("u1", "").await?.is_empty());

    let expiring = reconciler.expiring("u1", 3).await?;
    assert_eq!(
        expiring.iter().map(|e| e.to_string()).collect::<Vec<_>>(),
        [
            "• 300g [FROZEN] berries: expired 2 days ago",
            "• 1000ml milk: 1 day left",
        ]
    );

    Ok(())
}

#[tokio::test]
pub async fn test_non_positive_add_policies() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = helpers::setup_test_state(dir.child("accept.sqlite3")).await?;

    let outcome = state
        .reconciler
        .apply("u1", "salt", 0.0, "g", Action::Add)
        .await?;
    assert!(matches!(outcome, Outcome::Created { .. }));
    state
        .reconciler
        .apply("u1", "salt", -5.0, "g", Action::Add)
        .await?;
    assert_eq!(helpers::rows(&state, "u1").await?[0].quantity, "0");

    let state = helpers::setup_test_state_with(
        dir.child("reject.sqlite3"),
        ReconcilerOptions {
            non_positive_add: NonPositiveAdd::Reject,
            ..Default::default()
        },
    )
    .await?;

    let outcome = state
        .reconciler
        .apply("u1", "salt", 0.0, "g", Action::Add)
        .await?;
    assert!(matches!(outcome, Outcome::Rejected { .. }));
    assert!(helpers::rows(&state, "u1").await?.is_empty());

    Ok(())
}

#[tokio::test]
pub async fn test_default_shelf_life() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = helpers::setup_test_state_with(
        dir.child("db.sqlite3"),
        ReconcilerOptions {
            shelf_life: ShelfLife {
                frozen_raw_days: Some(90),
                frozen_ready_days: None,
                default_days: None,
            },
            ..Default::default()
        },
    )
    .await?;

    state
        .reconciler
        .apply("u1", "beef", 1.0, "kg", Action::Add)
        .await?;
    state
        .reconciler
        .apply("u1", "bread", 1.0, "pcs", Action::Add)
        .await?;

    let rows = helpers::rows(&state, "u1").await?;
    assert_eq!(rows[0].expiry_date, "2024-06-08");
    assert_eq!(rows[1].expiry_date, "");

    Ok(())
}
