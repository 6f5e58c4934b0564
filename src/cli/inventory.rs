use anyhow::Result;
use pantry::assistant::{expiring_reply, products_reply, stats_reply};
use pantry_inventory::CategoryTag;
use pantry_shared::Clock;
use time::{Date, Duration};

use super::App;

pub async fn add(
    app: &App,
    user: &str,
    name: &str,
    quantity: f64,
    unit: &str,
    expiry: Option<Date>,
    category: Option<CategoryTag>,
) -> Result<()> {
    let outcome = app
        .reconciler
        .add_product(user, name, quantity, unit, expiry, category)
        .await?;

    println!("{outcome}");

    Ok(())
}

pub async fn remove(app: &App, user: &str, name: &str, quantity: f64, unit: &str) -> Result<()> {
    let outcome = app
        .reconciler
        .remove_product(user, name, quantity, unit)
        .await?;

    println!("{outcome}");

    Ok(())
}

pub async fn list(app: &App, user: &str, category: Option<CategoryTag>) -> Result<()> {
    let products = app.reconciler.list_products(user, category).await?;

    println!("{}", products_reply(&products));

    Ok(())
}

pub async fn find(app: &App, user: &str, term: &str) -> Result<()> {
    let products = app.reconciler.find_products(user, term).await?;

    if products.is_empty() {
        println!("Didn't find {} in list", term.trim());
    } else {
        println!("{}", products_reply(&products));
    }

    Ok(())
}

pub async fn expiring(app: &App, user: &str, days: Option<i64>) -> Result<()> {
    let days = days.unwrap_or(app.config.inventory.expiry_window_days);
    let items = app.reconciler.expiring(user, days).await?;

    println!("{}", expiring_reply(&items, days));

    Ok(())
}

pub async fn stats(app: &App, user: &str, days: Option<i64>) -> Result<()> {
    let days = days.unwrap_or(app.config.inventory.stats_window_days);
    let since = app.reconciler.clock().now() - Duration::days(days);
    let stats = app.reconciler.log().consumption_stats(user, since).await?;

    println!("{}", stats_reply(&stats, days));

    Ok(())
}
