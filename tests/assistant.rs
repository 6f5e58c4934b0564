use pantry::assistant::{EMPTY_KITCHEN, NOT_UNDERSTOOD, STORAGE_FAILURE};
use pantry_db::Store;
use temp_dir::TempDir;

mod helpers;

#[tokio::test]
pub async fn test_milk_conversation() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = helpers::setup_test_state(dir.child("db.sqlite3")).await?;

    state.model.push(
        r#"{"action": "add", "product_name": "milk", "quantity": 1, "unit": "l", "confidence": 0.95}"#,
    );
    let reply = state.assistant.handle_message("42", "bought a liter of milk").await;
    assert_eq!(reply, "Added new product: 1l milk");

    state.model.push(
        "```json\n{\"action\": \"add\", \"product_name\": \"Milk\", \"quantity\": 500, \"unit\": \"ml\", \"confidence\": 0.9}\n```",
    );
    let reply = state.assistant.handle_message("42", "and 500 ml more").await;
    assert_eq!(reply, "Added 500ml Milk. Total now: 1500ml");

    state.model.push(
        r#"{"action": "remove", "product_name": "milk", "quantity": 0.5, "unit": "l", "confidence": 0.9}"#,
    );
    let reply = state.assistant.handle_message("42", "drank half a liter").await;
    assert_eq!(reply, "Removed 0.5l milk. Remaining: 1000ml");

    state
        .model
        .push(r#"{"action": "query", "product_name": "milk", "confidence": 0.9}"#);
    let reply = state.assistant.handle_message("42", "any milk left?").await;
    assert_eq!(reply, "Your products:\n\n• 1000ml milk");

    state.model.push(
        r#"{"action": "remove", "product_name": "milk", "quantity": 2, "unit": "l", "confidence": 0.9}"#,
    );
    let reply = state.assistant.handle_message("42", "spilled all the milk").await;
    assert_eq!(reply, "milk ran out, removed from list");

    state
        .model
        .push(r#"{"action": "query", "confidence": 0.9}"#);
    let reply = state.assistant.handle_message("42", "what do I have?").await;
    assert_eq!(reply, EMPTY_KITCHEN);

    assert!(state.store.product_rows("42").await?.is_empty());

    let prompts = state.model.prompts();
    assert_eq!(prompts.len(), 6);
    assert!(prompts[0].0.contains("JSON"));
    assert!(prompts[0].1.starts_with("Today is 2024-03-10."));
    assert!(prompts[0].1.ends_with("bought a liter of milk"));

    Ok(())
}

#[tokio::test]
pub async fn test_defaults_quantity_and_unit() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = helpers::setup_test_state(dir.child("db.sqlite3")).await?;

    state.model.push(
        r#"{"action": "add", "product_name": "bread", "expiry_date": "2024-03-14"}"#,
    );
    let reply = state.assistant.handle_message("42", "bought bread").await;
    assert_eq!(reply, "Added new product: 1pcs bread");

    let rows = state.store.product_rows("42").await?;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].quantity, "1");
    assert_eq!(rows[0].unit, "pcs");
    assert_eq!(rows[0].expiry_date, "2024-03-14");

    Ok(())
}

#[tokio::test]
pub async fn test_remove_unknown_product() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = helpers::setup_test_state(dir.child("db.sqlite3")).await?;

    state.model.push(
        r#"{"action": "remove", "product_name": "cheese", "quantity": 100, "unit": "g", "confidence": 0.8}"#,
    );
    let reply = state.assistant.handle_message("42", "ate some cheese").await;
    assert_eq!(reply, "Didn't find cheese in list");

    Ok(())
}

#[tokio::test]
pub async fn test_chat_fallback() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = helpers::setup_test_state(dir.child("db.sqlite3")).await?;

    state
        .model
        .push(r#"{"action": "chat", "confidence": 0.9}"#);
    state.model.push("  Hi! What did you cook today?  ");

    let reply = state.assistant.handle_message("42", "hello").await;
    assert_eq!(reply, "Hi! What did you cook today?");

    let prompts = state.model.prompts();
    assert_eq!(prompts.len(), 2);
    assert!(prompts[1].0.contains("kitchen assistant"));
    assert_eq!(prompts[1].1, "hello");

    Ok(())
}

#[tokio::test]
pub async fn test_low_confidence_goes_to_chat() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = helpers::setup_test_state(dir.child("db.sqlite3")).await?;

    state.model.push(
        r#"{"action": "add", "product_name": "milk", "quantity": 1, "unit": "l", "confidence": 0.2}"#,
    );
    state.model.push("Did you buy milk?");

    let reply = state.assistant.handle_message("42", "milk?").await;
    assert_eq!(reply, "Did you buy milk?");
    assert!(state.store.product_rows("42").await?.is_empty());
    assert!(state.store.log_rows("42", time::macros::datetime!(2000-01-01 0:00)).await?.is_empty());

    Ok(())
}

#[tokio::test]
pub async fn test_missing_product_name_goes_to_chat() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = helpers::setup_test_state(dir.child("db.sqlite3")).await?;

    state
        .model
        .push(r#"{"action": "add", "quantity": 2, "confidence": 0.9}"#);
    state.model.push("What did you buy?");

    let reply = state.assistant.handle_message("42", "bought two").await;
    assert_eq!(reply, "What did you buy?");
    assert!(state.store.product_rows("42").await?.is_empty());

    Ok(())
}

#[tokio::test]
pub async fn test_model_failure_apologizes() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = helpers::setup_test_state(dir.child("db.sqlite3")).await?;

    state.model.push("I am not JSON");

    let reply = state.assistant.handle_message("42", "bought milk").await;
    assert_eq!(reply, NOT_UNDERSTOOD);
    assert!(state.store.product_rows("42").await?.is_empty());

    Ok(())
}

#[tokio::test]
pub async fn test_shopping_add() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = helpers::setup_test_state(dir.child("db.sqlite3")).await?;

    state.model.push(
        r#"{"action": "shopping_add", "product_name": "eggs", "quantity": 10, "unit": "pcs", "note": "for cake", "confidence": 0.9}"#,
    );

    let reply = state.assistant.handle_message("42", "need eggs for a cake").await;
    assert_eq!(reply, "Added to shopping list: eggs");

    let rows = state.store.shopping_rows("42").await?;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].item, "eggs");
    assert_eq!(rows[0].quantity, "10");
    assert_eq!(rows[0].note, "for cake");
    assert!(state.store.product_rows("42").await?.is_empty());

    Ok(())
}

#[tokio::test]
pub async fn test_storage_failure_apologizes() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = helpers::setup_test_state(dir.child("db.sqlite3")).await?;

    state.store.0.close().await;
    state.model.push(
        r#"{"action": "add", "product_name": "milk", "quantity": 1, "unit": "l", "confidence": 0.9}"#,
    );

    let reply = state.assistant.handle_message("42", "bought milk").await;
    assert_eq!(reply, STORAGE_FAILURE);

    Ok(())
}

#[tokio::test]
pub async fn test_tag_only_name() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let state = helpers::setup_test_state(dir.child("db.sqlite3")).await?;

    state.model.push(
        r#"{"action": "remove", "product_name": "[FROZEN]", "quantity": 1, "unit": "g", "confidence": 0.9}"#,
    );
    let reply = state.assistant.handle_message("42", "took something frozen").await;
    assert_eq!(reply, "Didn't find [FROZEN] in list");

    state.model.push(
        r#"{"action": "add", "product_name": "[FROZEN]", "quantity": 1, "unit": "g", "confidence": 0.9}"#,
    );
    let reply = state.assistant.handle_message("42", "put something frozen").await;
    assert_eq!(reply, NOT_UNDERSTOOD);
    assert_ne!(reply, STORAGE_FAILURE);
    assert!(state.store.product_rows("42").await?.is_empty());

    Ok(())
}
