use std::sync::Arc;

use pantry_db::Store;
use pantry_shared::{Clock, Result, ShoppingItem, ShoppingView, format_quantity};

/// Per-user shopping list. Items are free text and may repeat.
#[derive(Clone)]
pub struct ShoppingList {
    store: Arc<dyn Store>,
    clock: Arc<dyn Clock>,
}

impl ShoppingList {
    pub fn new(store: Arc<dyn Store>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Append an entry exactly as given. Quantity and unit are not normalized.
    pub async fn add(
        &self,
        user_id: &str,
        item: &str,
        quantity: f64,
        unit: &str,
        note: &str,
    ) -> Result<ShoppingItem> {
        let item = ShoppingItem::new(
            user_id,
            item,
            quantity,
            unit.trim(),
            note.trim(),
            self.clock.today(),
        )?;

        self.store.append_shopping(&item).await?;
        tracing::info!(user_id, item = item.item, "Added to shopping list");

        Ok(item)
    }

    pub async fn list(&self, user_id: &str) -> Result<Vec<ShoppingView>> {
        let rows = self.store.shopping_rows(user_id).await?;

        Ok(rows.iter().map(|row| row.view()).collect())
    }

    /// Delete the first entry whose item contains `term`, ignoring case.
    pub async fn remove(&self, user_id: &str, term: &str) -> Result<Option<ShoppingView>> {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return Ok(None);
        }

        let rows = self.store.shopping_rows(user_id).await?;
        let Some(row) = rows
            .iter()
            .find(|row| row.item.to_lowercase().contains(&term))
        else {
            return Ok(None);
        };

        self.store.delete_shopping(row.row_id).await?;
        tracing::info!(user_id, item = row.item, "Removed from shopping list");

        Ok(Some(row.view()))
    }
}

/// `• 10pcs eggs (for cake)`
pub fn shopping_line(view: &ShoppingView) -> String {
    let amount = view
        .quantity
        .map(|quantity| format!("{}{} ", format_quantity(quantity), view.unit))
        .unwrap_or_default();
    let note = if view.note.is_empty() {
        String::new()
    } else {
        format!(" ({})", view.note)
    };

    format!("• {amount}{}{note}", view.item)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view(item: &str, quantity: Option<f64>, unit: &str, note: &str) -> ShoppingView {
        ShoppingView {
            row_id: 1,
            item: item.to_owned(),
            quantity,
            unit: unit.to_owned(),
            note: note.to_owned(),
            added_date: None,
        }
    }

    #[test]
    fn test_shopping_line() {
        assert_eq!(
            shopping_line(&view("eggs", Some(10.0), "pcs", "for cake")),
            "• 10pcs eggs (for cake)"
        );
        assert_eq!(shopping_line(&view("bread", Some(1.0), "", "")), "• 1 bread");
        assert_eq!(shopping_line(&view("salt", None, "", "")), "• salt");
    }
}
