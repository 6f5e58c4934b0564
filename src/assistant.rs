use std::sync::Arc;

use pantry_inventory::{ConsumptionStats, ExpiringItem, InventoryReconciler, product_line};
use pantry_shared::{Clock, Error, ProductView, ShoppingView, parse_date};
use pantry_shopping::{ShoppingList, shopping_line};

use crate::intent::{Intent, IntentAction, IntentClassifier};
use crate::llm::ChatModel;

pub const DEFAULT_UNIT: &str = "pcs";
pub const NOT_UNDERSTOOD: &str = "Sorry, I didn't understand. Try 'bought milk' or 'ate bread'.";
pub const STORAGE_FAILURE: &str = "Sorry, something went wrong while saving. Please try again.";
pub const EMPTY_KITCHEN: &str = "Your kitchen is empty! Tell me what you bought to fill it up.";

const CHAT_PROMPT: &str = "You are a friendly kitchen assistant. You help people keep track of food at home, \
plan what to cook and waste less. Answer briefly, in the language of the message.";

/// Routes a free-text message to the inventory, the shopping list or small talk.
#[derive(Clone)]
pub struct Assistant {
    reconciler: InventoryReconciler,
    shopping: ShoppingList,
    classifier: IntentClassifier,
    model: Arc<dyn ChatModel>,
    min_confidence: f64,
}

impl Assistant {
    pub fn new(
        reconciler: InventoryReconciler,
        shopping: ShoppingList,
        model: Arc<dyn ChatModel>,
        min_confidence: f64,
    ) -> Self {
        Self {
            reconciler,
            shopping,
            classifier: IntentClassifier::new(model.clone()),
            model,
            min_confidence,
        }
    }

    /// Always produces a reply. Only storage failures are answered with the
    /// apology; no error text reaches the user.
    #[tracing::instrument(skip(self, text))]
    pub async fn handle_message(&self, user_id: &str, text: &str) -> String {
        let intent = self
            .classifier
            .classify(text, self.reconciler.clock().today())
            .await;

        match self.dispatch(user_id, text, &intent).await {
            Ok(reply) => reply,
            Err(err @ Error::Storage(_)) => {
                tracing::error!(error = %err, action = %intent.action, "Storage failed while handling message");
                STORAGE_FAILURE.to_owned()
            }
            Err(err) => {
                tracing::warn!(error = %err, action = %intent.action, "Message could not be applied");
                NOT_UNDERSTOOD.to_owned()
            }
        }
    }

    async fn dispatch(
        &self,
        user_id: &str,
        text: &str,
        intent: &Intent,
    ) -> pantry_shared::Result<String> {
        if !intent.is_confident(self.min_confidence) {
            tracing::debug!(confidence = ?intent.confidence, "Low confidence, falling back to chat");
            return Ok(self.chat(text).await);
        }

        let name = intent.product_name.as_deref();
        let quantity = intent.quantity.unwrap_or(1.0);
        let unit = intent.unit.as_deref().unwrap_or(DEFAULT_UNIT);

        match (intent.action, name) {
            (IntentAction::Add, Some(name)) => {
                let outcome = self
                    .reconciler
                    .add_product(user_id, name, quantity, unit, expiry(intent), None)
                    .await?;

                Ok(outcome.to_string())
            }
            (IntentAction::Remove, Some(name)) => {
                let outcome = self
                    .reconciler
                    .remove_product(user_id, name, quantity, unit)
                    .await?;

                Ok(outcome.to_string())
            }
            (IntentAction::Query, Some(name)) => {
                let found = self.reconciler.find_products(user_id, name).await?;
                if found.is_empty() {
                    return Ok(format!("Didn't find {name} in list"));
                }

                Ok(products_reply(&found))
            }
            (IntentAction::Query, None) => {
                let products = self.reconciler.list_products(user_id, None).await?;

                Ok(products_reply(&products))
            }
            (IntentAction::ShoppingAdd, Some(name)) => {
                let item = self
                    .shopping
                    .add(
                        user_id,
                        name,
                        quantity,
                        intent.unit.as_deref().unwrap_or_default(),
                        intent.note.as_deref().unwrap_or_default(),
                    )
                    .await?;

                Ok(format!("Added to shopping list: {}", item.item))
            }
            _ => Ok(self.chat(text).await),
        }
    }

    async fn chat(&self, text: &str) -> String {
        match self.model.complete(CHAT_PROMPT, text).await {
            Ok(reply) => reply.trim().to_owned(),
            Err(err) => {
                tracing::warn!(error = %err, "Chat reply failed");
                NOT_UNDERSTOOD.to_owned()
            }
        }
    }
}

fn expiry(intent: &Intent) -> Option<time::Date> {
    let raw = intent.expiry_date.as_deref()?;
    let date = parse_date(raw);
    if date.is_none() {
        tracing::warn!(expiry_date = raw, "Ignoring unreadable expiry date");
    }

    date
}

pub fn products_reply(products: &[ProductView]) -> String {
    if products.is_empty() {
        return EMPTY_KITCHEN.to_owned();
    }

    let lines = products.iter().map(product_line).collect::<Vec<_>>();

    format!("Your products:\n\n{}", lines.join("\n"))
}

pub fn expiring_reply(items: &[ExpiringItem], window_days: i64) -> String {
    if items.is_empty() {
        return format!("Nothing expires in the next {window_days} days.");
    }

    let lines = items.iter().map(ToString::to_string).collect::<Vec<_>>();

    format!("Use these soon:\n\n{}", lines.join("\n"))
}

pub fn stats_reply(stats: &ConsumptionStats, window_days: i64) -> String {
    format!("Last {window_days} days:\n\n{}", stats.to_string().trim_end())
}

pub fn shopping_reply(items: &[ShoppingView]) -> String {
    if items.is_empty() {
        return "Your shopping list is empty.".to_owned();
    }

    let lines = items.iter().map(shopping_line).collect::<Vec<_>>();

    format!("Shopping list:\n\n{}", lines.join("\n"))
}
