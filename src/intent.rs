use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;
use strum::{Display, EnumString};
use time::Date;

use crate::llm::ChatModel;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum IntentAction {
    Add,
    Remove,
    Query,
    ShoppingAdd,
    Chat,
    #[default]
    Unknown,
}

/// Structured action recognized in a free-text message.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Intent {
    pub action: IntentAction,
    pub product_name: Option<String>,
    pub quantity: Option<f64>,
    pub unit: Option<String>,
    pub confidence: Option<f64>,
    pub expiry_date: Option<String>,
    pub note: Option<String>,
}

#[derive(Deserialize)]
struct RawIntent {
    #[serde(default)]
    action: Option<String>,
    #[serde(default)]
    product_name: Option<String>,
    #[serde(default)]
    quantity: Option<Value>,
    #[serde(default)]
    unit: Option<String>,
    #[serde(default)]
    confidence: Option<Value>,
    #[serde(default)]
    expiry_date: Option<String>,
    #[serde(default)]
    note: Option<String>,
}

impl Intent {
    pub fn unknown() -> Self {
        Self::default()
    }

    /// Parse a classifier reply. Code fences and prose around the JSON object are ignored.
    pub fn parse(reply: &str) -> Option<Self> {
        let start = reply.find('{')?;
        let end = reply.rfind('}')?;
        if end < start {
            return None;
        }

        let raw: RawIntent = serde_json::from_str(&reply[start..=end]).ok()?;
        let action = raw
            .action
            .and_then(|action| action.trim().parse().ok())
            .unwrap_or_default();

        Some(Self {
            action,
            product_name: non_blank(raw.product_name),
            quantity: raw.quantity.as_ref().and_then(number),
            unit: non_blank(raw.unit),
            confidence: raw.confidence.as_ref().and_then(number),
            expiry_date: non_blank(raw.expiry_date),
            note: non_blank(raw.note),
        })
    }

    /// A missing confidence counts as confident.
    pub fn is_confident(&self, min_confidence: f64) -> bool {
        self.confidence.is_none_or(|confidence| confidence >= min_confidence)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}

fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => pantry_shared::parse_quantity(text),
        _ => None,
    }
    .filter(|number| number.is_finite())
}

const SYSTEM_PROMPT: &str = r#"You recognize kitchen inventory actions in short messages written in Ukrainian or English.
Decide what the user wants and answer with a single JSON object and nothing else:
{
  "action": "add" | "remove" | "query" | "shopping_add" | "chat",
  "product_name": "product name in the user's language, without quantity",
  "quantity": number,
  "unit": "kg" | "g" | "l" | "ml" | "pcs" (or кг, г, л, мл, шт),
  "confidence": number between 0 and 1,
  "expiry_date": "YYYY-MM-DD" or null,
  "note": "free text for shopping list entries" or null
}

"remove": ate, used, cooked with, spent, minus (з'їв, використав, витратив, приготував, мінус).
"add": bought, added, put, received, plus (купив, додав, поклав, отримав, плюс).
"query": asks what is in the kitchen or whether a product is left; set product_name only when asking about one product.
"shopping_add": asks to put something on the shopping list (треба купити, додай до списку покупок).
"chat": anything else."#;

/// Turns free text into an [`Intent`] through a chat model.
///
/// Never fails: model errors and unreadable replies yield [`Intent::unknown`].
#[derive(Clone)]
pub struct IntentClassifier {
    model: Arc<dyn ChatModel>,
}

impl IntentClassifier {
    pub fn new(model: Arc<dyn ChatModel>) -> Self {
        Self { model }
    }

    pub async fn classify(&self, text: &str, today: Date) -> Intent {
        let prompt = format!("Today is {}.\nMessage: {text}", pantry_shared::format_date(today));

        let reply = match self.model.complete(SYSTEM_PROMPT, &prompt).await {
            Ok(reply) => reply,
            Err(err) => {
                tracing::warn!(error = %err, "Intent classification failed");
                return Intent::unknown();
            }
        };

        match Intent::parse(&reply) {
            Some(intent) => {
                tracing::debug!(action = %intent.action, product = ?intent.product_name, "Classified message");
                intent
            }
            None => {
                tracing::warn!(reply, "Unreadable intent reply");
                Intent::unknown()
            }
        }
    }
}
