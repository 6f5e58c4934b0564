use sqlx::prelude::FromRow;
use strum::{AsRefStr, Display, EnumString};
use time::PrimitiveDateTime;

use crate::{format_quantity, format_timestamp, invalid, parse_quantity, parse_timestamp};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, AsRefStr)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum LogAction {
    Add,
    Remove,
}

/// Append-only audit record of one reconciliation outcome.
#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    pub user_id: String,
    /// The stored product name at the time of the action.
    pub product_name: String,
    /// Positive for additions, negative for removals.
    pub delta_qty: f64,
    pub unit: String,
    pub action: LogAction,
    pub timestamp: PrimitiveDateTime,
}

impl LogEntry {
    pub fn new(
        user_id: impl Into<String>,
        product_name: impl Into<String>,
        delta_qty: f64,
        unit: impl Into<String>,
        action: LogAction,
        timestamp: PrimitiveDateTime,
    ) -> crate::Result<Self> {
        let user_id = user_id.into();
        let product_name = product_name.into();

        if user_id.trim().is_empty() || product_name.trim().is_empty() {
            invalid!("log entry requires a user id and a product name");
        }

        if !delta_qty.is_finite() {
            invalid!("log delta for `{product_name}` is not a number");
        }

        Ok(Self {
            user_id,
            product_name,
            delta_qty,
            unit: unit.into(),
            action,
            timestamp,
        })
    }

    /// Cells in `logs` column order.
    pub fn cells(&self) -> [String; 6] {
        [
            self.user_id.to_owned(),
            self.product_name.to_owned(),
            format_quantity(self.delta_qty),
            self.unit.to_owned(),
            self.action.to_string(),
            format_timestamp(self.timestamp),
        ]
    }
}

#[derive(Debug, Clone, Default, FromRow)]
pub struct LogRow {
    #[sqlx(rename = "rowid")]
    pub row_id: i64,
    pub user_id: String,
    pub product_name: String,
    pub delta_qty: String,
    pub unit: String,
    pub action: String,
    pub timestamp: String,
}

impl LogRow {
    /// Rebuild the typed entry. Rows with unreadable cells yield `None`.
    pub fn entry(&self) -> Option<LogEntry> {
        Some(LogEntry {
            user_id: self.user_id.to_owned(),
            product_name: self.product_name.to_owned(),
            delta_qty: parse_quantity(&self.delta_qty)?,
            unit: self.unit.to_owned(),
            action: self.action.trim().parse().ok()?,
            timestamp: parse_timestamp(&self.timestamp)?,
        })
    }
}
