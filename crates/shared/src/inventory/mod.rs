use sqlx::prelude::FromRow;
use time::Date;

use crate::{format_date, format_quantity, invalid, parse_date, parse_quantity};

/// One inventory row, keyed by `(user_id, canonical_name)`.
#[derive(Debug, Clone, PartialEq)]
pub struct InventoryItem {
    pub user_id: String,
    /// Display form: optional category prefix followed by the product name.
    pub canonical_name: String,
    /// Always expressed in `unit`, never negative.
    pub quantity: f64,
    pub unit: String,
    pub expiry_date: Option<Date>,
    pub added_date: Date,
}

impl InventoryItem {
    pub fn new(
        user_id: impl Into<String>,
        canonical_name: impl Into<String>,
        quantity: f64,
        unit: impl Into<String>,
        expiry_date: Option<Date>,
        added_date: Date,
    ) -> crate::Result<Self> {
        let user_id = user_id.into();
        let canonical_name = canonical_name.into();

        if user_id.trim().is_empty() {
            invalid!("inventory item requires a user id");
        }

        if canonical_name.trim().is_empty() {
            invalid!("inventory item requires a product name");
        }

        if !quantity.is_finite() || quantity < 0.0 {
            invalid!("quantity {quantity} of `{canonical_name}` must be a non-negative number");
        }

        Ok(Self {
            user_id,
            canonical_name,
            quantity,
            unit: unit.into(),
            expiry_date,
            added_date,
        })
    }

    /// Cells in `products` column order.
    pub fn cells(&self) -> [String; 6] {
        [
            self.user_id.to_owned(),
            self.canonical_name.to_owned(),
            format_quantity(self.quantity),
            self.unit.to_owned(),
            self.expiry_date.map(format_date).unwrap_or_default(),
            format_date(self.added_date),
        ]
    }
}

/// A `products` row exactly as stored. Every cell is text and may be malformed.
#[derive(Debug, Clone, Default, FromRow)]
pub struct ProductRow {
    #[sqlx(rename = "rowid")]
    pub row_id: i64,
    pub user_id: String,
    pub product_name: String,
    pub quantity: String,
    pub unit: String,
    pub expiry_date: String,
    pub added_date: String,
}

impl ProductRow {
    pub fn parsed_quantity(&self) -> Option<f64> {
        parse_quantity(&self.quantity)
    }

    pub fn view(&self) -> ProductView {
        ProductView {
            row_id: self.row_id,
            name: self.product_name.to_owned(),
            quantity: self.parsed_quantity().unwrap_or(0.0),
            unit: self.unit.to_owned(),
            expiry_date: parse_date(&self.expiry_date),
            added_date: parse_date(&self.added_date),
        }
    }
}

/// Read-side projection of a product row with leniently parsed cells.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductView {
    pub row_id: i64,
    pub name: String,
    pub quantity: f64,
    pub unit: String,
    pub expiry_date: Option<Date>,
    pub added_date: Option<Date>,
}
