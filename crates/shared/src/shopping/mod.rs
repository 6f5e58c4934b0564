use sqlx::prelude::FromRow;
use time::Date;

use crate::{format_date, format_quantity, invalid, parse_date, parse_quantity};

/// A shopping list entry. Duplicates are allowed.
#[derive(Debug, Clone, PartialEq)]
pub struct ShoppingItem {
    pub user_id: String,
    pub item: String,
    pub quantity: f64,
    pub unit: String,
    pub note: String,
    pub added_date: Date,
}

impl ShoppingItem {
    pub fn new(
        user_id: impl Into<String>,
        item: impl Into<String>,
        quantity: f64,
        unit: impl Into<String>,
        note: impl Into<String>,
        added_date: Date,
    ) -> crate::Result<Self> {
        let user_id = user_id.into();
        let item = item.into().trim().to_owned();

        if user_id.trim().is_empty() || item.is_empty() {
            invalid!("shopping item requires a user id and an item");
        }

        if !quantity.is_finite() {
            invalid!("quantity of `{item}` is not a number");
        }

        Ok(Self {
            user_id,
            item,
            quantity,
            unit: unit.into(),
            note: note.into(),
            added_date,
        })
    }

    /// Cells in `shopping` column order.
    pub fn cells(&self) -> [String; 6] {
        [
            self.user_id.to_owned(),
            self.item.to_owned(),
            format_quantity(self.quantity),
            self.unit.to_owned(),
            self.note.to_owned(),
            format_date(self.added_date),
        ]
    }
}

#[derive(Debug, Clone, Default, FromRow)]
pub struct ShoppingRow {
    #[sqlx(rename = "rowid")]
    pub row_id: i64,
    pub user_id: String,
    pub item: String,
    pub quantity: String,
    pub unit: String,
    pub note: String,
    pub added_date: String,
}

impl ShoppingRow {
    pub fn view(&self) -> ShoppingView {
        ShoppingView {
            row_id: self.row_id,
            item: self.item.to_owned(),
            quantity: parse_quantity(&self.quantity),
            unit: self.unit.to_owned(),
            note: self.note.to_owned(),
            added_date: parse_date(&self.added_date),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ShoppingView {
    pub row_id: i64,
    pub item: String,
    pub quantity: Option<f64>,
    pub unit: String,
    pub note: String,
    pub added_date: Option<Date>,
}
