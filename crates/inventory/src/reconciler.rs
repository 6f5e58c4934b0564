use std::{fmt, sync::Arc};

use pantry_db::{ProductChange, Store};
use pantry_shared::{
    Clock, InventoryItem, LogAction, LogEntry, ProductRow, ProductView, Result, format_quantity,
    invalid, round_quantity,
};
use serde::Deserialize;
use strum::{AsRefStr, Display, EnumString};
use time::{Date, Duration};

use crate::{
    ActionLog, CategoryClassifier, CategoryTag, ExpiringItem, KeyedLocks, NameNormalizer,
    UnitNormalizer, expiry_report,
    view::{filter_category, filter_search, product_views},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, AsRefStr)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Action {
    Add,
    Remove,
}

/// What to do with an add request whose quantity is zero or negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NonPositiveAdd {
    /// Apply the delta as given; the stored quantity never drops below 0.
    #[default]
    Accept,
    Reject,
}

/// Default shelf life per category, applied when a new row has no expiry.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ShelfLife {
    pub frozen_raw_days: Option<i64>,
    pub frozen_ready_days: Option<i64>,
    pub default_days: Option<i64>,
}

impl ShelfLife {
    pub fn days_for(&self, category: CategoryTag) -> Option<i64> {
        match category {
            CategoryTag::FrozenRaw => self.frozen_raw_days.or(self.default_days),
            CategoryTag::FrozenReady => self.frozen_ready_days.or(self.default_days),
            CategoryTag::None => self.default_days,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ReconcilerOptions {
    pub non_positive_add: NonPositiveAdd,
    pub shelf_life: ShelfLife,
}

/// The request as the user phrased it, echoed back in confirmations.
#[derive(Debug, Clone, PartialEq)]
pub struct Requested {
    pub name: String,
    pub quantity: f64,
    pub unit: String,
}

impl Requested {
    fn new(name: &str, quantity: f64, unit: &str) -> Self {
        Self {
            name: name.trim().to_owned(),
            quantity,
            unit: unit.trim().to_owned(),
        }
    }

    fn amount(&self) -> String {
        format!("{}{}", format_quantity(self.quantity), self.unit)
    }
}

/// Result of one reconciliation. NotFound and Rejected are normal outcomes.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Created {
        requested: Requested,
        item: InventoryItem,
    },
    Increased {
        requested: Requested,
        name: String,
        total: f64,
        unit: String,
    },
    Decreased {
        requested: Requested,
        name: String,
        remaining: f64,
        unit: String,
    },
    /// The row was deleted; `consumed` is what was actually on hand.
    Depleted {
        requested: Requested,
        name: String,
        consumed: f64,
        unit: String,
    },
    NotFound {
        requested: Requested,
    },
    Rejected {
        requested: Requested,
    },
}

impl Outcome {
    pub fn requested(&self) -> &Requested {
        match self {
            Outcome::Created { requested, .. }
            | Outcome::Increased { requested, .. }
            | Outcome::Decreased { requested, .. }
            | Outcome::Depleted { requested, .. }
            | Outcome::NotFound { requested }
            | Outcome::Rejected { requested } => requested,
        }
    }

    /// Quantity left in the row after the action, `None` when no row remains.
    pub fn quantity_after(&self) -> Option<f64> {
        match self {
            Outcome::Created { item, .. } => Some(item.quantity),
            Outcome::Increased { total, .. } => Some(*total),
            Outcome::Decreased { remaining, .. } => Some(*remaining),
            _ => None,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let requested = self.requested();
        let name = &requested.name;

        match self {
            Outcome::Created { .. } => {
                write!(f, "Added new product: {} {name}", requested.amount())
            }
            Outcome::Increased { total, unit, .. } => write!(
                f,
                "Added {} {name}. Total now: {}{unit}",
                requested.amount(),
                format_quantity(*total)
            ),
            Outcome::Decreased {
                remaining, unit, ..
            } => write!(
                f,
                "Removed {} {name}. Remaining: {}{unit}",
                requested.amount(),
                format_quantity(*remaining)
            ),
            Outcome::Depleted { .. } => write!(f, "{name} ran out, removed from list"),
            Outcome::NotFound { .. } => write!(f, "Didn't find {name} in list"),
            Outcome::Rejected { .. } => write!(
                f,
                "Not added: {} {name} is not a positive amount",
                requested.amount()
            ),
        }
    }
}

/// Reconciles add/remove actions against a user's stored inventory rows.
///
/// Every call re-reads the user's rows and holds the lock for
/// `(user_id, normalized name)` until its writes and log entry are done.
#[derive(Clone)]
pub struct InventoryReconciler {
    store: Arc<dyn Store>,
    log: ActionLog,
    locks: KeyedLocks,
    clock: Arc<dyn Clock>,
    options: ReconcilerOptions,
}

impl InventoryReconciler {
    pub fn new(store: Arc<dyn Store>, clock: Arc<dyn Clock>, options: ReconcilerOptions) -> Self {
        Self {
            log: ActionLog::new(store.clone()),
            store,
            locks: KeyedLocks::new(),
            clock,
            options,
        }
    }

    pub fn log(&self) -> &ActionLog {
        &self.log
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    pub async fn apply(
        &self,
        user_id: &str,
        raw_name: &str,
        quantity: f64,
        raw_unit: &str,
        action: Action,
    ) -> Result<Outcome> {
        match action {
            Action::Add => {
                self.add_product(user_id, raw_name, quantity, raw_unit, None, None)
                    .await
            }
            Action::Remove => {
                self.remove_product(user_id, raw_name, quantity, raw_unit)
                    .await
            }
        }
    }

    /// Create the product row or add to it. `category` overrides keyword
    /// classification; `expiry_date` is only used when the row is created.
    #[tracing::instrument(skip(self))]
    pub async fn add_product(
        &self,
        user_id: &str,
        raw_name: &str,
        quantity: f64,
        raw_unit: &str,
        expiry_date: Option<Date>,
        category: Option<CategoryTag>,
    ) -> Result<Outcome> {
        let requested = Requested::new(raw_name, quantity, raw_unit);
        let key = Self::key(raw_name, quantity)?;

        if quantity <= 0.0 && self.options.non_positive_add == NonPositiveAdd::Reject {
            tracing::info!(user_id, product = key, quantity, "Rejected non-positive add");
            return Ok(Outcome::Rejected { requested });
        }

        let (quantity, unit) = UnitNormalizer::normalize(quantity, raw_unit);
        let category = category.unwrap_or_else(|| CategoryClassifier::classify(raw_name));

        let _guard = self.locks.lock(user_id, &key).await;
        let rows = self.store.product_rows(user_id).await?;
        let now = self.clock.now();

        let Some(row) = Self::find(&rows, &key) else {
            let today = now.date();
            let expiry_date = expiry_date.or_else(|| self.default_expiry(category, today));
            let item = InventoryItem::new(
                user_id,
                category.decorate(raw_name),
                quantity.max(0.0),
                unit,
                expiry_date,
                today,
            )?;

            let entry = LogEntry::new(
                user_id,
                &item.canonical_name,
                quantity,
                &item.unit,
                LogAction::Add,
                now,
            )?;
            self.record(ProductChange::Append(&item), &entry).await?;

            tracing::info!(
                user_id,
                product = item.canonical_name,
                quantity = item.quantity,
                unit = item.unit,
                "Created product"
            );

            return Ok(Outcome::Created { requested, item });
        };

        if row.unit.trim() != unit {
            tracing::warn!(
                user_id,
                product = row.product_name,
                stored_unit = row.unit,
                unit,
                "Adding in a different unit than stored, quantities are summed as-is"
            );
        }

        let total = round_quantity(Self::stored_quantity(row) + quantity).max(0.0);
        let entry = LogEntry::new(user_id, &row.product_name, quantity, &unit, LogAction::Add, now)?;
        self.record(
            ProductChange::SetQuantity {
                row_id: row.row_id,
                quantity: total,
            },
            &entry,
        )
        .await?;

        tracing::info!(user_id, product = row.product_name, total, "Increased product");

        Ok(Outcome::Increased {
            requested,
            name: row.product_name.to_owned(),
            total,
            unit: row.unit.to_owned(),
        })
    }

    /// Subtract from the product row, deleting it once nothing is left.
    /// The sign of `quantity` is ignored.
    #[tracing::instrument(skip(self))]
    pub async fn remove_product(
        &self,
        user_id: &str,
        raw_name: &str,
        quantity: f64,
        raw_unit: &str,
    ) -> Result<Outcome> {
        let requested = Requested::new(raw_name, quantity, raw_unit);
        if NameNormalizer::normalize(raw_name).is_empty() {
            tracing::info!(user_id, raw_name, "Empty product name matches nothing");
            return Ok(Outcome::NotFound { requested });
        }

        let key = Self::key(raw_name, quantity)?;
        let (quantity, unit) = UnitNormalizer::normalize(quantity.abs(), raw_unit);

        let _guard = self.locks.lock(user_id, &key).await;
        let rows = self.store.product_rows(user_id).await?;

        let Some(row) = Self::find(&rows, &key) else {
            tracing::info!(user_id, product = key, "Nothing to remove");
            return Ok(Outcome::NotFound { requested });
        };

        let current = Self::stored_quantity(row);
        // Decided at storage precision so a row never persists as "0".
        let remaining = round_quantity(current - quantity);
        let now = self.clock.now();

        if remaining > 0.0 {
            let entry = LogEntry::new(
                user_id,
                &row.product_name,
                -quantity,
                &unit,
                LogAction::Remove,
                now,
            )?;
            self.record(
                ProductChange::SetQuantity {
                    row_id: row.row_id,
                    quantity: remaining,
                },
                &entry,
            )
            .await?;

            tracing::info!(user_id, product = row.product_name, remaining, "Decreased product");

            return Ok(Outcome::Decreased {
                requested,
                name: row.product_name.to_owned(),
                remaining,
                unit: row.unit.to_owned(),
            });
        }

        // `current` is in the stored unit, whatever the request used.
        let entry = LogEntry::new(
            user_id,
            &row.product_name,
            -current,
            &row.unit,
            LogAction::Remove,
            now,
        )?;
        self.record(ProductChange::Delete { row_id: row.row_id }, &entry)
            .await?;

        tracing::info!(user_id, product = row.product_name, consumed = current, "Product ran out");

        Ok(Outcome::Depleted {
            requested,
            name: row.product_name.to_owned(),
            consumed: current,
            unit: row.unit.to_owned(),
        })
    }

    pub async fn list_products(
        &self,
        user_id: &str,
        category: Option<CategoryTag>,
    ) -> Result<Vec<ProductView>> {
        let rows = self.store.product_rows(user_id).await?;

        Ok(filter_category(product_views(&rows), category))
    }

    pub async fn find_products(&self, user_id: &str, term: &str) -> Result<Vec<ProductView>> {
        let rows = self.store.product_rows(user_id).await?;

        Ok(filter_search(product_views(&rows), term))
    }

    pub async fn expiring(&self, user_id: &str, window_days: i64) -> Result<Vec<ExpiringItem>> {
        let rows = self.store.product_rows(user_id).await?;

        Ok(expiry_report(
            product_views(&rows),
            self.clock.today(),
            window_days,
        ))
    }

    async fn record(&self, change: ProductChange<'_>, entry: &LogEntry) -> Result<()> {
        self.store.record_product_change(change, entry).await?;

        tracing::debug!(
            user_id = entry.user_id,
            product = entry.product_name,
            delta = entry.delta_qty,
            unit = entry.unit,
            action = %entry.action,
            "Logged inventory action"
        );

        Ok(())
    }

    fn key(raw_name: &str, quantity: f64) -> Result<String> {
        let key = NameNormalizer::normalize(raw_name);
        if key.is_empty() {
            invalid!("product name `{raw_name}` is empty once normalized");
        }

        if !quantity.is_finite() {
            invalid!("quantity of `{key}` is not a number");
        }

        Ok(key)
    }

    /// First row whose normalized name equals `key`, in storage order.
    fn find<'a>(rows: &'a [ProductRow], key: &str) -> Option<&'a ProductRow> {
        let mut matches = rows
            .iter()
            .filter(|row| NameNormalizer::normalize(&row.product_name) == key);

        let first = matches.next()?;
        let duplicates = matches.map(|row| row.row_id).collect::<Vec<_>>();

        if !duplicates.is_empty() {
            tracing::warn!(
                product = key,
                kept = first.row_id,
                ?duplicates,
                "Duplicate rows for one product, using the first"
            );
        }

        Some(first)
    }

    fn stored_quantity(row: &ProductRow) -> f64 {
        row.parsed_quantity().unwrap_or_else(|| {
            tracing::warn!(
                row_id = row.row_id,
                product = row.product_name,
                quantity = row.quantity,
                "Malformed stored quantity, treating as 0"
            );
            0.0
        })
    }

    fn default_expiry(&self, category: CategoryTag, today: Date) -> Option<Date> {
        let days = self.options.shelf_life.days_for(category)?;

        today.checked_add(Duration::days(days))
    }
}
