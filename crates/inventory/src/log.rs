use std::{collections::HashMap, fmt, sync::Arc};

use pantry_db::Store;
use pantry_shared::{LogAction, LogEntry, Result, format_quantity};
use time::PrimitiveDateTime;

/// Read side of the append-only audit trail. Entries are written by the
/// reconciler together with the row change they describe.
#[derive(Clone)]
pub struct ActionLog {
    store: Arc<dyn Store>,
}

impl ActionLog {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Entries of `user_id` recorded at or after `since`, oldest first.
    /// Rows with unreadable cells are skipped.
    pub async fn query(&self, user_id: &str, since: PrimitiveDateTime) -> Result<Vec<LogEntry>> {
        let rows = self.store.log_rows(user_id, since).await?;
        let mut entries = Vec::with_capacity(rows.len());

        for row in rows {
            match row.entry() {
                Some(entry) => entries.push(entry),
                None => tracing::warn!(
                    user_id,
                    row_id = row.row_id,
                    "Skipping malformed log row"
                ),
            }
        }

        Ok(entries)
    }

    pub async fn consumption_stats(
        &self,
        user_id: &str,
        since: PrimitiveDateTime,
    ) -> Result<ConsumptionStats> {
        let entries = self.query(user_id, since).await?;

        Ok(ConsumptionStats::from_entries(&entries))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProductTotal {
    pub product_name: String,
    pub unit: String,
    pub total: f64,
}

/// Log entries partitioned into consumed and added magnitudes per product.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConsumptionStats {
    pub consumed: Vec<ProductTotal>,
    pub added: Vec<ProductTotal>,
}

impl ConsumptionStats {
    /// Totals are grouped by `(product_name, unit)` and sorted largest first.
    pub fn from_entries(entries: &[LogEntry]) -> Self {
        let mut consumed = HashMap::<(String, String), f64>::new();
        let mut added = HashMap::<(String, String), f64>::new();

        for entry in entries {
            let key = (entry.product_name.to_owned(), entry.unit.to_owned());
            match entry.action {
                LogAction::Remove => *consumed.entry(key).or_default() += entry.delta_qty.abs(),
                LogAction::Add => *added.entry(key).or_default() += entry.delta_qty,
            }
        }

        Self {
            consumed: Self::ranked(consumed),
            added: Self::ranked(added),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.consumed.is_empty() && self.added.is_empty()
    }

    fn ranked(totals: HashMap<(String, String), f64>) -> Vec<ProductTotal> {
        let mut ranked = totals
            .into_iter()
            .map(|((product_name, unit), total)| ProductTotal {
                product_name,
                unit,
                total,
            })
            .collect::<Vec<_>>();

        ranked.sort_by(|a, b| {
            b.total
                .total_cmp(&a.total)
                .then_with(|| a.product_name.cmp(&b.product_name))
        });

        ranked
    }
}

impl fmt::Display for ConsumptionStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "No activity in this period.");
        }

        for (title, totals) in [("Consumed", &self.consumed), ("Added", &self.added)] {
            if totals.is_empty() {
                continue;
            }

            writeln!(f, "{title}:")?;
            for total in totals {
                writeln!(
                    f,
                    "• {}{} {}",
                    format_quantity(total.total),
                    total.unit,
                    total.product_name
                )?;
            }
        }

        Ok(())
    }
}
