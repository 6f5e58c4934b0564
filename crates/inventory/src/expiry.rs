use std::fmt;

use pantry_shared::{ProductView, format_quantity};
use time::Date;

#[derive(Debug, Clone, PartialEq)]
pub struct ExpiringItem {
    pub product: ProductView,
    pub expiry_date: Date,
    /// Negative once the product has expired.
    pub days_left: i64,
}

/// Products expiring within `window_days` of `today`, soonest (or longest expired) first.
pub fn expiry_report(views: Vec<ProductView>, today: Date, window_days: i64) -> Vec<ExpiringItem> {
    let mut report = views
        .into_iter()
        .filter_map(|product| {
            let expiry_date = product.expiry_date?;
            let days_left = (expiry_date - today).whole_days();

            (days_left <= window_days).then_some(ExpiringItem {
                product,
                expiry_date,
                days_left,
            })
        })
        .collect::<Vec<_>>();

    report.sort_by_key(|item| item.days_left);

    report
}

impl ExpiringItem {
    pub fn status(&self) -> String {
        match self.days_left {
            0 => "expires today".to_owned(),
            1 => "1 day left".to_owned(),
            -1 => "expired 1 day ago".to_owned(),
            days if days < 0 => format!("expired {} days ago", -days),
            days => format!("{days} days left"),
        }
    }
}

impl fmt::Display for ExpiringItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "• {}{} {}: {}",
            format_quantity(self.product.quantity),
            self.product.unit,
            self.product.name,
            self.status()
        )
    }
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use super::*;

    fn view(name: &str, expiry_date: Option<Date>) -> ProductView {
        ProductView {
            row_id: 1,
            name: name.to_owned(),
            quantity: 2.0,
            unit: "pcs".to_owned(),
            expiry_date,
            added_date: None,
        }
    }

    #[test]
    fn test_report_window_and_order() {
        let today = date!(2024 - 03 - 10);
        let report = expiry_report(
            vec![
                view("yogurt", Some(date!(2024 - 03 - 12))),
                view("rice", None),
                view("cheese", Some(date!(2024 - 03 - 20))),
                view("milk", Some(date!(2024 - 03 - 08))),
                view("bread", Some(date!(2024 - 03 - 10))),
            ],
            today,
            3,
        );

        let names = report
            .iter()
            .map(|item| item.product.name.as_str())
            .collect::<Vec<_>>();
        assert_eq!(names, ["milk", "bread", "yogurt"]);
        assert_eq!(
            report.iter().map(|item| item.days_left).collect::<Vec<_>>(),
            [-2, 0, 2]
        );
    }

    #[test]
    fn test_status_text() {
        let today = date!(2024 - 03 - 10);
        let report = expiry_report(
            vec![
                view("a", Some(date!(2024 - 03 - 07))),
                view("b", Some(date!(2024 - 03 - 09))),
                view("c", Some(date!(2024 - 03 - 10))),
                view("d", Some(date!(2024 - 03 - 11))),
                view("e", Some(date!(2024 - 03 - 13))),
            ],
            today,
            7,
        );

        let statuses = report.iter().map(ExpiringItem::status).collect::<Vec<_>>();
        assert_eq!(
            statuses,
            [
                "expired 3 days ago",
                "expired 1 day ago",
                "expires today",
                "1 day left",
                "3 days left"
            ]
        );
        assert_eq!(report[4].to_string(), "• 2pcs e: 3 days left");
    }
}
