use pantry_shared::{ProductRow, ProductView, format_date, format_quantity};

use crate::{CategoryTag, NameNormalizer};

/// Project stored rows, warning about cells that could not be read.
pub fn product_views(rows: &[ProductRow]) -> Vec<ProductView> {
    rows.iter()
        .map(|row| {
            let view = row.view();

            if row.parsed_quantity().is_none() {
                tracing::warn!(
                    row_id = row.row_id,
                    product = row.product_name,
                    quantity = row.quantity,
                    "Malformed stored quantity, reading as 0"
                );
            }

            if view.expiry_date.is_none() && !row.expiry_date.trim().is_empty() {
                tracing::warn!(
                    row_id = row.row_id,
                    product = row.product_name,
                    expiry_date = row.expiry_date,
                    "Malformed stored expiry date, ignoring"
                );
            }

            view
        })
        .collect()
}

/// Keep products whose stored name carries `category`'s marker.
pub fn filter_category(views: Vec<ProductView>, category: Option<CategoryTag>) -> Vec<ProductView> {
    match category {
        Some(category) => views
            .into_iter()
            .filter(|view| CategoryTag::of_stored(&view.name) == category)
            .collect(),
        None => views,
    }
}

/// Substring match over normalized names, in both directions.
pub fn filter_search(views: Vec<ProductView>, term: &str) -> Vec<ProductView> {
    let term = NameNormalizer::normalize(term);
    if term.is_empty() {
        return Vec::new();
    }

    views
        .into_iter()
        .filter(|view| {
            let name = NameNormalizer::normalize(&view.name);
            !name.is_empty() && (name.contains(&term) || term.contains(&name))
        })
        .collect()
}

/// `• 500ml milk (until 2024-03-05)`
pub fn product_line(view: &ProductView) -> String {
    let expiry = view
        .expiry_date
        .map(|date| format!(" (until {})", format_date(date)))
        .unwrap_or_default();

    format!(
        "• {}{} {}{expiry}",
        format_quantity(view.quantity),
        view.unit,
        view.name
    )
}
