/// Parse a stored quantity cell.
///
/// Accepts either `.` or `,` as the decimal separator. Returns `None` for empty
/// or non-numeric content so callers can decide on a fallback.
pub fn parse_quantity(value: &str) -> Option<f64> {
    let value = value.trim().replace(',', ".");
    if value.is_empty() {
        return None;
    }

    value.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Round to the three decimals a stored quantity cell keeps.
pub fn round_quantity(value: f64) -> f64 {
    // Scaling past 2^53 would lose integer digits.
    if value.abs() >= 1e12 {
        return value;
    }

    // Adding 0.0 turns -0.0 into 0.0.
    (value * 1000.0).round() / 1000.0 + 0.0
}

/// Format a quantity for storage and display.
///
/// Whole numbers are printed without a fractional part, everything else is
/// rounded to three decimals with trailing zeros removed.
pub fn format_quantity(value: f64) -> String {
    let rounded = round_quantity(value);

    if rounded.fract() == 0.0 {
        return format!("{rounded:.0}");
    }

    format!("{rounded:.3}")
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_owned()
}
