/// Canonicalizes a `(quantity, unit)` pair into a base unit.
///
/// Base units are `g`, `ml` and `pcs`. Anything unrecognized passes through
/// unchanged so a spelling variant never blocks a conversational turn.
pub struct UnitNormalizer;

impl UnitNormalizer {
    pub fn normalize(quantity: f64, unit: &str) -> (f64, String) {
        let trimmed = unit.trim();
        let lowered = trimmed.to_lowercase();
        let key = lowered.strip_suffix('.').unwrap_or(&lowered);

        let (base_unit, base_quantity) = match key {
            // Weight -> grams
            "g" | "gr" | "gram" | "grams" | "gramme" | "grammes" | "г" | "гр" | "грам"
            | "грами" | "грамів" => ("g", quantity),
            "kg" | "kgs" | "kilo" | "kilos" | "kilogram" | "kilograms" | "кг" | "кіло"
            | "кілограм" | "кілограми" | "кілограмів" => ("g", quantity * 1000.0),

            // Volume -> millilitres
            "ml" | "milliliter" | "milliliters" | "millilitre" | "millilitres" | "мл"
            | "мілілітр" | "мілілітри" | "мілілітрів" => ("ml", quantity),
            "l" | "liter" | "liters" | "litre" | "litres" | "л" | "літр" | "літри" | "літрів" => {
                ("ml", quantity * 1000.0)
            }

            // Count
            "" | "pcs" | "pc" | "piece" | "pieces" | "item" | "items" | "шт" | "штук" | "штука"
            | "штуки" => ("pcs", quantity),

            _ => {
                tracing::warn!(unit = trimmed, "Unrecognized unit, storing as given");
                return (quantity, trimmed.to_owned());
            }
        };

        (base_quantity, base_unit.to_owned())
    }

    /// Whether `unit` is one of the base units produced by [`UnitNormalizer::normalize`].
    pub fn is_base_unit(unit: &str) -> bool {
        matches!(unit, "g" | "ml" | "pcs")
    }
}
