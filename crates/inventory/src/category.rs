use serde::Deserialize;
use strum::{AsRefStr, Display, EnumString};

use crate::NameNormalizer;

pub const FROZEN_RAW_PREFIX: &str = "[FROZEN]";
pub const FROZEN_READY_PREFIX: &str = "[FROZEN-READY]";

/// Implicit category inferred from a product name.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, AsRefStr, Deserialize,
)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
#[serde(rename_all = "kebab-case")]
pub enum CategoryTag {
    #[strum(to_string = "frozen-raw", serialize = "frozen", serialize = "raw")]
    FrozenRaw,
    #[strum(to_string = "frozen-ready", serialize = "ready")]
    FrozenReady,
    #[default]
    #[strum(to_string = "none", serialize = "fresh")]
    None,
}

impl CategoryTag {
    /// Stored name prefix, `None` for untagged products.
    pub fn prefix(&self) -> Option<&'static str> {
        match self {
            CategoryTag::FrozenRaw => Some(FROZEN_RAW_PREFIX),
            CategoryTag::FrozenReady => Some(FROZEN_READY_PREFIX),
            CategoryTag::None => None,
        }
    }

    /// Display name carrying the category prefix.
    pub fn decorate(&self, name: &str) -> String {
        let name = NameNormalizer::display(name);
        match self.prefix() {
            Some(prefix) => format!("{prefix} {name}"),
            None => name,
        }
    }

    /// Recover the tag of a stored display name from its leading marker.
    pub fn of_stored(stored: &str) -> CategoryTag {
        let lowered = stored.trim_start().to_lowercase();

        if READY_MARKERS.iter().any(|m| lowered.starts_with(m)) {
            return CategoryTag::FrozenReady;
        }

        if RAW_MARKERS.iter().any(|m| lowered.starts_with(m)) {
            return CategoryTag::FrozenRaw;
        }

        CategoryTag::None
    }
}

const READY_MARKERS: &[&str] = &[
    "[frozen-ready]",
    "[frozen_ready]",
    "[ready-meal]",
    "[ready_meal]",
    "[морозилка-готове]",
    "[морозилка_готова]",
    "[готова_їжа]",
];

const RAW_MARKERS: &[&str] = &["[frozen]", "[морозилка]"];

/// Stems marking ready-made dishes. Checked before the raw set since
/// dish names often mention their raw ingredient.
const READY_KEYWORDS: &[&str] = &[
    "stew",
    "dumpling",
    "pancake",
    "cutlet",
    "pizza",
    "soup",
    "borscht",
    "lasagn",
    "meatball",
    "pelmen",
    "varenyk",
    "вареник",
    "пельмен",
    "млин",
    "сирник",
    "голубц",
    "котлет",
    "борщ",
    "суп",
    "рагу",
];

const RAW_KEYWORDS: &[&str] = &[
    "meat",
    "fish",
    "ice cube",
    "chicken",
    "pork",
    "beef",
    "shrimp",
    "salmon",
    "mince",
    "м'яс",
    "мяс",
    "риба",
    "рибн",
    "лід",
    "курк",
    "куряч",
    "свинин",
    "яловичин",
    "фарш",
    "креветк",
];

/// Keyword classifier for the frozen category markers.
pub struct CategoryClassifier;

impl CategoryClassifier {
    /// Classify a product name by keyword substrings of its normalized form.
    pub fn classify(name: &str) -> CategoryTag {
        let normalized = NameNormalizer::normalize(name);

        if Self::has_keyword(&normalized, READY_KEYWORDS) {
            return CategoryTag::FrozenReady;
        }

        if Self::has_keyword(&normalized, RAW_KEYWORDS) {
            return CategoryTag::FrozenRaw;
        }

        CategoryTag::None
    }

    fn has_keyword(normalized: &str, keywords: &[&str]) -> bool {
        keywords.iter().any(|keyword| normalized.contains(keyword))
    }
}
