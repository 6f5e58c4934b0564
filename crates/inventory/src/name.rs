/// Bracketed category markers recognized in stored and user-supplied names,
/// including legacy spellings written by older versions of the store.
const KNOWN_TAGS: &[&str] = &[
    "[frozen-ready]",
    "[frozen_ready]",
    "[ready-meal]",
    "[ready_meal]",
    "[frozen]",
    "[морозилка-готове]",
    "[морозилка_готова]",
    "[готова_їжа]",
    "[морозилка]",
];

/// Canonicalizes free-text product names for matching.
pub struct NameNormalizer;

impl NameNormalizer {
    /// Case-folded name with every category tag removed and whitespace collapsed.
    ///
    /// Idempotent. An empty result must never be matched against stored rows.
    pub fn normalize(name: &str) -> String {
        collapse_whitespace(&strip_tags(&name.trim().to_lowercase()))
    }

    /// Same as [`NameNormalizer::normalize`] but keeps the caller's casing, for display.
    pub fn display(name: &str) -> String {
        collapse_whitespace(&strip_tags(name.trim()))
    }

    /// Whether two names refer to the same product. Empty names match nothing.
    pub fn same(a: &str, b: &str) -> bool {
        let a = Self::normalize(a);
        !a.is_empty() && a == Self::normalize(b)
    }
}

fn strip_tags(name: &str) -> String {
    let mut out = name.to_owned();

    loop {
        let found = out.char_indices().find_map(|(start, _)| {
            KNOWN_TAGS
                .iter()
                .find_map(|tag| tag_len_at(&out[start..], tag))
                .map(|len| (start, len))
        });

        match found {
            Some((start, len)) => out.replace_range(start..start + len, ""),
            None => return out,
        }
    }
}

/// Byte length of `tag` at the start of `hay`, compared case-insensitively.
fn tag_len_at(hay: &str, tag: &str) -> Option<usize> {
    let mut chars = hay.chars();
    let mut len = 0;

    for expected in tag.chars() {
        let found = chars.next()?;
        if !found.to_lowercase().eq(expected.to_lowercase()) {
            return None;
        }
        len += found.len_utf8();
    }

    Some(len)
}

fn collapse_whitespace(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}
