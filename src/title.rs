//! Event titles: marker prefixes and the normalized key used for holy-day lookup.

use itertools::Itertools;
use serde::Deserialize;

use crate::liturgy::Classification;

pub const DEFAULT_HOLY_DAY_SYMBOL: &str = "✝️";
pub const DEFAULT_FAST_SYMBOL: &str = "⛔";
pub const DEFAULT_ABSTINENCE_SYMBOL: &str = "🐟";

// Marks for feasts outranked by another celebration, kept in the title.
const OUTRANKED_MARKERS: &[char] = &['›', '»'];

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Symbols {
    pub holy_day: String,
    pub fast: String,
    pub abstinence: String,
}

impl Default for Symbols {
    fn default() -> Self {
        Symbols {
            holy_day: DEFAULT_HOLY_DAY_SYMBOL.to_owned(),
            fast: DEFAULT_FAST_SYMBOL.to_owned(),
            abstinence: DEFAULT_ABSTINENCE_SYMBOL.to_owned(),
        }
    }
}

impl Symbols {
    /// Markers for `marks` in the order holy day, fast, abstinence.
    pub fn prefix(&self, marks: &Classification) -> String {
        let mut prefix = String::new();
        if marks.holy_day {
            prefix += &self.holy_day;
        }
        if marks.fast {
            prefix += &self.fast;
        }
        if marks.abstinence {
            prefix += &self.abstinence;
        }
        prefix
    }

    /// Title carrying the markers for `marks` in front of `base`.
    pub fn apply(&self, marks: &Classification, base: &str) -> String {
        let prefix = self.prefix(marks);
        if prefix.is_empty() {
            base.to_owned()
        } else {
            format!("{} {}", prefix, base)
        }
    }

    fn markers(&self) -> impl Iterator<Item = &str> {
        [
            self.holy_day.as_str(),
            self.fast.as_str(),
            self.abstinence.as_str(),
            DEFAULT_HOLY_DAY_SYMBOL,
            DEFAULT_FAST_SYMBOL,
            DEFAULT_ABSTINENCE_SYMBOL,
        ]
        .into_iter()
        .filter(|s| !s.is_empty())
    }
}

/// Removes leading markers (and whitespace between them) from `summary`.
pub fn strip_markers(summary: &str, symbols: &Symbols) -> String {
    let mut rest = summary.trim();

    loop {
        let stripped = symbols
            .markers()
            .find_map(|marker| rest.strip_prefix(marker))
            .map(str::trim_start);

        match stripped {
            Some(s) => rest = s,
            None => break,
        }
    }

    rest.trim().to_owned()
}

/// Resolves the TEXT escapes of a raw property value: `\,` `\;` `\\` and
/// `\n`, which becomes a space.
pub fn unescape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') | Some('N') => out.push(' '),
            Some(escaped) => out.push(escaped),
            None => out.push('\\'),
        }
    }

    out
}

/// Lookup key for `summary`: markers and outranked marks removed, whitespace
/// collapsed and lowercased.
pub fn normalize(summary: &str, symbols: &Symbols) -> String {
    let stripped = strip_markers(summary, symbols);

    stripped
        .trim_start_matches(OUTRANKED_MARKERS)
        .split_whitespace()
        .join(" ")
        .to_lowercase()
}
