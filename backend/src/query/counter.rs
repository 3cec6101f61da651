//! Token tallies over a categorical field.
//!
//! A field such as `"English / French"` holds several values separated by
//! [`TOKEN_DELIMITER`]. Each value is trimmed and counted once per film:
//!
//! ```text
//! "English/Japanese"   ┐       ┌ English  2
//! "English"            ├──▶    ├ Japanese 1
//! "Spanish"            ┘       └ Spanish  1
//! ```
//!
//! Tokens keep their case. An absent or empty field contributes nothing.
//! Consecutive delimiters (`"English//French"`) produce an empty token,
//! dropped or kept according to [`SplitPolicy`].

use serde::Serialize;
use std::collections::HashMap;

use crate::models::{CategoryField, Film};

/// Separator between values in a multi-valued field.
pub const TOKEN_DELIMITER: char = '/';

/// What to do with the empty token between consecutive delimiters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SplitPolicy {
    /// Discard empty tokens.
    #[default]
    DropEmpty,
    /// Count empty tokens under `""`.
    KeepEmpty,
}

/// Split a field into trimmed tokens.
pub fn split_tokens(text: &str, policy: SplitPolicy) -> Vec<&str> {
    if text.trim().is_empty() {
        return Vec::new();
    }

    text.split(TOKEN_DELIMITER)
        .map(str::trim)
        .filter(|token| policy == SplitPolicy::KeepEmpty || !token.is_empty())
        .collect()
}

/// Occurrence count per token. Order carries no meaning.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CountTable {
    counts: HashMap<String, usize>,
}

/// One slice of a [`CountTable`], ready for a pie chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Share {
    pub token: String,
    pub count: usize,
    /// `count / total`, in `[0, 1]`.
    pub fraction: f64,
}

impl CountTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one occurrence of `token`.
    pub fn increment(&mut self, token: &str) {
        *self.counts.entry(token.to_string()).or_insert(0) += 1;
    }

    pub fn get(&self, token: &str) -> usize {
        self.counts.get(token).copied().unwrap_or(0)
    }

    /// Number of distinct tokens.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum of all counts.
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.counts.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Distinct tokens, alphabetically.
    pub fn tokens(&self) -> Vec<&str> {
        let mut tokens: Vec<&str> = self.counts.keys().map(String::as_str).collect();
        tokens.sort_unstable();
        tokens
    }

    /// `(token, count)` by descending count, ties alphabetically.
    pub fn sorted_by_count(&self) -> Vec<(&str, usize)> {
        let mut entries: Vec<(&str, usize)> = self.iter().collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        entries
    }

    /// Each token's fraction of the total, in [`Self::sorted_by_count`] order.
    pub fn shares(&self) -> Vec<Share> {
        let total = self.total();
        self.sorted_by_count()
            .into_iter()
            .map(|(token, count)| Share {
                token: token.to_string(),
                count,
                fraction: if total == 0 {
                    0.0
                } else {
                    count as f64 / total as f64
                },
            })
            .collect()
    }
}

impl<'a> FromIterator<&'a str> for CountTable {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut table = CountTable::new();
        for token in iter {
            table.increment(token);
        }
        table
    }
}

/// Tally `field` tokens across `films`, dropping empty tokens.
pub fn count<'a, I>(films: I, field: CategoryField) -> CountTable
where
    I: IntoIterator<Item = &'a Film>,
{
    count_with(films, field, SplitPolicy::default())
}

/// Tally `field` tokens across `films` with an explicit empty-token policy.
pub fn count_with<'a, I>(films: I, field: CategoryField, policy: SplitPolicy) -> CountTable
where
    I: IntoIterator<Item = &'a Film>,
{
    films
        .into_iter()
        .flat_map(|film| split_tokens(film.field(field).unwrap_or(""), policy))
        .collect()
}
