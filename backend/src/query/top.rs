//! Highest-rated films for a genre and language.

use std::ops::RangeInclusive;

use crate::dataset::Dataset;
use crate::error::QueryResult;
use crate::models::Film;

use super::aggregate::matching_films;

/// Number of films returned when the caller does not say.
pub const DEFAULT_TOP_N: usize = 10;

/// Scores eligible for a ranking. A score of 0 is a placeholder, not a rating.
pub const RANKED_SCORES: RangeInclusive<f64> = 1.0..=10.0;

/// Up to [`DEFAULT_TOP_N`] best-scored films. See [`top_films_n`].
pub fn top_films<'a>(dataset: &'a Dataset, genre: &str, language: &str) -> QueryResult<Vec<&'a Film>> {
    top_films_n(dataset, genre, language, DEFAULT_TOP_N)
}

/// Up to `n` films matching the genre/language filter, best score first.
///
/// Only scores within [`RANKED_SCORES`] are ranked. Equal scores keep their
/// source order. Fewer than `n` matches is not an error.
pub fn top_films_n<'a>(
    dataset: &'a Dataset,
    genre: &str,
    language: &str,
    n: usize,
) -> QueryResult<Vec<&'a Film>> {
    let mut ranked: Vec<(&Film, f64)> = matching_films(dataset, genre, language)?
        .into_iter()
        .filter_map(|film| film.imdb_score.map(|score| (film, score)))
        .filter(|(_, score)| RANKED_SCORES.contains(score))
        .collect();

    // Stable: ties stay in source order
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    ranked.truncate(n);

    Ok(ranked.into_iter().map(|(film, _)| film).collect())
}
