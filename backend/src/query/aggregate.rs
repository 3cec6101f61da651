//! Genre and language filtered statistics.
//!
//! A film matches when its genre equals the requested genre exactly and its
//! raw language text contains the requested language, ignoring case. The
//! language test runs on the whole field, not per token: `"eng"` matches
//! `"English/French"`.

use serde::Serialize;

use crate::dataset::Dataset;
use crate::error::QueryResult;
use crate::models::{Column, Film};

/// Columns a genre/language query reads.
pub const FILTER_COLUMNS: [Column; 3] = [Column::Genre, Column::Language, Column::ImdbScore];

/// Genre + language selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilmFilter {
    genre: String,
    language_lower: String,
}

impl FilmFilter {
    pub fn new(genre: impl Into<String>, language: &str) -> Self {
        Self {
            genre: genre.into(),
            language_lower: language.to_lowercase(),
        }
    }

    pub fn matches(&self, film: &Film) -> bool {
        film.genre.as_deref() == Some(self.genre.as_str())
            && film
                .language
                .as_deref()
                .is_some_and(|l| l.to_lowercase().contains(&self.language_lower))
    }
}

/// Count and mean score of the films matching a filter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenreStats {
    /// Matching films, scored or not.
    pub count: usize,
    /// Mean over the matching films that carry a score. `None` when none do,
    /// which always holds for `count == 0`.
    pub mean_score: Option<f64>,
}

impl GenreStats {
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

/// Films of `genre` whose language contains `language`, in source order.
pub fn matching_films<'a>(
    dataset: &'a Dataset,
    genre: &str,
    language: &str,
) -> QueryResult<Vec<&'a Film>> {
    dataset.schema().require(&FILTER_COLUMNS)?;

    let filter = FilmFilter::new(genre, language);
    Ok(dataset.films().iter().filter(|f| filter.matches(f)).collect())
}

/// Number of matching films and their mean IMDB score.
///
/// No match is a valid answer (`count == 0`, no mean). A catalogue without
/// the genre, language or score column cannot answer at all and yields
/// [`crate::error::SchemaMismatch`].
pub fn stats(dataset: &Dataset, genre: &str, language: &str) -> QueryResult<GenreStats> {
    let films = matching_films(dataset, genre, language)?;
    let scores: Vec<f64> = films.iter().filter_map(|f| f.imdb_score).collect();

    let mean_score = if scores.is_empty() {
        None
    } else {
        Some(scores.iter().sum::<f64>() / scores.len() as f64)
    };

    Ok(GenreStats {
        count: films.len(),
        mean_score,
    })
}
