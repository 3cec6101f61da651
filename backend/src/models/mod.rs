//! Domain models for the film catalogue.
//!
//! - [`Film`] - One catalogue entry with its derived premiere year
//! - [`Column`] - The expected CSV columns
//! - [`Schema`] - Which expected columns a loaded catalogue actually has
//! - [`CategoryField`] - Field selector for the categorical counter

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{QueryResult, SchemaMismatch};
use crate::normalize::parse_premiere;

// =============================================================================
// Columns
// =============================================================================

/// A column the catalogue is expected to carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Column {
    Title,
    Genre,
    Language,
    Premiere,
    #[serde(rename = "IMDB Score")]
    ImdbScore,
}

impl Column {
    /// Every expected column, in source file order.
    pub const ALL: [Column; 5] = [
        Column::Title,
        Column::Genre,
        Column::Language,
        Column::Premiere,
        Column::ImdbScore,
    ];

    /// Header text as it appears in the CSV.
    pub fn header(&self) -> &'static str {
        match self {
            Column::Title => "Title",
            Column::Genre => "Genre",
            Column::Language => "Language",
            Column::Premiere => "Premiere",
            Column::ImdbScore => "IMDB Score",
        }
    }

    /// Match a (trimmed) CSV header. Exact, case-sensitive.
    pub fn from_header(header: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.header() == header.trim())
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.header())
    }
}

// =============================================================================
// Schema
// =============================================================================

/// The set of expected columns present in a loaded catalogue.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Schema {
    present: Vec<Column>,
}

impl Schema {
    /// Build from raw CSV headers, ignoring columns we do not know about.
    pub fn from_headers<S: AsRef<str>>(headers: &[S]) -> Self {
        let present = Column::ALL
            .into_iter()
            .filter(|c| headers.iter().any(|h| Column::from_header(h.as_ref()) == Some(*c)))
            .collect();
        Self { present }
    }

    /// Schema with every expected column.
    pub fn complete() -> Self {
        Self {
            present: Column::ALL.to_vec(),
        }
    }

    pub fn has(&self, column: Column) -> bool {
        self.present.contains(&column)
    }

    pub fn present(&self) -> &[Column] {
        &self.present
    }

    /// Expected columns not in this schema.
    pub fn missing(&self) -> Vec<Column> {
        Column::ALL
            .into_iter()
            .filter(|c| !self.has(*c))
            .collect()
    }

    /// Fail with [`SchemaMismatch`] unless all `columns` are present.
    pub fn require(&self, columns: &[Column]) -> QueryResult<()> {
        let missing: Vec<Column> = columns
            .iter()
            .copied()
            .filter(|c| !self.has(*c))
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(SchemaMismatch { missing })
        }
    }
}

// =============================================================================
// Film
// =============================================================================

/// One film entry.
///
/// Fields backed by a column the catalogue lacks are `None`. `year` is absent
/// when the premiere text could not be parsed; such films still take part in
/// genre and language aggregation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Film {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub premiere: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub premiere_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub imdb_score: Option<f64>,
}

impl Film {
    /// Create a film with every column present, deriving the premiere year.
    pub fn new(
        title: impl Into<String>,
        genre: impl Into<String>,
        language: impl Into<String>,
        premiere: impl Into<String>,
        imdb_score: f64,
    ) -> Self {
        let premiere = premiere.into();
        let premiere_date = parse_premiere(&premiere);

        Self {
            title: title.into(),
            genre: Some(genre.into()),
            language: Some(language.into()),
            premiere_date,
            year: premiere_date.map(|d| d.year()),
            premiere: Some(premiere),
            imdb_score: Some(imdb_score),
        }
    }

    /// Raw text of a categorical field.
    pub fn field(&self, field: CategoryField) -> Option<&str> {
        match field {
            CategoryField::Genre => self.genre.as_deref(),
            CategoryField::Language => self.language.as_deref(),
        }
    }
}

// =============================================================================
// Category Field
// =============================================================================

/// Which categorical field to tally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryField {
    Genre,
    Language,
}

impl CategoryField {
    pub fn column(&self) -> Column {
        match self {
            CategoryField::Genre => Column::Genre,
            CategoryField::Language => Column::Language,
        }
    }
}

impl FromStr for CategoryField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "genre" | "genres" => Ok(CategoryField::Genre),
            "language" | "languages" => Ok(CategoryField::Language),
            other => Err(format!("Unknown field '{}', expected 'genre' or 'language'", other)),
        }
    }
}

impl fmt::Display for CategoryField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryField::Genre => f.write_str("genre"),
            CategoryField::Language => f.write_str("language"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_from_header() {
        assert_eq!(Column::from_header("IMDB Score"), Some(Column::ImdbScore));
        assert_eq!(Column::from_header("  Genre "), Some(Column::Genre));
        assert_eq!(Column::from_header("genre"), None);
        assert_eq!(Column::from_header("Runtime"), None);
    }

    #[test]
    fn test_schema_missing_and_require() {
        let schema = Schema::from_headers(&["Title", "Genre", "Premiere", "Runtime"]);
        assert!(schema.has(Column::Genre));
        assert!(!schema.has(Column::Language));
        assert_eq!(schema.missing(), vec![Column::Language, Column::ImdbScore]);

        assert!(schema.require(&[Column::Title, Column::Genre]).is_ok());
        let err = schema
            .require(&[Column::Genre, Column::Language])
            .unwrap_err();
        assert_eq!(err.missing, vec![Column::Language]);
    }

    #[test]
    fn test_film_new_derives_year() {
        let film = Film::new("Dick Johnson Is Dead", "Documentary", "English", "October 2, 2020", 7.5);
        assert_eq!(film.year, Some(2020));

        let film = Film::new("Untitled", "Drama", "English", "not-a-date", 6.0);
        assert_eq!(film.year, None);
        assert!(film.premiere_date.is_none());
    }

    #[test]
    fn test_category_field_parse() {
        assert_eq!("Genre".parse::<CategoryField>(), Ok(CategoryField::Genre));
        assert_eq!("languages".parse::<CategoryField>(), Ok(CategoryField::Language));
        assert!("runtime".parse::<CategoryField>().is_err());
    }

    #[test]
    fn test_film_serializes_camel_case() {
        let film = Film::new("Murder Mystery", "Comedy", "English", "June 14, 2019", 6.0);
        let json = serde_json::to_value(&film).unwrap();
        assert_eq!(json["imdbScore"], 6.0);
        assert_eq!(json["premiereDate"], "2019-06-14");
        assert_eq!(json["year"], 2019);
    }
}
