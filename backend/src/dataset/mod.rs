//! Loading the film catalogue into an immutable in-memory [`Dataset`].
//!
//! # Pipeline
//!
//! ```text
//! bytes ──▶ parser (encoding + delimiter) ──▶ drop incomplete rows ──▶ Film (+ year) ──▶ Dataset
//! ```
//!
//! A row with any empty cell, in any column, is dropped before it reaches the
//! queries, as is a row whose `IMDB Score` is not a number in `[0, 10]`.
//! Dropped rows are listed in the [`LoadReport`]; they never fail the load.
//!
//! Missing expected columns do not fail the load either. The [`Schema`] keeps
//! track of them so that queries needing those columns answer with a
//! [`crate::error::SchemaMismatch`] instead of an empty result.
//!
//! The premiere year is derived here, once, and every year-based query reads
//! [`Film::year`].

use chrono::Datelike;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use crate::api::logs::{log_info, log_info_indent, log_success, log_warning};
use crate::error::{DatasetError, DatasetResult};
use crate::models::{Column, Film, Schema};
use crate::normalize::parse_premiere;
use crate::parser::{parse_bytes_auto, parse_csv_file_auto, ParseResult, Row};

/// Highest valid IMDB score.
pub const MAX_SCORE: f64 = 10.0;

/// Why a source row did not make it into the dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum DropReason {
    /// One or more cells were empty.
    EmptyCells { columns: Vec<String> },
    /// The score cell is not a number in `[0, 10]`.
    InvalidScore { value: String },
}

impl fmt::Display for DropReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DropReason::EmptyCells { columns } => write!(f, "Missing: {}", columns.join(", ")),
            DropReason::InvalidScore { value } => write!(f, "Invalid IMDB Score '{}'", value),
        }
    }
}

/// A source row that was dropped.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DroppedRow {
    pub line: u64,
    pub reason: DropReason,
}

/// What happened while loading.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadReport {
    pub encoding: String,
    pub delimiter: char,
    pub headers: Vec<String>,
    pub source_rows: usize,
    pub dropped: Vec<DroppedRow>,
    /// Films kept whose premiere text could not be read as a date.
    pub unparsed_premieres: usize,
}

/// The immutable film catalogue every query runs against.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    films: Vec<Film>,
    schema: Schema,
    report: LoadReport,
}

impl Dataset {
    /// Build directly from films, e.g. for tests or non-CSV sources.
    pub fn new(films: Vec<Film>, schema: Schema) -> Self {
        let report = LoadReport {
            source_rows: films.len(),
            unparsed_premieres: films
                .iter()
                .filter(|f| f.premiere.is_some() && f.year.is_none())
                .count(),
            ..LoadReport::default()
        };
        Self {
            films,
            schema,
            report,
        }
    }

    /// Build from films that carry every expected column.
    pub fn from_films(films: Vec<Film>) -> Self {
        Self::new(films, Schema::complete())
    }

    /// Load a CSV file with auto-detected encoding and delimiter.
    pub fn from_path<P: AsRef<Path>>(path: P) -> DatasetResult<Self> {
        log_info(format!("📖 Reading catalogue: {}", path.as_ref().display()));
        let parsed = parse_csv_file_auto(path)?;
        Self::from_parsed(parsed)
    }

    /// Load CSV bytes with auto-detected encoding and delimiter.
    pub fn from_bytes(bytes: &[u8]) -> DatasetResult<Self> {
        let parsed = parse_bytes_auto(bytes)?;
        Self::from_parsed(parsed)
    }

    /// Map parsed rows onto films.
    pub fn from_parsed(parsed: ParseResult) -> DatasetResult<Self> {
        log_success(format!("Detected encoding: {}", parsed.encoding));
        log_success(format!("Detected separator: '{}'", format_delimiter(parsed.delimiter)));
        log_success(format!("Read {} rows", parsed.rows.len()));

        let schema = Schema::from_headers(&parsed.headers);
        if schema.present().is_empty() {
            return Err(DatasetError::UnrecognizedHeader(parsed.headers.join(", ")));
        }

        let missing = schema.missing();
        if !missing.is_empty() {
            let names: Vec<&str> = missing.iter().map(|c| c.header()).collect();
            log_warning(format!("Missing column(s): {}", names.join(", ")));
        }

        let positions = ColumnPositions::locate(&parsed.headers);
        let mut films = Vec::with_capacity(parsed.rows.len());
        let mut dropped = Vec::new();

        for row in &parsed.rows {
            match positions.film(row, &parsed.headers) {
                Ok(film) => films.push(film),
                Err(reason) => dropped.push(DroppedRow {
                    line: row.line,
                    reason,
                }),
            }
        }

        let unparsed_premieres = films
            .iter()
            .filter(|f| f.premiere.is_some() && f.year.is_none())
            .count();

        print_dropped(&dropped);
        if unparsed_premieres > 0 {
            log_warning(format!("{} premiere date(s) could not be parsed", unparsed_premieres));
        }
        log_success(format!("{} films loaded", films.len()));

        let report = LoadReport {
            encoding: parsed.encoding,
            delimiter: parsed.delimiter,
            headers: parsed.headers,
            source_rows: parsed.rows.len(),
            dropped,
            unparsed_premieres,
        };

        Ok(Self {
            films,
            schema,
            report,
        })
    }

    pub fn films(&self) -> &[Film] {
        &self.films
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn report(&self) -> &LoadReport {
        &self.report
    }

    pub fn len(&self) -> usize {
        self.films.len()
    }

    pub fn is_empty(&self) -> bool {
        self.films.is_empty()
    }
}

/// Index of each expected column in the header row.
struct ColumnPositions {
    positions: HashMap<Column, usize>,
}

impl ColumnPositions {
    fn locate(headers: &[String]) -> Self {
        let positions = headers
            .iter()
            .enumerate()
            .filter_map(|(i, h)| Column::from_header(h).map(|c| (c, i)))
            .collect();
        Self { positions }
    }

    fn cell<'a>(&self, row: &'a Row, column: Column) -> Option<&'a str> {
        self.positions
            .get(&column)
            .and_then(|&i| row.cells.get(i))
            .map(String::as_str)
    }

    fn film(&self, row: &Row, headers: &[String]) -> Result<Film, DropReason> {
        let empty: Vec<String> = headers
            .iter()
            .zip(&row.cells)
            .filter(|(_, cell)| cell.is_empty())
            .map(|(h, _)| h.clone())
            .collect();

        if !empty.is_empty() {
            return Err(DropReason::EmptyCells { columns: empty });
        }

        let imdb_score = match self.cell(row, Column::ImdbScore) {
            Some(raw) => Some(parse_score(raw).ok_or_else(|| DropReason::InvalidScore {
                value: raw.to_string(),
            })?),
            None => None,
        };

        let premiere = self.cell(row, Column::Premiere).map(str::to_string);
        let premiere_date = premiere.as_deref().and_then(parse_premiere);

        Ok(Film {
            title: self.cell(row, Column::Title).unwrap_or_default().to_string(),
            genre: self.cell(row, Column::Genre).map(str::to_string),
            language: self.cell(row, Column::Language).map(str::to_string),
            premiere,
            premiere_date,
            year: premiere_date.map(|d| d.year()),
            imdb_score,
        })
    }
}

/// Parse a score, accepting a decimal comma.
fn parse_score(raw: &str) -> Option<f64> {
    raw.trim()
        .replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|s| (0.0..=MAX_SCORE).contains(s))
}

/// Format delimiter for display
fn format_delimiter(d: char) -> String {
    match d {
        '\t' => "TAB".to_string(),
        c => c.to_string(),
    }
}

fn print_dropped(dropped: &[DroppedRow]) {
    if dropped.is_empty() {
        return;
    }

    log_warning(format!("{} rows dropped", dropped.len()));

    let mut reasons: HashMap<String, Vec<u64>> = HashMap::new();
    for row in dropped {
        reasons.entry(row.reason.to_string()).or_default().push(row.line);
    }

    let mut reasons: Vec<_> = reasons.into_iter().collect();
    reasons.sort_by(|a, b| b.1.len().cmp(&a.1.len()).then_with(|| a.0.cmp(&b.0)));

    for (reason, lines) in reasons.iter().take(5) {
        let sample: Vec<String> = lines.iter().take(5).map(|l| l.to_string()).collect();
        let more = if lines.len() > 5 {
            format!("... +{}", lines.len() - 5)
        } else {
            String::new()
        };
        log_info_indent(format!("• {} (lines: {}{})", reason, sample.join(", "), more), 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const CATALOGUE: &str = "\
Title,Genre,Premiere,Runtime,IMDB Score,Language
Enter the Anime,Documentary,\"August 5, 2019\",58,2.5,English/Japanese
Dark Forces,Thriller,\"August 21, 2020\",81,2.6,Spanish
The App,Science fiction/Drama,\"December 26, 2019\",79,2.6,Italian
Lost Cut,Drama,sometime soon,90,5.1,English
No Runtime,Comedy,\"May 1, 2020\",,6.0,English
Bad Score,Comedy,\"May 2, 2020\",95,great,English
";

    #[test]
    fn test_load_drops_incomplete_rows() {
        let dataset = Dataset::from_bytes(CATALOGUE.as_bytes()).unwrap();

        assert_eq!(dataset.len(), 4);
        assert_eq!(dataset.report().source_rows, 6);
        assert_eq!(dataset.report().dropped.len(), 2);

        let first = &dataset.report().dropped[0];
        assert_eq!(first.line, 6);
        assert_eq!(
            first.reason,
            DropReason::EmptyCells {
                columns: vec!["Runtime".to_string()]
            }
        );

        let second = &dataset.report().dropped[1];
        assert_eq!(
            second.reason,
            DropReason::InvalidScore {
                value: "great".to_string()
            }
        );
    }

    #[test]
    fn test_load_derives_year_once() {
        let dataset = Dataset::from_bytes(CATALOGUE.as_bytes()).unwrap();
        let films = dataset.films();

        assert_eq!(films[0].title, "Enter the Anime");
        assert_eq!(films[0].year, Some(2019));
        assert_eq!(films[0].imdb_score, Some(2.5));
        assert_eq!(films[0].language.as_deref(), Some("English/Japanese"));

        // Unparsable premiere keeps the film, without a year
        assert_eq!(films[3].title, "Lost Cut");
        assert_eq!(films[3].year, None);
        assert_eq!(dataset.report().unparsed_premieres, 1);
    }

    #[test]
    fn test_missing_column_recorded_in_schema() {
        let csv = "Title,Genre,IMDB Score\nRoma,Drama,7.7\n";
        let dataset = Dataset::from_bytes(csv.as_bytes()).unwrap();

        assert_eq!(dataset.len(), 1);
        assert!(!dataset.schema().has(Column::Language));
        assert_eq!(dataset.films()[0].language, None);
        assert_eq!(
            dataset.schema().missing(),
            vec![Column::Language, Column::Premiere]
        );
    }

    #[test]
    fn test_unrecognized_header() {
        let csv = "a,b\n1,2\n";
        let result = Dataset::from_bytes(csv.as_bytes());
        assert!(matches!(result, Err(DatasetError::UnrecognizedHeader(_))));
    }

    #[test]
    fn test_load_latin1_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"Title;Genre;Premiere;IMDB Score;Language\n").unwrap();
        // "Les Misérables" with 0xE9 for é, and a decimal comma
        file.write_all(b"Les Mis\xe9rables;Drama;March 5, 2021;7,4;French\n").unwrap();

        let dataset = Dataset::from_path(file.path()).unwrap();

        assert_eq!(dataset.report().delimiter, ';');
        assert_eq!(dataset.films()[0].title, "Les Misérables");
        assert_eq!(dataset.films()[0].imdb_score, Some(7.4));
        assert_eq!(dataset.films()[0].year, Some(2021));
    }

    #[test]
    fn test_missing_file_is_error() {
        let result = Dataset::from_path("/nonexistent/films.csv");
        assert!(matches!(result, Err(DatasetError::Csv(_))));
    }

    #[test]
    fn test_parse_score_bounds() {
        assert_eq!(parse_score("7.5"), Some(7.5));
        assert_eq!(parse_score("0"), Some(0.0));
        assert_eq!(parse_score("10"), Some(10.0));
        assert_eq!(parse_score("10.1"), None);
        assert_eq!(parse_score("-1"), None);
        assert_eq!(parse_score("NaN"), None);
    }
}
