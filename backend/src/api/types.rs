//! REST API request and response types.
//!
//! Responses carry presentation-ready aggregates; chart rendering is left to
//! the client.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::models::{CategoryField, Column, Film};
use crate::query::{CountTable, GenreStats, Share};

/// `?genre=&language=`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FilterParams {
    #[serde(default)]
    pub genre: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
}

/// `?genre=&language=&n=`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TopParams {
    #[serde(default)]
    pub genre: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub n: Option<usize>,
}

/// Catalogue summary for `/health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub films: usize,
    pub missing_columns: Vec<Column>,
}

/// Token tally for one field.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CountsResponse {
    pub field: CategoryField,
    pub total: usize,
    /// Distinct tokens, alphabetically, for selection controls
    pub tokens: Vec<String>,
    pub counts: CountTable,
}

impl CountsResponse {
    pub fn new(field: CategoryField, counts: CountTable) -> Self {
        Self {
            field,
            total: counts.total(),
            tokens: counts.tokens().into_iter().map(String::from).collect(),
            counts,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub genre: String,
    pub language: String,
    #[serde(flatten)]
    pub stats: GenreStats,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilmsResponse {
    pub genre: String,
    pub language: String,
    pub count: usize,
    pub films: Vec<Film>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopResponse {
    pub genre: String,
    pub language: String,
    pub limit: usize,
    pub films: Vec<Film>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YearsResponse {
    pub years: Vec<i32>,
}

/// Language distribution for one premiere year.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YearLanguagesResponse {
    pub year: i32,
    pub total: usize,
    /// False when no film premiered that year
    pub has_data: bool,
    pub shares: Vec<Share>,
}

impl YearLanguagesResponse {
    pub fn new(year: i32, counts: &CountTable) -> Self {
        Self {
            year,
            total: counts.total(),
            has_data: !counts.is_empty(),
            shares: counts.shares(),
        }
    }
}

/// Create an error response body
pub fn error_response(error: &str) -> Value {
    json!({
        "status": "error",
        "error": error,
    })
}

/// Error body for a query the catalogue cannot answer.
pub fn schema_mismatch_response(missing: &[Column]) -> Value {
    json!({
        "status": "schemaMismatch",
        "error": "The catalogue lacks columns required by this query",
        "missingColumns": missing,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_response_flattens() {
        let response = StatsResponse {
            genre: "Documentary".into(),
            language: "english".into(),
            stats: GenreStats {
                count: 2,
                mean_score: Some(8.75),
            },
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["count"], 2);
        assert_eq!(json["meanScore"], 8.75);
        assert_eq!(json["genre"], "Documentary");
    }

    #[test]
    fn test_counts_response_tokens_sorted() {
        let counts: CountTable = ["Spanish", "English", "English"].into_iter().collect();
        let response = CountsResponse::new(CategoryField::Language, counts);
        assert_eq!(response.tokens, vec!["English", "Spanish"]);
        assert_eq!(response.total, 3);

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["field"], "language");
        assert_eq!(json["counts"]["English"], 2);
    }

    #[test]
    fn test_year_without_data() {
        let response = YearLanguagesResponse::new(1999, &CountTable::new());
        assert!(!response.has_data);
        assert_eq!(response.total, 0);
    }

    #[test]
    fn test_schema_mismatch_body() {
        let body = schema_mismatch_response(&[Column::Language]);
        assert_eq!(body["status"], "schemaMismatch");
        assert_eq!(body["missingColumns"][0], "Language");
    }
}
