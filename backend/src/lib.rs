//! # Filmdash - genre, language and rating aggregates over a film catalogue
//!
//! Loads a catalogue CSV (title, genre, language, premiere, IMDB score) once
//! and answers dashboard queries from it: how many films per genre or
//! language, how a genre/language pair scores on average, which films rank
//! highest, and how languages split across premiere years.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   CSV File  │────▶│   Parser    │────▶│   Dataset   │────▶│   Queries   │
//! │ (Latin/UTF8)│     │  (auto-enc) │     │ (immutable) │     │ (pure fns)  │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use filmdash::{Dataset, query};
//!
//! let dataset = Dataset::from_path("NetflixOriginals.csv")?;
//! let stats = query::stats(&dataset, "Documentary", "english")?;
//! println!("{} films, mean {:?}", stats.count, stats.mean_score);
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Hierarchical error types
//! - [`models`] - Film, columns and schema
//! - [`parser`] - CSV parsing with auto-detection
//! - [`normalize`] - Lenient premiere date parsing
//! - [`dataset`] - Catalogue loading
//! - [`query`] - Counts, stats, rankings, year grouping
//! - [`config`] - Runtime configuration
//! - [`api`] - HTTP API server

// Core modules
pub mod error;
pub mod models;

// Loading
pub mod dataset;
pub mod normalize;
pub mod parser;

// Queries
pub mod query;

pub mod config;

// HTTP API
pub mod api;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{CsvError, DatasetError, SchemaMismatch, ServerError};

pub use models::{CategoryField, Column, Film, Schema};

pub use parser::{
    decode_content, detect_delimiter, detect_encoding, parse_bytes_auto, parse_csv_file_auto,
    parse_str, ParseResult, Row,
};

pub use normalize::{parse_premiere, premiere_year};

pub use dataset::{Dataset, DropReason, DroppedRow, LoadReport};

pub use query::{
    count, count_with, language_distribution, matching_films, premiere_years, stats, top_films,
    top_films_n, CountTable, GenreStats, SplitPolicy, DEFAULT_TOP_N,
};

pub use config::DashboardConfig;

// Server
pub mod server {
    pub use crate::api::server::start_server;
}
