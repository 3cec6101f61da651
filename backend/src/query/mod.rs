//! Queries over a loaded [`crate::dataset::Dataset`].
//!
//! Every function here is pure: it reads the immutable catalogue and
//! recomputes its answer on each call.
//!
//! - Counter: token tallies per genre or language
//! - Aggregate: count and mean score for a genre + language
//! - Top: highest-rated films for a genre + language
//! - Years: premiere years and per-year language tallies

pub mod aggregate;
pub mod counter;
pub mod top;
pub mod years;

pub use aggregate::{matching_films, stats, FilmFilter, GenreStats, FILTER_COLUMNS};
pub use counter::{count, count_with, split_tokens, CountTable, Share, SplitPolicy, TOKEN_DELIMITER};
pub use top::{top_films, top_films_n, DEFAULT_TOP_N, RANKED_SCORES};
pub use years::{language_distribution, premiere_years};
