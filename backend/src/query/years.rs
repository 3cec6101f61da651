//! Premiere year grouping.
//!
//! Films whose premiere could not be parsed have no year and are left out
//! here, while still counting everywhere else.

use std::collections::BTreeSet;

use crate::dataset::Dataset;
use crate::models::CategoryField;

use super::counter::{count, CountTable};

/// Distinct premiere years, ascending.
pub fn premiere_years(dataset: &Dataset) -> Vec<i32> {
    dataset
        .films()
        .iter()
        .filter_map(|f| f.year)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Language tally of the films that premiered in `year`.
///
/// An empty table means there is no data for that year.
pub fn language_distribution(dataset: &Dataset, year: i32) -> CountTable {
    count(
        dataset.films().iter().filter(|f| f.year == Some(year)),
        CategoryField::Language,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Film;

    fn sample() -> Dataset {
        Dataset::from_films(vec![
            Film::new("A", "Drama", "English/Spanish", "March 5, 2021", 6.0),
            Film::new("B", "Drama", "English", "December 31, 2019", 6.5),
            Film::new("C", "Comedy", "Hindi", "January 1, 2021", 5.5),
            Film::new("D", "Comedy", "Korean", "not-a-date", 7.0),
        ])
    }

    #[test]
    fn test_premiere_years_sorted_distinct() {
        assert_eq!(premiere_years(&sample()), vec![2019, 2021]);
    }

    #[test]
    fn test_language_distribution_for_year() {
        let table = language_distribution(&sample(), 2021);
        assert_eq!(table.get("English"), 1);
        assert_eq!(table.get("Spanish"), 1);
        assert_eq!(table.get("Hindi"), 1);
        assert_eq!(table.get("Korean"), 0);
        assert_eq!(table.total(), 3);
    }

    #[test]
    fn test_unknown_year_is_empty() {
        assert!(language_distribution(&sample(), 1999).is_empty());
    }

    #[test]
    fn test_undated_film_still_counted_elsewhere() {
        let dataset = sample();
        let all = count(dataset.films(), CategoryField::Language);
        assert_eq!(all.get("Korean"), 1);

        let by_year: usize = premiere_years(&dataset)
            .into_iter()
            .map(|y| language_distribution(&dataset, y).get("Korean"))
            .sum();
        assert_eq!(by_year, 0);
    }
}
