use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::common::error::{DashboardError, Result};
use crate::common::types::{CanonicalRecord, MediaType};

/// User-selected constraints. `None` (or an empty search term) means the
/// dimension does not constrain anything.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct FilterCriteria {
    pub search_term: String,
    pub genre: Option<String>,
    pub year: Option<i32>,
    pub country: Option<String>,
    pub media_type: Option<MediaType>,
    pub min_rating: Option<f64>,
}

/// One filter control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterDimension {
    Search,
    Genre,
    Year,
    Country,
    MediaType,
    MinRating,
}

impl fmt::Display for FilterDimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FilterDimension::Search => "search",
            FilterDimension::Genre => "genre",
            FilterDimension::Year => "year",
            FilterDimension::Country => "country",
            FilterDimension::MediaType => "media_type",
            FilterDimension::MinRating => "min_rating",
        };
        f.write_str(name)
    }
}

impl FromStr for FilterDimension {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "search" => Ok(FilterDimension::Search),
            "genre" => Ok(FilterDimension::Genre),
            "year" => Ok(FilterDimension::Year),
            "country" => Ok(FilterDimension::Country),
            "media_type" => Ok(FilterDimension::MediaType),
            "min_rating" | "rating" => Ok(FilterDimension::MinRating),
            other => Err(DashboardError::UnknownFilter(other.to_string())),
        }
    }
}

fn optional(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

fn invalid(dimension: FilterDimension, value: &str) -> DashboardError {
    DashboardError::InvalidFilter {
        dimension: dimension.to_string(),
        value: value.to_string(),
    }
}

impl FilterCriteria {
    /// Update one dimension from the raw control value. An empty value clears it.
    pub fn set(&mut self, dimension: FilterDimension, value: &str) -> Result<()> {
        match dimension {
            FilterDimension::Search => self.search_term = value.to_string(),
            FilterDimension::Genre => self.genre = optional(value).map(str::to_string),
            FilterDimension::Country => self.country = optional(value).map(str::to_string),
            FilterDimension::Year => {
                self.year = optional(value)
                    .map(|v| v.parse::<i32>().map_err(|_| invalid(dimension, v)))
                    .transpose()?;
            }
            FilterDimension::MediaType => {
                self.media_type = optional(value).map(str::parse::<MediaType>).transpose()?;
            }
            FilterDimension::MinRating => {
                self.min_rating = optional(value)
                    .map(|v| v.parse::<f64>().map_err(|_| invalid(dimension, v)))
                    .transpose()?;
            }
        }
        Ok(())
    }

    /// Reset every dimension
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// All dimensions AND-combined
    pub fn matches(&self, record: &CanonicalRecord) -> bool {
        self.matches_search(record)
            && self.genre.as_ref().map_or(true, |g| record.genres.contains(g))
            && self.country.as_ref().map_or(true, |c| record.countries.contains(c))
            && self.year.map_or(true, |y| record.release_year == Some(y))
            && self.media_type.map_or(true, |m| record.media_type == m)
            && self
                .min_rating
                .map_or(true, |min| record.rating.is_some_and(|r| r >= min))
    }

    fn matches_search(&self, record: &CanonicalRecord) -> bool {
        if self.search_term.is_empty() {
            return true;
        }
        let needle = self.search_term.to_lowercase();
        record.display_name.to_lowercase().contains(&needle)
            || record
                .cast_names
                .iter()
                .any(|actor| actor.to_lowercase().contains(&needle))
    }

    pub fn apply(&self, records: &[CanonicalRecord]) -> Vec<CanonicalRecord> {
        records.iter().filter(|r| self.matches(r)).cloned().collect()
    }
}

/// Distinct values offered by the filter dropdowns, in first-occurrence order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct FilterOptions {
    pub genres: Vec<String>,
    pub years: Vec<i32>,
    pub countries: Vec<String>,
}

impl FilterOptions {
    pub fn from_records(records: &[CanonicalRecord]) -> Self {
        let mut options = FilterOptions::default();
        for record in records {
            for genre in &record.genres {
                if !options.genres.contains(genre) {
                    options.genres.push(genre.clone());
                }
            }
            if let Some(year) = record.release_year {
                if !options.years.contains(&year) {
                    options.years.push(year);
                }
            }
            for country in &record.countries {
                if !options.countries.contains(country) {
                    options.countries.push(country.clone());
                }
            }
        }
        options
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movie(name: &str) -> CanonicalRecord {
        CanonicalRecord {
            display_name: name.to_string(),
            release_year: Some(1994),
            media_type: MediaType::Movie,
            rating: Some(8.8),
            genres: vec!["Drama".into()],
            countries: vec!["US".into()],
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_criteria_match_everything() {
        let criteria = FilterCriteria::default();
        assert!(criteria.is_empty());
        assert!(criteria.matches(&CanonicalRecord::default()));
    }

    #[test]
    fn test_search_matches_cast_regardless_of_title() {
        let mut record = movie("Forrest Gump");
        record.cast_names = vec!["Tom Hanks".into(), "Robin Wright".into()];
        let criteria = FilterCriteria { search_term: "tom".into(), ..Default::default() };
        assert!(criteria.matches(&record));

        let criteria = FilterCriteria { search_term: "FORREST".into(), ..Default::default() };
        assert!(criteria.matches(&record));

        let criteria = FilterCriteria { search_term: "meryl".into(), ..Default::default() };
        assert!(!criteria.matches(&record));
    }

    #[test]
    fn test_membership_and_equality_dimensions() {
        let record = movie("Pulp Fiction");
        let mut criteria = FilterCriteria::default();

        criteria.set(FilterDimension::Genre, "Drama").unwrap();
        criteria.set(FilterDimension::Country, "US").unwrap();
        criteria.set(FilterDimension::Year, "1994").unwrap();
        criteria.set(FilterDimension::MediaType, "movie").unwrap();
        assert!(criteria.matches(&record));

        criteria.set(FilterDimension::Year, "1995").unwrap();
        assert!(!criteria.matches(&record));

        criteria.set(FilterDimension::Year, "").unwrap();
        criteria.set(FilterDimension::Genre, "Comedy").unwrap();
        assert!(!criteria.matches(&record));
    }

    #[test]
    fn test_min_rating_rejects_unrated() {
        let criteria = FilterCriteria { min_rating: Some(8.0), ..Default::default() };
        assert!(criteria.matches(&movie("Rated")));

        let mut unrated = movie("Unrated");
        unrated.rating = None;
        assert!(!criteria.matches(&unrated));

        let mut low = movie("Low");
        low.rating = Some(7.9);
        assert!(!criteria.matches(&low));
    }

    #[test]
    fn test_set_rejects_unparseable_values() {
        let mut criteria = FilterCriteria::default();
        assert!(criteria.set(FilterDimension::Year, "nineteen").is_err());
        assert!(criteria.set(FilterDimension::MinRating, "high").is_err());
        assert!(criteria.set(FilterDimension::MediaType, "podcast").is_err());
        assert!(criteria.is_empty());
    }

    #[test]
    fn test_clear_resets_all_dimensions() {
        let mut criteria = FilterCriteria::default();
        criteria.set(FilterDimension::Search, "heat").unwrap();
        criteria.set(FilterDimension::MinRating, "7").unwrap();
        criteria.clear();
        assert!(criteria.is_empty());
    }

    #[test]
    fn test_filter_options_are_distinct_in_first_seen_order() {
        let mut a = movie("A");
        a.genres = vec!["Drama".into(), "Crime".into()];
        let mut b = movie("B");
        b.release_year = Some(2001);
        b.genres = vec!["Crime".into(), "War".into()];
        b.countries = vec!["UK".into(), "US".into()];

        let options = FilterOptions::from_records(&[a, b]);
        assert_eq!(options.genres, vec!["Drama", "Crime", "War"]);
        assert_eq!(options.years, vec![1994, 2001]);
        assert_eq!(options.countries, vec!["US", "UK"]);
    }

    #[test]
    fn test_dimension_parse() {
        assert_eq!("rating".parse::<FilterDimension>().unwrap(), FilterDimension::MinRating);
        let err = "plot".parse::<FilterDimension>().unwrap_err();
        assert_eq!(err.to_string(), "Unknown filter `plot`");
    }
}
