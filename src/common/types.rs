use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::common::error::DashboardError;

/// Raw record as returned in the catalog's `results` array
pub type RawRecord = serde_json::Value;

/// Kind of catalog entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Movie,
    Tv,
    #[default]
    Unknown,
}

impl MediaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Movie => "movie",
            MediaType::Tv => "tv",
            MediaType::Unknown => "unknown",
        }
    }

    /// Map an upstream `media_type` value; anything unrecognised is `Unknown`
    pub fn from_source(value: Option<&str>) -> Self {
        match value {
            Some("movie") => MediaType::Movie,
            Some("tv") => MediaType::Tv,
            _ => MediaType::Unknown,
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaType {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "movie" => Ok(MediaType::Movie),
            "tv" => Ok(MediaType::Tv),
            "unknown" => Ok(MediaType::Unknown),
            other => Err(DashboardError::InvalidFilter {
                dimension: "media_type".to_string(),
                value: other.to_string(),
            }),
        }
    }
}

/// Catalog-agnostic representation of one movie or show.
///
/// `genres`, `countries` and `languages` behave as sets: no duplicates,
/// kept in the order the source listed them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct CanonicalRecord {
    pub display_name: String,
    pub release_year: Option<i32>,
    pub media_type: MediaType,
    pub rating: Option<f64>,
    pub vote_count: Option<i64>,
    pub genres: Vec<String>,
    pub countries: Vec<String>,
    pub languages: Vec<String>,
    pub cast_names: Vec<String>,
    pub award_nominations: i64,
    pub award_wins: i64,
}

impl CanonicalRecord {
    pub fn identity_key(&self) -> IdentityKey {
        IdentityKey {
            display_name: self.display_name.clone(),
            release_year: self.release_year,
        }
    }
}

/// Duplicate-detection key. Lossy on purpose: two different titles released
/// the same year under the same name collapse into one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IdentityKey {
    pub display_name: String,
    pub release_year: Option<i32>,
}

/// Parallel label/count sequences in first-occurrence order, ready for a chart
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Distribution {
    pub labels: Vec<String>,
    pub data: Vec<u64>,
}

impl Distribution {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Count recorded for `label`, if it was observed
    pub fn count_for(&self, label: &str) -> Option<u64> {
        self.labels
            .iter()
            .position(|l| l == label)
            .map(|idx| self.data[idx])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_type_from_source() {
        assert_eq!(MediaType::from_source(Some("movie")), MediaType::Movie);
        assert_eq!(MediaType::from_source(Some("tv")), MediaType::Tv);
        assert_eq!(MediaType::from_source(Some("person")), MediaType::Unknown);
        assert_eq!(MediaType::from_source(None), MediaType::Unknown);
    }

    #[test]
    fn test_media_type_parse_rejects_garbage() {
        assert_eq!("TV".parse::<MediaType>().unwrap(), MediaType::Tv);
        assert!("documentary".parse::<MediaType>().is_err());
    }

    #[test]
    fn test_distribution_count_for() {
        let dist = Distribution {
            labels: vec!["en".into(), "fr".into()],
            data: vec![2, 1],
        };
        assert_eq!(dist.count_for("fr"), Some(1));
        assert_eq!(dist.count_for("de"), None);
        assert_eq!(dist.len(), 2);
    }
}
