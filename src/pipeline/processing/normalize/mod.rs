pub mod fields;

use serde::Serialize;
use tracing::debug;

use crate::common::types::{CanonicalRecord, MediaType, RawRecord};
use fields::FieldUtils;

// Source keys, in lookup order. Trending results use TMDB's names; the awards
// catalog uses the singular forms.
const NAME_KEYS: &[&str] = &["title", "name"];
const DATE_KEYS: &[&str] = &["release_date", "first_air_date"];
const GENRE_KEYS: &[&str] = &["genres", "genre", "genre_ids"];
const COUNTRY_KEYS: &[&str] = &["country", "production_countries", "origin_country"];
const LANGUAGE_KEYS: &[&str] = &["language", "spoken_languages", "original_language"];

/// Trait for normalizing raw catalog records into the canonical shape
pub trait Normalizer {
    /// Returns `None` when the record cannot be rendered and should be dropped
    fn normalize(&self, raw: &RawRecord) -> Option<CanonicalRecord>;
}

/// Normalizer that understands both the trending (movie/TV) and the awards
/// record shapes by checking which fields are present.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultNormalizer;

impl DefaultNormalizer {
    fn extract_release_year(data: &RawRecord) -> Option<i32> {
        match FieldUtils::first_string(data, DATE_KEYS) {
            Some(date) => FieldUtils::parse_year_str(&date),
            None => data.get("year").and_then(FieldUtils::parse_year),
        }
    }

    fn extract_rating(data: &RawRecord) -> Option<f64> {
        FieldUtils::number(data, "vote_average").or_else(|| FieldUtils::number(data, "imdb_rating"))
    }
}

impl Normalizer for DefaultNormalizer {
    fn normalize(&self, raw: &RawRecord) -> Option<CanonicalRecord> {
        // Records without any usable name are dropped rather than rendered blank
        let Some(display_name) = FieldUtils::first_string(raw, NAME_KEYS) else {
            debug!("Dropping record without title or name");
            return None;
        };

        Some(CanonicalRecord {
            display_name,
            release_year: Self::extract_release_year(raw),
            media_type: MediaType::from_source(raw.get("media_type").and_then(|v| v.as_str())),
            rating: Self::extract_rating(raw),
            vote_count: FieldUtils::integer(raw, "vote_count"),
            genres: FieldUtils::string_set(raw, GENRE_KEYS),
            countries: FieldUtils::string_set(raw, COUNTRY_KEYS),
            languages: FieldUtils::string_set(raw, LANGUAGE_KEYS),
            cast_names: FieldUtils::string_list(raw, "cast"),
            award_nominations: FieldUtils::integer(raw, "oscar_nominations").unwrap_or(0),
            award_wins: FieldUtils::integer(raw, "oscar_winning").unwrap_or(0),
        })
    }
}

/// Result of normalizing one page of raw records
#[derive(Debug, Clone, Default, Serialize)]
pub struct NormalizeOutcome {
    pub records: Vec<CanonicalRecord>,
    pub skipped: usize,
}

/// Normalize every record in order, counting the ones that had to be dropped
pub fn normalize_batch(normalizer: &dyn Normalizer, raw_records: &[RawRecord]) -> NormalizeOutcome {
    let mut outcome = NormalizeOutcome::default();
    for raw in raw_records {
        match normalizer.normalize(raw) {
            Some(record) => outcome.records.push(record),
            None => outcome.skipped += 1,
        }
    }
    outcome
}
