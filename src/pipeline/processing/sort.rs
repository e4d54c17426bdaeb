use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::common::constants::TOP_N;
use crate::common::error::DashboardError;
use crate::common::types::CanonicalRecord;

/// Sortable table columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    DisplayName,
    ReleaseYear,
    MediaType,
    Rating,
    VoteCount,
    AwardNominations,
    AwardWins,
}

impl SortField {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::DisplayName => "display_name",
            SortField::ReleaseYear => "release_year",
            SortField::MediaType => "media_type",
            SortField::Rating => "rating",
            SortField::VoteCount => "vote_count",
            SortField::AwardNominations => "award_nominations",
            SortField::AwardWins => "award_wins",
        }
    }

    fn value(&self, record: &CanonicalRecord) -> SortValue {
        match self {
            SortField::DisplayName => SortValue::Text(record.display_name.clone()),
            SortField::ReleaseYear => record.release_year.map(f64::from).into(),
            SortField::MediaType => SortValue::Text(record.media_type.as_str().to_string()),
            SortField::Rating => record.rating.into(),
            SortField::VoteCount => record.vote_count.map(|v| v as f64).into(),
            SortField::AwardNominations => SortValue::Number(record.award_nominations as f64),
            SortField::AwardWins => SortValue::Number(record.award_wins as f64),
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortField {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "display_name" | "title" | "name" => Ok(SortField::DisplayName),
            "release_year" | "year" => Ok(SortField::ReleaseYear),
            "media_type" => Ok(SortField::MediaType),
            "rating" => Ok(SortField::Rating),
            "vote_count" | "votes" => Ok(SortField::VoteCount),
            "award_nominations" | "nominations" => Ok(SortField::AwardNominations),
            "award_wins" | "wins" => Ok(SortField::AwardWins),
            other => Err(DashboardError::InvalidFilter {
                dimension: "sort".to_string(),
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

/// Current column and direction of the ranked table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortState {
    pub field: SortField,
    pub direction: SortDirection,
}

impl Default for SortState {
    fn default() -> Self {
        Self {
            field: SortField::Rating,
            direction: SortDirection::Desc,
        }
    }
}

impl SortState {
    /// Column click: the same column flips direction, a new column starts descending
    pub fn toggle(&mut self, field: SortField) {
        if field == self.field {
            self.direction = self.direction.flipped();
        } else {
            self.field = field;
            self.direction = SortDirection::Desc;
        }
    }
}

/// Comparable projection of a field value
#[derive(Debug, Clone, PartialEq)]
enum SortValue {
    Number(f64),
    Text(String),
    Null,
}

impl From<Option<f64>> for SortValue {
    fn from(value: Option<f64>) -> Self {
        value.map_or(SortValue::Null, SortValue::Number)
    }
}

/// Base letters only: decomposed, combining marks dropped, lowercased
fn primary_key(s: &str) -> impl Iterator<Item = char> + '_ {
    s.nfd().filter(|c| !is_combining_mark(*c)).flat_map(char::to_lowercase)
}

/// Collation close to a default locale. Compares base letters first, so
/// "Élite" sorts with the E's, then accents, then lowercase before uppercase.
pub fn locale_compare(a: &str, b: &str) -> Ordering {
    primary_key(a)
        .cmp(primary_key(b))
        .then_with(|| {
            a.nfd()
                .flat_map(char::to_lowercase)
                .cmp(b.nfd().flat_map(char::to_lowercase))
        })
        .then_with(|| {
            a.chars()
                .zip(b.chars())
                .find(|(x, y)| x != y)
                .map_or(Ordering::Equal, |(x, y)| match (x.is_lowercase(), y.is_lowercase()) {
                    (true, false) => Ordering::Less,
                    (false, true) => Ordering::Greater,
                    _ => x.cmp(&y),
                })
        })
}

fn compare(a: &SortValue, b: &SortValue, direction: SortDirection) -> Ordering {
    let ordering = match (a, b) {
        // Nulls sink to the bottom in both directions
        (SortValue::Null, SortValue::Null) => return Ordering::Equal,
        (SortValue::Null, _) => return Ordering::Greater,
        (_, SortValue::Null) => return Ordering::Less,
        (SortValue::Number(x), SortValue::Number(y)) => x.partial_cmp(y).unwrap_or(Ordering::Equal),
        (SortValue::Text(x), SortValue::Text(y)) => locale_compare(x, y),
        _ => Ordering::Equal,
    };
    match direction {
        SortDirection::Asc => ordering,
        SortDirection::Desc => ordering.reverse(),
    }
}

/// Stable sort by the given state; ties keep their input order
pub fn sort_records(records: &[CanonicalRecord], state: SortState) -> Vec<CanonicalRecord> {
    let mut keyed: Vec<(SortValue, &CanonicalRecord)> =
        records.iter().map(|r| (state.field.value(r), r)).collect();
    keyed.sort_by(|(a, _), (b, _)| compare(a, b, state.direction));
    keyed.into_iter().map(|(_, r)| r.clone()).collect()
}

/// Keep the first `TOP_N` rows
pub fn top_n(mut records: Vec<CanonicalRecord>) -> Vec<CanonicalRecord> {
    records.truncate(TOP_N);
    records
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rated(name: &str, rating: Option<f64>) -> CanonicalRecord {
        CanonicalRecord {
            display_name: name.to_string(),
            rating,
            ..Default::default()
        }
    }

    fn ratings(records: &[CanonicalRecord]) -> Vec<Option<f64>> {
        records.iter().map(|r| r.rating).collect()
    }

    #[test]
    fn test_nulls_sort_last_in_both_directions() {
        let input = vec![rated("a", None), rated("b", Some(3.0)), rated("c", None), rated("d", Some(5.0))];

        let desc = SortState { field: SortField::Rating, direction: SortDirection::Desc };
        assert_eq!(ratings(&sort_records(&input, desc)), vec![Some(5.0), Some(3.0), None, None]);

        let asc = SortState { field: SortField::Rating, direction: SortDirection::Asc };
        assert_eq!(ratings(&sort_records(&input, asc)), vec![Some(3.0), Some(5.0), None, None]);
    }

    #[test]
    fn test_sort_is_stable_for_ties_and_nulls() {
        let input = vec![rated("first", None), rated("x", Some(1.0)), rated("second", None), rated("y", Some(1.0))];
        let sorted = sort_records(&input, SortState::default());
        let names: Vec<&str> = sorted.iter().map(|r| r.display_name.as_str()).collect();
        assert_eq!(names, vec!["x", "y", "first", "second"]);
    }

    #[test]
    fn test_text_sort_is_case_insensitive() {
        let input = vec![rated("banana", None), rated("Apple", None), rated("cherry", None)];
        let state = SortState { field: SortField::DisplayName, direction: SortDirection::Asc };
        let names: Vec<String> = sort_records(&input, state).into_iter().map(|r| r.display_name).collect();
        assert_eq!(names, vec!["Apple", "banana", "cherry"]);

        let state = SortState { field: SortField::DisplayName, direction: SortDirection::Desc };
        let names: Vec<String> = sort_records(&input, state).into_iter().map(|r| r.display_name).collect();
        assert_eq!(names, vec!["cherry", "banana", "Apple"]);
    }

    #[test]
    fn test_locale_compare_ties() {
        assert_eq!(locale_compare("a", "A"), Ordering::Less);
        assert_eq!(locale_compare("abc", "ABD"), Ordering::Less);
        assert_eq!(locale_compare("same", "same"), Ordering::Equal);
    }

    #[test]
    fn test_accented_titles_sort_with_base_letter() {
        let input = vec![rated("Zodiac", None), rated("Amélie", None), rated("Élite", None), rated("Fargo", None)];
        let state = SortState { field: SortField::DisplayName, direction: SortDirection::Asc };
        let names: Vec<String> = sort_records(&input, state).into_iter().map(|r| r.display_name).collect();
        assert_eq!(names, vec!["Amélie", "Élite", "Fargo", "Zodiac"]);

        assert_eq!(locale_compare("elite", "élite"), Ordering::Less);
        assert_eq!(locale_compare("Ñu", "Nz"), Ordering::Less);
    }

    #[test]
    fn test_mixed_values_compare_equal() {
        let a = SortValue::Text("x".into());
        let b = SortValue::Number(1.0);
        assert_eq!(compare(&a, &b, SortDirection::Asc), Ordering::Equal);
        assert_eq!(compare(&a, &b, SortDirection::Desc), Ordering::Equal);
    }

    #[test]
    fn test_truncates_to_five() {
        let input: Vec<CanonicalRecord> = (0..20).map(|i| rated(&format!("r{i}"), Some(i as f64))).collect();
        let top = top_n(sort_records(&input, SortState::default()));
        assert_eq!(top.len(), 5);
        assert_eq!(top[0].rating, Some(19.0));
        assert_eq!(top_n(input[..3].to_vec()).len(), 3);
    }

    #[test]
    fn test_toggle_flips_or_resets() {
        let mut state = SortState::default();
        state.toggle(SortField::Rating);
        assert_eq!(state.direction, SortDirection::Asc);

        state.toggle(SortField::ReleaseYear);
        assert_eq!(state, SortState { field: SortField::ReleaseYear, direction: SortDirection::Desc });

        state.toggle(SortField::ReleaseYear);
        assert_eq!(state.direction, SortDirection::Asc);
    }
}
