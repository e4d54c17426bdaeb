use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::common::types::{CanonicalRecord, Distribution};

/// Multi-valued record fields that can be fanned out into a distribution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SetField {
    Genres,
    Countries,
    Languages,
}

impl SetField {
    pub fn values<'a>(&self, record: &'a CanonicalRecord) -> &'a [String] {
        match self {
            SetField::Genres => &record.genres,
            SetField::Countries => &record.countries,
            SetField::Languages => &record.languages,
        }
    }
}

/// Insertion-ordered counter backing every distribution
#[derive(Default)]
struct OrderedCounter {
    index: HashMap<String, usize>,
    dist: Distribution,
}

impl OrderedCounter {
    fn bump(&mut self, label: &str) {
        match self.index.get(label) {
            Some(&idx) => self.dist.data[idx] += 1,
            None => {
                self.index.insert(label.to_string(), self.dist.labels.len());
                self.dist.labels.push(label.to_string());
                self.dist.data.push(1);
            }
        }
    }

    fn finish(self) -> Distribution {
        self.dist
    }
}

/// Count records per value of a single-valued field
pub fn group_by<F>(records: &[CanonicalRecord], key: F) -> Distribution
where
    F: Fn(&CanonicalRecord) -> Option<String>,
{
    let mut counter = OrderedCounter::default();
    for record in records {
        if let Some(label) = key(record) {
            counter.bump(&label);
        }
    }
    counter.finish()
}

/// Fan-out count: a record contributes once to every value in its set, so the
/// counts can sum to more than the number of records.
pub fn group_by_set(records: &[CanonicalRecord], field: SetField) -> Distribution {
    let mut counter = OrderedCounter::default();
    for record in records {
        for value in field.values(record) {
            counter.bump(value);
        }
    }
    counter.finish()
}

pub fn media_type_distribution(records: &[CanonicalRecord]) -> Distribution {
    group_by(records, |r| Some(r.media_type.as_str().to_string()))
}

/// How a yearly rollup combines the records of one year
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RollupMode {
    /// Sum award nominations and wins
    Sum,
    /// Average rating
    Average,
}

/// Award totals per release year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct AwardRollup {
    pub labels: Vec<String>,
    pub nominations: Vec<i64>,
    pub wins: Vec<i64>,
}

/// Mean rating per release year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct RatingRollup {
    pub labels: Vec<String>,
    /// Unrounded means
    pub averages: Vec<f64>,
    /// Means rounded to two decimals, e.g. "7.50"
    pub display: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum YearlyRollup {
    Sum(AwardRollup),
    Average(RatingRollup),
}

/// Per-year rollup with labels in ascending numeric order.
/// Records without a release year are left out entirely.
pub fn yearly_rollup(records: &[CanonicalRecord], mode: RollupMode) -> YearlyRollup {
    match mode {
        RollupMode::Sum => YearlyRollup::Sum(award_rollup(records)),
        RollupMode::Average => YearlyRollup::Average(rating_rollup(records)),
    }
}

pub fn award_rollup(records: &[CanonicalRecord]) -> AwardRollup {
    let mut by_year: BTreeMap<i32, (i64, i64)> = BTreeMap::new();
    for record in records {
        let Some(year) = record.release_year else { continue };
        let entry = by_year.entry(year).or_default();
        // Source counts are untrusted and can be huge; clamp instead of overflowing
        entry.0 = entry.0.saturating_add(record.award_nominations);
        entry.1 = entry.1.saturating_add(record.award_wins);
    }

    let mut rollup = AwardRollup::default();
    for (year, (nominations, wins)) in by_year {
        rollup.labels.push(year.to_string());
        rollup.nominations.push(nominations);
        rollup.wins.push(wins);
    }
    rollup
}

/// Unrated records do not count toward a year's mean; a year with no rated
/// records produces no label.
pub fn rating_rollup(records: &[CanonicalRecord]) -> RatingRollup {
    let mut by_year: BTreeMap<i32, (f64, u32)> = BTreeMap::new();
    for record in records {
        let (Some(year), Some(rating)) = (record.release_year, record.rating) else { continue };
        let entry = by_year.entry(year).or_default();
        entry.0 += rating;
        entry.1 += 1;
    }

    let mut rollup = RatingRollup::default();
    for (year, (sum, count)) in by_year {
        let avg = sum / f64::from(count);
        rollup.labels.push(year.to_string());
        rollup.averages.push(avg);
        rollup.display.push(format!("{avg:.2}"));
    }
    rollup
}
