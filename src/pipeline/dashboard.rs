use metrics::{counter, histogram};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::common::types::{CanonicalRecord, Distribution, RawRecord};
use crate::pipeline::processing::aggregate::{
    award_rollup, group_by_set, media_type_distribution, rating_rollup, AwardRollup, RatingRollup, SetField,
};
use crate::pipeline::processing::dedup::deduplicate;
use crate::pipeline::processing::filter::{FilterCriteria, FilterOptions};
use crate::pipeline::processing::normalize::{normalize_batch, Normalizer, NormalizeOutcome};
use crate::pipeline::processing::sort::{sort_records, top_n, SortState};

/// Everything a renderer needs for one view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardView {
    pub view: String,
    pub total_records: usize,
    pub skipped_records: usize,
    pub matching_records: usize,
    pub filters: FilterCriteria,
    pub filter_options: FilterOptions,
    pub sort: SortState,
    pub top_records: Vec<CanonicalRecord>,
    pub media_types: Distribution,
    pub languages: Distribution,
    pub countries: Distribution,
    pub genres: Distribution,
    pub awards_by_year: AwardRollup,
    pub rating_by_year: RatingRollup,
}

pub struct Pipeline;

impl Pipeline {
    /// Normalize one fetched page
    #[instrument(skip(normalizer, raw_records), fields(records = raw_records.len()))]
    pub fn normalize(view: &str, normalizer: &dyn Normalizer, raw_records: &[RawRecord]) -> NormalizeOutcome {
        let outcome = normalize_batch(normalizer, raw_records);

        counter!("dashboard_records_normalized_total", "view" => view.to_string())
            .increment(outcome.records.len() as u64);
        counter!("dashboard_records_skipped_total", "view" => view.to_string()).increment(outcome.skipped as u64);
        info!(
            "Normalized {} records ({} skipped)",
            outcome.records.len(),
            outcome.skipped
        );
        outcome
    }

    /// Derive the view from the current record set, criteria and sort state.
    ///
    /// Dropdown options and yearly rollups describe the whole set; the ranked
    /// table and the distributions only cover records passing the filters.
    #[instrument(skip_all, fields(view = %view))]
    pub fn derive(
        view: &str,
        records: &[CanonicalRecord],
        skipped_records: usize,
        criteria: &FilterCriteria,
        sort: SortState,
    ) -> DashboardView {
        let t_derive = std::time::Instant::now();

        let filtered = criteria.apply(records);
        debug!("{} of {} records pass the filters", filtered.len(), records.len());

        let ranked = top_n(sort_records(&deduplicate(&filtered), sort));

        let view_out = DashboardView {
            view: view.to_string(),
            total_records: records.len() + skipped_records,
            skipped_records,
            matching_records: filtered.len(),
            filters: criteria.clone(),
            filter_options: FilterOptions::from_records(records),
            sort,
            top_records: ranked,
            media_types: media_type_distribution(&filtered),
            languages: group_by_set(&filtered, SetField::Languages),
            countries: group_by_set(&filtered, SetField::Countries),
            genres: group_by_set(&filtered, SetField::Genres),
            awards_by_year: award_rollup(records),
            rating_by_year: rating_rollup(records),
        };

        histogram!("dashboard_derive_duration_seconds", "view" => view.to_string())
            .record(t_derive.elapsed().as_secs_f64());
        view_out
    }

    /// Fetch-free path: raw page in, view out
    pub fn run(
        view: &str,
        normalizer: &dyn Normalizer,
        raw_records: &[RawRecord],
        criteria: &FilterCriteria,
        sort: SortState,
    ) -> DashboardView {
        let outcome = Self::normalize(view, normalizer, raw_records);
        Self::derive(view, &outcome.records, outcome.skipped, criteria, sort)
    }
}
