use tracing::{error, info};

use crate::apis::CatalogClient;
use crate::common::error::{FetchError, Result};
use crate::common::types::{CanonicalRecord, RawRecord};
use crate::pipeline::dashboard::{DashboardView, Pipeline};
use crate::pipeline::processing::filter::{FilterCriteria, FilterDimension};
use crate::pipeline::processing::normalize::{DefaultNormalizer, Normalizer};
use crate::pipeline::processing::sort::{SortField, SortState};

/// Load state of a view
#[derive(Debug, Clone, PartialEq)]
pub enum ViewState {
    Loading,
    Ready,
    Failed(String),
}

/// Use case for one dashboard view.
///
/// Owns the current canonical record set, the filter criteria and the sort
/// state; every change recomputes the view from scratch.
pub struct DashboardUseCase {
    view: String,
    endpoint: String,
    normalizer: Box<dyn Normalizer + Send + Sync>,
    state: ViewState,
    records: Vec<CanonicalRecord>,
    skipped: usize,
    criteria: FilterCriteria,
    sort: SortState,
}

impl DashboardUseCase {
    pub fn new(view: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self::with_normalizer(view, endpoint, Box::new(DefaultNormalizer))
    }

    pub fn with_normalizer(
        view: impl Into<String>,
        endpoint: impl Into<String>,
        normalizer: Box<dyn Normalizer + Send + Sync>,
    ) -> Self {
        Self {
            view: view.into(),
            endpoint: endpoint.into(),
            normalizer,
            state: ViewState::Loading,
            records: Vec::new(),
            skipped: 0,
            criteria: FilterCriteria::default(),
            sort: SortState::default(),
        }
    }

    pub fn view_name(&self) -> &str {
        &self.view
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn records(&self) -> &[CanonicalRecord] {
        &self.records
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn sort(&self) -> SortState {
        self.sort
    }

    /// Point the view at another endpoint; the caller refreshes afterwards
    pub fn set_endpoint(&mut self, endpoint: impl Into<String>) {
        self.endpoint = endpoint.into();
        self.state = ViewState::Loading;
    }

    /// Fetch the current endpoint once and apply the result
    pub async fn refresh(&mut self, client: &CatalogClient) {
        self.state = ViewState::Loading;
        let result = client.fetch_results(&self.endpoint).await;
        self.apply_fetch(result);
    }

    /// Apply a completed fetch. Results overwrite whatever is there, so when
    /// two fetches overlap the one applied last wins.
    pub fn apply_fetch(&mut self, result: std::result::Result<Vec<RawRecord>, FetchError>) {
        match result {
            Ok(raw_records) => {
                let outcome = Pipeline::normalize(&self.view, self.normalizer.as_ref(), &raw_records);
                self.records = outcome.records;
                self.skipped = outcome.skipped;
                self.state = ViewState::Ready;
                info!("View {} ready with {} records", self.view, self.records.len());
            }
            Err(e) => {
                error!("View {} failed to load: {}", self.view, e);
                self.state = ViewState::Failed(e.to_string());
            }
        }
    }

    pub fn set_filter(&mut self, dimension: FilterDimension, value: &str) -> Result<()> {
        self.criteria.set(dimension, value)
    }

    pub fn set_criteria(&mut self, criteria: FilterCriteria) {
        self.criteria = criteria;
    }

    pub fn clear_filters(&mut self) {
        self.criteria.clear();
    }

    pub fn set_sort(&mut self, sort: SortState) {
        self.sort = sort;
    }

    pub fn toggle_sort(&mut self, field: SortField) {
        self.sort.toggle(field);
    }

    /// Derived view; `None` while loading or after a failed fetch
    pub fn current_view(&self) -> Option<DashboardView> {
        match self.state {
            ViewState::Ready => Some(Pipeline::derive(
                &self.view,
                &self.records,
                self.skipped,
                &self.criteria,
                self.sort,
            )),
            ViewState::Loading | ViewState::Failed(_) => None,
        }
    }
}
