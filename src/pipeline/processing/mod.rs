// Pipeline processing: normalization, deduplication, filtering, sorting and aggregation

pub mod aggregate;
pub mod dedup;
pub mod filter;
pub mod normalize;
pub mod sort;

pub use aggregate::{RollupMode, SetField, YearlyRollup};
pub use filter::{FilterCriteria, FilterDimension, FilterOptions};
pub use normalize::{DefaultNormalizer, Normalizer};
pub use sort::{SortDirection, SortField, SortState};
