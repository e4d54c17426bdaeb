// Data-shaping pipeline: processing stages and the view derivation that chains them

pub mod dashboard;
pub mod processing;

pub use dashboard::{DashboardView, Pipeline};
