// Upstream catalog API clients

pub mod catalog_client;

pub use catalog_client::{parse_results, CatalogClient};
