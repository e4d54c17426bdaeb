// Common utilities and shared types used across the application

pub mod constants;
pub mod error;
pub mod types;

pub use error::{DashboardError, FetchError, Result};
pub use types::{CanonicalRecord, Distribution, IdentityKey, MediaType, RawRecord};
