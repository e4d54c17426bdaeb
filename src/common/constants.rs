/// Catalog and view constants shared across the application

// Upstream catalog
pub const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3";
pub const API_LANGUAGE: &str = "en-US";
pub const API_KEY_ENV: &str = "TMDB_API_KEY";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 10;

// Built-in views (used when no config file is present)
pub const TRENDING_VIEW: &str = "trending";
pub const TRENDING_ENDPOINT: &str = "trending/all/week";
pub const TOP_RATED_VIEW: &str = "top_rated";
pub const TOP_RATED_ENDPOINT: &str = "movie/top_rated";

/// Rows kept in the ranked table after sorting
pub const TOP_N: usize = 5;

pub const DEFAULT_CONFIG_PATH: &str = "config.toml";
pub const DEFAULT_OUTPUT_DIR: &str = "output";

/// Get the built-in (view name, endpoint) pairs
pub fn default_views() -> Vec<(&'static str, &'static str)> {
    vec![
        (TRENDING_VIEW, TRENDING_ENDPOINT),
        (TOP_RATED_VIEW, TOP_RATED_ENDPOINT),
    ]
}
