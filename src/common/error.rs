use thiserror::Error;

/// Failure to obtain a result page from the catalog API.
///
/// This is the only error kind that reaches the user; everything that goes
/// wrong while shaping records degrades to defaults instead.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("request to {url} failed: {message}")]
    Network { url: String, message: String },

    #[error("{url} responded with HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("response body from {url} is not valid JSON: {source}")]
    Body {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("{url} returned {content_type} instead of JSON")]
    ContentType { url: String, content_type: String },

    #[error("response body from {url} has no `results` field")]
    MissingResults { url: String },
}

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("Fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("JSON deserialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid value {value:?} for filter `{dimension}`")]
    InvalidFilter { dimension: String, value: String },

    #[error("Unknown filter `{0}`")]
    UnknownFilter(String),

    #[error("Environment variable error: {0}")]
    Env(#[from] std::env::VarError),
}

pub type Result<T> = std::result::Result<T, DashboardError>;
