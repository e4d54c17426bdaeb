use metrics::histogram;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use crate::app::ports::HttpClientPort;
use crate::common::constants::API_LANGUAGE;
use crate::common::error::FetchError;
use crate::common::types::RawRecord;

/// Catalog API client: one GET per call, no retries
pub struct CatalogClient {
    http: Arc<dyn HttpClientPort>,
    base_url: String,
    api_key: String,
}

impl CatalogClient {
    pub fn new(http: Arc<dyn HttpClientPort>, base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Endpoint URL without credentials, safe to log and to put in errors
    pub fn endpoint_url(&self, endpoint: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            endpoint.trim_start_matches('/')
        )
    }

    /// Port errors are free text; never let the key through
    fn redact(&self, message: &str) -> String {
        if self.api_key.is_empty() {
            return message.to_string();
        }
        message.replace(&self.api_key, "***")
    }

    /// Full request URL with `api_key` and `language` query parameters
    pub fn request_url(&self, endpoint: &str) -> Result<String, FetchError> {
        let base = self.endpoint_url(endpoint);
        reqwest::Url::parse_with_params(&base, &[("api_key", self.api_key.as_str()), ("language", API_LANGUAGE)])
            .map(|url| url.to_string())
            .map_err(|e| FetchError::Network {
                url: base.clone(),
                message: format!("invalid URL: {e}"),
            })
    }

    /// Fetch one page and return its `results` array
    #[instrument(skip(self))]
    pub async fn fetch_results(&self, endpoint: &str) -> Result<Vec<RawRecord>, FetchError> {
        let url = self.endpoint_url(endpoint);
        let request_url = self.request_url(endpoint)?;
        let t_fetch = std::time::Instant::now();

        debug!("Requesting {}", url);
        let resp = self
            .http
            .get(&request_url)
            .await
            .map_err(|message| FetchError::Network {
                url: url.clone(),
                message: self.redact(&message),
            })?;

        if !resp.is_success() {
            warn!("{} responded with HTTP {}", url, resp.status);
            return Err(FetchError::Status { url, status: resp.status });
        }

        let results = parse_results(&url, &resp.bytes).map_err(|e| match e {
            FetchError::Body { url, .. } if !resp.is_json() => FetchError::ContentType {
                url,
                content_type: resp.content_type.clone(),
            },
            other => other,
        })?;
        histogram!("dashboard_fetch_duration_seconds").record(t_fetch.elapsed().as_secs_f64());

        info!(
            "Fetched {} records from {} in {:.2}s",
            results.len(),
            url,
            t_fetch.elapsed().as_secs_f32()
        );
        Ok(results)
    }
}

/// Extract the `results` array from a response body.
///
/// `results: null` is an empty page, not an error; a body without the field
/// at all (or with a non-array value) is.
pub fn parse_results(source: &str, bytes: &[u8]) -> Result<Vec<RawRecord>, FetchError> {
    let mut body: Value = serde_json::from_slice(bytes).map_err(|e| FetchError::Body {
        url: source.to_string(),
        source: e,
    })?;

    match body.get_mut("results").map(Value::take) {
        Some(Value::Array(items)) => Ok(items),
        Some(Value::Null) => Ok(Vec::new()),
        Some(_) | None => {
            warn!("{} returned a body without a `results` array", source);
            Err(FetchError::MissingResults { url: source.to_string() })
        }
    }
}
