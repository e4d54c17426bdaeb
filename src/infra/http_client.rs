use crate::app::ports::{HttpClientPort, HttpGetResult};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use std::time::Duration;

pub struct ReqwestHttp {
    client: reqwest::Client,
}

impl ReqwestHttp {
    pub fn new(timeout_seconds: u64) -> Self {
        // Builder only fails on TLS backend init; fall back to the default client
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self { client }
    }
}

impl Default for ReqwestHttp {
    fn default() -> Self {
        Self::new(crate::common::constants::DEFAULT_TIMEOUT_SECONDS)
    }
}

#[async_trait]
impl HttpClientPort for ReqwestHttp {
    async fn get(&self, url: &str) -> Result<HttpGetResult, String> {
        // reqwest errors print the request URL, query string and api key included
        let resp = self.client.get(url).send().await.map_err(|e| e.without_url().to_string())?;
        let status = resp.status().as_u16();
        let content_type = resp
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = resp
            .bytes()
            .await
            .map_err(|e| e.without_url().to_string())?
            .to_vec();
        Ok(HttpGetResult { status, bytes, content_type })
    }
}
