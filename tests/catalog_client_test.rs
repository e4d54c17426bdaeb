#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::{Arc, Mutex};
    use tmdb_dashboard::apis::CatalogClient;
    use tmdb_dashboard::app::ports::{HttpClientPort, HttpGetResult};
    use tmdb_dashboard::app::{DashboardUseCase, ViewState};
    use tmdb_dashboard::common::error::FetchError;
    use tmdb_dashboard::infra::ReqwestHttp;

    struct MockHttp {
        status: u16,
        body: String,
        content_type: String,
        requested: Arc<Mutex<Vec<String>>>,
    }

    impl MockHttp {
        fn new(status: u16, body: &str) -> Self {
            Self {
                status,
                body: body.to_string(),
                content_type: "application/json;charset=utf-8".to_string(),
                requested: Arc::new(Mutex::new(Vec::new())),
            }
        }

        fn with_content_type(mut self, content_type: &str) -> Self {
            self.content_type = content_type.to_string();
            self
        }
    }

    #[async_trait]
    impl HttpClientPort for MockHttp {
        async fn get(&self, url: &str) -> Result<HttpGetResult, String> {
            self.requested.lock().unwrap().push(url.to_string());
            Ok(HttpGetResult {
                status: self.status,
                bytes: self.body.as_bytes().to_vec(),
                content_type: self.content_type.clone(),
            })
        }
    }

    #[tokio::test]
    async fn test_fetch_sends_key_and_language() {
        let http = MockHttp::new(200, &json!({ "page": 1, "results": [{ "title": "Alien" }] }).to_string());
        let requested = http.requested.clone();
        let client = CatalogClient::new(Arc::new(http), "https://api.themoviedb.org/3", "abc123");

        let results = client.fetch_results("movie/top_rated").await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0]["title"], "Alien");

        let urls = requested.lock().unwrap();
        assert_eq!(
            urls.as_slice(),
            ["https://api.themoviedb.org/3/movie/top_rated?api_key=abc123&language=en-US".to_string()]
        );
    }

    #[tokio::test]
    async fn test_non_success_status_is_fetch_error() {
        for status in [401u16, 404, 500] {
            let client = CatalogClient::new(Arc::new(MockHttp::new(status, "{}")), "https://api.example", "k");
            match client.fetch_results("trending/all/week").await {
                Err(FetchError::Status { status: got, url }) => {
                    assert_eq!(got, status);
                    assert!(!url.contains("api_key"));
                }
                other => panic!("expected status error, got {other:?}"),
            }
        }
    }

    #[tokio::test]
    async fn test_missing_results_and_null_results() {
        let missing = CatalogClient::new(
            Arc::new(MockHttp::new(200, r#"{"status_code": 7}"#)),
            "https://api.example",
            "k",
        );
        assert!(matches!(
            missing.fetch_results("trending/all/week").await,
            Err(FetchError::MissingResults { .. })
        ));

        let null = CatalogClient::new(Arc::new(MockHttp::new(200, r#"{"results": null}"#)), "https://api.example", "k");
        assert!(null.fetch_results("trending/all/week").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_empty_page_renders_empty_view() {
        let client = CatalogClient::new(Arc::new(MockHttp::new(200, r#"{"results": []}"#)), "https://api.example", "k");
        let mut use_case = DashboardUseCase::new("top_rated", "movie/top_rated");
        use_case.refresh(&client).await;

        assert_eq!(use_case.state(), &ViewState::Ready);
        let view = use_case.current_view().unwrap();
        assert!(view.top_records.is_empty());
        assert!(view.genres.is_empty());
        assert!(view.awards_by_year.labels.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_body_fails_view() {
        let client = CatalogClient::new(
            Arc::new(MockHttp::new(200, "<html>maintenance</html>")),
            "https://api.example",
            "k",
        );
        let mut use_case = DashboardUseCase::new("trending", "trending/all/week");
        use_case.refresh(&client).await;

        assert!(matches!(use_case.state(), ViewState::Failed(_)));
        assert!(use_case.current_view().is_none());
    }

    #[tokio::test]
    async fn test_connection_refused_does_not_leak_key() {
        let client = CatalogClient::new(Arc::new(ReqwestHttp::new(2)), "http://127.0.0.1:1", "SECRETKEY123");
        let err = client.fetch_results("trending/all/week").await.unwrap_err();
        assert!(matches!(err, FetchError::Network { .. }));
        assert!(!err.to_string().contains("SECRETKEY123"));

        let mut use_case = DashboardUseCase::new("trending", "trending/all/week");
        use_case.refresh(&client).await;
        match use_case.state() {
            ViewState::Failed(message) => assert!(!message.contains("SECRETKEY123")),
            other => panic!("expected failed view, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_html_body_reports_content_type() {
        let http = MockHttp::new(200, "<html>maintenance</html>").with_content_type("text/html; charset=utf-8");
        let client = CatalogClient::new(Arc::new(http), "https://api.example", "k");
        match client.fetch_results("trending/all/week").await {
            Err(FetchError::ContentType { content_type, .. }) => assert_eq!(content_type, "text/html; charset=utf-8"),
            other => panic!("expected content type error, got {other:?}"),
        }
    }
}
