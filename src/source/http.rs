//! Client for a remote aggregation endpoint.

use std::time::Duration;

use async_trait::async_trait;
use latencyscope_types::LatencyReport;
use reqwest::header::{HeaderMap, HeaderValue, CACHE_CONTROL};
use reqwest::Client;

use super::{FeedError, ReportFetcher};

/// Fetches `{fetchedAt, measurements}` from an aggregation endpoint.
#[derive(Debug, Clone)]
pub struct AggregatorClient {
    client: Client,
    endpoint: String,
}

impl AggregatorClient {
    /// `timeout` bounds the whole request, including the probe cycle the
    /// endpoint runs before it answers.
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, FeedError> {
        let mut headers = HeaderMap::new();
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-store"));

        let client = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| FeedError::Client(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }
}

#[async_trait]
impl ReportFetcher for AggregatorClient {
    async fn fetch(&self) -> Result<LatencyReport, FeedError> {
        let response = self.client.get(&self.endpoint).send().await?;

        if !response.status().is_success() {
            return Err(FeedError::Status(response.status().as_u16()));
        }

        let body = response.bytes().await?;
        let report: LatencyReport = serde_json::from_slice(&body)?;
        Ok(report)
    }

    fn describe(&self) -> String {
        self.endpoint.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{refused_addr, StubResponse, StubServer};
    use latencyscope_types::CloudProvider;

    const PAYLOAD: &str = r#"{
        "fetchedAt": 1700000000000,
        "measurements": [
            {"id": "binance-tokyo", "name": "Binance", "provider": "AWS",
             "latencyMs": 42, "success": true, "status": 200},
            {"id": "okx-singapore", "name": "OKX", "provider": "GCP",
             "latencyMs": 8000, "success": false, "status": 0,
             "error": "request timed out after 8000ms"}
        ]
    }"#;

    fn client(url: String) -> AggregatorClient {
        AggregatorClient::new(url, Duration::from_secs(2)).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_parses_payload() {
        let server = StubServer::start(StubResponse::ok(PAYLOAD)).await;
        let report = client(server.url("/api/latency")).fetch().await.unwrap();

        assert_eq!(report.fetched_at, 1_700_000_000_000);
        assert_eq!(report.len(), 2);
        let okx = report.get("okx-singapore").unwrap();
        assert_eq!(okx.provider, CloudProvider::Gcp);
        assert!(!okx.success);
        assert_eq!(okx.error.as_deref(), Some("request timed out after 8000ms"));
    }

    #[tokio::test]
    async fn test_non_2xx_is_a_feed_error() {
        let server = StubServer::start(StubResponse::status(500)).await;
        let err = client(server.url("/api/latency")).fetch().await.unwrap_err();
        assert!(matches!(err, FeedError::Status(500)));
    }

    #[tokio::test]
    async fn test_invalid_json_is_a_feed_error() {
        let server = StubServer::start(StubResponse::ok("<html>")).await;
        let err = client(server.url("/api/latency")).fetch().await.unwrap_err();
        assert!(matches!(err, FeedError::Parse(_)));
    }

    #[tokio::test]
    async fn test_unreachable_is_a_feed_error() {
        let addr = refused_addr().await;
        let err = client(format!("http://{}/api/latency", addr))
            .fetch()
            .await
            .unwrap_err();
        assert!(matches!(err, FeedError::Connection(_) | FeedError::Http(_)));
    }

    #[tokio::test]
    async fn test_timeout_is_a_feed_error() {
        let server = StubServer::silent().await;
        let client = AggregatorClient::new(server.url("/"), Duration::from_millis(100)).unwrap();
        let err = client.fetch().await.unwrap_err();
        assert!(matches!(err, FeedError::Timeout));
    }
}
