//! Endpoint prober.
//!
//! Issues one bounded request per [`Target`] and turns the outcome into a
//! [`Measurement`]. Transport failures never escape this module: a timeout,
//! DNS failure or refused connection becomes a failed measurement carrying the
//! timeout bound as its latency.

use std::time::{Duration, Instant};

use chrono::Utc;
use futures::future::join_all;
use latencyscope_types::{HttpMethod, LatencyReport, Measurement, Target};
use reqwest::header::{HeaderMap, HeaderValue, CACHE_CONTROL};
use reqwest::{Client, Method, StatusCode};
use tracing::{debug, info};

/// Hard per-request deadline.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(8000);

pub const DEFAULT_USER_AGENT: &str = "LatencyVisualizer/1.0";

/// Probes targets concurrently with a shared HTTP client.
#[derive(Debug, Clone)]
pub struct Prober {
    client: Client,
    timeout: Duration,
}

impl Prober {
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self, reqwest::Error> {
        let mut headers = HeaderMap::new();
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));

        let client = Client::builder()
            .user_agent(user_agent)
            .default_headers(headers)
            .build()?;

        Ok(Self { client, timeout })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn timeout_ms(&self) -> u64 {
        self.timeout.as_millis() as u64
    }

    /// Probe one target. Always resolves by the deadline.
    pub async fn measure(&self, target: &Target) -> Measurement {
        let start = Instant::now();

        match tokio::time::timeout(self.timeout, self.request(target)).await {
            Ok(Ok(status)) => {
                let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;
                let latency_ms = elapsed_ms.round().max(1.0) as u64;
                debug!(
                    target_id = %target.id,
                    latency_ms,
                    status = status.as_u16(),
                    "Probe completed"
                );
                Measurement {
                    id: target.id.clone(),
                    name: target.name.clone(),
                    provider: target.provider,
                    latency_ms,
                    success: status.is_success(),
                    status: status.as_u16(),
                    error: None,
                }
            }
            Ok(Err(e)) => {
                debug!(target_id = %target.id, error = %e, "Probe failed");
                Measurement::failure(
                    &target.id,
                    &target.name,
                    target.provider,
                    self.timeout_ms(),
                    e.to_string(),
                )
            }
            Err(_) => {
                debug!(target_id = %target.id, "Probe timed out");
                Measurement::failure(
                    &target.id,
                    &target.name,
                    target.provider,
                    self.timeout_ms(),
                    format!("request timed out after {}ms", self.timeout_ms()),
                )
            }
        }
    }

    /// Send the request and drain the body so transfer time is included.
    async fn request(&self, target: &Target) -> Result<StatusCode, reqwest::Error> {
        let method = match target.method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
        };
        let response = self.client.request(method, &target.url).send().await?;
        let status = response.status();
        response.bytes().await?;
        Ok(status)
    }

    /// Probe every target concurrently and wait for all of them.
    ///
    /// Measurements keep target order. `fetched_at` is stamped after the last
    /// target resolved.
    ///
    /// ```no_run
    /// use latencyscope::catalog::default_targets;
    /// use latencyscope::probe::{Prober, DEFAULT_TIMEOUT, DEFAULT_USER_AGENT};
    ///
    /// # tokio_test::block_on(async {
    /// let prober = Prober::new(DEFAULT_TIMEOUT, DEFAULT_USER_AGENT).unwrap();
    /// let report = prober.probe_all(&default_targets()).await;
    /// println!("{} measurements", report.len());
    /// # });
    /// ```
    pub async fn probe_all(&self, targets: &[Target]) -> LatencyReport {
        let measurements = join_all(targets.iter().map(|t| self.measure(t))).await;
        let fetched_at = Utc::now().timestamp_millis().max(0) as u64;

        let succeeded = measurements.iter().filter(|m| m.success).count();
        info!(
            targets = measurements.len(),
            succeeded,
            "Probe cycle complete"
        );

        LatencyReport::new(fetched_at, measurements)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{refused_addr, StubResponse, StubServer};
    use latencyscope_types::CloudProvider;

    fn prober(timeout_ms: u64) -> Prober {
        Prober::new(Duration::from_millis(timeout_ms), DEFAULT_USER_AGENT).unwrap()
    }

    fn target(id: &str, url: String) -> Target {
        Target::new(id, id.to_uppercase(), CloudProvider::Aws, url)
    }

    #[tokio::test]
    async fn test_measure_success() {
        let server = StubServer::start(StubResponse::ok(r#"{"serverTime":1}"#)).await;
        let m = prober(2000).measure(&target("a", server.url("/ping"))).await;

        assert!(m.success);
        assert_eq!(m.status, 200);
        assert!(m.latency_ms >= 1);
        assert!(m.error.is_none());
        assert_eq!(m.id, "a");
        assert_eq!(m.name, "A");
    }

    #[tokio::test]
    async fn test_measure_sends_headers() {
        let server = StubServer::start(StubResponse::ok("{}")).await;
        prober(2000).measure(&target("a", server.url("/ping"))).await;

        let requests = server.requests();
        assert_eq!(requests.len(), 1);
        let head = requests[0].to_ascii_lowercase();
        assert!(head.starts_with("get /ping"));
        assert!(head.contains("user-agent: latencyvisualizer/1.0"));
        assert!(head.contains("cache-control: no-cache"));
    }

    #[tokio::test]
    async fn test_measure_post_method() {
        let server = StubServer::start(StubResponse::ok("{}")).await;
        let t = target("a", server.url("/time")).with_method(HttpMethod::Post);
        prober(2000).measure(&t).await;

        assert!(server.requests()[0].starts_with("POST /time"));
    }

    #[tokio::test]
    async fn test_measure_non_2xx_is_unsuccessful() {
        let server = StubServer::start(StubResponse::status(503)).await;
        let m = prober(2000).measure(&target("a", server.url("/"))).await;

        assert!(!m.success);
        assert_eq!(m.status, 503);
        assert!(m.latency_ms < 2000);
    }

    #[tokio::test]
    async fn test_measure_times_out() {
        let server = StubServer::silent().await;
        let p = prober(200);

        let start = Instant::now();
        let m = p.measure(&target("slow", server.url("/"))).await;
        let elapsed = start.elapsed();

        assert!(!m.success);
        assert_eq!(m.status, 0);
        assert_eq!(m.latency_ms, 200);
        assert_eq!(m.error.as_deref(), Some("request timed out after 200ms"));
        assert!(elapsed < Duration::from_millis(1500), "took {elapsed:?}");
    }

    #[tokio::test]
    async fn test_measure_connection_refused() {
        let addr = refused_addr().await;
        let m = prober(2000).measure(&target("down", format!("http://{}/", addr))).await;

        assert!(!m.success);
        assert_eq!(m.status, 0);
        assert_eq!(m.latency_ms, 2000);
        assert!(m.error.is_some());
    }

    #[tokio::test]
    async fn test_probe_all_preserves_order_and_isolates_failures() {
        let slow =
            StubServer::start(StubResponse::ok("{}").delayed(Duration::from_millis(150))).await;
        let fast = StubServer::start(StubResponse::ok("{}")).await;
        let hung = StubServer::silent().await;

        let targets = vec![
            target("slow", slow.url("/")),
            target("hung", hung.url("/")),
            target("fast", fast.url("/")),
        ];

        let before = Utc::now().timestamp_millis() as u64;
        let report = prober(400).probe_all(&targets).await;

        let ids: Vec<&str> = report.measurements.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["slow", "hung", "fast"]);

        assert!(report.get("slow").unwrap().success);
        assert!(report.get("slow").unwrap().latency_ms >= 150);
        assert!(!report.get("hung").unwrap().success);
        assert!(report.get("fast").unwrap().success);
        assert!(report.get("fast").unwrap().latency_ms < 150);

        assert!(report.fetched_at >= before);
    }

    #[tokio::test]
    async fn test_probe_all_empty() {
        let report = prober(100).probe_all(&[]).await;
        assert!(report.is_empty());
        assert!(report.fetched_at > 0);
    }
}
