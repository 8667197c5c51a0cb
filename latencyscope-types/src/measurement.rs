//! Probe targets and the measurements a probe cycle produces.

use crate::CloudProvider;

/// HTTP method used to probe a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "UPPERCASE"))]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
}

/// A fixed network endpoint probed for latency.
///
/// Targets are defined once at startup and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Target {
    pub id: String,
    pub name: String,
    pub provider: CloudProvider,
    pub url: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub method: HttpMethod,
}

impl Target {
    /// Create a GET target.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        provider: CloudProvider,
        url: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            provider,
            url: url.into(),
            method: HttpMethod::Get,
        }
    }

    /// Override the HTTP method.
    pub fn with_method(mut self, method: HttpMethod) -> Self {
        self.method = method;
        self
    }
}

/// One probe outcome for a target in one cycle.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Measurement {
    pub id: String,
    pub name: String,
    pub provider: CloudProvider,
    /// Round-trip time in milliseconds, or the timeout bound on failure.
    pub latency_ms: u64,
    pub success: bool,
    /// HTTP status code, 0 on transport failure.
    pub status: u16,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub error: Option<String>,
}

impl Measurement {
    /// A measurement that completed with a successful HTTP status.
    pub fn success(
        id: impl Into<String>,
        name: impl Into<String>,
        provider: CloudProvider,
        latency_ms: u64,
        status: u16,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            provider,
            latency_ms,
            success: true,
            status,
            error: None,
        }
    }

    /// A measurement that failed at the transport level (timeout, DNS, refused).
    pub fn failure(
        id: impl Into<String>,
        name: impl Into<String>,
        provider: CloudProvider,
        timeout_ms: u64,
        error: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            provider,
            latency_ms: timeout_ms,
            success: false,
            status: 0,
            error: Some(error.into()),
        }
    }
}

/// The payload emitted by one probe cycle.
///
/// Matches the JSON served by the aggregation endpoint:
/// `{ "fetchedAt": <epoch millis>, "measurements": [...] }`.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct LatencyReport {
    /// Unix timestamp in milliseconds at which probing completed.
    pub fetched_at: u64,
    pub measurements: Vec<Measurement>,
}

impl LatencyReport {
    pub fn new(fetched_at: u64, measurements: Vec<Measurement>) -> Self {
        Self {
            fetched_at,
            measurements,
        }
    }

    /// Look up the measurement for a target id.
    pub fn get(&self, id: &str) -> Option<&Measurement> {
        self.measurements.iter().find(|m| m.id == id)
    }

    /// Iterate over the measurements that reported success.
    pub fn successful(&self) -> impl Iterator<Item = &Measurement> {
        self.measurements.iter().filter(|m| m.success)
    }

    pub fn is_empty(&self) -> bool {
        self.measurements.is_empty()
    }

    pub fn len(&self) -> usize {
        self.measurements.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_uses_timeout_sentinel() {
        let m =
            Measurement::failure("kraken-newark", "Kraken", CloudProvider::Gcp, 8000, "timed out");
        assert_eq!(m.latency_ms, 8000);
        assert_eq!(m.status, 0);
        assert!(!m.success);
        assert_eq!(m.error.as_deref(), Some("timed out"));
    }

    #[test]
    fn test_report_lookup() {
        let report = LatencyReport::new(
            10,
            vec![
                Measurement::success("a", "A", CloudProvider::Aws, 50, 200),
                Measurement::failure("b", "B", CloudProvider::Aws, 8000, "boom"),
            ],
        );
        assert_eq!(report.get("b").map(|m| m.status), Some(0));
        assert!(report.get("c").is_none());
        assert_eq!(report.successful().count(), 1);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_deserialize_aggregation_payload() {
        let json = r#"{
            "fetchedAt": 1700000000000,
            "measurements": [
                {"id": "binance-tokyo", "name": "Binance", "provider": "AWS",
                 "latencyMs": 212, "success": true, "status": 200},
                {"id": "okx-singapore", "name": "OKX", "provider": "GCP",
                 "latencyMs": 8000, "success": false, "status": 0, "error": "aborted"}
            ]
        }"#;

        let report: LatencyReport = serde_json::from_str(json).unwrap();
        assert_eq!(report.fetched_at, 1_700_000_000_000);
        assert_eq!(report.len(), 2);
        assert_eq!(report.measurements[0].latency_ms, 212);
        assert_eq!(report.measurements[1].error.as_deref(), Some("aborted"));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_target_method_defaults_to_get() {
        let json = r#"{"id":"x","name":"X","provider":"Azure","url":"https://example.com"}"#;
        let target: Target = serde_json::from_str(json).unwrap();
        assert_eq!(target.method, HttpMethod::Get);

        let json = r#"{"id":"x","name":"X","provider":"Azure",
            "url":"https://example.com","method":"POST"}"#;
        let target: Target = serde_json::from_str(json).unwrap();
        assert_eq!(target.method, HttpMethod::Post);
    }
}
