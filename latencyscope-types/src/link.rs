//! Synthesized links between topology nodes.

use crate::CloudProvider;

/// A latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Coords {
    pub lat: f64,
    pub lng: f64,
}

impl Coords {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// The null island fallback used for unknown node ids.
    pub const ORIGIN: Coords = Coords { lat: 0.0, lng: 0.0 };
}

/// Coarse latency classification used for colouring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum LatencyBand {
    Low,
    Medium,
    High,
}

impl LatencyBand {
    pub fn label(&self) -> &'static str {
        match self {
            LatencyBand::Low => "low",
            LatencyBand::Medium => "medium",
            LatencyBand::High => "high",
        }
    }
}

/// Health classification used for operational framing.
///
/// Independent of [`LatencyBand`]: the two use different thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum LinkStatus {
    Healthy,
    Degraded,
    Critical,
}

impl LinkStatus {
    /// Returns a short symbol for display.
    pub fn symbol(&self) -> &'static str {
        match self {
            LinkStatus::Healthy => "OK",
            LinkStatus::Degraded => "DEGR",
            LinkStatus::Critical => "CRIT",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            LinkStatus::Healthy => "healthy",
            LinkStatus::Degraded => "degraded",
            LinkStatus::Critical => "critical",
        }
    }
}

/// One synthesized edge of the latency graph.
///
/// Recreated every cycle and never mutated after creation.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct LatencyLink {
    pub id: String,
    pub from_id: String,
    pub to_id: String,
    pub from_coords: Coords,
    pub to_coords: Coords,
    pub provider: CloudProvider,
    pub latency_ms: u32,
    pub band: LatencyBand,
    pub status: LinkStatus,
    /// `"<from name> → <to name>"`.
    pub label: String,
}

impl LatencyLink {
    /// Whether either endpoint of this link is the given node.
    pub fn touches(&self, node_id: &str) -> bool {
        self.from_id == node_id || self.to_id == node_id
    }
}
