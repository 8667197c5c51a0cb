//! Snapshot - the immutable result of one synthesis cycle.

use crate::LatencyLink;

/// Aggregate statistics over every link in a snapshot.
///
/// An empty snapshot yields all zeros rather than NaN.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LinkStats {
    pub min: u32,
    pub max: u32,
    /// Mean latency rounded to one decimal.
    pub avg: f64,
}

/// All synthesized links plus aggregate statistics for one cycle.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Snapshot {
    pub links: Vec<LatencyLink>,
    pub stats: LinkStats,
    /// Unix timestamp in milliseconds of the probe cycle that produced this
    /// snapshot (not the time synthesis ran).
    pub last_updated: u64,
}

impl Snapshot {
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    /// Get a link by id.
    pub fn get(&self, link_id: &str) -> Option<&LatencyLink> {
        self.links.iter().find(|l| l.id == link_id)
    }
}

/// One point of a per-link historical series.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct HistoricalPoint {
    pub timestamp: u64,
    pub latency_ms: u32,
    pub link_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CloudProvider, Coords, LatencyBand, LinkStatus};

    fn link(id: &str) -> LatencyLink {
        LatencyLink {
            id: id.to_string(),
            from_id: "binance-tokyo".to_string(),
            to_id: "bybit-frankfurt".to_string(),
            from_coords: Coords::new(35.68, 139.65),
            to_coords: Coords::new(50.11, 8.68),
            provider: CloudProvider::Aws,
            latency_ms: 184,
            band: LatencyBand::High,
            status: LinkStatus::Degraded,
            label: "Binance → Bybit".to_string(),
        }
    }

    #[test]
    fn test_get_link() {
        let snapshot = Snapshot {
            links: vec![link("binance-bybit")],
            stats: LinkStats::default(),
            last_updated: 1,
        };
        assert!(snapshot.get("binance-bybit").is_some());
        assert!(snapshot.get("missing").is_none());
        assert!(snapshot.get("binance-bybit").unwrap().touches("bybit-frankfurt"));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serialize_wire_names() {
        let snapshot = Snapshot {
            links: vec![link("binance-bybit")],
            stats: LinkStats { min: 184, max: 184, avg: 184.0 },
            last_updated: 42,
        };
        let value = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(value["lastUpdated"], 42);
        assert_eq!(value["links"][0]["fromId"], "binance-tokyo");
        assert_eq!(value["links"][0]["latencyMs"], 184);
        assert_eq!(value["links"][0]["band"], "high");
        assert_eq!(value["links"][0]["status"], "degraded");
        assert_eq!(value["links"][0]["provider"], "AWS");
    }
}
