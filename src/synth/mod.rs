//! Latency snapshot synthesis.
//!
//! Turns one cycle of raw probe measurements into a [`Snapshot`]: one
//! [`LatencyLink`] per blueprint edge with a synthesized latency, a band, a
//! status and a label, plus aggregate statistics.
//!
//! ## Pipeline
//!
//! ```text
//! LatencyReport ──▶ BaseLatencies (direct / provider mean / default)
//!                          │
//! Catalog blueprints ──────┼──▶ haversine distance
//!                          ▼
//!            0.5 * mean(base) + km / 60 + jitter, floored at 10 ms
//!                          │
//!                          ▼
//!              band / status / label ──▶ Snapshot (+ LinkStats)
//! ```
//!
//! Synthesis is pure computation over already-resolved data and never fails:
//! unknown ids degrade to defaults instead of dropping the edge.

pub mod classify;
pub mod geo;
pub mod jitter;

use std::collections::HashMap;
use std::sync::Arc;

use latencyscope_types::{
    CloudProvider, LatencyLink, LatencyReport, LinkStats, Measurement, Snapshot,
};
use tracing::debug;

use crate::catalog::{Catalog, LinkBlueprint};

pub use classify::{band_for, status_for, BAND_LOW_BELOW_MS, BAND_MEDIUM_BELOW_MS};
pub use geo::haversine_km;
pub use jitter::{FixedJitter, JitterSource, UniformJitter, JITTER_MS};

/// Base latency used when neither a measurement nor a provider mean exists.
pub const DEFAULT_BASE_LATENCY_MS: f64 = 160.0;

/// Synthesized latencies never drop below this floor.
pub const MIN_LINK_LATENCY_MS: f64 = 10.0;

/// Kilometres per millisecond of propagation cost (~1.6 ms per 100 km).
pub const KM_PER_MS: f64 = 60.0;

/// Owns the catalog and jitter source used for each cycle.
#[derive(Debug)]
pub struct Synthesizer {
    catalog: Arc<Catalog>,
    jitter: Box<dyn JitterSource>,
}

impl Synthesizer {
    pub fn new(catalog: Arc<Catalog>, jitter: Box<dyn JitterSource>) -> Self {
        Self { catalog, jitter }
    }

    /// Synthesizer with OS-seeded jitter, or a fixed seed when given.
    pub fn with_seed(catalog: Arc<Catalog>, seed: Option<u64>) -> Self {
        let jitter: Box<dyn JitterSource> = match seed {
            Some(seed) => Box::new(UniformJitter::seeded(seed)),
            None => Box::new(UniformJitter::from_os_rng()),
        };
        Self::new(catalog, jitter)
    }

    pub fn synthesize(&mut self, report: &LatencyReport) -> Snapshot {
        synthesize(report, &self.catalog, self.jitter.as_mut())
    }
}

/// Build a snapshot from one cycle of measurements.
///
/// The snapshot is stamped with the report's `fetched_at`, so freshness
/// reflects when probing happened rather than when synthesis ran.
pub fn synthesize(
    report: &LatencyReport,
    catalog: &Catalog,
    jitter: &mut dyn JitterSource,
) -> Snapshot {
    let bases = BaseLatencies::from_report(report);

    let links: Vec<LatencyLink> = catalog
        .blueprints()
        .iter()
        .map(|blueprint| synthesize_link(blueprint, catalog, &bases, jitter))
        .collect();

    let stats = compute_stats(&links);

    Snapshot {
        links,
        stats,
        last_updated: report.fetched_at,
    }
}

fn synthesize_link(
    blueprint: &LinkBlueprint,
    catalog: &Catalog,
    bases: &BaseLatencies<'_>,
    jitter: &mut dyn JitterSource,
) -> LatencyLink {
    let from_coords = catalog.coords(&blueprint.from_id);
    let to_coords = catalog.coords(&blueprint.to_id);

    let from_base = bases.resolve(&blueprint.from_id, catalog, blueprint.provider);
    let to_base = bases.resolve(&blueprint.to_id, catalog, blueprint.provider);

    let km = haversine_km(from_coords, to_coords);
    let latency_ms = synthesize_latency(from_base, to_base, km, jitter.sample());

    let from_name = label_name(catalog, &blueprint.from_id);
    let to_name = label_name(catalog, &blueprint.to_id);

    LatencyLink {
        id: blueprint.id.clone(),
        from_id: blueprint.from_id.clone(),
        to_id: blueprint.to_id.clone(),
        from_coords,
        to_coords,
        provider: blueprint.provider,
        latency_ms,
        band: band_for(latency_ms),
        status: status_for(latency_ms),
        label: format!("{} → {}", from_name, to_name),
    }
}

fn label_name<'a>(catalog: &'a Catalog, id: &'a str) -> &'a str {
    catalog.display_name(id).unwrap_or_else(|| {
        debug!(node_id = id, "Unknown topology id, labelling with raw id");
        id
    })
}

/// Combine two endpoint base latencies and a distance into a link latency.
///
/// `round(max(10, 0.5 * mean(from, to) + km / 60 + jitter))`
pub fn synthesize_latency(from_base_ms: f64, to_base_ms: f64, km: f64, jitter_ms: f64) -> u32 {
    let base = (from_base_ms + to_base_ms) / 2.0;
    let propagation = km / KM_PER_MS;
    (0.5 * base + propagation + jitter_ms).max(MIN_LINK_LATENCY_MS).round() as u32
}

/// Min, max and one-decimal mean over all links. Zeros when empty.
pub fn compute_stats(links: &[LatencyLink]) -> LinkStats {
    let Some(min) = links.iter().map(|l| l.latency_ms).min() else {
        return LinkStats::default();
    };
    let max = links.iter().map(|l| l.latency_ms).max().unwrap_or(min);
    let sum: u64 = links.iter().map(|l| u64::from(l.latency_ms)).sum();
    let mean = sum as f64 / links.len() as f64;

    LinkStats {
        min,
        max,
        avg: (mean * 10.0).round() / 10.0,
    }
}

/// Mean latency of the successful measurements of each provider.
pub fn provider_means(report: &LatencyReport) -> HashMap<CloudProvider, f64> {
    let mut buckets: HashMap<CloudProvider, (f64, usize)> = HashMap::new();
    for m in report.successful() {
        let entry = buckets.entry(m.provider).or_insert((0.0, 0));
        entry.0 += m.latency_ms as f64;
        entry.1 += 1;
    }
    buckets.into_iter().map(|(provider, (sum, n))| (provider, sum / n as f64)).collect()
}

/// Per-cycle base latency resolution.
///
/// 1. a successful measurement for the id itself;
/// 2. the mean of successful measurements for the id's provider;
/// 3. [`DEFAULT_BASE_LATENCY_MS`].
///
/// Failed measurements (timeouts, transport errors, non-2xx) count as missing.
#[derive(Debug)]
pub struct BaseLatencies<'a> {
    measurements: HashMap<&'a str, &'a Measurement>,
    provider_means: HashMap<CloudProvider, f64>,
}

impl<'a> BaseLatencies<'a> {
    pub fn from_report(report: &'a LatencyReport) -> Self {
        Self {
            measurements: report.measurements.iter().map(|m| (m.id.as_str(), m)).collect(),
            provider_means: provider_means(report),
        }
    }

    /// Resolve the base latency for a node id.
    pub fn resolve(&self, id: &str, catalog: &Catalog, fallback_provider: CloudProvider) -> f64 {
        let measurement = self.measurements.get(id).copied();
        if let Some(m) = measurement.filter(|m| m.success) {
            return m.latency_ms as f64;
        }

        let provider = catalog
            .provider_of(id)
            .or_else(|| measurement.map(|m| m.provider))
            .unwrap_or(fallback_provider);

        self.provider_means.get(&provider).copied().unwrap_or(DEFAULT_BASE_LATENCY_MS)
    }
}
