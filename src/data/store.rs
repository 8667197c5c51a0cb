//! Client-side state container.
//!
//! [`LatencyStore`] owns the current snapshot, its history and the active
//! filters. [`LatencyStore::apply_snapshot`] is the only way new link data
//! gets in; everything the dashboard renders is read back through accessors.

use std::sync::Arc;

use latencyscope_types::{LatencyBand, LatencyLink, LinkStats, Snapshot};
use tracing::{debug, warn};

use super::filter::FilterState;
use super::history::History;
use crate::catalog::{Catalog, Exchange, Region};

/// Freshness of the data on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedState {
    /// No snapshot has arrived yet.
    Loading,
    /// The latest cycle succeeded.
    Live,
    /// The latest cycle failed; the last good snapshot (if any) is still shown.
    Stale,
}

impl FeedState {
    pub fn label(&self) -> &'static str {
        match self {
            FeedState::Loading => "Loading live latencies…",
            FeedState::Live => "Live",
            FeedState::Stale => "Live feed unavailable",
        }
    }
}

/// Headline numbers for the dashboard header.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Summary {
    pub stats: LinkStats,
    pub active_paths: usize,
    pub healthy: usize,
    /// Links in the high latency band.
    pub hot: usize,
}

#[derive(Debug)]
pub struct LatencyStore {
    catalog: Arc<Catalog>,
    snapshot: Option<Snapshot>,
    history: History,
    filters: FilterState,
    feed_state: FeedState,
    last_error: Option<String>,
}

impl LatencyStore {
    pub fn new(catalog: Arc<Catalog>, history_points: usize) -> Self {
        Self {
            catalog,
            snapshot: None,
            history: History::new(history_points),
            filters: FilterState::default(),
            feed_state: FeedState::Loading,
            last_error: None,
        }
    }

    /// Replace the current snapshot wholesale and append it to history.
    pub fn apply_snapshot(&mut self, snapshot: Snapshot) {
        debug!(
            links = snapshot.len(),
            last_updated = snapshot.last_updated,
            "Applying snapshot"
        );
        self.history.record(&snapshot);
        self.snapshot = Some(snapshot);
        self.feed_state = FeedState::Live;
        self.last_error = None;
    }

    /// Record a failed cycle. The previous snapshot stays in place.
    pub fn mark_unavailable(&mut self, reason: impl Into<String>) {
        let reason = reason.into();
        if self.last_error.as_deref() != Some(reason.as_str()) {
            warn!(error = %reason, "Latency feed unavailable");
        }
        self.feed_state = FeedState::Stale;
        self.last_error = Some(reason);
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn snapshot(&self) -> Option<&Snapshot> {
        self.snapshot.as_ref()
    }

    pub fn links(&self) -> &[LatencyLink] {
        self.snapshot.as_ref().map(|s| s.links.as_slice()).unwrap_or(&[])
    }

    pub fn stats(&self) -> LinkStats {
        self.snapshot.as_ref().map(|s| s.stats).unwrap_or_default()
    }

    /// Probe timestamp of the current snapshot.
    pub fn last_updated(&self) -> Option<u64> {
        self.snapshot.as_ref().map(|s| s.last_updated)
    }

    pub fn feed_state(&self) -> FeedState {
        self.feed_state
    }

    /// Diagnostic text of the last failed cycle.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn update_filters(&mut self, update: impl FnOnce(&mut FilterState)) {
        update(&mut self.filters);
    }

    pub fn reset_filters(&mut self) {
        self.filters = FilterState::default();
    }

    /// Links passing the filters. Empty while the real-time layer is hidden.
    pub fn filtered_links(&self) -> Vec<&LatencyLink> {
        if !self.filters.layers.realtime {
            return Vec::new();
        }
        self.filters.apply(self.links())
    }

    /// Regions for the overview. Empty while the region layer is hidden.
    pub fn visible_regions(&self) -> Vec<&Region> {
        if !self.filters.layers.regions {
            return Vec::new();
        }
        self.catalog
            .regions()
            .iter()
            .filter(|r| self.filters.matches_region(r))
            .collect()
    }

    pub fn visible_exchanges(&self) -> Vec<&Exchange> {
        self.catalog
            .exchanges()
            .iter()
            .filter(|e| self.filters.matches_exchange(e))
            .collect()
    }

    pub fn summary(&self) -> Summary {
        let links = self.links();
        let hot = links.iter().filter(|l| l.band == LatencyBand::High).count();
        Summary {
            stats: self.stats(),
            active_paths: links.len(),
            healthy: links.len() - hot,
            hot,
        }
    }
}
