//! Filter state and predicates over snapshot links.
//!
//! Each predicate is independent and the link set is their conjunction, so
//! the order in which they are applied never changes the result.

use latencyscope_types::{CloudProvider, LatencyLink};

use crate::catalog::{Exchange, Region};

/// Default inclusive latency range.
pub const DEFAULT_LATENCY_RANGE: (u32, u32) = (0, 400);

/// The two ends of the range never get closer than this.
pub const MIN_RANGE_GAP_MS: u32 = 10;

/// Upper limit of the range's lower end.
pub const RANGE_MIN_LIMIT_MS: u32 = 400;

/// Upper limit of the range's upper end.
pub const RANGE_MAX_LIMIT_MS: u32 = 450;

/// Inclusive latency bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LatencyRange {
    min: u32,
    max: u32,
}

impl Default for LatencyRange {
    fn default() -> Self {
        Self {
            min: DEFAULT_LATENCY_RANGE.0,
            max: DEFAULT_LATENCY_RANGE.1,
        }
    }
}

impl LatencyRange {
    pub fn min(&self) -> u32 {
        self.min
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    pub fn contains(&self, latency_ms: u32) -> bool {
        (self.min..=self.max).contains(&latency_ms)
    }

    /// Move the lower end, keeping it at least the minimum gap below the upper end.
    pub fn set_min(&mut self, value: u32) {
        let value = value.min(RANGE_MIN_LIMIT_MS);
        self.min = value.min(self.max.saturating_sub(MIN_RANGE_GAP_MS));
    }

    /// Move the upper end, keeping it at least the minimum gap above the lower end.
    pub fn set_max(&mut self, value: u32) {
        let value = value.min(RANGE_MAX_LIMIT_MS);
        self.max = value.max(self.min + MIN_RANGE_GAP_MS);
    }

    pub fn nudge_min(&mut self, delta: i32) {
        self.set_min(self.min.saturating_add_signed(delta));
    }

    pub fn nudge_max(&mut self, delta: i32) {
        self.set_max(self.max.saturating_add_signed(delta));
    }
}

/// Which presentation layers are shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layers {
    pub realtime: bool,
    pub historical: bool,
    pub regions: bool,
}

impl Default for Layers {
    fn default() -> Self {
        Self {
            realtime: true,
            historical: true,
            regions: true,
        }
    }
}

/// Active filters. `None` means "all".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    pub provider: Option<CloudProvider>,
    /// Only links with this node id at either end.
    pub exchange: Option<String>,
    pub range: LatencyRange,
    /// Case-insensitive substring of link labels and region names.
    pub search: String,
    pub layers: Layers,
}

impl FilterState {
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }

    pub fn matches(&self, link: &LatencyLink) -> bool {
        self.matches_provider(link.provider)
            && self.exchange.as_deref().is_none_or(|id| link.touches(id))
            && self.range.contains(link.latency_ms)
            && contains_ignore_case(&link.label, &self.search)
    }

    /// Links passing every predicate, in their original order.
    pub fn apply<'a>(&self, links: &'a [LatencyLink]) -> Vec<&'a LatencyLink> {
        links.iter().filter(|l| self.matches(l)).collect()
    }

    /// Region overview filter: provider plus case-insensitive name search.
    pub fn matches_region(&self, region: &Region) -> bool {
        self.matches_provider(region.provider) && contains_ignore_case(&region.name, &self.search)
    }

    pub fn matches_exchange(&self, exchange: &Exchange) -> bool {
        self.matches_provider(exchange.provider)
    }

    fn matches_provider(&self, provider: CloudProvider) -> bool {
        self.provider.is_none_or(|p| p == provider)
    }

    /// Step the provider filter: all → AWS → GCP → Azure → all.
    pub fn cycle_provider(&mut self) {
        self.provider = match self.provider {
            None => Some(CloudProvider::ALL[0]),
            Some(current) => CloudProvider::ALL
                .iter()
                .position(|p| *p == current)
                .and_then(|i| CloudProvider::ALL.get(i + 1))
                .copied(),
        };
    }

    /// Step the exchange filter through `ids`, then back to all.
    pub fn cycle_exchange<'a>(&mut self, ids: impl IntoIterator<Item = &'a str>) {
        let ids: Vec<&str> = ids.into_iter().collect();
        self.exchange = match self.exchange.as_deref() {
            None => ids.first().map(|s| s.to_string()),
            Some(current) => ids
                .iter()
                .position(|id| *id == current)
                .and_then(|i| ids.get(i + 1))
                .map(|s| s.to_string()),
        };
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    needle.is_empty() || haystack.to_lowercase().contains(&needle.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use latencyscope_types::{Coords, LatencyBand, LinkStatus};

    fn link(
        id: &str,
        from: &str,
        to: &str,
        provider: CloudProvider,
        latency: u32,
        label: &str,
    ) -> LatencyLink {
        LatencyLink {
            id: id.to_string(),
            from_id: from.to_string(),
            to_id: to.to_string(),
            from_coords: Coords::ORIGIN,
            to_coords: Coords::ORIGIN,
            provider,
            latency_ms: latency,
            band: LatencyBand::Low,
            status: LinkStatus::Healthy,
            label: label.to_string(),
        }
    }

    fn links() -> Vec<LatencyLink> {
        vec![
            link(
                "1",
                "binance-tokyo",
                "bybit-frankfurt",
                CloudProvider::Aws,
                184,
                "Binance → Bybit",
            ),
            link("2", "okx-singapore", "binance-tokyo", CloudProvider::Gcp, 60, "OKX → Binance"),
            link(
                "3",
                "kraken-newark",
                "coinbase-london",
                CloudProvider::Gcp,
                400,
                "Kraken → Coinbase",
            ),
            link(
                "4",
                "deribit-amsterdam",
                "azure-westeurope",
                CloudProvider::Azure,
                12,
                "Deribit → Azure West Europe",
            ),
        ]
    }

    fn ids(selected: Vec<&LatencyLink>) -> Vec<&str> {
        selected.iter().map(|l| l.id.as_str()).collect()
    }

    #[test]
    fn test_default_filter_passes_everything_in_range() {
        let links = links();
        let filter = FilterState::default();
        assert!(filter.is_default());
        assert_eq!(ids(filter.apply(&links)), vec!["1", "2", "3", "4"]);
    }

    #[test]
    fn test_range_is_inclusive() {
        let links = links();
        let mut filter = FilterState::default();
        filter.range.set_max(399);
        assert_eq!(ids(filter.apply(&links)), vec!["1", "2", "4"]);

        filter.range.set_min(60);
        filter.range.set_max(184);
        assert_eq!(ids(filter.apply(&links)), vec!["1", "2"]);
    }

    #[test]
    fn test_exchange_matches_either_end() {
        let links = links();
        let filter = FilterState {
            exchange: Some("binance-tokyo".to_string()),
            ..Default::default()
        };
        assert_eq!(ids(filter.apply(&links)), vec!["1", "2"]);
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let links = links();
        let filter = FilterState {
            search: "BINANCE".to_string(),
            ..Default::default()
        };
        assert_eq!(ids(filter.apply(&links)), vec!["1", "2"]);
    }

    #[test]
    fn test_predicates_conjoin() {
        let links = links();
        let filter = FilterState {
            provider: Some(CloudProvider::Gcp),
            search: "binance".to_string(),
            ..Default::default()
        };
        assert_eq!(ids(filter.apply(&links)), vec!["2"]);
    }

    #[test]
    fn test_predicate_order_does_not_matter() {
        let links = links();
        let filter = FilterState {
            provider: Some(CloudProvider::Gcp),
            exchange: Some("binance-tokyo".to_string()),
            search: "okx".to_string(),
            ..Default::default()
        };

        let all_at_once = ids(filter.apply(&links));

        let by_provider = FilterState { provider: filter.provider, ..Default::default() };
        let by_exchange = FilterState { exchange: filter.exchange.clone(), ..Default::default() };
        let by_search = FilterState { search: filter.search.clone(), ..Default::default() };

        let staged: Vec<&LatencyLink> = links
            .iter()
            .filter(|l| by_search.matches(l))
            .filter(|l| by_exchange.matches(l))
            .filter(|l| by_provider.matches(l))
            .collect();

        assert_eq!(all_at_once, ids(staged));
    }

    #[test]
    fn test_range_keeps_minimum_gap() {
        let mut range = LatencyRange::default();
        range.set_min(395);
        assert_eq!(range.min(), 390);

        range.set_max(100);
        assert_eq!(range.max(), 400);

        let mut range = LatencyRange::default();
        range.set_max(5);
        assert_eq!(range.max(), 10);
        range.set_min(50);
        assert_eq!(range.min(), 0);
    }

    #[test]
    fn test_range_limits() {
        let mut range = LatencyRange::default();
        range.set_max(1000);
        assert_eq!(range.max(), RANGE_MAX_LIMIT_MS);
        range.set_min(1000);
        assert_eq!(range.min(), RANGE_MIN_LIMIT_MS);

        range.nudge_min(-1000);
        assert_eq!(range.min(), 0);
    }

    #[test]
    fn test_cycle_provider() {
        let mut filter = FilterState::default();
        let mut seen = Vec::new();
        for _ in 0..4 {
            filter.cycle_provider();
            seen.push(filter.provider);
        }
        assert_eq!(
            seen,
            vec![
                Some(CloudProvider::Aws),
                Some(CloudProvider::Gcp),
                Some(CloudProvider::Azure),
                None
            ]
        );
    }

    #[test]
    fn test_cycle_exchange() {
        let mut filter = FilterState::default();
        let ids = ["a", "b"];
        filter.cycle_exchange(ids);
        assert_eq!(filter.exchange.as_deref(), Some("a"));
        filter.cycle_exchange(ids);
        assert_eq!(filter.exchange.as_deref(), Some("b"));
        filter.cycle_exchange(ids);
        assert_eq!(filter.exchange, None);
    }

    #[test]
    fn test_region_filter() {
        let catalog = Catalog::builtin();
        let filter = FilterState {
            provider: Some(CloudProvider::Azure),
            search: "uk".to_string(),
            ..Default::default()
        };
        let names: Vec<&str> = catalog
            .regions()
            .iter()
            .filter(|r| filter.matches_region(r))
            .map(|r| r.name.as_str())
            .collect();
        assert_eq!(names, vec!["Azure UK South"]);
    }
}
