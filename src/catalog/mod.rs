//! Static topology reference data.
//!
//! The catalog holds the exchange locations, the cloud provider regions and
//! the blueprint graph of links that every snapshot is synthesized over. It is
//! built once at startup and is read-only afterwards.
//!
//! The blueprint set is the union of the curated exchange-to-exchange trading
//! links and one derived link from every exchange to its own cloud region.

mod builtin;

use std::collections::HashMap;

use latencyscope_types::{CloudProvider, Coords};

pub use builtin::default_targets;

/// An exchange matching engine location.
#[derive(Debug, Clone, PartialEq)]
pub struct Exchange {
    pub id: String,
    pub name: String,
    pub city: String,
    pub country: String,
    pub latitude: f64,
    pub longitude: f64,
    pub provider: CloudProvider,
    pub region_code: String,
    /// Id of the [`Region`] this exchange is co-located in.
    pub cloud_region_id: String,
}

/// A cloud provider region.
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    pub id: String,
    pub provider: CloudProvider,
    pub region_code: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub server_count: u32,
}

/// A node of the topology graph.
#[derive(Debug, Clone, Copy)]
pub enum TopologyNode<'a> {
    Exchange(&'a Exchange),
    Region(&'a Region),
}

impl<'a> TopologyNode<'a> {
    pub fn coords(&self) -> Coords {
        match self {
            TopologyNode::Exchange(e) => Coords::new(e.latitude, e.longitude),
            TopologyNode::Region(r) => Coords::new(r.latitude, r.longitude),
        }
    }

    pub fn name(&self) -> &'a str {
        match *self {
            TopologyNode::Exchange(e) => &e.name,
            TopologyNode::Region(r) => &r.name,
        }
    }

    pub fn provider(&self) -> CloudProvider {
        match self {
            TopologyNode::Exchange(e) => e.provider,
            TopologyNode::Region(r) => r.provider,
        }
    }
}

/// A static declaration that a link should exist between two nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkBlueprint {
    pub id: String,
    pub from_id: String,
    pub to_id: String,
    pub provider: CloudProvider,
}

/// Read-only topology catalog with id lookups.
#[derive(Debug, Clone)]
pub struct Catalog {
    exchanges: Vec<Exchange>,
    regions: Vec<Region>,
    blueprints: Vec<LinkBlueprint>,
    exchange_index: HashMap<String, usize>,
    region_index: HashMap<String, usize>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Catalog {
    /// The built-in exchange/region topology.
    pub fn builtin() -> Self {
        Self::new(builtin::exchanges(), builtin::regions(), builtin::trading_links())
    }

    /// Build a catalog, deriving one exchange-to-region link per exchange and
    /// appending them after the curated trading links.
    pub fn new(
        exchanges: Vec<Exchange>,
        regions: Vec<Region>,
        trading_links: Vec<LinkBlueprint>,
    ) -> Self {
        let exchange_index =
            exchanges.iter().enumerate().map(|(i, e)| (e.id.clone(), i)).collect();
        let region_index = regions.iter().enumerate().map(|(i, r)| (r.id.clone(), i)).collect();

        let mut blueprints = trading_links;
        blueprints.extend(derive_region_links(&exchanges));

        Self {
            exchanges,
            regions,
            blueprints,
            exchange_index,
            region_index,
        }
    }

    pub fn exchanges(&self) -> &[Exchange] {
        &self.exchanges
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    /// Every link that a snapshot contains, in snapshot order.
    pub fn blueprints(&self) -> &[LinkBlueprint] {
        &self.blueprints
    }

    pub fn exchange(&self, id: &str) -> Option<&Exchange> {
        self.exchange_index.get(id).map(|&i| &self.exchanges[i])
    }

    pub fn region(&self, id: &str) -> Option<&Region> {
        self.region_index.get(id).map(|&i| &self.regions[i])
    }

    /// Resolve an id to an exchange first, then a region.
    pub fn node(&self, id: &str) -> Option<TopologyNode<'_>> {
        self.exchange(id)
            .map(TopologyNode::Exchange)
            .or_else(|| self.region(id).map(TopologyNode::Region))
    }

    /// Coordinates of a node, or `(0, 0)` for unknown ids.
    pub fn coords(&self, id: &str) -> Coords {
        self.node(id).map(|n| n.coords()).unwrap_or(Coords::ORIGIN)
    }

    pub fn display_name(&self, id: &str) -> Option<&str> {
        self.node(id).map(|n| n.name())
    }

    pub fn provider_of(&self, id: &str) -> Option<CloudProvider> {
        self.node(id).map(|n| n.provider())
    }

    /// Exchanges co-located in the given region.
    pub fn exchanges_in_region<'a>(
        &'a self,
        region_id: &'a str,
    ) -> impl Iterator<Item = &'a Exchange> + 'a {
        self.exchanges.iter().filter(move |e| e.cloud_region_id == region_id)
    }

    /// Blueprint endpoint ids that do not resolve to a known node.
    pub fn unresolved_endpoints(&self) -> Vec<&str> {
        self.blueprints
            .iter()
            .flat_map(|b| [b.from_id.as_str(), b.to_id.as_str()])
            .filter(|id| self.node(id).is_none())
            .collect()
    }
}

fn derive_region_links(exchanges: &[Exchange]) -> Vec<LinkBlueprint> {
    exchanges
        .iter()
        .map(|e| LinkBlueprint {
            id: format!("{}-{}", e.id, e.cloud_region_id),
            from_id: e.id.clone(),
            to_id: e.cloud_region_id.clone(),
            provider: e.provider,
        })
        .collect()
}
