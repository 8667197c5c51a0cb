//! # latencyscope
//!
//! A terminal dashboard and library for watching latency between crypto
//! exchange matching engines and the cloud regions they run in.
//!
//! Every cycle the exchanges' public endpoints are timed over HTTP. Those raw
//! round trips are then spread over a fixed topology of exchange-to-exchange
//! and exchange-to-region links, weighted by great-circle distance, and
//! rendered as live tables, a region overview and per-link history.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │  probe ──▶ LatencyReport ──▶ source ──▶ app ──▶ ui ──▶ Terminal  │
//! │    │       (server serves     (poller,   │                       │
//! │    │        it over HTTP)      file)     ▼                       │
//! │    │                                   synth ──▶ data (store,    │
//! │    └── targets from config             │         history,        │
//! │                                 catalog┘         filters)        │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`probe`]**: Times each target endpoint and builds a [`LatencyReport`]
//! - **[`server`]**: Serves fresh reports at `/api/latency`
//! - **[`source`]**: The [`DataSource`] trait plus the background poller,
//!   aggregation client and file replay
//! - **[`catalog`]**: Static exchanges, cloud regions and link blueprints
//! - **[`synth`]**: Turns a report into a [`Snapshot`] of synthesized links
//! - **[`data`]**: Client-side store with history and filters
//! - **[`ui`]**: Terminal rendering using ratatui
//!
//! ## Usage
//!
//! ### As a CLI tool
//!
//! ```bash
//! # Probe exchanges in-process and show the dashboard
//! latencyscope
//!
//! # Run the aggregation endpoint, then point dashboards at it
//! latencyscope --serve 0.0.0.0:3000
//! latencyscope --connect http://host:3000/api/latency
//!
//! # One cycle, written as JSON
//! latencyscope --export snapshot.json
//! ```
//!
//! ### As a library
//!
//! ```
//! use std::sync::Arc;
//! use latencyscope::{Catalog, FixedJitter, LatencyStore, Synthesizer};
//! use latencyscope_types::{CloudProvider, LatencyReport, Measurement};
//!
//! let catalog = Arc::new(Catalog::builtin());
//! let mut synthesizer = Synthesizer::new(catalog.clone(), Box::new(FixedJitter(0.0)));
//! let mut store = LatencyStore::new(catalog, 240);
//!
//! let report = LatencyReport::new(
//!     1_700_000_000_000,
//!     vec![Measurement::success("binance-tokyo", "Binance", CloudProvider::Aws, 42, 200)],
//! );
//! store.apply_snapshot(synthesizer.synthesize(&report));
//! assert_eq!(store.links().len(), 16);
//! ```

pub mod app;
pub mod catalog;
pub mod config;
pub mod data;
pub mod events;
pub mod logging;
pub mod probe;
pub mod server;
pub mod source;
pub mod synth;
pub mod ui;

#[cfg(test)]
pub(crate) mod testing;

// Re-export main types for convenience
pub use app::App;
pub use catalog::Catalog;
pub use data::{FeedState, FilterState, History, LatencyStore};
pub use latencyscope_types::{LatencyLink, LatencyReport, Measurement, Snapshot, Target};
pub use probe::Prober;
pub use source::{ChannelSource, DataSource, FileSource};
pub use synth::{FixedJitter, Synthesizer};
