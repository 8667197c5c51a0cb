//! # latencyscope-types
//!
//! Core types shared by the latencyscope prober, the aggregation endpoint and
//! the dashboard. This crate defines the wire payload produced by a probe cycle
//! and the synthesized link graph consumed by every presentation component.
//!
//! ## Features
//!
//! - `serde`: JSON serialization via serde. Field names follow the camelCase
//!   wire format (`fetchedAt`, `latencyMs`, `fromId`, ...).
//!
//! ## Example
//!
//! ```rust
//! use latencyscope_types::{CloudProvider, LatencyReport, Measurement};
//!
//! let report = LatencyReport::new(
//!     1_700_000_000_000,
//!     vec![Measurement::success("binance-tokyo", "Binance", CloudProvider::Aws, 42, 200)],
//! );
//!
//! assert_eq!(report.successful().count(), 1);
//! ```

mod link;
mod measurement;
mod provider;
mod snapshot;

pub use link::*;
pub use measurement::*;
pub use provider::*;
pub use snapshot::*;
