//! Client-side state built from synthesized snapshots.
//!
//! ## Submodules
//!
//! - [`duration`]: Parsing and formatting of duration strings (e.g., "10s", "8000ms")
//! - [`filter`]: Filter predicates over links and regions
//! - [`history`]: Bounded per-link history for sparklines and the history chart
//! - [`store`]: The [`LatencyStore`] state container
//!
//! ## Data Flow
//!
//! ```text
//! Snapshot (from the synthesizer)
//!        │
//!        ▼
//! LatencyStore::apply_snapshot()
//!        │
//!        ├──▶ current links + stats (replaced wholesale)
//!        │
//!        └──▶ History::record() (for sparklines and the chart)
//! ```

pub mod duration;
pub mod filter;
pub mod history;
pub mod store;

pub use filter::{FilterState, LatencyRange, Layers};
pub use history::{HistoricalSeries, History, TimeWindow, WindowStats, DEFAULT_HISTORY_POINTS};
pub use store::{FeedState, LatencyStore, Summary};
