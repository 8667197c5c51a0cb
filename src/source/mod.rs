//! Feed source abstraction.
//!
//! The dashboard never probes or fetches on its UI thread. It polls a
//! [`DataSource`] once per frame; the source hands back whatever arrived since
//! the last poll. Sources differ only in where reports come from:
//!
//! - [`ChannelSource`] receives updates pushed by a background poller
//!   ([`spawn_poller`]) that drives a [`ReportFetcher`].
//! - [`FileSource`] replays a recorded report file.

mod channel;
mod error;
mod file;
mod http;
mod poller;

pub use channel::ChannelSource;
pub use error::FeedError;
pub use file::FileSource;
pub use http::AggregatorClient;
pub use poller::{spawn_poller, LocalProbe, ReportFetcher};

use std::fmt::Debug;

use latencyscope_types::LatencyReport;

/// One outcome of a feed cycle.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedUpdate {
    /// A complete set of measurements.
    Report(LatencyReport),
    /// The cycle failed. Carries diagnostic text only.
    Failed(String),
}

/// Trait for receiving latency reports from various sources.
///
/// # Example
///
/// ```
/// use latencyscope::source::{DataSource, FeedUpdate, FileSource};
///
/// let mut source = FileSource::new("latency.json");
/// match source.poll() {
///     Some(FeedUpdate::Report(report)) => println!("{} measurements", report.len()),
///     Some(FeedUpdate::Failed(reason)) => println!("unavailable: {}", reason),
///     None => {}
/// }
/// ```
pub trait DataSource: Send + Debug {
    /// Take the update that arrived since the last poll, if any.
    ///
    /// Must not block.
    fn poll(&mut self) -> Option<FeedUpdate>;

    /// Human-readable description, shown in the status bar.
    fn description(&self) -> &str;

    /// Error text of the most recent failed cycle, cleared by the next success.
    fn error(&self) -> Option<&str>;

    /// Ask for a new cycle as soon as possible.
    ///
    /// Requests made while a cycle is in flight coalesce into one follow-up.
    fn request_refresh(&mut self) {}
}
