//! Background feed poller.
//!
//! Drives a [`ReportFetcher`] on a fixed interval and pushes each outcome into
//! a [`ChannelSource`]. Cycles never overlap: the loop awaits the current
//! fetch before it waits for the next tick, ticks missed during an overrun are
//! skipped, and refresh requests that arrive mid-cycle collapse into a single
//! follow-up cycle.

use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use latencyscope_types::{LatencyReport, Target};
use tokio::sync::{watch, Notify};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use super::{ChannelSource, FeedError, FeedUpdate};
use crate::probe::Prober;

/// Produces one report per call.
#[async_trait]
pub trait ReportFetcher: Send + Sync + Debug {
    async fn fetch(&self) -> Result<LatencyReport, FeedError>;

    /// Where reports come from, for display.
    fn describe(&self) -> String;
}

#[async_trait]
impl<T: ReportFetcher + ?Sized> ReportFetcher for Box<T> {
    async fn fetch(&self) -> Result<LatencyReport, FeedError> {
        (**self).fetch().await
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

/// Probes targets in-process.
#[derive(Debug)]
pub struct LocalProbe {
    prober: Prober,
    targets: Vec<Target>,
}

impl LocalProbe {
    pub fn new(prober: Prober, targets: Vec<Target>) -> Self {
        Self { prober, targets }
    }
}

#[async_trait]
impl ReportFetcher for LocalProbe {
    async fn fetch(&self) -> Result<LatencyReport, FeedError> {
        Ok(self.prober.probe_all(&self.targets).await)
    }

    fn describe(&self) -> String {
        format!("probe: {} targets", self.targets.len())
    }
}

/// Spawn the poll loop and return the source it feeds.
///
/// The first cycle starts immediately. The task stops when the returned source
/// is dropped.
pub fn spawn_poller<F>(fetcher: F, interval: Duration) -> ChannelSource
where
    F: ReportFetcher + 'static,
{
    let description = fetcher.describe();
    let (tx, rx) = watch::channel(None);
    let refresh = Arc::new(Notify::new());

    let task = tokio::spawn(run(fetcher, interval, tx, refresh.clone()));

    ChannelSource::new(rx, &description)
        .with_refresh(refresh)
        .with_producer(task)
}

async fn run<F: ReportFetcher>(
    fetcher: F,
    interval: Duration,
    tx: watch::Sender<Option<FeedUpdate>>,
    refresh: Arc<Notify>,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    info!(
        source = %fetcher.describe(),
        interval_ms = interval.as_millis() as u64,
        "Feed poller started"
    );

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = refresh.notified() => {
                debug!("Manual refresh requested");
                ticker.reset();
            }
        }

        let update = match fetcher.fetch().await {
            Ok(report) => {
                debug!(
                    measurements = report.len(),
                    fetched_at = report.fetched_at,
                    "Feed cycle complete"
                );
                FeedUpdate::Report(report)
            }
            Err(e) => {
                warn!(error = %e, "Feed cycle failed");
                FeedUpdate::Failed(e.to_string())
            }
        };

        if tx.send(Some(update)).is_err() {
            debug!("Feed receiver dropped, stopping poller");
            return;
        }
    }
}
