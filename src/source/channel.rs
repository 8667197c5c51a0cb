//! Channel-based data source.
//!
//! Receives feed updates via a tokio watch channel. A watch channel only keeps
//! the latest value, so a slow UI never builds up a backlog of stale reports.

use std::sync::Arc;

use tokio::sync::{watch, Notify};
use tokio::task::JoinHandle;

use super::{DataSource, FeedUpdate};

/// A data source fed by a background producer.
///
/// # Example
///
/// ```
/// use latencyscope::source::{ChannelSource, DataSource, FeedUpdate};
/// use latencyscope_types::LatencyReport;
///
/// let (tx, mut source) = ChannelSource::create("test feed");
/// assert!(source.poll().is_none());
///
/// tx.send(Some(FeedUpdate::Report(LatencyReport::new(1, vec![])))).unwrap();
/// assert!(matches!(source.poll(), Some(FeedUpdate::Report(_))));
/// ```
#[derive(Debug)]
pub struct ChannelSource {
    receiver: watch::Receiver<Option<FeedUpdate>>,
    description: String,
    last_error: Option<String>,
    refresh: Option<Arc<Notify>>,
    /// Producer task, aborted when the source is dropped.
    producer: Option<JoinHandle<()>>,
}

impl ChannelSource {
    /// Create a new channel source.
    ///
    /// `None` in the channel means nothing has arrived yet.
    pub fn new(receiver: watch::Receiver<Option<FeedUpdate>>, source_description: &str) -> Self {
        Self {
            receiver,
            description: source_description.to_string(),
            last_error: None,
            refresh: None,
            producer: None,
        }
    }

    /// Create a channel pair for pushing updates into a `ChannelSource`.
    pub fn create(source_description: &str) -> (watch::Sender<Option<FeedUpdate>>, Self) {
        let (tx, rx) = watch::channel(None);
        (tx, Self::new(rx, source_description))
    }

    /// Forward refresh requests to the producer through `notify`.
    pub fn with_refresh(mut self, notify: Arc<Notify>) -> Self {
        self.refresh = Some(notify);
        self
    }

    /// Tie the producer task's lifetime to this source.
    pub fn with_producer(mut self, task: JoinHandle<()>) -> Self {
        self.producer = Some(task);
        self
    }
}

impl DataSource for ChannelSource {
    fn poll(&mut self) -> Option<FeedUpdate> {
        if !self.receiver.has_changed().unwrap_or(false) {
            return None;
        }

        let update = self.receiver.borrow_and_update().clone()?;
        match &update {
            FeedUpdate::Report(_) => self.last_error = None,
            FeedUpdate::Failed(reason) => self.last_error = Some(reason.clone()),
        }
        Some(update)
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    fn request_refresh(&mut self) {
        if let Some(notify) = &self.refresh {
            notify.notify_one();
        }
    }
}

impl Drop for ChannelSource {
    fn drop(&mut self) {
        if let Some(task) = self.producer.take() {
            task.abort();
        }
    }
}
