//! File-based data source.
//!
//! Replays a recorded `{fetchedAt, measurements}` JSON file, for example one
//! written by `curl http://127.0.0.1:3000/api/latency > latency.json`.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use latencyscope_types::LatencyReport;
use tracing::debug;

use super::{DataSource, FeedUpdate};

/// A data source that reads latency reports from a JSON file.
///
/// The source tracks the file's modification time and only returns a new
/// report when the file has been updated.
#[derive(Debug)]
pub struct FileSource {
    path: PathBuf,
    description: String,
    last_error: Option<String>,
    last_modified: Option<SystemTime>,
    force_read: bool,
}

impl FileSource {
    /// Create a new file source for the given path.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let description = format!("file: {}", path.display());
        Self {
            path,
            description,
            last_error: None,
            last_modified: None,
            force_read: true,
        }
    }

    /// Returns the path being replayed.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn modified_time(&self) -> Option<SystemTime> {
        fs::metadata(&self.path).ok()?.modified().ok()
    }

    fn read_file(&self) -> Result<LatencyReport, String> {
        let content = fs::read_to_string(&self.path).map_err(|e| format!("Read error: {}", e))?;
        serde_json::from_str(&content).map_err(|e| format!("Parse error: {}", e))
    }

    /// Record a failure, reporting it only when it differs from the last one.
    fn fail(&mut self, reason: String) -> Option<FeedUpdate> {
        if self.last_error.as_deref() == Some(reason.as_str()) {
            return None;
        }
        debug!(path = %self.path.display(), error = %reason, "Report file unavailable");
        self.last_error = Some(reason.clone());
        Some(FeedUpdate::Failed(reason))
    }
}

impl DataSource for FileSource {
    fn poll(&mut self) -> Option<FeedUpdate> {
        let current_modified = self.modified_time();

        let file_changed = match (&self.last_modified, &current_modified) {
            _ if self.force_read => true,
            (None, _) => true,
            // vanished after a successful read
            (Some(_), None) => true,
            (Some(last), Some(current)) => current > last,
        };

        if !file_changed {
            return None;
        }
        self.force_read = false;

        match self.read_file() {
            Ok(report) => {
                self.last_error = None;
                self.last_modified = current_modified;
                Some(FeedUpdate::Report(report))
            }
            Err(reason) => {
                if current_modified.is_none() {
                    self.last_modified = None;
                }
                self.fail(reason)
            }
        }
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    fn request_refresh(&mut self) {
        self.force_read = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn sample_json() -> &'static str {
        r#"{
            "fetchedAt": 1700000000000,
            "measurements": [
                {"id": "kraken-newark", "name": "Kraken", "provider": "GCP",
                 "latencyMs": 61, "success": true, "status": 200}
            ]
        }"#
    }

    #[test]
    fn test_file_source_new() {
        let source = FileSource::new("/tmp/latency.json");
        assert_eq!(source.path(), Path::new("/tmp/latency.json"));
        assert_eq!(source.description(), "file: /tmp/latency.json");
        assert!(source.error().is_none());
    }

    #[test]
    fn test_file_source_poll_reads_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{}", sample_json()).unwrap();

        let mut source = FileSource::new(file.path());

        match source.poll() {
            Some(FeedUpdate::Report(report)) => {
                assert_eq!(report.fetched_at, 1_700_000_000_000);
                assert_eq!(report.get("kraken-newark").unwrap().latency_ms, 61);
            }
            other => panic!("unexpected update: {other:?}"),
        }

        // Unchanged file
        assert!(source.poll().is_none());
    }

    #[test]
    fn test_request_refresh_rereads() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{}", sample_json()).unwrap();

        let mut source = FileSource::new(file.path());
        assert!(source.poll().is_some());
        assert!(source.poll().is_none());

        source.request_refresh();
        assert!(matches!(source.poll(), Some(FeedUpdate::Report(_))));
    }

    #[test]
    fn test_file_source_missing_file() {
        let mut source = FileSource::new("/nonexistent/path/latency.json");

        assert!(matches!(source.poll(), Some(FeedUpdate::Failed(_))));
        assert!(source.error().unwrap().contains("Read error"));

        // Same failure is not reported twice
        assert!(source.poll().is_none());
        assert!(source.error().is_some());
    }

    #[test]
    fn test_deleted_file_is_reported_once() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{}", sample_json()).unwrap();
        let path = file.path().to_path_buf();

        let mut source = FileSource::new(&path);
        assert!(matches!(source.poll(), Some(FeedUpdate::Report(_))));

        drop(file);
        match source.poll() {
            Some(FeedUpdate::Failed(reason)) => assert!(reason.contains("Read error")),
            other => panic!("unexpected update: {other:?}"),
        }
        assert!(source.poll().is_none());
        assert!(source.error().is_some());

        // Reappearing file is picked up again
        std::fs::write(&path, sample_json()).unwrap();
        assert!(matches!(source.poll(), Some(FeedUpdate::Report(_))));
        assert!(source.error().is_none());
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_file_source_invalid_json() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "not valid json").unwrap();

        let mut source = FileSource::new(file.path());

        match source.poll() {
            Some(FeedUpdate::Failed(reason)) => assert!(reason.contains("Parse error")),
            other => panic!("unexpected update: {other:?}"),
        }
    }
}
