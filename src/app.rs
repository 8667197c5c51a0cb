//! Application state and navigation logic.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::Result;
use latencyscope_types::LatencyLink;
use serde_json::json;
use tracing::info;

use crate::catalog::Region;
use crate::data::{LatencyStore, TimeWindow};
use crate::source::{DataSource, FeedUpdate};
use crate::synth::Synthesizer;
use crate::ui::links::{sort_links_by, SortColumn};
use crate::ui::Theme;

/// Default file written by the in-app export key.
pub const DEFAULT_EXPORT_PATH: &str = "latencyscope-export.json";

/// How long a status message stays visible.
const STATUS_MESSAGE_TTL: Duration = Duration::from_secs(3);

/// The current view/tab in the TUI.
///
/// Link detail is shown as an overlay (controlled by `App::show_detail_overlay`)
/// rather than as a separate view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Synthesized links with latency, band and status.
    Links,
    /// Cloud region overview.
    Regions,
    /// Latency trend of the selected link.
    History,
}

impl View {
    pub fn next(self) -> Self {
        match self {
            View::Links => View::Regions,
            View::Regions => View::History,
            View::History => View::Links,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            View::Links => View::History,
            View::Regions => View::Links,
            View::History => View::Regions,
        }
    }

    /// Returns the display label for this view.
    pub fn label(&self) -> &'static str {
        match self {
            View::Links => "Links",
            View::Regions => "Regions",
            View::History => "History",
        }
    }
}

/// Main application state.
pub struct App {
    pub running: bool,
    pub current_view: View,
    pub show_help: bool,
    pub show_detail_overlay: bool,

    // Data
    source: Box<dyn DataSource>,
    synthesizer: Synthesizer,
    pub store: LatencyStore,
    /// Cadence of the feed, shown in the header.
    pub poll_interval: Duration,

    // Navigation state
    pub selected_link_index: usize,
    pub selected_region_index: usize,

    // Sorting (Links view)
    pub sort_column: SortColumn,
    pub sort_ascending: bool,

    /// Whether keystrokes currently edit the search text.
    pub search_active: bool,
    pub history_window: TimeWindow,

    // UI
    pub theme: Theme,
    pub status_message: Option<(String, Instant)>,
    pub export_path: PathBuf,
}

impl App {
    /// Create a new App with a theme matching the terminal background.
    pub fn new(
        source: Box<dyn DataSource>,
        synthesizer: Synthesizer,
        store: LatencyStore,
        poll_interval: Duration,
    ) -> Self {
        Self::with_theme(source, synthesizer, store, poll_interval, Theme::auto_detect())
    }

    pub fn with_theme(
        source: Box<dyn DataSource>,
        synthesizer: Synthesizer,
        store: LatencyStore,
        poll_interval: Duration,
        theme: Theme,
    ) -> Self {
        Self {
            running: true,
            current_view: View::Links,
            show_help: false,
            show_detail_overlay: false,
            source,
            synthesizer,
            store,
            poll_interval,
            selected_link_index: 0,
            selected_region_index: 0,
            sort_column: SortColumn::default(),
            sort_ascending: true,
            search_active: false,
            history_window: TimeWindow::default(),
            theme,
            status_message: None,
            export_path: PathBuf::from(DEFAULT_EXPORT_PATH),
        }
    }

    pub fn source_description(&self) -> &str {
        self.source.description()
    }

    /// Set a temporary status message that will be shown for a few seconds.
    pub fn set_status_message(&mut self, message: impl Into<String>) {
        self.status_message = Some((message.into(), Instant::now()));
    }

    /// Get the current status message if it hasn't expired.
    pub fn get_status_message(&self) -> Option<&str> {
        match &self.status_message {
            Some((msg, time)) if time.elapsed() < STATUS_MESSAGE_TTL => Some(msg),
            _ => None,
        }
    }

    /// Poll the data source and fold whatever arrived into the store.
    ///
    /// Returns true when a new snapshot was applied.
    pub fn reload_data(&mut self) -> bool {
        match self.source.poll() {
            Some(FeedUpdate::Report(report)) => {
                let snapshot = self.synthesizer.synthesize(&report);
                self.store.apply_snapshot(snapshot);
                self.clamp_selection();
                true
            }
            Some(FeedUpdate::Failed(reason)) => {
                self.store.mark_unavailable(reason);
                false
            }
            None => false,
        }
    }

    /// Ask the source for an immediate cycle.
    pub fn request_refresh(&mut self) {
        self.source.request_refresh();
        self.set_status_message("Refreshing…");
    }

    fn clamp_selection(&mut self) {
        let links = self.visible_links().len();
        if self.selected_link_index >= links {
            self.selected_link_index = links.saturating_sub(1);
        }
        let regions = self.store.visible_regions().len();
        if self.selected_region_index >= regions {
            self.selected_region_index = regions.saturating_sub(1);
        }
    }

    /// Filtered links in display order.
    pub fn visible_links(&self) -> Vec<&LatencyLink> {
        let mut links = self.store.filtered_links();
        sort_links_by(&mut links, self.sort_column, self.sort_ascending);
        links
    }

    pub fn selected_link(&self) -> Option<&LatencyLink> {
        self.visible_links().get(self.selected_link_index).copied()
    }

    pub fn selected_region(&self) -> Option<&Region> {
        self.store.visible_regions().get(self.selected_region_index).copied()
    }

    pub fn next_view(&mut self) {
        self.current_view = self.current_view.next();
    }

    pub fn prev_view(&mut self) {
        self.current_view = self.current_view.prev();
    }

    pub fn set_view(&mut self, view: View) {
        self.current_view = view;
    }

    pub fn select_next(&mut self) {
        self.select_next_n(1);
    }

    pub fn select_prev(&mut self) {
        self.select_prev_n(1);
    }

    /// Move selection down by n items.
    pub fn select_next_n(&mut self, n: usize) {
        match self.current_view {
            View::Links | View::History => {
                let max = self.visible_links().len().saturating_sub(1);
                self.selected_link_index = (self.selected_link_index + n).min(max);
            }
            View::Regions => {
                let max = self.store.visible_regions().len().saturating_sub(1);
                self.selected_region_index = (self.selected_region_index + n).min(max);
            }
        }
    }

    /// Move selection up by n items.
    pub fn select_prev_n(&mut self, n: usize) {
        match self.current_view {
            View::Links | View::History => {
                self.selected_link_index = self.selected_link_index.saturating_sub(n);
            }
            View::Regions => {
                self.selected_region_index = self.selected_region_index.saturating_sub(n);
            }
        }
    }

    pub fn select_first(&mut self) {
        match self.current_view {
            View::Links | View::History => self.selected_link_index = 0,
            View::Regions => self.selected_region_index = 0,
        }
    }

    pub fn select_last(&mut self) {
        match self.current_view {
            View::Links | View::History => {
                self.selected_link_index = self.visible_links().len().saturating_sub(1);
            }
            View::Regions => {
                self.selected_region_index = self.store.visible_regions().len().saturating_sub(1);
            }
        }
    }

    /// Open the detail overlay for the currently selected link.
    pub fn enter_detail(&mut self) {
        if self.current_view != View::Regions && self.selected_link().is_some() {
            self.show_detail_overlay = true;
        }
    }

    /// Navigate back: close overlay first, then return to the Links view.
    pub fn go_back(&mut self) {
        if self.show_detail_overlay {
            self.show_detail_overlay = false;
        } else if self.current_view != View::Links {
            self.current_view = View::Links;
        }
    }

    pub fn close_overlay(&mut self) {
        self.show_detail_overlay = false;
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    pub fn cycle_sort(&mut self) {
        self.sort_column = self.sort_column.next();
    }

    pub fn toggle_sort_direction(&mut self) {
        self.sort_ascending = !self.sort_ascending;
    }

    /// Enter search input mode (starts capturing keystrokes).
    pub fn start_search(&mut self) {
        self.search_active = true;
    }

    /// Exit search input mode without clearing the search text.
    pub fn cancel_search(&mut self) {
        self.search_active = false;
    }

    pub fn clear_search(&mut self) {
        self.store.update_filters(|f| f.search.clear());
        self.search_active = false;
        self.clamp_selection();
    }

    pub fn search_push(&mut self, c: char) {
        self.store.update_filters(|f| f.search.push(c));
        self.clamp_selection();
    }

    pub fn search_pop(&mut self) {
        self.store.update_filters(|f| {
            f.search.pop();
        });
        self.clamp_selection();
    }

    pub fn cycle_provider(&mut self) {
        self.store.update_filters(|f| f.cycle_provider());
        let label = self
            .store
            .filters()
            .provider
            .map(|p| p.label())
            .unwrap_or("all");
        self.set_status_message(format!("Provider: {}", label));
        self.clamp_selection();
    }

    /// Step the exchange filter through the exchanges that pass the provider filter.
    pub fn cycle_exchange(&mut self) {
        let ids: Vec<String> = self
            .store
            .visible_exchanges()
            .iter()
            .map(|e| e.id.clone())
            .collect();
        self.store
            .update_filters(|f| f.cycle_exchange(ids.iter().map(String::as_str)));

        let label = match self.store.filters().exchange.as_deref() {
            Some(id) => self.store.catalog().display_name(id).unwrap_or(id).to_string(),
            None => "all".to_string(),
        };
        self.set_status_message(format!("Exchange: {}", label));
        self.clamp_selection();
    }

    pub fn nudge_range_min(&mut self, delta: i32) {
        self.store.update_filters(|f| f.range.nudge_min(delta));
        self.clamp_selection();
    }

    pub fn nudge_range_max(&mut self, delta: i32) {
        self.store.update_filters(|f| f.range.nudge_max(delta));
        self.clamp_selection();
    }

    pub fn toggle_realtime_layer(&mut self) {
        self.store.update_filters(|f| f.layers.realtime = !f.layers.realtime);
        self.clamp_selection();
    }

    pub fn toggle_historical_layer(&mut self) {
        self.store.update_filters(|f| f.layers.historical = !f.layers.historical);
    }

    pub fn toggle_region_layer(&mut self) {
        self.store.update_filters(|f| f.layers.regions = !f.layers.regions);
        self.clamp_selection();
    }

    pub fn reset_filters(&mut self) {
        self.store.reset_filters();
        self.search_active = false;
        self.set_status_message("Filters reset");
    }

    pub fn cycle_history_window(&mut self) {
        self.history_window = self.history_window.next();
    }

    /// Signal the application to quit.
    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Export current state to a file.
    pub fn export_state(&self, path: &Path) -> Result<()> {
        write_export(&self.store, path)
    }
}

/// Serialize the store's current snapshot as a JSON document.
pub fn export_document(store: &LatencyStore) -> serde_json::Value {
    let summary = store.summary();
    let mut export = serde_json::Map::new();

    export.insert(
        "feedState".to_string(),
        json!(format!("{:?}", store.feed_state()).to_lowercase()),
    );
    export.insert("lastUpdated".to_string(), json!(store.last_updated()));
    if let Some(error) = store.last_error() {
        export.insert("error".to_string(), json!(error));
    }
    export.insert(
        "summary".to_string(),
        json!({
            "activePaths": summary.active_paths,
            "healthy": summary.healthy,
            "hot": summary.hot,
        }),
    );
    export.insert("stats".to_string(), json!(store.stats()));
    export.insert("links".to_string(), json!(store.links()));

    serde_json::Value::Object(export)
}

/// Write [`export_document`] to `path` as pretty JSON.
pub fn write_export(store: &LatencyStore, path: &Path) -> Result<()> {
    if store.snapshot().is_none() {
        anyhow::bail!("No data to export");
    }

    let json = serde_json::to_string_pretty(&export_document(store))?;
    std::fs::write(path, json)?;
    info!(path = %path.display(), links = store.links().len(), "Exported snapshot");
    Ok(())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::source::ChannelSource;
    use crate::synth::FixedJitter;
    use latencyscope_types::{CloudProvider, LatencyReport, Measurement};
    use std::sync::Arc;
    use tokio::sync::watch;

    pub(crate) fn app() -> (watch::Sender<Option<FeedUpdate>>, App) {
        let catalog = Arc::new(Catalog::builtin());
        let (tx, source) = ChannelSource::create("test feed");
        let synthesizer = Synthesizer::new(catalog.clone(), Box::new(FixedJitter(0.0)));
        let store = LatencyStore::new(catalog, 240);
        let app = App::with_theme(
            Box::new(source),
            synthesizer,
            store,
            Duration::from_secs(10),
            Theme::dark(),
        );
        (tx, app)
    }

    pub(crate) fn report(fetched_at: u64) -> FeedUpdate {
        FeedUpdate::Report(LatencyReport::new(
            fetched_at,
            vec![
                Measurement::success("binance-tokyo", "Binance", CloudProvider::Aws, 40, 200),
                Measurement::success("okx-hongkong", "OKX", CloudProvider::Gcp, 120, 200),
            ],
        ))
    }

    #[test]
    fn test_view_cycle() {
        assert_eq!(View::Links.next(), View::Regions);
        assert_eq!(View::History.next(), View::Links);
        assert_eq!(View::Links.prev(), View::History);
        assert_eq!(View::Regions.label(), "Regions");
    }

    #[test]
    fn test_reload_applies_report() {
        let (tx, mut app) = app();
        assert!(!app.reload_data());

        tx.send(Some(report(1000))).unwrap();
        assert!(app.reload_data());
        assert_eq!(app.store.links().len(), 16);
        assert_eq!(app.store.last_updated(), Some(1000));

        // Nothing new since the last poll.
        assert!(!app.reload_data());
    }

    #[test]
    fn test_failure_keeps_snapshot() {
        let (tx, mut app) = app();
        tx.send(Some(report(1000))).unwrap();
        app.reload_data();

        tx.send(Some(FeedUpdate::Failed("Connection failed".to_string()))).unwrap();
        assert!(!app.reload_data());
        assert_eq!(app.store.feed_state(), crate::data::FeedState::Stale);
        assert_eq!(app.store.links().len(), 16);
        assert_eq!(app.store.last_error(), Some("Connection failed"));
    }

    #[test]
    fn test_selection_is_clamped_by_filters() {
        let (tx, mut app) = app();
        tx.send(Some(report(1000))).unwrap();
        app.reload_data();

        app.select_last();
        assert_eq!(app.selected_link_index, 15);

        app.search_push('z');
        app.search_push('z');
        app.search_push('z');
        assert!(app.visible_links().is_empty());
        assert_eq!(app.selected_link_index, 0);
        assert!(app.selected_link().is_none());

        app.clear_search();
        assert_eq!(app.visible_links().len(), 16);
    }

    #[test]
    fn test_navigation_bounds() {
        let (tx, mut app) = app();
        tx.send(Some(report(1000))).unwrap();
        app.reload_data();

        app.select_prev();
        assert_eq!(app.selected_link_index, 0);
        app.select_next_n(100);
        assert_eq!(app.selected_link_index, 15);

        app.set_view(View::Regions);
        app.select_next_n(100);
        assert_eq!(app.selected_region_index, 10);
        app.select_first();
        assert_eq!(app.selected_region_index, 0);
        assert!(app.selected_region().is_some());
    }

    #[test]
    fn test_detail_overlay_and_back() {
        let (tx, mut app) = app();
        app.enter_detail();
        assert!(!app.show_detail_overlay, "no link selected yet");

        tx.send(Some(report(1000))).unwrap();
        app.reload_data();
        app.enter_detail();
        assert!(app.show_detail_overlay);

        app.set_view(View::History);
        app.go_back();
        assert!(!app.show_detail_overlay);
        assert_eq!(app.current_view, View::History);
        app.go_back();
        assert_eq!(app.current_view, View::Links);
    }

    #[test]
    fn test_filter_controls() {
        let (tx, mut app) = app();
        tx.send(Some(report(1000))).unwrap();
        app.reload_data();

        app.cycle_provider();
        assert_eq!(app.store.filters().provider, Some(CloudProvider::Aws));
        assert!(app.visible_links().iter().all(|l| l.provider == CloudProvider::Aws));

        app.cycle_exchange();
        let exchange = app.store.filters().exchange.clone().unwrap();
        assert_eq!(app.store.catalog().exchange(&exchange).unwrap().provider, CloudProvider::Aws);

        app.toggle_realtime_layer();
        assert!(app.visible_links().is_empty());

        app.reset_filters();
        assert!(app.store.filters().is_default());
        assert_eq!(app.get_status_message(), Some("Filters reset"));
    }

    #[test]
    fn test_export_state() {
        let (tx, mut app) = app();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("export.json");

        assert!(app.export_state(&path).is_err());

        tx.send(Some(report(1000))).unwrap();
        app.reload_data();
        app.export_state(&path).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["feedState"], "live");
        assert_eq!(value["lastUpdated"], 1000);
        assert_eq!(value["links"].as_array().unwrap().len(), 16);
        assert_eq!(value["summary"]["activePaths"], 16);
        assert!(value.get("error").is_none());
    }
}
