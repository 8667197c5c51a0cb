//! Per-link latency history for trend sparklines and the history chart.

use std::collections::{HashMap, VecDeque};

use latencyscope_types::{HistoricalPoint, Snapshot};

/// Default number of points kept per link.
pub const DEFAULT_HISTORY_POINTS: usize = 240;

const MS_PER_HOUR: u64 = 60 * 60 * 1000;

/// Look-back window for the history chart, relative to the newest snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeWindow {
    #[default]
    Hour,
    Day,
    Week,
    Month,
}

impl TimeWindow {
    pub const ALL: [TimeWindow; 4] = [
        TimeWindow::Hour,
        TimeWindow::Day,
        TimeWindow::Week,
        TimeWindow::Month,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            TimeWindow::Hour => "1H",
            TimeWindow::Day => "24H",
            TimeWindow::Week => "7D",
            TimeWindow::Month => "30D",
        }
    }

    pub fn span_ms(&self) -> u64 {
        match self {
            TimeWindow::Hour => MS_PER_HOUR,
            TimeWindow::Day => 24 * MS_PER_HOUR,
            TimeWindow::Week => 7 * 24 * MS_PER_HOUR,
            TimeWindow::Month => 30 * 24 * MS_PER_HOUR,
        }
    }

    pub fn next(&self) -> Self {
        match self {
            TimeWindow::Hour => TimeWindow::Day,
            TimeWindow::Day => TimeWindow::Week,
            TimeWindow::Week => TimeWindow::Month,
            TimeWindow::Month => TimeWindow::Hour,
        }
    }
}

/// Min, max and integer mean of a set of points. Zeros when empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WindowStats {
    pub min: u32,
    pub max: u32,
    pub avg: u32,
}

impl WindowStats {
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a HistoricalPoint>) -> Self {
        let mut count = 0u64;
        let mut sum = 0u64;
        let mut min = u32::MAX;
        let mut max = 0u32;

        for point in points {
            count += 1;
            sum += u64::from(point.latency_ms);
            min = min.min(point.latency_ms);
            max = max.max(point.latency_ms);
        }

        if count == 0 {
            return Self::default();
        }

        Self {
            min,
            max,
            avg: (sum as f64 / count as f64).round() as u32,
        }
    }
}

/// Bounded FIFO of points for one link.
///
/// New points go on the tail; once the cap is exceeded the oldest point is
/// dropped from the head.
#[derive(Debug, Clone)]
pub struct HistoricalSeries {
    points: VecDeque<HistoricalPoint>,
    capacity: usize,
}

impl HistoricalSeries {
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            points: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, point: HistoricalPoint) {
        self.points.push_back(point);
        while self.points.len() > self.capacity {
            self.points.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn latest(&self) -> Option<&HistoricalPoint> {
        self.points.back()
    }

    pub fn iter(&self) -> impl Iterator<Item = &HistoricalPoint> {
        self.points.iter()
    }

    /// Points no older than `window` before `now_ms`.
    pub fn window(
        &self,
        window: TimeWindow,
        now_ms: u64,
    ) -> impl Iterator<Item = &HistoricalPoint> {
        let cutoff = now_ms.saturating_sub(window.span_ms());
        self.points.iter().filter(move |p| p.timestamp >= cutoff)
    }
}

/// Tracks one [`HistoricalSeries`] per link id.
#[derive(Debug, Clone)]
pub struct History {
    series: HashMap<String, HistoricalSeries>,
    capacity: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_POINTS)
    }
}

impl History {
    pub fn new(capacity: usize) -> Self {
        Self {
            series: HashMap::new(),
            capacity,
        }
    }

    /// Append one point per link, stamped with the snapshot's timestamp.
    pub fn record(&mut self, snapshot: &Snapshot) {
        for link in &snapshot.links {
            let capacity = self.capacity;
            self.series
                .entry(link.id.clone())
                .or_insert_with(|| HistoricalSeries::with_capacity(capacity))
                .push(HistoricalPoint {
                    timestamp: snapshot.last_updated,
                    latency_ms: link.latency_ms,
                    link_id: link.id.clone(),
                });
        }
    }

    pub fn series(&self, link_id: &str) -> Option<&HistoricalSeries> {
        self.series.get(link_id)
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Points of `link_id` inside `window`, oldest first.
    pub fn window(&self, link_id: &str, window: TimeWindow, now_ms: u64) -> Vec<&HistoricalPoint> {
        self.series(link_id)
            .map(|s| s.window(window, now_ms).collect())
            .unwrap_or_default()
    }

    pub fn window_stats(&self, link_id: &str, window: TimeWindow, now_ms: u64) -> WindowStats {
        WindowStats::from_points(self.window(link_id, window, now_ms))
    }

    /// Latest `width` latencies normalized to 0-7 for 8 bar levels.
    ///
    /// Returns an empty Vec if there's not enough history.
    pub fn sparkline(&self, link_id: &str, width: usize) -> Vec<u8> {
        let Some(series) = self.series(link_id) else {
            return Vec::new();
        };
        if series.len() < 2 {
            return Vec::new();
        }

        let skip = series.len().saturating_sub(width);
        let values: Vec<u32> = series.iter().skip(skip).map(|p| p.latency_ms).collect();

        let max = values.iter().copied().max().unwrap_or(0);
        let min = values.iter().copied().min().unwrap_or(0);
        let range = (max - min).max(1) as f64;

        values
            .iter()
            .map(|&v| {
                let normalized = ((v - min) as f64 / range * 7.0).round() as u8;
                normalized.min(7)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use latencyscope_types::{
        CloudProvider, Coords, LatencyBand, LatencyLink, LinkStats, LinkStatus,
    };

    fn point(ts: u64, latency: u32) -> HistoricalPoint {
        HistoricalPoint {
            timestamp: ts,
            latency_ms: latency,
            link_id: "l".to_string(),
        }
    }

    fn snapshot(ts: u64, latencies: &[(&str, u32)]) -> Snapshot {
        Snapshot {
            links: latencies
                .iter()
                .map(|(id, latency)| LatencyLink {
                    id: id.to_string(),
                    from_id: "a".to_string(),
                    to_id: "b".to_string(),
                    from_coords: Coords::ORIGIN,
                    to_coords: Coords::ORIGIN,
                    provider: CloudProvider::Aws,
                    latency_ms: *latency,
                    band: LatencyBand::Low,
                    status: LinkStatus::Healthy,
                    label: "A → B".to_string(),
                })
                .collect(),
            stats: LinkStats::default(),
            last_updated: ts,
        }
    }

    #[test]
    fn test_series_drops_exactly_the_oldest() {
        let mut series = HistoricalSeries::with_capacity(3);
        for i in 0..4 {
            series.push(point(i, 10 + i as u32));
        }
        let timestamps: Vec<u64> = series.iter().map(|p| p.timestamp).collect();
        assert_eq!(timestamps, vec![1, 2, 3]);
        assert_eq!(series.latest().unwrap().latency_ms, 13);
    }

    #[test]
    fn test_default_capacity() {
        let mut history = History::default();
        for ts in 0..300 {
            history.record(&snapshot(ts, &[("x", 50)]));
        }
        let series = history.series("x").unwrap();
        assert_eq!(series.len(), DEFAULT_HISTORY_POINTS);
        assert_eq!(series.iter().next().unwrap().timestamp, 60);
    }

    #[test]
    fn test_record_uses_snapshot_timestamp() {
        let mut history = History::new(10);
        history.record(&snapshot(1000, &[("x", 50), ("y", 70)]));
        history.record(&snapshot(2000, &[("x", 55)]));

        assert_eq!(history.len(), 2);
        let x: Vec<(u64, u32)> =
            history.series("x").unwrap().iter().map(|p| (p.timestamp, p.latency_ms)).collect();
        assert_eq!(x, vec![(1000, 50), (2000, 55)]);
        assert_eq!(history.series("y").unwrap().len(), 1);
        assert!(history.series("z").is_none());
    }

    #[test]
    fn test_window_is_relative_to_now() {
        let mut history = History::new(10);
        let hour = TimeWindow::Hour.span_ms();
        history.record(&snapshot(0, &[("x", 200)]));
        history.record(&snapshot(2 * hour, &[("x", 40)]));
        history.record(&snapshot(2 * hour + 1000, &[("x", 60)]));

        let now = 2 * hour + 1000;
        assert_eq!(history.window("x", TimeWindow::Hour, now).len(), 2);
        assert_eq!(history.window("x", TimeWindow::Day, now).len(), 3);
        assert!(history.window("missing", TimeWindow::Day, now).is_empty());

        let stats = history.window_stats("x", TimeWindow::Hour, now);
        assert_eq!(stats, WindowStats { min: 40, max: 60, avg: 50 });
    }

    #[test]
    fn test_window_stats_round_and_zero() {
        let points = [point(0, 10), point(1, 11)];
        assert_eq!(WindowStats::from_points(&points).avg, 11);
        assert_eq!(WindowStats::from_points(&[]), WindowStats::default());
    }

    #[test]
    fn test_time_window_cycle() {
        let mut w = TimeWindow::default();
        let mut labels = Vec::new();
        for _ in 0..4 {
            labels.push(w.label());
            w = w.next();
        }
        assert_eq!(labels, vec!["1H", "24H", "7D", "30D"]);
        assert_eq!(w, TimeWindow::Hour);
    }

    #[test]
    fn test_sparkline_normalization() {
        let mut history = History::new(10);
        assert!(history.sparkline("x", 8).is_empty());

        for (ts, latency) in [(1, 100), (2, 150), (3, 200)] {
            history.record(&snapshot(ts, &[("x", latency)]));
        }
        assert_eq!(history.sparkline("x", 8), vec![0, 4, 7]);
        // only the most recent points
        assert_eq!(history.sparkline("x", 2), vec![0, 7]);
    }

    #[test]
    fn test_sparkline_flat_series() {
        let mut history = History::new(10);
        history.record(&snapshot(1, &[("x", 80)]));
        history.record(&snapshot(2, &[("x", 80)]));
        assert_eq!(history.sparkline("x", 8), vec![0, 0]);
    }
}
