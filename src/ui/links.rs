//! Links view rendering.
//!
//! Displays the filtered links of the current snapshot with latency, band,
//! status and a sparkline of recent samples.

use latencyscope_types::{CloudProvider, LatencyBand, LatencyLink};
use ratatui::{
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::app::App;
use crate::data::{FilterState, LatencyRange};
use crate::synth::{haversine_km, BAND_LOW_BELOW_MS, BAND_MEDIUM_BELOW_MS};
use crate::ui::Theme;

/// Sparkline characters (8 levels of height).
pub const SPARKLINE_CHARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

const SPARKLINE_WIDTH: usize = 8;

/// Column to sort by in the Links view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortColumn {
    #[default]
    Route,
    Provider,
    Latency,
    Status,
}

impl SortColumn {
    pub fn next(self) -> Self {
        match self {
            SortColumn::Route => SortColumn::Provider,
            SortColumn::Provider => SortColumn::Latency,
            SortColumn::Latency => SortColumn::Status,
            SortColumn::Status => SortColumn::Route,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            SortColumn::Route => "route",
            SortColumn::Provider => "provider",
            SortColumn::Latency => "latency",
            SortColumn::Status => "status",
        }
    }
}

/// Render the Links view as a sortable table.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));

    let filters = app.store.filters();
    if !filters.layers.realtime {
        let paragraph = Paragraph::new(" Real-time layer hidden (t to show)")
            .style(Style::default().add_modifier(Modifier::DIM))
            .block(block.title(" Links "));
        frame.render_widget(paragraph, area);
        return;
    }

    let links = app.visible_links();
    let total = app.store.links().len();

    let header = Row::new(vec![
        Cell::from(format_header("Route", SortColumn::Route, app)),
        Cell::from(format_header("Provider", SortColumn::Provider, app)),
        Cell::from(format_header("Latency", SortColumn::Latency, app)),
        Cell::from("Band"),
        Cell::from("Distance"),
        Cell::from("Trend"),
        Cell::from(format_header("Status", SortColumn::Status, app)),
    ])
    .height(1)
    .style(app.theme.header);

    let rows: Vec<Row> = links
        .iter()
        .map(|link| {
            let band_style = app.theme.band_style(link.band);
            let trend = if filters.layers.historical {
                render_sparkline(&app.store.history().sparkline(&link.id, SPARKLINE_WIDTH))
            } else {
                String::new()
            };
            let km = haversine_km(link.from_coords, link.to_coords);

            Row::new(vec![
                Cell::from(link.label.clone()),
                Cell::from(link.provider.label()).style(app.theme.provider_style(link.provider)),
                Cell::from(format!("{} ms", link.latency_ms)).style(band_style),
                Cell::from(link.band.label()).style(band_style),
                Cell::from(format!("{:.0} km", km)),
                Cell::from(trend).style(band_style),
                Cell::from(link.status.symbol()).style(app.theme.status_style(link.status)),
            ])
        })
        .collect();

    let widths = [
        Constraint::Fill(4),
        Constraint::Fill(1),
        Constraint::Fill(1),
        Constraint::Fill(1),
        Constraint::Fill(1),
        Constraint::Min(8),
        Constraint::Min(6),
    ];

    let selected = app.selected_link_index.min(links.len().saturating_sub(1));
    let sort_dir = if app.sort_ascending { "↑" } else { "↓" };

    let position_info = if !links.is_empty() {
        format!(" [{}/{}]", selected + 1, links.len())
    } else {
        String::new()
    };

    let title = format!(
        " Links ({}/{}) [s:sort {}{}]{}{} ",
        links.len(),
        total,
        app.sort_column.label(),
        sort_dir,
        filter_summary(filters, app),
        position_info
    );

    let table = Table::new(rows, widths)
        .header(header)
        .block(block.title(title).title_bottom(legend_line(&app.theme)))
        .row_highlight_style(app.theme.selected)
        .highlight_symbol("▶ ");

    let mut state = TableState::default();
    state.select(Some(selected));

    frame.render_stateful_widget(table, area, &mut state);
}

/// Band cut-offs and provider colours, e.g. ` <90 ms  90-180 ms  >180 ms │ AWS GCP Azure `.
pub fn legend_line(theme: &Theme) -> Line<'static> {
    let bands = [
        (LatencyBand::Low, format!("<{} ms", BAND_LOW_BELOW_MS)),
        (LatencyBand::Medium, format!("{}-{} ms", BAND_LOW_BELOW_MS, BAND_MEDIUM_BELOW_MS)),
        (LatencyBand::High, format!(">{} ms", BAND_MEDIUM_BELOW_MS)),
    ];

    let mut spans = vec![Span::raw(" ")];
    for (band, text) in bands {
        spans.push(Span::styled(format!("■ {}", text), theme.band_style(band)));
        spans.push(Span::raw("  "));
    }
    spans.push(Span::raw("│ "));
    for provider in CloudProvider::ALL {
        spans.push(Span::styled(provider.label(), theme.provider_style(provider)));
        spans.push(Span::raw(" "));
    }
    Line::from(spans)
}

/// Short description of the non-default filters for a block title.
pub fn filter_summary(filters: &FilterState, app: &App) -> String {
    let mut parts = Vec::new();
    if let Some(provider) = filters.provider {
        parts.push(provider.label().to_string());
    }
    if let Some(id) = filters.exchange.as_deref() {
        parts.push(app.store.catalog().display_name(id).unwrap_or(id).to_string());
    }
    if filters.range != LatencyRange::default() {
        parts.push(format!("{}-{} ms", filters.range.min(), filters.range.max()));
    }
    if !filters.search.is_empty() {
        parts.push(format!("/{}/", filters.search));
    }

    if parts.is_empty() {
        String::new()
    } else {
        format!(" {{{}}}", parts.join(" "))
    }
}

fn format_header(name: &str, col: SortColumn, app: &App) -> Span<'static> {
    if app.sort_column == col {
        let arrow = if app.sort_ascending { "↑" } else { "↓" };
        Span::raw(format!("{}{}", name, arrow))
    } else {
        Span::raw(name.to_string())
    }
}

/// Sort links by the given column and direction. Ties fall back to the link id.
pub fn sort_links_by(links: &mut [&LatencyLink], column: SortColumn, ascending: bool) {
    links.sort_by(|a, b| {
        let primary = match column {
            SortColumn::Route => a.label.cmp(&b.label),
            SortColumn::Provider => a.provider.label().cmp(b.provider.label()),
            SortColumn::Latency => a.latency_ms.cmp(&b.latency_ms),
            SortColumn::Status => a.status.cmp(&b.status),
        };

        let primary = if ascending { primary } else { primary.reverse() };

        if primary == std::cmp::Ordering::Equal {
            a.id.cmp(&b.id)
        } else {
            primary
        }
    });
}

/// One bar per level. Blank placeholder when there is no history yet.
pub fn render_sparkline(data: &[u8]) -> String {
    if data.is_empty() {
        return " ".repeat(SPARKLINE_WIDTH);
    }

    data.iter().map(|&v| SPARKLINE_CHARS[v.min(7) as usize]).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use latencyscope_types::{CloudProvider, Coords, LatencyBand, LinkStatus};

    fn link(id: &str, label: &str, provider: CloudProvider, latency_ms: u32) -> LatencyLink {
        LatencyLink {
            id: id.to_string(),
            from_id: "a".to_string(),
            to_id: "b".to_string(),
            from_coords: Coords::ORIGIN,
            to_coords: Coords::ORIGIN,
            provider,
            latency_ms,
            band: LatencyBand::Low,
            status: LinkStatus::Healthy,
            label: label.to_string(),
        }
    }

    #[test]
    fn test_sort_by_latency_with_id_tiebreak() {
        let a = link("a", "Zeta", CloudProvider::Aws, 50);
        let b = link("b", "Alpha", CloudProvider::Gcp, 20);
        let c = link("c", "Beta", CloudProvider::Azure, 50);
        let mut links = vec![&a, &b, &c];

        sort_links_by(&mut links, SortColumn::Latency, true);
        let ids: Vec<&str> = links.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, ["b", "a", "c"]);

        sort_links_by(&mut links, SortColumn::Latency, false);
        let ids: Vec<&str> = links.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, ["a", "c", "b"]);

        sort_links_by(&mut links, SortColumn::Route, true);
        let ids: Vec<&str> = links.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, ["b", "c", "a"]);
    }

    #[test]
    fn test_sort_column_cycles() {
        let mut col = SortColumn::default();
        for _ in 0..4 {
            col = col.next();
        }
        assert_eq!(col, SortColumn::Route);
    }

    #[test]
    fn test_legend_shows_band_cutoffs_and_providers() {
        let theme = Theme::dark();
        let legend = legend_line(&theme);
        let text: String = legend.spans.iter().map(|s| s.content.as_ref()).collect();

        assert!(text.contains("<90 ms"));
        assert!(text.contains("90-180 ms"));
        assert!(text.contains(">180 ms"));

        let styled = |needle: &str| {
            legend
                .spans
                .iter()
                .find(|s| s.content.contains(needle))
                .map(|s| s.style)
                .unwrap()
        };
        assert_eq!(styled("<90"), theme.band_style(LatencyBand::Low));
        assert_eq!(styled(">180"), theme.band_style(LatencyBand::High));
        for provider in CloudProvider::ALL {
            assert_eq!(styled(provider.label()), theme.provider_style(provider));
        }
    }

    #[test]
    fn test_sparkline_levels() {
        assert_eq!(render_sparkline(&[]), "        ");
        assert_eq!(render_sparkline(&[0, 7, 9]), "▁██");
        assert_eq!(render_sparkline(&[0, 1, 2, 3, 4, 5, 6, 7]), "▁▂▃▄▅▆▇█");
    }
}
