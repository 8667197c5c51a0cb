//! History view rendering.
//!
//! Charts the selected link's latency over the chosen time window. The window
//! is anchored at the newest snapshot rather than the wall clock, so replayed
//! files chart the same way live feeds do.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph},
    Frame,
};

use crate::app::App;
use crate::data::{TimeWindow, WindowStats};

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));

    let placeholder = |text: &str| {
        Paragraph::new(format!(" {}", text))
            .style(Style::default().add_modifier(Modifier::DIM))
            .block(block.clone().title(" History "))
    };

    if !app.store.filters().layers.historical {
        frame.render_widget(placeholder("Historical layer hidden (H to show)"), area);
        return;
    }
    let (Some(link), Some(anchor)) = (app.selected_link(), app.store.last_updated()) else {
        frame.render_widget(placeholder("Select a link to chart its history"), area);
        return;
    };

    let window = app.history_window;
    let points = app.store.history().window(&link.id, window, anchor);
    let stats = WindowStats::from_points(points.iter().copied());

    let chunks = Layout::vertical([Constraint::Length(3), Constraint::Min(6)]).split(area);

    let summary = Line::from(vec![
        Span::styled(format!(" {} ", link.label), Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("│ "),
        window_tabs(app, window),
        Span::raw(" │ "),
        Span::raw(format!(
            "min {} ms • max {} ms • avg {} ms",
            stats.min, stats.max, stats.avg
        )),
        Span::styled(
            format!(" ({} samples)", points.len()),
            Style::default().add_modifier(Modifier::DIM),
        ),
    ]);
    frame.render_widget(Paragraph::new(summary).block(block.clone()), chunks[0]);

    if points.is_empty() {
        frame.render_widget(placeholder("No samples in this window yet"), chunks[1]);
        return;
    }

    let start = anchor.saturating_sub(window.span_ms());
    let data: Vec<(f64, f64)> = points
        .iter()
        .map(|p| {
            (
                p.timestamp.saturating_sub(start) as f64 / 1000.0,
                f64::from(p.latency_ms),
            )
        })
        .collect();

    let span_secs = window.span_ms() as f64 / 1000.0;
    let y_max = (f64::from(stats.max) * 1.2).max(10.0);

    let datasets = vec![Dataset::default()
        .name(link.id.as_str())
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(app.theme.band_style(link.band))
        .data(&data)];

    let axis_style = Style::default().fg(app.theme.border);
    let chart = Chart::new(datasets)
        .block(block.title(format!(" Latency • {} ", window.label())))
        .x_axis(
            Axis::default()
                .style(axis_style)
                .bounds([0.0, span_secs])
                .labels([format!("-{}", window.label()), "now".to_string()]),
        )
        .y_axis(
            Axis::default()
                .title("ms")
                .style(axis_style)
                .bounds([0.0, y_max])
                .labels(["0".to_string(), format!("{:.0}", y_max / 2.0), format!("{:.0}", y_max)]),
        );

    frame.render_widget(chart, chunks[1]);
}

fn window_tabs(app: &App, current: TimeWindow) -> Span<'static> {
    let labels: Vec<String> = TimeWindow::ALL
        .iter()
        .map(|w| {
            if *w == current {
                format!("[{}]", w.label())
            } else {
                w.label().to_string()
            }
        })
        .collect();
    Span::styled(labels.join(" "), Style::default().fg(app.theme.highlight))
}
