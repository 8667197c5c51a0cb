//! Detail overlay rendering.
//!
//! Displays a modal overlay with everything known about the selected link.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::App;
use crate::data::duration::format_age;
use crate::synth::haversine_km;
use crate::ui::common::now_ms;
use crate::ui::links::render_sparkline;

/// Minimum width required for the detail overlay to render properly.
const MIN_OVERLAY_WIDTH: u16 = 50;
/// Minimum height required for the detail overlay to render properly.
const MIN_OVERLAY_HEIGHT: u16 = 16;

const DETAIL_SPARKLINE_WIDTH: usize = 32;

/// Render the link detail as a modal overlay.
pub fn render_overlay(frame: &mut Frame, app: &App, area: Rect) {
    if area.width < MIN_OVERLAY_WIDTH || area.height < MIN_OVERLAY_HEIGHT {
        return;
    }

    let Some(link) = app.selected_link() else {
        return;
    };
    let catalog = app.store.catalog();

    let overlay_width = (area.width * 80 / 100).clamp(MIN_OVERLAY_WIDTH, 90);
    let overlay_height = (area.height * 70 / 100).clamp(MIN_OVERLAY_HEIGHT, 24);

    let x = area.x + (area.width.saturating_sub(overlay_width)) / 2;
    let y = area.y + (area.height.saturating_sub(overlay_height)) / 2;
    let overlay_area = Rect::new(x, y, overlay_width, overlay_height);

    frame.render_widget(Clear, overlay_area);

    let chunks = Layout::vertical([
        Constraint::Length(7),
        Constraint::Min(6),
        Constraint::Length(1),
    ])
    .split(overlay_area);

    // ===== LINK SECTION =====
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let band_style = app.theme.band_style(link.band);
    let km = haversine_km(link.from_coords, link.to_coords);

    let endpoint = |id: &str| {
        let name = catalog.display_name(id).unwrap_or("unknown");
        let coords = catalog.coords(id);
        format!("{} ({}) at {:.2}, {:.2}", name, id, coords.lat, coords.lng)
    };

    let link_lines = vec![
        Line::from(vec![Span::styled(format!(" {} ", link.label), bold)]),
        Line::from(""),
        Line::from(vec![Span::raw(" From: "), Span::raw(endpoint(&link.from_id))]),
        Line::from(vec![Span::raw(" To:   "), Span::raw(endpoint(&link.to_id))]),
        Line::from(vec![
            Span::raw(" Latency: "),
            Span::styled(
                format!("{} ms", link.latency_ms),
                band_style.add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!(" ({})", link.band.label())),
            Span::raw("    Status: "),
            Span::styled(
                format!("{} {}", link.status.symbol(), link.status.label()),
                app.theme.status_style(link.status),
            ),
            Span::raw("    Provider: "),
            Span::styled(link.provider.label(), app.theme.provider_style(link.provider)),
            Span::raw(format!("    Distance: {:.0} km", km)),
        ]),
    ];

    let link_block = Block::default()
        .title(" Link Detail ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight));
    frame.render_widget(Paragraph::new(link_lines).block(link_block), chunks[0]);

    // ===== HISTORY SECTION =====
    let history = app.store.history();
    let mut history_lines = Vec::new();

    if let (Some(series), Some(anchor)) = (history.series(&link.id), app.store.last_updated()) {
        history_lines.push(Line::from(vec![
            Span::raw(" Samples: "),
            Span::styled(format!("{}/{}", series.len(), series.capacity()), bold),
        ]));
        if let Some(first) = series.iter().next() {
            history_lines.push(Line::from(format!(
                " Oldest sample: {}",
                format_age(first.timestamp, now_ms())
            )));
        }
        history_lines.push(Line::from(""));

        for window in crate::data::TimeWindow::ALL {
            let stats = history.window_stats(&link.id, window, anchor);
            let style = if window == app.history_window {
                Style::default().fg(app.theme.highlight)
            } else {
                Style::default()
            };
            history_lines.push(Line::from(Span::styled(
                format!(
                    " {:>4}  min {:>4} ms  max {:>4} ms  avg {:>4} ms",
                    window.label(),
                    stats.min,
                    stats.max,
                    stats.avg
                ),
                style,
            )));
        }

        history_lines.push(Line::from(""));
        history_lines.push(Line::from(vec![
            Span::raw(" Trend: "),
            Span::styled(
                render_sparkline(&history.sparkline(&link.id, DETAIL_SPARKLINE_WIDTH)),
                band_style,
            ),
        ]));
    } else {
        history_lines.push(Line::from(Span::styled(
            " No history recorded for this link",
            Style::default().add_modifier(Modifier::DIM),
        )));
    }

    let history_block = Block::default()
        .title(" History ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));
    frame.render_widget(Paragraph::new(history_lines).block(history_block), chunks[1]);

    let footer = Paragraph::new(" Esc:close  w:window  ↑↓:next link")
        .style(Style::default().add_modifier(Modifier::DIM));
    frame.render_widget(footer, chunks[2]);
}
