//! Common UI components shared across views.
//!
//! This module contains the header bar, tab bar, status bar, and help overlay.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Tabs},
    Frame,
};

use crate::app::{App, View};
use crate::data::duration::{format_age, format_duration};
use crate::data::FeedState;

/// Milliseconds since the Unix epoch, for "N seconds ago" labels.
pub fn now_ms() -> u64 {
    chrono::Utc::now().timestamp_millis().max(0) as u64
}

/// Render the header bar with the headline latency numbers.
///
/// Displays: feed indicator, average/min/max latency, active paths split into
/// healthy and hot, and the age of the snapshot.
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let feed = app.store.feed_state();
    let indicator = Span::styled(" ● ", app.theme.feed_style(feed));
    let title = Span::styled("LATENCYSCOPE ", Style::default().add_modifier(Modifier::BOLD));

    let Some(last_updated) = app.store.last_updated() else {
        let line = Line::from(vec![indicator, title, Span::raw(format!("│ {}", feed.label()))]);
        frame.render_widget(Paragraph::new(line), area);
        return;
    };

    let summary = app.store.summary();
    let dim = Style::default().add_modifier(Modifier::DIM);

    let line = Line::from(vec![
        indicator,
        title,
        Span::raw("│ avg "),
        Span::styled(
            format!("{:.1} ms", summary.stats.avg),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(" (min {} ms • max {} ms)", summary.stats.min, summary.stats.max),
            dim,
        ),
        Span::raw(" │ "),
        Span::styled(
            format!("{}", summary.active_paths),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(" paths: "),
        Span::styled(format!("{}", summary.healthy), Style::default().fg(app.theme.good)),
        Span::raw(" healthy • "),
        if summary.hot > 0 {
            Span::styled(
                format!("{}", summary.hot),
                Style::default().fg(app.theme.critical).add_modifier(Modifier::BOLD),
            )
        } else {
            Span::styled("0", dim)
        },
        Span::raw(" hot │ "),
        Span::raw(format_age(last_updated, now_ms())),
        Span::styled(
            format!(" (every {})", format_duration(app.poll_interval)),
            dim,
        ),
    ]);

    frame.render_widget(Paragraph::new(line), area);
}

/// Render the tab bar showing available views.
pub fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<Line> = vec![
        Line::from(" 1:Links "),
        Line::from(" 2:Regions "),
        Line::from(" 3:History "),
    ];

    let selected = match app.current_view {
        View::Links => 0,
        View::Regions => 1,
        View::History => 2,
    };

    let tabs = Tabs::new(titles)
        .select(selected)
        .style(app.theme.tab_inactive)
        .highlight_style(app.theme.tab_active)
        .divider("|");

    frame.render_widget(tabs, area);
}

/// Render the status bar at the bottom.
///
/// A failed cycle is the primary state shown; the underlying error text is
/// appended as secondary detail.
pub fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    if let Some(msg) = app.get_status_message() {
        let paragraph =
            Paragraph::new(format!(" {} ", msg)).style(Style::default().fg(app.theme.highlight));
        frame.render_widget(paragraph, area);
        return;
    }

    if app.search_active {
        let paragraph = Paragraph::new(format!(
            " Search: {}█ | Enter:apply Esc:cancel",
            app.store.filters().search
        ))
        .style(Style::default().fg(app.theme.highlight));
        frame.render_widget(paragraph, area);
        return;
    }

    let controls = match app.current_view {
        View::Links => "/:search p:provider x:exchange s:sort Enter:detail ?:help q:quit",
        View::Regions => "/:search p:provider g:layer ?:help q:quit",
        View::History => "↑↓:link w:window Enter:detail ?:help q:quit",
    };

    let (status, style) = match app.store.feed_state() {
        FeedState::Loading => (
            format!(" {} | {} | q:quit", FeedState::Loading.label(), app.source_description()),
            Style::default().add_modifier(Modifier::DIM),
        ),
        FeedState::Live => (
            format!(" {} | {} | {}", app.source_description(), app.current_view.label(), controls),
            Style::default().add_modifier(Modifier::DIM),
        ),
        FeedState::Stale => {
            let detail = app.store.last_error().unwrap_or("unknown error");
            (
                format!(" {} ({}) | r:retry q:quit", FeedState::Stale.label(), detail),
                Style::default().fg(app.theme.warning),
            )
        }
    };

    frame.render_widget(Paragraph::new(status).style(style), area);
}

/// Render the help overlay with keyboard shortcuts.
///
/// Displayed as a centered modal on top of the current view.
pub fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let section = |title: &'static str| {
        Line::from(vec![Span::styled(
            title,
            Style::default().add_modifier(Modifier::BOLD),
        )])
    };

    let help_text = vec![
        Line::from(vec![Span::styled("Keyboard Shortcuts", app.theme.header)]),
        Line::from(""),
        section(" Navigation"),
        Line::from("  ←/→ h/l 1-3 Switch views"),
        Line::from("  ↑/↓ j/k     Navigate list"),
        Line::from("  PgUp/PgDn   Jump 10 items"),
        Line::from("  Home/End    Jump to first/last"),
        Line::from("  Enter       Link detail"),
        Line::from("  Esc         Go back"),
        Line::from(""),
        section(" Filters"),
        Line::from("  /         Search labels and regions"),
        Line::from("  c         Clear search"),
        Line::from("  p         Cycle provider"),
        Line::from("  x         Cycle exchange"),
        Line::from("  [ ]       Lower/raise min latency"),
        Line::from("  { }       Lower/raise max latency"),
        Line::from("  t g H     Toggle realtime/region/history"),
        Line::from("  0         Reset all filters"),
        Line::from(""),
        section(" General"),
        Line::from("  s S       Sort column/direction"),
        Line::from("  w         Cycle history window"),
        Line::from("  r         Refresh now"),
        Line::from("  e         Export to JSON"),
        Line::from("  q         Quit"),
        Line::from(""),
        section(" Legend"),
        super::links::legend_line(&app.theme),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Press any key to close",
            Style::default().add_modifier(Modifier::DIM),
        )]),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight));

    let paragraph = Paragraph::new(help_text).block(block);

    let help_width = 60u16.min(area.width.saturating_sub(4));
    let help_height = 34u16.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(help_width)) / 2;
    let y = area.y + (area.height.saturating_sub(help_height)) / 2;
    let help_area = Rect::new(x, y, help_width, help_height);

    frame.render_widget(Clear, help_area);
    frame.render_widget(paragraph, help_area);
}
