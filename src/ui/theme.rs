//! Theme configuration for the TUI.
//!
//! Supports light and dark themes with automatic terminal detection.

use latencyscope_types::{CloudProvider, LatencyBand, LinkStatus};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::block::BorderType;

use crate::data::FeedState;

/// Color and style theme for the TUI.
///
/// Use [`Theme::auto_detect()`] for automatic theme selection based on
/// terminal background, or [`Theme::dark()`]/[`Theme::light()`] explicitly.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Accent color for highlights and active elements.
    pub highlight: Color,
    /// Low band and healthy links.
    pub good: Color,
    /// Medium band and degraded links.
    pub warning: Color,
    /// High band and critical links.
    pub critical: Color,
    pub aws: Color,
    pub gcp: Color,
    pub azure: Color,
    /// Color for borders and separators.
    pub border: Color,
    /// Style for header rows in tables.
    pub header: Style,
    /// Style for selected/highlighted rows.
    pub selected: Style,
    /// Style for the active tab.
    pub tab_active: Style,
    /// Style for inactive tabs.
    pub tab_inactive: Style,
    /// Border style (rounded, plain, etc.).
    pub border_type: BorderType,
}

impl Theme {
    /// Create a dark theme suitable for dark terminal backgrounds.
    pub fn dark() -> Self {
        Self {
            highlight: Color::Cyan,
            good: Color::Green,
            warning: Color::Yellow,
            critical: Color::Red,
            aws: Color::Rgb(255, 153, 0),
            gcp: Color::Rgb(66, 133, 244),
            azure: Color::Rgb(0, 164, 239),
            border: Color::Gray,
            header: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            selected: Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD),
            tab_active: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            tab_inactive: Style::default().fg(Color::Gray),
            border_type: BorderType::Rounded,
        }
    }

    /// Create a light theme suitable for light terminal backgrounds.
    pub fn light() -> Self {
        Self {
            highlight: Color::Blue,
            good: Color::Green,
            warning: Color::Rgb(176, 120, 0),
            critical: Color::Red,
            aws: Color::Rgb(204, 102, 0),
            gcp: Color::Rgb(26, 86, 196),
            azure: Color::Rgb(0, 110, 180),
            border: Color::DarkGray,
            header: Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            selected: Style::default().bg(Color::LightBlue).add_modifier(Modifier::BOLD),
            tab_active: Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            tab_inactive: Style::default().fg(Color::DarkGray),
            border_type: BorderType::Rounded,
        }
    }

    /// Auto-detect based on terminal background
    pub fn auto_detect() -> Self {
        match terminal_light::luma() {
            Ok(luma) if luma > 0.5 => Self::light(),
            _ => Self::dark(),
        }
    }

    pub fn band_style(&self, band: LatencyBand) -> Style {
        match band {
            LatencyBand::Low => Style::default().fg(self.good),
            LatencyBand::Medium => Style::default().fg(self.warning),
            LatencyBand::High => Style::default().fg(self.critical),
        }
    }

    pub fn status_style(&self, status: LinkStatus) -> Style {
        match status {
            LinkStatus::Healthy => Style::default().fg(self.good),
            LinkStatus::Degraded => Style::default().fg(self.warning),
            LinkStatus::Critical => {
                Style::default().fg(self.critical).add_modifier(Modifier::BOLD)
            }
        }
    }

    pub fn provider_style(&self, provider: CloudProvider) -> Style {
        let color = match provider {
            CloudProvider::Aws => self.aws,
            CloudProvider::Gcp => self.gcp,
            CloudProvider::Azure => self.azure,
        };
        Style::default().fg(color)
    }

    pub fn feed_style(&self, state: FeedState) -> Style {
        match state {
            FeedState::Loading => Style::default().fg(self.border),
            FeedState::Live => Style::default().fg(self.good),
            FeedState::Stale => Style::default().fg(self.critical).add_modifier(Modifier::BOLD),
        }
    }
}
