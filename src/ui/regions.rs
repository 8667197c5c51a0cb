//! Region overview rendering.
//!
//! Lists the cloud regions that pass the provider and search filters together
//! with the exchanges co-located in each.

use ratatui::{
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::app::App;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));

    if !app.store.filters().layers.regions {
        let paragraph = Paragraph::new(" Region layer hidden (g to show)")
            .style(Style::default().add_modifier(Modifier::DIM))
            .block(block.title(" Regions "));
        frame.render_widget(paragraph, area);
        return;
    }

    let regions = app.store.visible_regions();
    let catalog = app.store.catalog();

    let header = Row::new(vec![
        Cell::from("Region"),
        Cell::from("Provider"),
        Cell::from("Code"),
        Cell::from("Servers"),
        Cell::from("Location"),
        Cell::from("Exchanges"),
    ])
    .height(1)
    .style(app.theme.header);

    let rows: Vec<Row> = regions
        .iter()
        .map(|region| {
            let exchanges: Vec<&str> = catalog
                .exchanges_in_region(&region.id)
                .filter(|e| app.store.filters().matches_exchange(e))
                .map(|e| e.name.as_str())
                .collect();

            Row::new(vec![
                Cell::from(region.name.clone()),
                Cell::from(region.provider.label())
                    .style(app.theme.provider_style(region.provider)),
                Cell::from(region.region_code.clone()),
                Cell::from(region.server_count.to_string()),
                Cell::from(format!("{:.2}, {:.2}", region.latitude, region.longitude)),
                Cell::from(if exchanges.is_empty() {
                    "-".to_string()
                } else {
                    exchanges.join(", ")
                }),
            ])
        })
        .collect();

    let widths = [
        Constraint::Fill(3),
        Constraint::Fill(1),
        Constraint::Fill(2),
        Constraint::Min(7),
        Constraint::Fill(2),
        Constraint::Fill(3),
    ];

    let selected = app.selected_region_index.min(regions.len().saturating_sub(1));
    let servers: u32 = regions.iter().map(|r| r.server_count).sum();
    let title = format!(
        " Regions ({}/{}) • {} servers ",
        regions.len(),
        catalog.regions().len(),
        servers
    );

    let table = Table::new(rows, widths)
        .header(header)
        .block(block.title(title))
        .row_highlight_style(app.theme.selected)
        .highlight_symbol("▶ ");

    let mut state = TableState::default();
    state.select(Some(selected));

    frame.render_stateful_widget(table, area, &mut state);
}
