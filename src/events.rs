use std::time::Duration;

use anyhow::Result;
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

use crate::app::{App, View};

/// Step applied by the range keys, in milliseconds.
const RANGE_STEP_MS: i32 = 10;

/// Row of the first table header, below the header bar, tabs and block border.
pub const CONTENT_START_ROW: u16 = 3;

/// Poll for events with a timeout
pub fn poll_event(timeout: Duration) -> Result<Option<Event>> {
    if event::poll(timeout)? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}

/// Handle a key event
pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    // If help is shown, any key closes it
    if app.show_help {
        app.show_help = false;
        return;
    }

    if app.show_detail_overlay {
        match key.code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Backspace | KeyCode::Char('q') => {
                app.close_overlay();
            }
            // Allow stepping through links while the overlay is open
            KeyCode::Up | KeyCode::Char('k') => app.select_prev(),
            KeyCode::Down | KeyCode::Char('j') => app.select_next(),
            KeyCode::PageUp => app.select_prev_n(10),
            KeyCode::PageDown => app.select_next_n(10),
            KeyCode::Home => app.select_first(),
            KeyCode::End => app.select_last(),
            KeyCode::Char('w') => app.cycle_history_window(),
            _ => {}
        }
        return;
    }

    if app.search_active {
        handle_search_input(app, key);
        return;
    }

    match key.code {
        KeyCode::Char('q') => app.quit(),

        // View switching
        KeyCode::Tab => {
            if key.modifiers.contains(KeyModifiers::SHIFT) {
                app.prev_view();
            } else {
                app.next_view();
            }
        }
        KeyCode::BackTab => app.prev_view(),
        KeyCode::Char('1') => app.set_view(View::Links),
        KeyCode::Char('2') => app.set_view(View::Regions),
        KeyCode::Char('3') => app.set_view(View::History),

        // Navigation (up/down for items, left/right for tabs)
        KeyCode::Up | KeyCode::Char('k') => app.select_prev(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next(),
        KeyCode::Left | KeyCode::Char('h') => app.prev_view(),
        KeyCode::Right | KeyCode::Char('l') => app.next_view(),
        KeyCode::PageUp => app.select_prev_n(10),
        KeyCode::PageDown => app.select_next_n(10),
        KeyCode::Home => app.select_first(),
        KeyCode::End => app.select_last(),

        KeyCode::Enter => app.enter_detail(),
        KeyCode::Esc | KeyCode::Backspace => app.go_back(),

        KeyCode::Char('r') => app.request_refresh(),
        KeyCode::Char('?') => app.toggle_help(),

        // Sorting (Links view)
        KeyCode::Char('s') if app.current_view == View::Links => app.cycle_sort(),
        KeyCode::Char('S') if app.current_view == View::Links => app.toggle_sort_direction(),

        // Filters
        KeyCode::Char('/') => app.start_search(),
        KeyCode::Char('c') => {
            if !app.store.filters().search.is_empty() {
                app.clear_search();
            }
        }
        KeyCode::Char('p') => app.cycle_provider(),
        KeyCode::Char('x') => app.cycle_exchange(),
        KeyCode::Char('[') => app.nudge_range_min(-RANGE_STEP_MS),
        KeyCode::Char(']') => app.nudge_range_min(RANGE_STEP_MS),
        KeyCode::Char('{') => app.nudge_range_max(-RANGE_STEP_MS),
        KeyCode::Char('}') => app.nudge_range_max(RANGE_STEP_MS),
        KeyCode::Char('t') => app.toggle_realtime_layer(),
        KeyCode::Char('g') => app.toggle_region_layer(),
        KeyCode::Char('H') => app.toggle_historical_layer(),
        KeyCode::Char('0') => app.reset_filters(),
        KeyCode::Char('w') => app.cycle_history_window(),

        KeyCode::Char('e') => {
            let export_path = app.export_path.clone();
            match app.export_state(&export_path) {
                Ok(()) => {
                    app.set_status_message(format!("Exported to {}", export_path.display()));
                }
                Err(e) => {
                    app.set_status_message(format!("Export failed: {}", e));
                }
            }
        }

        _ => {}
    }
}

/// Handle key input while search is active
fn handle_search_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => app.cancel_search(),

        // Keep text but exit input mode
        KeyCode::Esc => app.cancel_search(),

        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.clear_search();
        }

        KeyCode::Backspace => {
            app.search_pop();
            if app.store.filters().search.is_empty() {
                app.cancel_search();
            }
        }

        KeyCode::Char(c) => app.search_push(c),

        _ => {}
    }
}

/// Handle mouse events
pub fn handle_mouse_event(app: &mut App, mouse: MouseEvent, content_start_row: u16) {
    match mouse.kind {
        MouseEventKind::ScrollUp => app.select_prev(),
        MouseEventKind::ScrollDown => app.select_next(),

        MouseEventKind::Down(MouseButton::Left) => {
            let clicked_row = mouse.row;

            if clicked_row > content_start_row {
                let item_row = (clicked_row - content_start_row - 1) as usize;

                match app.current_view {
                    View::Links => {
                        if item_row < app.visible_links().len() {
                            app.selected_link_index = item_row;
                        }
                    }
                    View::Regions => {
                        if item_row < app.store.visible_regions().len() {
                            app.selected_region_index = item_row;
                        }
                    }
                    View::History => {}
                }
            }

            // Tab bar sits on row 1, after the header
            if clicked_row == 1 {
                let col = mouse.column;
                // Approximate tab positions: Links (0-11), Regions (12-25), History (26-38)
                if col < 12 {
                    app.set_view(View::Links);
                } else if col < 26 {
                    app.set_view(View::Regions);
                } else if col < 39 {
                    app.set_view(View::History);
                }
            }
        }

        // Right-click goes back
        MouseEventKind::Down(MouseButton::Right) => app.go_back(),

        _ => {}
    }
}
