//! Pure view/render functions for the TUI.
//!
//! Functions here take `&AppState`, draw to a ratatui `Frame`, and never
//! return effects. The only write is the toggle hit area, kept in a `Cell`
//! so mouse events can be matched against what was last drawn.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};

use crate::controller::TournamentController;
use crate::features::standings;
use crate::state::AppState;

/// Header height (title row).
const HEADER_HEIGHT: u16 = 1;

/// Pager height when search is closed.
const PAGER_HEIGHT: u16 = 1;

/// Renders the entire TUI to the frame.
pub fn render(app: &AppState, frame: &mut Frame) {
    let area = frame.area();

    let footer_height = if app.ctrl.searching() {
        search_height(app, area)
    } else {
        PAGER_HEIGHT
    };

    let [header, body, footer] = Layout::vertical([
        Constraint::Length(HEADER_HEIGHT),
        Constraint::Min(0),
        Constraint::Length(footer_height),
    ])
    .areas(area);

    standings::render_header(&app.ctrl, frame, header, &app.toggle_area);
    standings::render_table(&app.ctrl, frame, body);

    if app.ctrl.searching() {
        app.search.render(frame, footer, app.spinner_frame);
    } else {
        standings::render_pager(&app.ctrl, frame, footer);
    }
}

/// Input plus suggestions, leaving room for the header and a few rows.
fn search_height(app: &AppState, area: Rect) -> u16 {
    let max = area.height.saturating_sub(HEADER_HEIGHT + 3).max(3);
    app.search.height().min(max)
}
