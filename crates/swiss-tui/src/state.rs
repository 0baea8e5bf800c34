//! Application state composition.
//!
//! ```text
//! AppState
//! ├── ctrl: TournamentCtrl   (standings data, page, search flag, redraw flag)
//! ├── search: SearchInput    (mounted while search is open)
//! ├── task_seq: TaskSeq      (async task id generator)
//! ├── tasks: Tasks           (task lifecycle state)
//! └── toggle_area            (last rendered toggle rect, for mouse hits)
//! ```

use std::cell::Cell;
use std::sync::Arc;

use ratatui::layout::Rect;
use swiss_core::complete::UserCompleteService;
use swiss_core::config::Config;
use swiss_core::tournament::TournamentData;

use crate::common::{TaskSeq, Tasks};
use crate::controller::TournamentCtrl;
use crate::features::search::SearchInput;

/// Combined application state for the TUI.
#[derive(Debug)]
pub struct AppState {
    pub should_quit: bool,
    pub ctrl: TournamentCtrl,
    pub search: SearchInput,
    pub task_seq: TaskSeq,
    pub tasks: Tasks,
    /// Where the search toggle was last drawn. Written during render.
    pub toggle_area: Cell<Rect>,
    /// Spinner animation frame counter.
    pub spinner_frame: usize,
}

impl AppState {
    pub fn new(
        data: TournamentData,
        config: &Config,
        service: Arc<dyn UserCompleteService>,
    ) -> Self {
        Self {
            should_quit: false,
            ctrl: TournamentCtrl::new(data, config.players_per_page),
            search: SearchInput::new(service, config.complete.clone()),
            task_seq: TaskSeq::default(),
            tasks: Tasks::default(),
            toggle_area: Cell::new(Rect::default()),
            spinner_frame: 0,
        }
    }
}
