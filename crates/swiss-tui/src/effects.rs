//! UI effect types.
//!
//! Effects are commands returned by the reducer that the runtime executes.
//! They represent task spawning and cancellation only; the reducer never
//! performs I/O or spawns tasks directly.

use std::sync::Arc;

use swiss_core::complete::{CompleteOptions, UserComplete, UserCompleteService};
use tokio_util::sync::CancellationToken;

use crate::common::{TaskId, TaskKind};

/// Effects returned by the reducer for the runtime to execute.
#[derive(Debug)]
pub enum UiEffect {
    /// Quit the application.
    Quit,

    /// Acquire the completion handle for a freshly mounted search input.
    ///
    /// `task` doubles as the mount id the result is checked against.
    LoadUserComplete {
        task: TaskId,
        service: Arc<dyn UserCompleteService>,
    },

    /// Query suggestions for the current search term.
    SearchPlayers {
        task: TaskId,
        handle: UserComplete,
        opts: CompleteOptions,
        term: String,
    },

    /// Cancel an in-progress task.
    CancelTask {
        kind: TaskKind,
        token: Option<CancellationToken>,
    },
}
