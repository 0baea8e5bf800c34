//! UI event types.
//!
//! All inputs (terminal, async results) are converted to `UiEvent` before the
//! reducer sees them. Async work follows the task lifecycle: the runtime
//! emits `TaskStarted` once a task is spawned and `TaskCompleted` wrapping
//! the result event when it finishes. The reducer drops completions for
//! tasks that are no longer active.

use crossterm::event::Event as CrosstermEvent;
use swiss_core::complete::{SearchResult, UserComplete};

use crate::common::{TaskCompleted, TaskId, TaskKind, TaskStarted};

/// Unified event enum for the TUI.
#[derive(Debug)]
pub enum UiEvent {
    /// Timer tick.
    Tick,

    /// Terminal input event (key, mouse, resize).
    Terminal(CrosstermEvent),

    /// Completion handle acquisition finished for the mount `mount`.
    UserCompleteLoaded {
        mount: TaskId,
        result: Result<UserComplete, String>,
    },

    /// Suggestion query finished.
    PlayersFound {
        term: String,
        result: Result<Vec<SearchResult>, String>,
    },

    /// Task lifecycle: runtime started a task.
    TaskStarted {
        kind: TaskKind,
        started: TaskStarted,
    },

    /// Task lifecycle: runtime completed a task (wraps the result event).
    TaskCompleted {
        kind: TaskKind,
        completed: TaskCompleted<Box<UiEvent>>,
    },
}
