//! Effect handlers for the TUI runtime.
//!
//! Handlers are pure async functions that return a `UiEvent`. They perform
//! the service calls and never touch state; the runtime spawns them and
//! sends their results to the inbox.

use std::sync::Arc;
use std::time::Duration;

use swiss_core::complete::{CompleteOptions, UserComplete, UserCompleteService};
use tokio_util::sync::CancellationToken;

use crate::common::TaskId;
use crate::events::UiEvent;

/// Upper bound on acquiring the completion handle.
const ACQUIRE_TIMEOUT_SECS: u64 = 10;

/// Acquires the completion handle for the mount `mount`.
///
/// Failures, timeouts and cancellation come back as `Err` text.
pub async fn load_user_complete(
    mount: TaskId,
    service: Arc<dyn UserCompleteService>,
    cancel: Option<CancellationToken>,
) -> UiEvent {
    let cancel = cancel.unwrap_or_default();
    let result = tokio::select! {
        () = cancel.cancelled() => Err("player search cancelled".to_string()),
        loaded = tokio::time::timeout(
            Duration::from_secs(ACQUIRE_TIMEOUT_SECS),
            service.user_complete(),
        ) => {
            loaded
                .map_err(|elapsed| {
                    format!("player search timed out after {ACQUIRE_TIMEOUT_SECS}s ({elapsed})")
                })
                .and_then(|r| r.map_err(|e| format!("{e:#}")))
        }
    };
    UiEvent::UserCompleteLoaded { mount, result }
}

/// Runs one suggestion query.
pub async fn search_players(
    handle: UserComplete,
    opts: CompleteOptions,
    term: String,
    cancel: Option<CancellationToken>,
) -> UiEvent {
    let cancel = cancel.unwrap_or_default();
    let result = tokio::select! {
        () = cancel.cancelled() => Err("search cancelled".to_string()),
        found = handle.search(&opts, &term) => found.map_err(|e| format!("{e:#}")),
    };
    UiEvent::PlayersFound { term, result }
}
