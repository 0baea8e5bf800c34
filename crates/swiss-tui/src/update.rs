//! TUI reducer (update function).
//!
//! All state mutations happen here. The runtime calls `update(app, event)`
//! and executes the returned effects.
//!
//! After every event the search input is reconciled with the controller's
//! `searching` flag: it is mounted when search opens and unmounted when it
//! closes, wherever the toggle came from.

use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::layout::Position;

use crate::common::TaskKind;
use crate::controller::TournamentController;
use crate::effects::UiEffect;
use crate::events::UiEvent;
use crate::features::search::{MountState, SearchToggle};
use crate::features::standings;
use crate::state::AppState;

/// The main reducer function.
///
/// Takes the current state and an event, mutates state, and returns effects
/// for the runtime to execute.
pub fn update(app: &mut AppState, event: UiEvent) -> Vec<UiEffect> {
    let mut effects = reduce(app, event);
    effects.extend(sync_search_mount(app));
    effects
}

fn reduce(app: &mut AppState, event: UiEvent) -> Vec<UiEffect> {
    match event {
        UiEvent::Tick => {
            app.spinner_frame = app.spinner_frame.wrapping_add(1);
            let animating = app.search.mount_state() == Some(MountState::Pending)
                || app.search.autocomplete().is_some_and(|c| c.is_loading());
            if animating {
                app.ctrl.redraw();
            }
            vec![]
        }
        UiEvent::Terminal(term_event) => handle_terminal_event(app, term_event),
        UiEvent::UserCompleteLoaded { mount, result } => {
            if app.search.on_user_complete(&app.ctrl, mount, result) {
                app.ctrl.redraw();
            }
            vec![]
        }
        UiEvent::PlayersFound { term, result } => {
            app.search.on_players_found(&term, result);
            app.ctrl.redraw();
            vec![]
        }
        UiEvent::TaskStarted { kind, started } => {
            let live = match kind {
                TaskKind::UserComplete => app.search.is_live_mount(started.id),
                TaskKind::PlayerSearch => app.search.is_mounted(),
            };
            if !live {
                tracing::debug!(?kind, task = started.id.0, "task started for a disposed input");
                return vec![UiEffect::CancelTask {
                    kind,
                    token: started.cancel,
                }];
            }

            // A newer task of the same kind supersedes the running one.
            let state = app.tasks.state_mut(kind);
            let superseded = state.take_cancel();
            state.on_started(&started);
            superseded
                .map(|token| UiEffect::CancelTask {
                    kind,
                    token: Some(token),
                })
                .into_iter()
                .collect()
        }
        UiEvent::TaskCompleted { kind, completed } => {
            if app.tasks.state_mut(kind).finish_if_active(completed.id) {
                reduce(app, *completed.result)
            } else {
                tracing::debug!(?kind, task = completed.id.0, "dropping result of inactive task");
                vec![]
            }
        }
    }
}

/// Mounts the search input when search opens and disposes it when it closes.
fn sync_search_mount(app: &mut AppState) -> Vec<UiEffect> {
    match (app.ctrl.searching(), app.search.is_mounted()) {
        (true, false) => app.search.mount(&mut app.task_seq).into_iter().collect(),
        (false, true) => app.search.unmount(&mut app.tasks),
        _ => vec![],
    }
}

fn handle_terminal_event(app: &mut AppState, event: Event) -> Vec<UiEffect> {
    match event {
        Event::Key(key) => handle_key(app, key),
        Event::Mouse(mouse) => {
            handle_mouse(app, mouse);
            vec![]
        }
        Event::Resize(_, _) => {
            app.ctrl.redraw();
            vec![]
        }
        _ => vec![],
    }
}

fn handle_key(app: &mut AppState, key: KeyEvent) -> Vec<UiEffect> {
    if key.kind == KeyEventKind::Release {
        return vec![];
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return vec![UiEffect::Quit];
    }

    if app.ctrl.searching() {
        return app
            .search
            .handle_key(&mut app.ctrl, key, &mut app.task_seq);
    }

    if SearchToggle::is_shortcut(&key) {
        SearchToggle::press(&mut app.ctrl);
        return vec![];
    }
    if key.code == KeyCode::Char('q') {
        return vec![UiEffect::Quit];
    }
    standings::handle_key(&mut app.ctrl, key);
    vec![]
}

fn handle_mouse(app: &mut AppState, mouse: MouseEvent) {
    if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
        return;
    }
    if app
        .toggle_area
        .get()
        .contains(Position::new(mouse.column, mouse.row))
    {
        SearchToggle::press(&mut app.ctrl);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use futures_util::FutureExt;
    use futures_util::future::BoxFuture;
    use ratatui::layout::Rect;
    use swiss_core::complete::{
        CompleteOptions, CompletionSource, LocalUserComplete, SearchResult, UserComplete,
    };
    use swiss_core::config::Config;
    use swiss_core::tournament::PlayerId;
    use tokio_util::sync::CancellationToken;

    use super::*;
    use crate::common::{TaskCompleted, TaskId, TaskStarted};
    use crate::controller::testing::tournament;

    struct NoSource;

    impl CompletionSource for NoSource {
        fn search(
            &self,
            _opts: &CompleteOptions,
            _term: &str,
        ) -> BoxFuture<'static, anyhow::Result<Vec<SearchResult>>> {
            futures_util::future::ready(Ok(Vec::new())).boxed()
        }
    }

    fn app() -> AppState {
        let data = tournament();
        let service = Arc::new(LocalUserComplete::new(&data));
        let mut app = AppState::new(data, &Config::default(), service);
        app.ctrl.take_redraw();
        app
    }

    fn press(app: &mut AppState, code: KeyCode) -> Vec<UiEffect> {
        update(
            app,
            UiEvent::Terminal(Event::Key(KeyEvent::new(code, KeyModifiers::NONE))),
        )
    }

    fn type_text(app: &mut AppState, text: &str) -> Vec<UiEffect> {
        text.chars()
            .flat_map(|ch| press(app, KeyCode::Char(ch)))
            .collect()
    }

    fn load_task(effects: &[UiEffect]) -> TaskId {
        let tasks: Vec<TaskId> = effects
            .iter()
            .filter_map(|effect| match effect {
                UiEffect::LoadUserComplete { task, .. } => Some(*task),
                _ => None,
            })
            .collect();
        assert_eq!(tasks.len(), 1, "expected one acquisition, got {effects:?}");
        tasks[0]
    }

    /// Feeds the runtime's lifecycle events for a finished task.
    fn run_task(app: &mut AppState, kind: TaskKind, id: TaskId, result: UiEvent) -> Vec<UiEffect> {
        let mut effects = update(
            app,
            UiEvent::TaskStarted {
                kind,
                started: TaskStarted {
                    id,
                    cancel: Some(CancellationToken::new()),
                },
            },
        );
        effects.extend(update(
            app,
            UiEvent::TaskCompleted {
                kind,
                completed: TaskCompleted {
                    id,
                    result: Box::new(result),
                },
            },
        ));
        effects
    }

    fn loaded(mount: TaskId) -> UiEvent {
        UiEvent::UserCompleteLoaded {
            mount,
            result: Ok(UserComplete::new(Arc::new(NoSource))),
        }
    }

    fn found(term: &str, ids: &[&str]) -> UiEvent {
        UiEvent::PlayersFound {
            term: term.to_string(),
            result: Ok(ids
                .iter()
                .map(|id| SearchResult {
                    id: PlayerId::new(*id),
                    name: (*id).to_string(),
                    title: None,
                    rating: None,
                    match_indices: Vec::new(),
                })
                .collect()),
        }
    }

    #[test]
    fn test_opening_search_mounts_once() {
        let mut app = app();

        let effects = press(&mut app, KeyCode::Char('/'));
        load_task(&effects);
        assert!(app.ctrl.searching());
        assert!(app.ctrl.take_redraw());

        // Further events while mounted do not acquire again.
        assert!(update(&mut app, UiEvent::Tick).is_empty());
        assert!(type_text(&mut app, "us").is_empty());
    }

    #[test]
    fn test_search_and_select_jumps_to_player_page() {
        let mut app = app();
        let mount = load_task(&press(&mut app, KeyCode::Char('/')));
        run_task(&mut app, TaskKind::UserComplete, mount, loaded(mount));

        assert_eq!(app.search.mount_state(), Some(MountState::Attached));
        assert!(app.search.is_focused());
        assert_eq!(
            app.search.autocomplete().map(|c| c.options().swiss.0.as_str()),
            Some("abc")
        );

        let effects = type_text(&mut app, "user42");
        let query = effects
            .iter()
            .rev()
            .find_map(|effect| match effect {
                UiEffect::SearchPlayers { task, term, .. } => Some((*task, term.clone())),
                _ => None,
            })
            .unwrap();
        assert_eq!(query.1, "user42");

        run_task(&mut app, TaskKind::PlayerSearch, query.0, found("user42", &["user42"]));
        app.ctrl.take_redraw();
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.ctrl.page(), 3);
        assert_eq!(app.ctrl.focus(), Some(&PlayerId::new("user42")));
        assert!(app.ctrl.take_redraw());
    }

    #[test]
    fn test_closing_before_load_drops_result() {
        let mut app = app();
        let mount = load_task(&press(&mut app, KeyCode::Char('/')));
        assert!(press(&mut app, KeyCode::Esc).is_empty());
        assert!(!app.ctrl.searching());
        assert!(!app.search.is_mounted());

        let token = CancellationToken::new();
        let effects = update(
            &mut app,
            UiEvent::TaskStarted {
                kind: TaskKind::UserComplete,
                started: TaskStarted {
                    id: mount,
                    cancel: Some(token.clone()),
                },
            },
        );
        assert!(matches!(
            effects.as_slice(),
            [UiEffect::CancelTask {
                kind: TaskKind::UserComplete,
                token: Some(_)
            }]
        ));

        let effects = update(
            &mut app,
            UiEvent::TaskCompleted {
                kind: TaskKind::UserComplete,
                completed: TaskCompleted {
                    id: mount,
                    result: Box::new(loaded(mount)),
                },
            },
        );
        assert!(effects.is_empty());
        assert!(!app.search.is_mounted());
        assert!(!app.search.is_focused());
    }

    #[test]
    fn test_reopen_ignores_previous_mount() {
        let mut app = app();
        let first = load_task(&press(&mut app, KeyCode::Char('/')));
        press(&mut app, KeyCode::Esc);
        let second = load_task(&press(&mut app, KeyCode::Char('/')));
        assert_ne!(first, second);

        // The first acquisition finishes late: dropped.
        let effects = run_task(&mut app, TaskKind::UserComplete, first, loaded(first));
        assert!(matches!(effects.as_slice(), [UiEffect::CancelTask { .. }]));
        assert_eq!(app.search.mount_state(), Some(MountState::Pending));

        run_task(&mut app, TaskKind::UserComplete, second, loaded(second));
        assert_eq!(app.search.mount_state(), Some(MountState::Attached));
    }

    #[test]
    fn test_failed_load_leaves_plain_input() {
        let mut app = app();
        let mount = load_task(&press(&mut app, KeyCode::Char('/')));
        run_task(
            &mut app,
            TaskKind::UserComplete,
            mount,
            UiEvent::UserCompleteLoaded {
                mount,
                result: Err("service unavailable".to_string()),
            },
        );

        assert_eq!(app.search.mount_state(), Some(MountState::Failed));
        assert!(type_text(&mut app, "user42").is_empty());
        assert_eq!(app.search.text(), "user42");
    }

    #[test]
    fn test_newer_query_supersedes_older() {
        let mut app = app();
        let mount = load_task(&press(&mut app, KeyCode::Char('/')));
        run_task(&mut app, TaskKind::UserComplete, mount, loaded(mount));

        let older = CancellationToken::new();
        update(
            &mut app,
            UiEvent::TaskStarted {
                kind: TaskKind::PlayerSearch,
                started: TaskStarted {
                    id: TaskId(100),
                    cancel: Some(older.clone()),
                },
            },
        );
        let effects = update(
            &mut app,
            UiEvent::TaskStarted {
                kind: TaskKind::PlayerSearch,
                started: TaskStarted {
                    id: TaskId(101),
                    cancel: None,
                },
            },
        );

        let [UiEffect::CancelTask {
            token: Some(token), ..
        }] = effects.as_slice()
        else {
            panic!("expected the older query to be cancelled, got {effects:?}");
        };
        token.cancel();
        assert!(older.is_cancelled());
        assert_eq!(app.tasks.player_search.active, Some(TaskId(101)));
    }

    #[test]
    fn test_mouse_down_on_toggle_presses_it() {
        let mut app = app();
        app.toggle_area.set(Rect::new(37, 0, 3, 1));
        let click = |column| {
            UiEvent::Terminal(Event::Mouse(MouseEvent {
                kind: MouseEventKind::Down(MouseButton::Left),
                column,
                row: 0,
                modifiers: KeyModifiers::NONE,
            }))
        };

        update(&mut app, click(10));
        assert!(!app.ctrl.searching());

        let effects = update(&mut app, click(38));
        assert!(app.ctrl.searching());
        load_task(&effects);

        let effects = update(&mut app, click(38));
        assert!(!app.ctrl.searching());
        assert!(effects.iter().all(|e| matches!(e, UiEffect::CancelTask { .. })));
    }

    #[test]
    fn test_quit_keys() {
        let mut app = app();
        assert!(matches!(
            press(&mut app, KeyCode::Char('q')).as_slice(),
            [UiEffect::Quit]
        ));

        // While searching, `q` is text.
        press(&mut app, KeyCode::Char('/'));
        assert!(press(&mut app, KeyCode::Char('q')).is_empty());
        assert_eq!(app.search.text(), "q");

        let ctrl_c = UiEvent::Terminal(Event::Key(KeyEvent::new(
            KeyCode::Char('c'),
            KeyModifiers::CONTROL,
        )));
        assert!(matches!(update(&mut app, ctrl_c).as_slice(), [UiEffect::Quit]));
    }

    #[test]
    fn test_pager_keys_when_search_closed() {
        let mut app = app();
        press(&mut app, KeyCode::Right);
        assert_eq!(app.ctrl.page(), 2);
        press(&mut app, KeyCode::Home);
        assert_eq!(app.ctrl.page(), 1);
    }
}
