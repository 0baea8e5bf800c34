//! TUI runtime: owns the terminal, runs the event loop, executes effects.
//!
//! All side effects happen here. The reducer stays pure and produces
//! effects; this module executes them.
//!
//! ## Inbox Pattern
//!
//! - Spawned tasks send `UiEvent`s to `inbox_tx`
//! - The runtime drains `inbox_rx` each frame
//!
//! Rendering is on demand: a frame is drawn only when the controller has a
//! pending redraw request.

mod handlers;
mod inbox;

use std::future::Future;
use std::io::Stdout;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event;
use inbox::{UiEventReceiver, UiEventSender};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use swiss_core::complete::UserCompleteService;
use swiss_core::config::Config;
use swiss_core::tournament::TournamentData;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::common::{TaskCompleted, TaskId, TaskKind, TaskStarted};
use crate::controller::TournamentController;
use crate::effects::UiEffect;
use crate::events::UiEvent;
use crate::state::AppState;
use crate::{render, terminal, update};

/// Tick cadence while something is loading (spinner animation).
pub const FRAME_DURATION: Duration = Duration::from_millis(80);

/// Poll duration when idle.
pub const IDLE_POLL_DURATION: Duration = Duration::from_millis(250);

/// Full-screen TUI runtime.
///
/// Terminal state is restored on drop and on panic.
pub struct TuiRuntime {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    pub state: AppState,
    inbox_tx: UiEventSender,
    inbox_rx: UiEventReceiver,
    last_tick: Instant,
}

impl TuiRuntime {
    /// Must be called within a tokio runtime context.
    pub fn new(
        data: TournamentData,
        config: &Config,
        service: Arc<dyn UserCompleteService>,
    ) -> Result<Self> {
        // Set up panic hook BEFORE entering alternate screen
        terminal::install_panic_hook();
        let terminal = terminal::setup_terminal().context("Failed to setup terminal")?;

        let state = AppState::new(data, config, service);
        let (inbox_tx, inbox_rx) = mpsc::unbounded_channel();

        Ok(Self {
            terminal,
            state,
            inbox_tx,
            inbox_rx,
            last_tick: Instant::now(),
        })
    }

    /// Runs the main event loop until quit.
    pub fn run(&mut self) -> Result<()> {
        terminal::enable_input_features()?;
        let result = self.event_loop();
        self.shutdown();
        let _ = terminal::disable_input_features();
        result
    }

    fn event_loop(&mut self) -> Result<()> {
        while !self.state.should_quit {
            let events = self.collect_events()?;
            for event in events {
                let effects = update::update(&mut self.state, event);
                self.execute_effects(effects);
            }

            if self.state.ctrl.take_redraw() {
                self.terminal.draw(|frame| {
                    render::render(&self.state, frame);
                })?;
            }
        }
        Ok(())
    }

    /// Tears the controller down and cancels outstanding tasks.
    fn shutdown(&mut self) {
        for kind in [TaskKind::UserComplete, TaskKind::PlayerSearch] {
            if let Some(cancel) = self.state.tasks.state_mut(kind).take_cancel() {
                cancel.cancel();
            }
        }
        self.state.ctrl.teardown();
        tracing::info!("standings view closed");
    }

    // ========================================================================
    // Event Collection
    // ========================================================================

    fn collect_events(&mut self) -> Result<Vec<UiEvent>> {
        let mut events = Vec::new();

        let tick_interval = if self.state.tasks.is_any_running() || self.state.ctrl.searching() {
            FRAME_DURATION
        } else {
            IDLE_POLL_DURATION
        };

        while let Ok(ev) = self.inbox_rx.try_recv() {
            events.push(ev);
        }

        // Block until the next tick only when there is nothing to process.
        let poll_duration = if events.is_empty() {
            tick_interval.saturating_sub(self.last_tick.elapsed())
        } else {
            Duration::ZERO
        };

        if event::poll(poll_duration)? {
            events.push(UiEvent::Terminal(event::read()?));
            while event::poll(Duration::ZERO)? {
                events.push(UiEvent::Terminal(event::read()?));
            }
        }

        if self.last_tick.elapsed() >= tick_interval {
            events.push(UiEvent::Tick);
            self.last_tick = Instant::now();
        }

        Ok(events)
    }

    // ========================================================================
    // Effect Dispatch
    // ========================================================================

    fn execute_effects(&mut self, effects: Vec<UiEffect>) {
        for effect in effects {
            self.execute_effect(effect);
        }
    }

    /// Spawns an async task with a uniform TaskStarted/TaskCompleted lifecycle.
    fn spawn_task<F, Fut>(&self, kind: TaskKind, id: TaskId, cancelable: bool, f: F)
    where
        F: FnOnce(Option<CancellationToken>) -> Fut + Send + 'static,
        Fut: Future<Output = UiEvent> + Send + 'static,
    {
        let tx = self.inbox_tx.clone();
        let cancel = cancelable.then(CancellationToken::new);
        let started = TaskStarted {
            id,
            cancel: cancel.clone(),
        };
        let _ = tx.send(UiEvent::TaskStarted { kind, started });
        tokio::spawn(async move {
            let inner = f(cancel).await;
            let completed = TaskCompleted {
                id,
                result: Box::new(inner),
            };
            let _ = tx.send(UiEvent::TaskCompleted { kind, completed });
        });
    }

    fn execute_effect(&mut self, effect: UiEffect) {
        match effect {
            UiEffect::Quit => {
                self.state.should_quit = true;
            }
            UiEffect::CancelTask { kind, token } => {
                if let Some(cancel) = token {
                    tracing::debug!(?kind, "cancelling task");
                    cancel.cancel();
                }
            }
            UiEffect::LoadUserComplete { task, service } => {
                self.spawn_task(TaskKind::UserComplete, task, true, move |cancel| {
                    handlers::load_user_complete(task, service, cancel)
                });
            }
            UiEffect::SearchPlayers {
                task,
                handle,
                opts,
                term,
            } => {
                self.spawn_task(TaskKind::PlayerSearch, task, true, move |cancel| {
                    handlers::search_players(handle, opts, term, cancel)
                });
            }
        }
    }
}

impl Drop for TuiRuntime {
    fn drop(&mut self) {
        let _ = terminal::restore_terminal();
    }
}
