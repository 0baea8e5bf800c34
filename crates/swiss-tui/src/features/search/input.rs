//! Search input bound to the player completion widget.
//!
//! The input has an explicit lifecycle instead of an insertion callback:
//!
//! - [`SearchInput::mount`] runs once per insertion and returns the effect
//!   that acquires the completion handle.
//! - [`SearchInput::on_user_complete`] attaches the handle, but only when the
//!   result belongs to the live mount.
//! - [`SearchInput::unmount`] disposes the mount and cancels pending work.
//!
//! ```text
//! mount() ─▶ Pending ─┬─▶ Attached
//!                     ├─▶ Failed      (acquisition error, plain input)
//!                     └─▶ (abandoned) unmount() before the result arrives
//! ```

use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::{Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};
use swiss_core::complete::{
    CompleteOptions, DEFAULT_TAG, SearchResult, UserComplete, UserCompleteService,
};
use swiss_core::config::CompleteConfig;

use super::complete::Autocomplete;
use super::line::LineBuffer;
use super::toggle::{SearchToggle, TITLE};
use crate::common::{TaskId, TaskKind, TaskSeq, Tasks, truncate_with_ellipsis, width_before};
use crate::controller::TournamentController;
use crate::effects::UiEffect;

/// Spinner frames shown while the completion handle is loading.
const SPINNER_FRAMES: &[&str] = &["◐", "◓", "◑", "◒"];

/// Lifecycle of one mount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MountState {
    Pending,
    Attached,
    Failed,
}

#[derive(Debug)]
struct Mount {
    id: TaskId,
    state: MountState,
}

/// The search input component.
#[derive(Debug)]
pub struct SearchInput {
    service: Arc<dyn UserCompleteService>,
    settings: CompleteConfig,
    mount: Option<Mount>,
    line: LineBuffer,
    complete: Option<Autocomplete>,
    focused: bool,
}

impl SearchInput {
    pub fn new(service: Arc<dyn UserCompleteService>, settings: CompleteConfig) -> Self {
        Self {
            service,
            settings,
            mount: None,
            line: LineBuffer::default(),
            complete: None,
            focused: false,
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.mount.is_some()
    }

    pub fn mount_state(&self) -> Option<MountState> {
        self.mount.as_ref().map(|m| m.state)
    }

    /// Whether `id` names the current mount.
    pub fn is_live_mount(&self, id: TaskId) -> bool {
        self.mount.as_ref().is_some_and(|m| m.id == id)
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn text(&self) -> &str {
        self.line.text()
    }

    pub fn autocomplete(&self) -> Option<&Autocomplete> {
        self.complete.as_ref()
    }

    /// Post-insertion initialization.
    ///
    /// Returns the acquisition effect on the first call after an unmount and
    /// `None` while already mounted.
    pub fn mount(&mut self, seq: &mut TaskSeq) -> Option<UiEffect> {
        if self.mount.is_some() {
            return None;
        }
        let id = seq.next_id();
        self.mount = Some(Mount {
            id,
            state: MountState::Pending,
        });
        tracing::debug!(mount = id.0, "search input mounted");
        Some(UiEffect::LoadUserComplete {
            task: id,
            service: Arc::clone(&self.service),
        })
    }

    /// Disposal: forgets the mount and cancels its outstanding tasks.
    pub fn unmount(&mut self, tasks: &mut Tasks) -> Vec<UiEffect> {
        let Some(mount) = self.mount.take() else {
            return Vec::new();
        };
        if mount.state == MountState::Pending {
            tracing::debug!(mount = mount.id.0, "search input unmounted before attach");
        }
        self.line.clear();
        self.complete = None;
        self.focused = false;

        [TaskKind::UserComplete, TaskKind::PlayerSearch]
            .into_iter()
            .filter_map(|kind| {
                let token = tasks.state_mut(kind).take_cancel()?;
                Some(UiEffect::CancelTask {
                    kind,
                    token: Some(token),
                })
            })
            .collect()
    }

    /// Completion handle acquisition finished.
    ///
    /// Attaches only when `mount` is the live, still pending mount. Returns
    /// true when the input changed.
    pub fn on_user_complete<C: TournamentController + ?Sized>(
        &mut self,
        ctrl: &C,
        mount: TaskId,
        result: Result<UserComplete, String>,
    ) -> bool {
        let Some(live) = self.mount.as_mut() else {
            tracing::debug!(mount = mount.0, "completion resolved after unmount; dropped");
            return false;
        };
        if live.id != mount || live.state != MountState::Pending {
            tracing::debug!(mount = mount.0, live = live.id.0, "stale completion dropped");
            return false;
        }

        match result {
            Ok(handle) => {
                let opts = attach_options(ctrl, &self.settings);
                tracing::info!(swiss = %opts.swiss, tag = %opts.tag, "player search attached");
                if opts.focus {
                    self.focused = true;
                }
                self.complete = Some(Autocomplete::attach(handle, opts));
                live.state = MountState::Attached;
            }
            Err(error) => {
                tracing::warn!(%error, "player search unavailable");
                live.state = MountState::Failed;
            }
        }
        self.focused = true;
        true
    }

    /// Suggestion results arrived.
    pub fn on_players_found(&mut self, term: &str, result: Result<Vec<SearchResult>, String>) {
        if let Some(complete) = self.complete.as_mut() {
            complete.on_results(term, result);
        }
    }

    /// Selection handler: jump to the player's page, then request a render.
    pub fn on_select<C: TournamentController + ?Sized>(ctrl: &mut C, result: &SearchResult) {
        ctrl.jump_to_page_of(&result.id);
        ctrl.redraw();
    }

    /// Handles a key while the input has focus.
    pub fn handle_key<C: TournamentController + ?Sized>(
        &mut self,
        ctrl: &mut C,
        key: KeyEvent,
        seq: &mut TaskSeq,
    ) -> Vec<UiEffect> {
        let ctrl_mod = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => {
                SearchToggle::press(ctrl);
                Vec::new()
            }
            KeyCode::Char('f') if ctrl_mod => {
                SearchToggle::press(ctrl);
                Vec::new()
            }
            KeyCode::Up => {
                if let Some(complete) = self.complete.as_mut() {
                    complete.select_prev();
                    ctrl.redraw();
                }
                Vec::new()
            }
            KeyCode::Down => {
                if let Some(complete) = self.complete.as_mut() {
                    complete.select_next();
                    ctrl.redraw();
                }
                Vec::new()
            }
            KeyCode::Enter | KeyCode::Tab => {
                let Some(selected) = self
                    .complete
                    .as_ref()
                    .and_then(Autocomplete::selected)
                    .cloned()
                else {
                    return Vec::new();
                };
                self.line.set_text(&selected.name);
                if let Some(complete) = self.complete.as_mut() {
                    complete.reset();
                }
                Self::on_select(ctrl, &selected);
                Vec::new()
            }
            _ => {
                if !self.line.input(key) {
                    ctrl.redraw();
                    return Vec::new();
                }
                ctrl.redraw();
                let term = self.line.text().to_string();
                self.complete
                    .as_mut()
                    .and_then(|complete| complete.on_term_changed(&term, seq))
                    .into_iter()
                    .collect()
            }
        }
    }

    /// Rows needed to render the input with its suggestions.
    pub fn height(&self) -> u16 {
        let suggestions = self
            .complete
            .as_ref()
            .map_or(0, |c| c.suggestions().len());
        3 + suggestions as u16
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, spinner_frame: usize) {
        let input_area = Rect::new(area.x, area.y, area.width, area.height.min(3));
        let border = if self.focused {
            Color::Yellow
        } else {
            Color::DarkGray
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border))
            .title(format!(" {TITLE} "));
        let inner = block.inner(input_area);
        frame.render_widget(block, input_area);

        let line = match self.mount_state() {
            Some(MountState::Pending) if self.line.is_empty() => {
                let spinner = SPINNER_FRAMES[spinner_frame % SPINNER_FRAMES.len()];
                Line::from(Span::styled(
                    format!("{spinner} loading player search"),
                    Style::default().fg(Color::DarkGray),
                ))
            }
            Some(MountState::Failed) if self.line.is_empty() => Line::from(Span::styled(
                "player search unavailable",
                Style::default().fg(Color::Red),
            )),
            _ => {
                let mut spans = vec![Span::raw(self.line.text().to_string())];
                if self.complete.as_ref().is_some_and(Autocomplete::is_loading) {
                    spans.push(Span::styled(" …", Style::default().fg(Color::DarkGray)));
                }
                Line::from(spans)
            }
        };
        frame.render_widget(Paragraph::new(line), inner);

        if self.focused && inner.width > 0 {
            let offset = width_before(self.line.text(), self.line.cursor()) as u16;
            frame.set_cursor_position(Position::new(
                inner.x + offset.min(inner.width.saturating_sub(1)),
                inner.y,
            ));
        }

        let Some(complete) = self.complete.as_ref() else {
            return;
        };
        if complete.suggestions().is_empty() || area.height <= 3 {
            return;
        }
        let list_area = Rect::new(
            area.x + 1,
            area.y + 3,
            area.width.saturating_sub(2),
            area.height - 3,
        );
        render_suggestions(frame, complete, list_area);
    }
}

fn attach_options<C: TournamentController + ?Sized>(
    ctrl: &C,
    settings: &CompleteConfig,
) -> CompleteOptions {
    CompleteOptions {
        swiss: ctrl.swiss_id().clone(),
        tag: DEFAULT_TAG.to_string(),
        focus: true,
        min_length: settings.min_length,
        max_results: settings.max_results,
    }
}

fn render_suggestions(frame: &mut Frame, complete: &Autocomplete, area: Rect) {
    let name_width = area.width.saturating_sub(8) as usize;
    let tag = complete.options().tag.as_str();
    let items: Vec<ListItem> = complete
        .suggestions()
        .iter()
        .map(|result| ListItem::new(build_suggestion_line(result, tag, name_width)))
        .collect();

    let list = List::new(items)
        .highlight_style(
            Style::default()
                .bg(Color::Yellow)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▶ ");

    let mut state = ListState::default();
    state.select(Some(complete.selected_index()));
    frame.render_stateful_widget(list, area, &mut state);
}

/// Style of the query-matched characters for a markup tag.
fn tag_style(tag: &str) -> Style {
    let plain = Style::default().fg(Color::Cyan);
    match tag {
        "b" | "strong" => plain.add_modifier(Modifier::BOLD),
        "i" | "em" => plain.add_modifier(Modifier::ITALIC),
        "u" => plain.add_modifier(Modifier::UNDERLINED),
        "mark" => Style::default().fg(Color::Black).bg(Color::Yellow),
        _ => Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    }
}

/// Builds one suggestion row: the (titled) name with matched characters
/// styled per `tag`, followed by the rating.
fn build_suggestion_line(result: &SearchResult, tag: &str, name_width: usize) -> Line<'static> {
    let (name, offset) = match &result.title {
        Some(title) => (
            format!("{title} {}", result.name),
            title.chars().count() + 1,
        ),
        None => (result.name.clone(), 0),
    };
    let shown = truncate_with_ellipsis(&name, name_width);
    // The ellipsis never takes a match style.
    let kept = if shown == name {
        usize::MAX
    } else {
        shown.chars().count().saturating_sub(1)
    };

    let plain = Style::default().fg(Color::Cyan);
    let matched = tag_style(tag);
    let is_match = |idx: usize| {
        idx < kept
            && idx >= offset
            && result.match_indices.binary_search(&(idx - offset)).is_ok()
    };

    let mut spans = Vec::new();
    let mut run = String::new();
    let mut run_matched = false;
    for (idx, ch) in shown.chars().enumerate() {
        let hit = is_match(idx);
        if hit != run_matched && !run.is_empty() {
            let style = if run_matched { matched } else { plain };
            spans.push(Span::styled(std::mem::take(&mut run), style));
        }
        run_matched = hit;
        run.push(ch);
    }
    if !run.is_empty() {
        let style = if run_matched { matched } else { plain };
        spans.push(Span::styled(run, style));
    }

    if let Some(rating) = result.rating {
        spans.push(Span::styled(
            format!(" {rating}"),
            Style::default().fg(Color::DarkGray),
        ));
    }
    Line::from(spans)
}
