//! Standings view: header with the search toggle, the table page, and the pager.

use std::cell::Cell;

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Row, Table};

use crate::common::truncate_with_ellipsis;
use crate::controller::{TournamentController, TournamentCtrl};
use crate::features::search::{self, toggle};

/// Handles pager keys. Returns true when the key was consumed.
pub fn handle_key(ctrl: &mut TournamentCtrl, key: KeyEvent) -> bool {
    let before = ctrl.page();
    match key.code {
        KeyCode::Left | KeyCode::PageUp => ctrl.prev_page(),
        KeyCode::Right | KeyCode::PageDown => ctrl.next_page(),
        KeyCode::Home => ctrl.first_page(),
        KeyCode::End => ctrl.last_page(),
        _ => return false,
    }
    if ctrl.page() != before {
        ctrl.redraw();
    }
    true
}

/// Renders the header and records where the toggle was drawn.
pub fn render_header(
    ctrl: &TournamentCtrl,
    frame: &mut Frame,
    area: Rect,
    toggle_area: &Cell<Rect>,
) {
    let button = search::button(ctrl);
    let toggle_width = toggle::WIDTH.min(area.width);
    let title_width = area.width.saturating_sub(toggle_width + 1) as usize;

    let data = &ctrl.data;
    let progress = format!("  round {}/{}", data.round, data.nb_rounds);
    let name_width = title_width.saturating_sub(progress.chars().count());
    let line = Line::from(vec![
        Span::styled(
            truncate_with_ellipsis(&data.name, name_width),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::styled(progress, Style::default().fg(Color::DarkGray)),
    ]);
    frame.render_widget(Paragraph::new(line), area);

    let button_area = Rect::new(
        area.x + area.width.saturating_sub(toggle_width),
        area.y,
        toggle_width,
        area.height.min(1),
    );
    frame.render_widget(&button, button_area);
    toggle_area.set(button_area);
}

/// Renders the current page of the standings.
pub fn render_table(ctrl: &TournamentCtrl, frame: &mut Frame, area: Rect) {
    let focus = ctrl.focus();
    let rows: Vec<Row> = ctrl
        .page_players()
        .iter()
        .map(|player| {
            let row = Row::new(vec![
                player.rank.to_string(),
                player.display_name(),
                player.rating.to_string(),
                format!("{:.1}", player.points),
                format!("{:.2}", player.tie_break),
            ]);
            if focus.is_some_and(|id| id.matches(&player.id)) {
                row.style(
                    Style::default()
                        .fg(Color::Black)
                        .bg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                )
            } else {
                row
            }
        })
        .collect();

    let header = Row::new(vec!["#", "Player", "Rating", "Pts", "TB"])
        .style(Style::default().fg(Color::DarkGray));
    let table = Table::new(
        rows,
        [
            Constraint::Length(4),
            Constraint::Min(12),
            Constraint::Length(6),
            Constraint::Length(5),
            Constraint::Length(6),
        ],
    )
    .header(header)
    .block(Block::default().borders(Borders::TOP));
    frame.render_widget(table, area);
}

/// Renders the pager footer shown while search is closed.
pub fn render_pager(ctrl: &TournamentCtrl, frame: &mut Frame, area: Rect) {
    let line = Line::from(vec![
        Span::styled("← ", Style::default().fg(Color::DarkGray)),
        Span::raw(format!("page {}/{}", ctrl.page(), ctrl.page_count())),
        Span::styled(" →", Style::default().fg(Color::DarkGray)),
        Span::styled(
            format!("   / {}", toggle::TITLE),
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}
