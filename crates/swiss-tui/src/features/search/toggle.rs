//! Search toggle button shown in the standings header.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Span;
use ratatui::widgets::Widget;

use crate::controller::TournamentController;

/// Tooltip of the toggle, also shown as the footer hint.
pub const TITLE: &str = "Search tournament players";

/// Icon code while search is open.
pub const ACTIVE_ICON: char = 'L';

/// Icon code while search is closed.
pub const INACTIVE_ICON: char = 'y';

/// Columns taken by the rendered button.
pub const WIDTH: u16 = 3;

/// Render description of the toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchToggle {
    pub active: bool,
    pub icon: char,
    pub title: &'static str,
}

/// Describes the toggle for the controller's current state.
pub fn button<C: TournamentController + ?Sized>(ctrl: &C) -> SearchToggle {
    let active = ctrl.searching();
    SearchToggle {
        active,
        icon: if active { ACTIVE_ICON } else { INACTIVE_ICON },
        title: TITLE,
    }
}

impl SearchToggle {
    /// Press-down handler: toggles search, then requests a render.
    pub fn press<C: TournamentController + ?Sized>(ctrl: &mut C) {
        ctrl.toggle_search();
        ctrl.redraw();
    }

    /// Keyboard shortcuts that act as a press: `/` and `Ctrl+F`.
    pub fn is_shortcut(key: &KeyEvent) -> bool {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('/') => !ctrl,
            KeyCode::Char('f') => ctrl,
            _ => false,
        }
    }

    pub fn symbol(&self) -> &'static str {
        icon_symbol(self.icon)
    }

    fn style(&self) -> Style {
        if self.active {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Yellow)
        }
    }
}

/// Maps icon-font codes to terminal glyphs.
pub fn icon_symbol(icon: char) -> &'static str {
    match icon {
        INACTIVE_ICON => "⌕",
        ACTIVE_ICON => "✕",
        _ => "?",
    }
}

impl Widget for &SearchToggle {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let label = format!(" {} ", self.symbol());
        let span = Span::styled(label, self.style());
        buf.set_span(area.x, area.y, &span, area.width.min(WIDTH));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::testing::{Call, RecordingCtrl};

    #[test]
    fn test_inactive_toggle() {
        let ctrl = RecordingCtrl::new(false, "abc");
        let toggle = button(&ctrl);

        assert!(!toggle.active);
        assert_eq!(toggle.icon, 'y');
        assert_eq!(toggle.title, "Search tournament players");
    }

    #[test]
    fn test_active_toggle() {
        let ctrl = RecordingCtrl::new(true, "abc");
        let toggle = button(&ctrl);

        assert!(toggle.active);
        assert_eq!(toggle.icon, 'L');
        assert_eq!(toggle.title, TITLE);
    }

    #[test]
    fn test_press_toggles_then_redraws_once() {
        for searching in [false, true] {
            let mut ctrl = RecordingCtrl::new(searching, "abc");
            SearchToggle::press(&mut ctrl);

            assert_eq!(ctrl.calls, vec![Call::ToggleSearch, Call::Redraw]);
            assert_eq!(ctrl.searching, !searching);
        }
    }

    #[test]
    fn test_shortcuts() {
        assert!(SearchToggle::is_shortcut(&KeyEvent::new(
            KeyCode::Char('/'),
            KeyModifiers::NONE
        )));
        assert!(SearchToggle::is_shortcut(&KeyEvent::new(
            KeyCode::Char('f'),
            KeyModifiers::CONTROL
        )));
        assert!(!SearchToggle::is_shortcut(&KeyEvent::new(
            KeyCode::Char('f'),
            KeyModifiers::NONE
        )));
    }

    #[test]
    fn test_render_uses_glyph() {
        let toggle = button(&RecordingCtrl::new(false, "abc"));
        let area = Rect::new(0, 0, WIDTH, 1);
        let mut buf = Buffer::empty(area);
        (&toggle).render(area, &mut buf);

        assert_eq!(buf[(1, 0)].symbol(), "⌕");
    }
}
