//! Tournament view controller.
//!
//! Components never own tournament state: they read it and call back into a
//! [`TournamentController`]. [`TournamentCtrl`] is the application's
//! implementation; tests substitute a recorder.

use swiss_core::tournament::{Player, PlayerId, SwissId, TournamentData};

/// The controller surface the search components depend on.
pub trait TournamentController {
    /// Whether player search is open.
    fn searching(&self) -> bool;

    /// Identifier of the tournament being viewed.
    fn swiss_id(&self) -> &SwissId;

    fn toggle_search(&mut self);

    /// Moves the standings to the page holding `id` and focuses that row.
    fn jump_to_page_of(&mut self, id: &PlayerId);

    /// Requests a render before the next input poll.
    fn redraw(&mut self);
}

/// Standings controller backed by a loaded tournament snapshot.
#[derive(Debug)]
pub struct TournamentCtrl {
    pub data: TournamentData,
    per_page: usize,
    /// 1-based current page.
    page: usize,
    searching: bool,
    focus: Option<PlayerId>,
    redraw_requested: bool,
    alive: bool,
}

impl TournamentCtrl {
    pub fn new(data: TournamentData, per_page: usize) -> Self {
        Self {
            data,
            per_page: per_page.max(1),
            page: 1,
            searching: false,
            focus: None,
            redraw_requested: true,
            alive: true,
        }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_count(&self) -> usize {
        self.data.page_count(self.per_page)
    }

    /// Players on the current page.
    pub fn page_players(&self) -> &[Player] {
        self.data.page(self.page, self.per_page)
    }

    /// Player highlighted by the last jump, if any.
    pub fn focus(&self) -> Option<&PlayerId> {
        self.focus.as_ref()
    }

    pub fn set_page(&mut self, page: usize) {
        if !self.alive {
            return;
        }
        let page = page.clamp(1, self.page_count());
        if page != self.page {
            self.page = page;
            self.focus = None;
        }
    }

    pub fn next_page(&mut self) {
        self.set_page(self.page + 1);
    }

    pub fn prev_page(&mut self) {
        self.set_page(self.page.saturating_sub(1));
    }

    pub fn first_page(&mut self) {
        self.set_page(1);
    }

    pub fn last_page(&mut self) {
        self.set_page(self.page_count());
    }

    /// Returns and clears the pending redraw request.
    pub fn take_redraw(&mut self) -> bool {
        std::mem::take(&mut self.redraw_requested)
    }

    /// Marks the controller as torn down; later mutations are ignored.
    pub fn teardown(&mut self) {
        self.alive = false;
    }
}

impl TournamentController for TournamentCtrl {
    fn searching(&self) -> bool {
        self.searching
    }

    fn swiss_id(&self) -> &SwissId {
        &self.data.id
    }

    fn toggle_search(&mut self) {
        if !self.alive {
            return;
        }
        self.searching = !self.searching;
        tracing::debug!(searching = self.searching, "search toggled");
    }

    fn jump_to_page_of(&mut self, id: &PlayerId) {
        if !self.alive {
            return;
        }
        let Some(page) = self.data.page_of(id, self.per_page) else {
            tracing::info!(player = %id, "player not in standings");
            return;
        };
        self.page = page;
        self.focus = self.data.player(id).map(|p| p.id.clone());
        tracing::debug!(player = %id, page, "jumped to player page");
    }

    fn redraw(&mut self) {
        if self.alive {
            self.redraw_requested = true;
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    /// A controller call, as recorded by [`RecordingCtrl`].
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum Call {
        ToggleSearch,
        JumpToPageOf(PlayerId),
        Redraw,
    }

    /// Controller double that records every call in order.
    #[derive(Debug)]
    pub struct RecordingCtrl {
        pub searching: bool,
        pub id: SwissId,
        pub calls: Vec<Call>,
    }

    impl RecordingCtrl {
        pub fn new(searching: bool, id: &str) -> Self {
            Self {
                searching,
                id: SwissId(id.to_string()),
                calls: Vec::new(),
            }
        }
    }

    impl TournamentController for RecordingCtrl {
        fn searching(&self) -> bool {
            self.searching
        }

        fn swiss_id(&self) -> &SwissId {
            &self.id
        }

        fn toggle_search(&mut self) {
            self.searching = !self.searching;
            self.calls.push(Call::ToggleSearch);
        }

        fn jump_to_page_of(&mut self, id: &PlayerId) {
            self.calls.push(Call::JumpToPageOf(id.clone()));
        }

        fn redraw(&mut self) {
            self.calls.push(Call::Redraw);
        }
    }

    pub fn player(rank: u32, id: &str) -> Player {
        Player {
            id: PlayerId::new(id),
            name: id.to_string(),
            title: None,
            rating: 2000 - rank,
            points: 0.0,
            tie_break: 0.0,
            rank,
        }
    }

    /// 25 players: user1 .. user25, plus `user42` ranked last.
    pub fn tournament() -> TournamentData {
        let mut players: Vec<Player> = (1..=25).map(|n| player(n, &format!("user{n}"))).collect();
        players.push(player(26, "user42"));
        TournamentData {
            id: SwissId("abc".to_string()),
            name: "Weekly Swiss".to_string(),
            nb_rounds: 7,
            round: 3,
            players,
        }
    }
}
