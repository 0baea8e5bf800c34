//! Swiss tournament data: identifiers, players, and standings pagination.

use std::fmt;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Tournament identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SwissId(pub String);

impl fmt::Display for SwissId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Player identifier (the lower-cased user name).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub String);

impl PlayerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Compares ids the way user names are compared: case-insensitively.
    pub fn matches(&self, other: &PlayerId) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One row of the standings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub rating: u32,
    /// Score in points (half points allowed).
    pub points: f32,
    #[serde(default)]
    pub tie_break: f32,
    pub rank: u32,
}

impl Player {
    /// Name with the title prefix, e.g. "GM Magnus".
    pub fn display_name(&self) -> String {
        match &self.title {
            Some(title) => format!("{title} {}", self.name),
            None => self.name.clone(),
        }
    }
}

/// Tournament snapshot as shown by the standings view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TournamentData {
    pub id: SwissId,
    pub name: String,
    pub nb_rounds: u32,
    #[serde(default)]
    pub round: u32,
    pub players: Vec<Player>,
}

impl TournamentData {
    /// Loads a tournament snapshot from a JSON file.
    ///
    /// Players are re-sorted into standings order.
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read tournament from {}", path.display()))?;
        Self::from_json(&contents)
            .with_context(|| format!("Failed to parse tournament from {}", path.display()))
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let mut data: TournamentData = serde_json::from_str(json)?;
        data.players.sort_by_key(|p| p.rank);
        Ok(data)
    }

    /// Number of standings pages (at least one, even when empty).
    pub fn page_count(&self, per_page: usize) -> usize {
        self.players.len().div_ceil(per_page.max(1)).max(1)
    }

    /// Players on a 1-based page. Out-of-range pages are empty.
    pub fn page(&self, page: usize, per_page: usize) -> &[Player] {
        let per_page = per_page.max(1);
        let start = page.saturating_sub(1).saturating_mul(per_page);
        if start >= self.players.len() {
            return &[];
        }
        let end = (start + per_page).min(self.players.len());
        &self.players[start..end]
    }

    /// The 1-based page holding a player, if they are in the standings.
    pub fn page_of(&self, id: &PlayerId, per_page: usize) -> Option<usize> {
        self.players
            .iter()
            .position(|p| p.id.matches(id))
            .map(|idx| idx / per_page.max(1) + 1)
    }

    pub fn player(&self, id: &PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id.matches(id))
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn player(rank: u32, id: &str, rating: u32) -> Player {
        Player {
            id: PlayerId::new(id),
            name: id.to_string(),
            title: None,
            rating,
            points: 0.0,
            tie_break: 0.0,
            rank,
        }
    }

    /// 25 players: user1 .. user25 in rank order.
    pub fn tournament() -> TournamentData {
        TournamentData {
            id: SwissId("abc".to_string()),
            name: "Weekly Swiss".to_string(),
            nb_rounds: 7,
            round: 3,
            players: (1..=25)
                .map(|n| player(n, &format!("user{n}"), 2000 - n))
                .collect(),
        }
    }
}
