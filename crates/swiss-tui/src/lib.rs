//! Full-screen standings viewer with player search.

pub mod common;
pub mod controller;
pub mod effects;
pub mod events;
pub mod features;
pub mod render;
pub mod runtime;
pub mod state;
pub mod terminal;
pub mod update;

use std::io::{IsTerminal, stderr};
use std::sync::Arc;

use anyhow::Result;
pub use controller::{TournamentController, TournamentCtrl};
pub use runtime::TuiRuntime;
use swiss_core::complete::UserCompleteService;
use swiss_core::config::Config;
use swiss_core::tournament::TournamentData;

/// Runs the standings view until the user quits.
///
/// Must be called within a tokio runtime context.
pub fn run_standings(
    config: &Config,
    data: TournamentData,
    service: Arc<dyn UserCompleteService>,
) -> Result<()> {
    if !stderr().is_terminal() {
        anyhow::bail!("The standings view requires a terminal.");
    }

    tracing::info!(swiss = %data.id, players = data.players.len(), "opening standings");
    let mut runtime = TuiRuntime::new(data, config, service)?;
    runtime.run()
}
