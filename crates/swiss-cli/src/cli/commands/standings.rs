//! Standings command handler (the default mode).

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use swiss_core::complete::LocalUserComplete;
use swiss_core::config::Config;
use swiss_core::logging;
use swiss_core::tournament::TournamentData;

pub async fn run(config: &Config, data_path: &Path) -> Result<()> {
    let _log_guard = logging::init(&config.log).context("init logging")?;

    let data = TournamentData::load_from(data_path)?;
    tracing::info!(
        path = %data_path.display(),
        swiss = %data.id,
        per_page = config.players_per_page,
        "tournament loaded"
    );

    let service = Arc::new(LocalUserComplete::new(&data));
    swiss_tui::run_standings(config, data, service)
}
