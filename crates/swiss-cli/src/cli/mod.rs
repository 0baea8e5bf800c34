//! CLI entry and dispatch.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use swiss_core::config;

mod commands;

#[derive(Parser)]
#[command(name = "swiss")]
#[command(version = "0.1")]
#[command(about = "Terminal standings viewer for Swiss tournaments")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Tournament JSON file to show
    #[arg(long, value_name = "FILE", env = "SWISS_DATA")]
    data: Option<PathBuf>,

    /// Override the standings rows per page from config
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u16).range(1..))]
    per_page: Option<u16>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(clap::Subcommand)]
enum ConfigCommands {
    /// Print the config file path
    Path,
    /// Create a config file with the default template
    Init,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // one tokio runtime for everything
    let rt = tokio::runtime::Runtime::new().context("create tokio runtime")?;

    rt.block_on(async move { dispatch(cli).await })
}

async fn dispatch(cli: Cli) -> Result<()> {
    let Cli {
        command,
        data,
        per_page,
    } = cli;

    if let Some(Commands::Config { command }) = command {
        return match command {
            ConfigCommands::Path => {
                commands::config::path();
                Ok(())
            }
            ConfigCommands::Init => commands::config::init(),
        };
    }

    let mut config = config::Config::load().context("load config")?;
    if let Some(per_page) = per_page {
        config.players_per_page = usize::from(per_page);
    }

    let Some(data) = data else {
        anyhow::bail!("No tournament to show.\nPass --data <FILE> or set SWISS_DATA.");
    };
    commands::standings::run(&config, &data).await
}
