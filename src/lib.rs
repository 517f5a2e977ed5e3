pub mod cli;
pub mod commands;
pub mod detection;
pub mod models;
pub mod monitor;
pub mod render;
pub mod settings;
pub mod timer;
pub mod utils;
pub mod video;
pub mod zones;

use anyhow::{Context, Result};
use clap::Parser;

use cli::{Cli, Command};
use settings::SettingsStore;

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    utils::logging::init_logging(cli.verbose);

    log::info!("zonewatch starting up...");

    let settings = SettingsStore::new(cli.settings.clone())?.into_settings();

    match cli.command {
        Command::Monitor(args) => {
            let runtime = tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()
                .context("Failed to start the async runtime")?;
            let summary = runtime.block_on(commands::monitor(args, settings))?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        Command::Zones { zones, action } => {
            let path = zones.unwrap_or(settings.zones_path);
            for line in commands::zones(&path, action)? {
                println!("{line}");
            }
        }
    }

    Ok(())
}
