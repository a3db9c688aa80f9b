pub mod cli;
pub mod core;
pub mod handlers;
pub mod providers;
pub mod store;

use crate::core::config::AppConfig;
use crate::handlers::{DeltaCalculator, RateFetcher};
use anyhow::Result;
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppCommand {
    Fetch,
    Delta,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Json,
    Table,
}

pub async fn run_command(
    command: AppCommand,
    config_path: Option<&str>,
    format: OutputFormat,
) -> Result<()> {
    info!("ratedelta starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let table = store::open_table(&config)?;
    let event = serde_json::Value::Object(serde_json::Map::new());

    let response = match command {
        AppCommand::Fetch => {
            let source = Arc::new(providers::ecb::EcbFeedProvider::new(&config.feed.url));
            RateFetcher::new(source, table).handle(&event).await?
        }
        AppCommand::Delta => {
            let calculator =
                DeltaCalculator::new(table, &config.store.index, config.delta.missing_previous);
            if format == OutputFormat::Table {
                let report = calculator.calculate(Utc::now().date_naive()).await?;
                cli::ui::display_delta(&report);
                return Ok(());
            }
            calculator.handle(&event).await?
        }
    };

    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}
