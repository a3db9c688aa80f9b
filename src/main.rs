use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use ratedelta::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Download today's reference rates and store them
    Fetch,
    /// Show today's rates and the change since yesterday
    Delta {
        /// Render a table instead of the JSON response
        #[arg(long)]
        table: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let config_path = cli.config_path.as_deref();
    let result = match cli.command {
        Some(Commands::Setup) => setup(),
        Some(Commands::Fetch) => {
            ratedelta::run_command(
                ratedelta::AppCommand::Fetch,
                config_path,
                ratedelta::OutputFormat::Json,
            )
            .await
        }
        Some(Commands::Delta { table }) => {
            let format = if table {
                ratedelta::OutputFormat::Table
            } else {
                ratedelta::OutputFormat::Json
            };
            ratedelta::run_command(ratedelta::AppCommand::Delta, config_path, format).await
        }
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}

fn setup() -> anyhow::Result<()> {
    use anyhow::Context;

    let path = ratedelta::core::config::AppConfig::default_config_path()?;

    if path.exists() {
        anyhow::bail!("Configuration file already exists at {}", path.display());
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let default_config = r#"---
feed:
  url: "https://www.ecb.europa.eu/stats/eurofxref/eurofxref-daily.xml"

store:
  table: "CurrencyRates"
  index: "TSIndex"

# "zero" treats a currency missing yesterday as rate 0, "omit" leaves it out
delta:
  missing_previous: zero
"#;

    std::fs::write(&path, default_config)
        .with_context(|| format!("Failed to write config file to {}", path.display()))?;

    tracing::info!("Created default configuration at {}", path.display());
    Ok(())
}
