use budgetflow::{
    BudgetStore, Result,
    config::{seed::load_seed_config, settings::AppConfig},
    core::transfer::ImportMode,
};
use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use serde::Serialize;
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "budgetflow", about = "BudgetFlow - event budget and expense tracker")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create the tables and seed sample data into empty collections
    Init,
    /// Print the dashboard: budget position, status totals and breakdowns
    Summary,
    /// List events, latest date first
    Events,
    /// Print the report for one event
    EventReport {
        /// Event id
        id: i64,
    },
    /// Export everything to a timestamped JSON file
    Export {
        /// Directory to write into (defaults to EXPORT_DIR)
        #[arg(short, long)]
        dir: Option<PathBuf>,
    },
    /// Import a JSON export
    Import {
        /// File to import
        file: PathBuf,
        /// Back up and wipe the current data instead of appending
        #[arg(long)]
        replace: bool,
    },
    /// Delete every row of every collection
    Clear,
    /// Print the dashboard again after every change until Ctrl-C
    Watch,
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn run(command: Command, config: &AppConfig, store: &BudgetStore) -> Result<()> {
    match command {
        Command::Init => {
            let seed = load_seed_config(&config.seed_file)?;
            let outcome = store.seed_if_empty(&seed).await?;
            if outcome.is_empty() {
                info!("Store already populated, nothing seeded");
            }
        }
        Command::Summary => print_json(&store.dashboard().await?)?,
        Command::Events => print_json(&store.list_events().await?)?,
        Command::EventReport { id } => print_json(&store.event_report(id).await?)?,
        Command::Export { dir } => {
            let dir = dir.unwrap_or_else(|| config.export_dir.clone());
            let path = store.export_to_dir(&dir).await?;
            println!("{}", path.display());
        }
        Command::Import { file, replace } => {
            let mode = if replace {
                ImportMode::Replace
            } else {
                ImportMode::Append
            };
            let outcome = store.import_from_file(&file, mode).await?;
            if let Some(backup) = &outcome.backup_path {
                info!("Previous data backed up to {}", backup.display());
            }
            println!(
                "Imported {} categories, {} funders, {} events, {} expenses",
                outcome.categories, outcome.funders, outcome.events, outcome.expenses
            );
        }
        Command::Clear => {
            store.clear_all().await?;
            println!("All data cleared");
        }
        Command::Watch => {
            let _subscription = store.watch_dashboard(|dashboard| {
                match serde_json::to_string_pretty(&dashboard) {
                    Ok(json) => println!("{json}"),
                    Err(e) => error!("Failed to render dashboard: {}", e),
                }
            });
            tokio::signal::ctrl_c().await?;
            info!("Stopping watch");
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; env vars can also be set externally
    dotenv().ok();

    let cli = Cli::parse();

    // 3. Load settings and open the store
    let config = AppConfig::from_env()
        .inspect_err(|e| error!("Failed to load configuration: {}", e))?;
    let store = BudgetStore::connect(&config)
        .await
        .inspect_err(|e| error!("Failed to open database: {}", e))?;

    // 4. Run the requested command
    run(cli.command, &config, &store)
        .await
        .inspect_err(|e| error!("Command failed: {}", e))
}
