use crate::{env::EnvManager, error::CliError};
use clap::Parser;
use commands::Commands;
use connectors::config::ServiceConfig;
use engine_core::QueryEngine;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

mod commands;
mod env;
mod error;
mod output;

#[derive(Parser)]
#[command(
    name = "tabsql",
    version = "0.1.0",
    about = "Run SQL SELECT statements against Airtable bases"
)]
struct Cli {
    #[arg(
        long,
        global = true,
        help = "Connection URL, e.g. tabsql://<baseId>?apiKey=<token>"
    )]
    url: Option<String>,

    #[arg(long, global = true, help = "Load TABSQL_* variables from this .env file")]
    env_file: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    // Initialize logger
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Translate { sql } => {
            let query = sql_syntax::translate(&sql)?;
            output::print_json(&query)?;
        }
        Commands::Query {
            sql,
            max_rows,
            format,
        } => {
            let engine = connect(cli.url.as_deref(), cli.env_file.as_deref())?;
            let result = engine.run(&sql, max_rows).await?;
            output::print_result(&result, format)?;
        }
        Commands::Tables { json } => {
            let engine = connect(cli.url.as_deref(), cli.env_file.as_deref())?;
            let tables = engine.fetch_table_descriptors().await?;
            if json {
                output::print_json(&tables)?;
            } else {
                output::print_tables(&tables);
            }
        }
        Commands::Fields { table } => {
            let engine = connect(cli.url.as_deref(), cli.env_file.as_deref())?;
            let types = engine.field_types(&table).await?;
            output::print_field_types(&types);
        }
    }

    Ok(())
}

fn connect(url: Option<&str>, env_file: Option<&str>) -> Result<QueryEngine, CliError> {
    let config = load_config(url, env_file)?;
    info!(
        base_id = config.base_id(),
        endpoint = config.endpoint(),
        "Connecting"
    );
    Ok(QueryEngine::new(config)?)
}

fn load_config(url: Option<&str>, env_file: Option<&str>) -> Result<ServiceConfig, CliError> {
    let mut env = EnvManager::new();
    if let Some(path) = env_file {
        env.load_from_file(path)?;
    }
    for (key, value) in env.describe() {
        debug!(key = %key, value = %value, "Environment setting");
    }
    env.service_config(url)
}
