use std::net::SocketAddr;

use anyhow::Context;
use chrono::{Datelike, Utc};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use lindyscore::config::{RecordPolicy, RowPolicy, Settings, Source, DEFAULT_PORT, DEFAULT_SOURCE};

#[derive(Subcommand, Debug)]
enum Commands {
    /// Serve Lindy scores over HTTP (default if no subcommand)
    Serve,
    /// Run the pipeline once and print the score map as JSON
    Score,
}

#[derive(Parser, Debug)]
#[command(name = "lindyscore")]
#[command(about = "ACL graft Lindy score service", long_about = None)]
#[command(version)]
struct Cli {
    /// Dataset location: HTTPS URL or local file path
    #[arg(short, long, global = true, env = "LINDY_SOURCE", default_value = DEFAULT_SOURCE)]
    source: Source,

    /// Listen port for the HTTP server
    #[arg(short, long, env = "PORT", default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Policy for CSV rows that fail to parse
    #[arg(long, global = true, value_enum, default_value_t = RowPolicy::Skip)]
    on_bad_row: RowPolicy,

    /// Policy for records that violate numeric preconditions
    #[arg(long, global = true, value_enum, default_value_t = RecordPolicy::Reject)]
    on_invalid_record: RecordPolicy,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();
    let settings = Settings {
        source: cli.source,
        row_policy: cli.on_bad_row,
        record_policy: cli.on_invalid_record,
    };

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(settings, cli.port).await,
        Commands::Score => score_once(settings).await,
    }
}

async fn serve(settings: Settings, port: u16) -> anyhow::Result<()> {
    info!(source = %settings.source, "starting lindyscore");

    let app = lindyscore::server::build_router(settings);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("listening on http://{}", addr);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}

async fn score_once(settings: Settings) -> anyhow::Result<()> {
    let table = lindyscore::loader::load_table(&settings).await?;
    let scores =
        lindyscore::scoring::calculate_scores(&table, Utc::now().year(), settings.record_policy)?;
    println!("{}", serde_json::to_string_pretty(&scores)?);
    Ok(())
}
