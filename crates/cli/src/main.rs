//! Censo CLI
//!
//! Command-line interface for the corporate report survey system: intake,
//! administration, statistics, and exports over a flat-file or Postgres
//! backend.

mod bootstrap;
mod commands;
mod session;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use censo_store_flatfile::FlatFileConfig;
use session::{AdminCredentials, Session};

/// Censo — gestión de encuestas de reportes corporativos.
#[derive(Parser, Debug)]
#[command(name = "censo", version, about)]
struct Cli {
    /// Postgres connection URL; without it the flat-file backend is used.
    #[arg(long, env = "DATABASE_URL", global = true)]
    database_url: Option<String>,

    /// Flat-file data path.
    #[arg(
        long,
        env = "CENSO_DATA_PATH",
        default_value = "encuestas_reportes.csv",
        global = true
    )]
    data_path: PathBuf,

    /// Backup directory for the flat-file backend.
    #[arg(long, env = "CENSO_BACKUP_DIR", default_value = "backups", global = true)]
    backup_dir: PathBuf,

    /// Admin username (required by administrative commands).
    #[arg(long, env = "CENSO_USER", global = true)]
    user: Option<String>,

    /// Admin password (required by administrative commands).
    #[arg(long, env = "CENSO_PASSWORD", global = true)]
    password: Option<String>,

    /// Output format.
    #[arg(long, default_value = "text", global = true)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// File a new survey.
    Submit(commands::submit::SubmitArgs),
    /// List surveys, optionally filtered.
    List(commands::list::ListArgs),
    /// Show a single survey in full.
    Show(commands::show::ShowArgs),
    /// Show the change history of a survey.
    History(commands::history::HistoryArgs),
    /// Edit fields of a survey.
    Update(commands::update::UpdateArgs),
    /// Delete a survey and its history.
    Delete(commands::delete::DeleteArgs),
    /// Store statistics and grouped summaries.
    Stats,
    /// Ranked automation opportunities.
    Opportunities(commands::opportunities::OpportunitiesArgs),
    /// Export surveys as CSV, workbook, or document.
    Export(commands::export::ExportArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let flatfile = FlatFileConfig {
        data_path: cli.data_path.clone(),
        backup_dir: cli.backup_dir.clone(),
        ..FlatFileConfig::default()
    };
    let store = bootstrap::select_store(cli.database_url.as_deref(), flatfile).await?;

    match cli.command {
        Command::Submit(args) => commands::submit::run(store.as_ref(), &args, &cli.format).await,
        Command::List(ref args) => {
            let session = authenticate(&cli)?;
            commands::list::run(store.as_ref(), &session, &args, &cli.format).await
        }
        Command::Show(ref args) => {
            let session = authenticate(&cli)?;
            commands::show::run(store.as_ref(), &session, &args, &cli.format).await
        }
        Command::History(ref args) => {
            let session = authenticate(&cli)?;
            commands::history::run(store.as_ref(), &session, &args, &cli.format).await
        }
        Command::Update(ref args) => {
            let session = authenticate(&cli)?;
            commands::update::run(store.as_ref(), &session, &args, &cli.format).await
        }
        Command::Delete(ref args) => {
            let session = authenticate(&cli)?;
            commands::delete::run(store.as_ref(), &session, &args, &cli.format).await
        }
        Command::Stats => {
            let session = authenticate(&cli)?;
            commands::stats::run(store.as_ref(), &session, &cli.format).await
        }
        Command::Opportunities(ref args) => {
            let session = authenticate(&cli)?;
            commands::opportunities::run(store.as_ref(), &session, &args, &cli.format).await
        }
        Command::Export(ref args) => {
            let session = authenticate(&cli)?;
            commands::export::run(store.as_ref(), &session, &args, &cli.format).await
        }
    }
}

/// Verify the supplied admin credentials before any admin handler runs.
fn authenticate(cli: &Cli) -> anyhow::Result<Session> {
    let username = cli
        .user
        .as_deref()
        .context("este comando requiere --user (o CENSO_USER)")?;
    let password = cli
        .password
        .as_deref()
        .context("este comando requiere --password (o CENSO_PASSWORD)")?;

    AdminCredentials::from_env()
        .verify(username, password)
        .context("usuario o contraseña incorrectos")
}
