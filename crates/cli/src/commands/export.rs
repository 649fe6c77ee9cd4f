use std::path::PathBuf;

use anyhow::Context;
use chrono::Utc;
use clap::Args;

use censo_export::{csv, export_filename, Document, Workbook};
use censo_store::{RecordId, RecordStore};

use crate::session::Session;
use crate::OutputFormat;

use super::{load_records, FilterArgs};

#[derive(Debug, Clone, clap::ValueEnum)]
pub enum ExportKind {
    /// Flat CSV in the wire format.
    Csv,
    /// Multi-sheet workbook content model (JSON).
    Workbook,
    /// Paginated document content model (JSON).
    Document,
}

#[derive(Args, Debug)]
pub struct ExportArgs {
    /// What to produce.
    #[arg(value_enum)]
    pub kind: ExportKind,

    /// Output file; defaults to a timestamped name in the current
    /// directory.
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Export the detail document for a single record instead of the
    /// full listing. Only valid with `document`.
    #[arg(long)]
    pub id: Option<RecordId>,

    #[command(flatten)]
    pub filter: FilterArgs,
}

pub async fn run(
    store: &dyn RecordStore,
    _session: &Session,
    args: &ExportArgs,
    format: &OutputFormat,
) -> anyhow::Result<()> {
    let now = Utc::now();

    let (payload, default_name, exported) = if let Some(id) = args.id {
        if !matches!(args.kind, ExportKind::Document) {
            anyhow::bail!("--id solo aplica a la exportación de documento");
        }
        let record = store
            .load(id)
            .await?
            .with_context(|| format!("Encuesta no encontrada: {id}"))?;
        (
            serde_json::to_string_pretty(&Document::record_detail(&record, now))?,
            export_filename("document.json", now),
            1,
        )
    } else {
        let records = load_records(store).await;
        let filter = args.filter.to_filter();
        let matched: Vec<censo_core::SurveyRecord> =
            filter.apply(&records).into_iter().cloned().collect();
        let stats = censo_store::store::scan_statistics(&matched);
        let count = matched.len();

        let (payload, default_name) = match args.kind {
            ExportKind::Csv => (csv::to_csv(&matched), export_filename("csv", now)),
            ExportKind::Workbook => (
                serde_json::to_string_pretty(&Workbook::build(&matched, &stats))?,
                export_filename("workbook.json", now),
            ),
            ExportKind::Document => (
                serde_json::to_string_pretty(&Document::full_listing(&matched, &stats, now))?,
                export_filename("document.json", now),
            ),
        };
        (payload, default_name, count)
    };

    let path = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(default_name));
    std::fs::write(&path, &payload)?;

    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&serde_json::json!({
                    "path": path,
                    "records": exported,
                }))?
            );
        }
        OutputFormat::Text => {
            println!("Exportadas {exported} encuestas a {}", path.display());
        }
    }
    Ok(())
}
