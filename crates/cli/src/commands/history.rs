use clap::Args;

use censo_store::{RecordId, RecordStore};

use crate::session::Session;
use crate::OutputFormat;

#[derive(Args, Debug)]
pub struct HistoryArgs {
    /// Record id.
    pub id: RecordId,
}

pub async fn run(
    store: &dyn RecordStore,
    _session: &Session,
    args: &HistoryArgs,
    format: &OutputFormat,
) -> anyhow::Result<()> {
    let entries = store.history(args.id).await?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&entries)?);
        }
        OutputFormat::Text => {
            if entries.is_empty() {
                println!("Sin historial para la encuesta {}", args.id);
                return Ok(());
            }
            println!("Historial de la encuesta {} ({} cambios)", args.id, entries.len());
            for entry in &entries {
                println!(
                    "  [{ts}] {field}: \"{prior}\" -> \"{new}\" por {user}",
                    ts = entry.changed_at,
                    field = entry.field.label(),
                    prior = entry.prior_value,
                    new = entry.new_value,
                    user = entry.changed_by,
                );
                if let Some(reason) = &entry.reason {
                    println!("      motivo: {reason}");
                }
            }
        }
    }
    Ok(())
}
