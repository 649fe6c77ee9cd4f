use clap::Args;

use censo_core::Field;
use censo_store::{RecordId, RecordStore};

use crate::session::Session;
use crate::OutputFormat;

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Record id.
    pub id: RecordId,
}

pub async fn run(
    store: &dyn RecordStore,
    _session: &Session,
    args: &ShowArgs,
    format: &OutputFormat,
) -> anyhow::Result<()> {
    let Some(record) = store.load(args.id).await? else {
        println!("Encuesta no encontrada: {}", args.id);
        return Ok(());
    };

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
        OutputFormat::Text => {
            println!("Encuesta {}", args.id);
            for field in Field::ALL {
                let value = record.get(field);
                if !value.is_empty() {
                    println!("  {:<28} {value}", field.label());
                }
            }
            if let Some(updated_at) = record.updated_at {
                println!("  {:<28} {}", "Última modificación", updated_at);
            }
        }
    }
    Ok(())
}
