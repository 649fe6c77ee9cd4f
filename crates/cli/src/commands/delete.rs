use clap::Args;

use censo_store::{RecordId, RecordStore};

use crate::session::Session;
use crate::OutputFormat;

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Record id.
    pub id: RecordId,
}

pub async fn run(
    store: &dyn RecordStore,
    _session: &Session,
    args: &DeleteArgs,
    format: &OutputFormat,
) -> anyhow::Result<()> {
    store.delete(args.id).await?;

    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&serde_json::json!({
                    "deleted": true,
                    "id": args.id,
                }))?
            );
        }
        OutputFormat::Text => {
            println!("Encuesta {} eliminada junto con su historial", args.id);
        }
    }
    Ok(())
}
