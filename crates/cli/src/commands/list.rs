use clap::Args;

use censo_store::RecordStore;

use crate::session::Session;
use crate::OutputFormat;

use super::{load_records, FilterArgs};

#[derive(Args, Debug)]
pub struct ListArgs {
    #[command(flatten)]
    pub filter: FilterArgs,
}

pub async fn run(
    store: &dyn RecordStore,
    _session: &Session,
    args: &ListArgs,
    format: &OutputFormat,
) -> anyhow::Result<()> {
    let records = load_records(store).await;
    let filter = args.filter.to_filter();
    let matched = filter.apply(&records);

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&matched)?);
        }
        OutputFormat::Text => {
            println!("Mostrando {} de {} encuestas", matched.len(), records.len());
            for record in matched {
                let id = record
                    .id
                    .map_or_else(|| "-".to_owned(), |id| id.to_string());
                println!(
                    "  [{id}] {name} | {department} | {periodicity} | {criticality} | {responsible}",
                    name = record.report_name,
                    department = record.department,
                    periodicity = record.periodicity,
                    criticality = record.criticality,
                    responsible = record.responsible,
                );
            }
        }
    }
    Ok(())
}
