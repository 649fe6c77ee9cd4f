use clap::Args;

use censo_query::{rank_opportunities, DEFAULT_OPPORTUNITY_LIMIT};
use censo_store::RecordStore;

use crate::session::Session;
use crate::OutputFormat;

use super::load_records;

#[derive(Args, Debug)]
pub struct OpportunitiesArgs {
    /// Maximum candidates to show.
    #[arg(long, default_value_t = DEFAULT_OPPORTUNITY_LIMIT)]
    pub limit: usize,
}

pub async fn run(
    store: &dyn RecordStore,
    _session: &Session,
    args: &OpportunitiesArgs,
    format: &OutputFormat,
) -> anyhow::Result<()> {
    let records = load_records(store).await;
    let ranked = rank_opportunities(&records, args.limit);

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&ranked)?);
        }
        OutputFormat::Text => {
            if ranked.is_empty() {
                println!("Todos los reportes están automatizados.");
                return Ok(());
            }
            println!("Oportunidades de automatización (top {}):", ranked.len());
            for (index, opportunity) in ranked.iter().enumerate() {
                println!(
                    "  {:>2}. [{prio}] {name} | {periodicity} | {criticality} | {department}",
                    index + 1,
                    prio = opportunity.priority,
                    name = opportunity.record.report_name,
                    periodicity = opportunity.record.periodicity,
                    criticality = opportunity.record.criticality,
                    department = opportunity.record.department,
                );
            }
        }
    }
    Ok(())
}
