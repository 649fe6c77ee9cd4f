use censo_query::{automation_breakdown, per_department, per_periodicity};
use censo_store::RecordStore;

use crate::session::Session;
use crate::OutputFormat;

use super::load_records;

pub async fn run(
    store: &dyn RecordStore,
    _session: &Session,
    format: &OutputFormat,
) -> anyhow::Result<()> {
    let stats = store.statistics().await?;
    let records = load_records(store).await;

    let departments = per_department(&records);
    let periodicities = per_periodicity(&records);
    let automation = automation_breakdown(&records);

    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&serde_json::json!({
                    "statistics": stats,
                    "departments": departments,
                    "periodicities": periodicities,
                    "automation": automation,
                }))?
            );
        }
        OutputFormat::Text => {
            println!("Estadísticas ({})", store.backend_name());
            println!("  Total encuestas:        {}", stats.total);
            println!("  Departamentos únicos:   {}", stats.unique_departments);
            println!("  Sistemas únicos:        {}", stats.unique_systems);
            println!("  Encuestas críticas:     {}", stats.critical);
            println!("  Automatizadas:          {}", stats.automated);

            if !departments.is_empty() {
                println!("\nPor departamento:");
                for d in &departments {
                    println!(
                        "  {:<30} {:>4} total | {:>3} críticos | {:>3} automatizados",
                        d.department, d.total, d.critical, d.automated
                    );
                }
            }

            if !periodicities.is_empty() {
                println!("\nPor periodicidad:");
                for p in &periodicities {
                    println!(
                        "  {:<30} {:>4} total | {:>3} críticos",
                        p.periodicity, p.total, p.critical
                    );
                }
            }

            println!(
                "\nAutomatización: {} sí, {} parcial, {} no, {} sin dato ({:.1}% automatizado)",
                automation.automated,
                automation.partial,
                automation.manual,
                automation.unspecified,
                automation.automated_pct(),
            );
        }
    }
    Ok(())
}
