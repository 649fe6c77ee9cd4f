pub mod delete;
pub mod export;
pub mod history;
pub mod list;
pub mod opportunities;
pub mod show;
pub mod stats;
pub mod submit;
pub mod update;

use clap::Args;
use tracing::warn;

use censo_core::SurveyRecord;
use censo_query::RecordFilter;
use censo_store::RecordStore;

/// Filter flags shared by `list` and `export`.
#[derive(Args, Debug)]
pub struct FilterArgs {
    /// Filter by department (exact match).
    #[arg(long)]
    pub department: Option<String>,

    /// Filter by criticality (Alto, Medio, Bajo).
    #[arg(long)]
    pub criticality: Option<String>,

    /// Filter by report periodicity.
    #[arg(long)]
    pub periodicity: Option<String>,

    /// Case-insensitive search over report name, responsible, and source
    /// system.
    #[arg(long)]
    pub search: Option<String>,
}

impl FilterArgs {
    pub fn to_filter(&self) -> RecordFilter {
        RecordFilter {
            department: self.department.clone(),
            criticality: self.criticality.clone(),
            periodicity: self.periodicity.clone(),
            search: self.search.clone(),
        }
    }
}

/// Read every record, degrading to an empty set on backend read errors so
/// the reporting commands stay usable.
pub async fn load_records(store: &dyn RecordStore) -> Vec<SurveyRecord> {
    match store.load_all().await {
        Ok(records) => records,
        Err(err) => {
            warn!(error = %err, "no se pudieron leer las encuestas");
            Vec::new()
        }
    }
}
