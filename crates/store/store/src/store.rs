use async_trait::async_trait;

use censo_core::SurveyRecord;

use crate::diff::RecordPatch;
use crate::error::StoreError;
use crate::history::ChangeEntry;
use crate::stats::StoreStatistics;
use crate::RecordId;

/// Contract for survey record storage backends.
///
/// Implementations must be `Send + Sync`. Callers select a backend once at
/// startup and observe its capabilities only through
/// [`RecordStore::supports_editing`]; the flat-file backend reports the
/// identity-dependent operations as unsupported rather than emulating them.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Persist a new record. Returns the assigned identifier, or `None` on
    /// backends without stable identity (flat-file).
    async fn save(&self, record: &SurveyRecord) -> Result<Option<RecordId>, StoreError>;

    /// Load the full record set.
    ///
    /// The relational backend orders newest-submission-first; the flat-file
    /// backend preserves file order (oldest first).
    async fn load_all(&self) -> Result<Vec<SurveyRecord>, StoreError>;

    /// Load one record by identifier. Always `None` on the flat-file
    /// backend, which has no stable identity.
    async fn load(&self, id: RecordId) -> Result<Option<SurveyRecord>, StoreError>;

    /// Apply a patch to an existing record, emitting one [`ChangeEntry`]
    /// per field whose stringified value actually changes. Returns the
    /// entries written. Column updates and history rows are applied
    /// atomically; an empty diff writes nothing.
    async fn update(
        &self,
        id: RecordId,
        patch: &RecordPatch,
        actor: &str,
        reason: Option<&str>,
    ) -> Result<Vec<ChangeEntry>, StoreError>;

    /// The change history of a record, newest first.
    async fn history(&self, id: RecordId) -> Result<Vec<ChangeEntry>, StoreError>;

    /// Delete a record, cascading deletion of its history.
    async fn delete(&self, id: RecordId) -> Result<(), StoreError>;

    /// Aggregate counts over the whole record set.
    async fn statistics(&self) -> Result<StoreStatistics, StoreError>;

    /// Short backend identifier for logs and error messages.
    fn backend_name(&self) -> &'static str;

    /// Whether identity-dependent operations (`load`, `update`, `delete`,
    /// `history`) are available.
    fn supports_editing(&self) -> bool;
}

/// Compute [`StoreStatistics`] by scanning a materialized record list.
///
/// Used by backends without server-side aggregation and by the tests that
/// cross-check the Postgres aggregation queries.
pub fn scan_statistics(records: &[SurveyRecord]) -> StoreStatistics {
    let mut departments: Vec<&str> = records
        .iter()
        .map(|r| r.department.as_str())
        .filter(|d| !d.is_empty())
        .collect();
    departments.sort_unstable();
    departments.dedup();

    let mut systems: Vec<&str> = records
        .iter()
        .map(|r| r.source_system.as_str())
        .filter(|s| !s.is_empty())
        .collect();
    systems.sort_unstable();
    systems.dedup();

    StoreStatistics {
        total: records.len() as u64,
        unique_departments: departments.len() as u64,
        unique_systems: systems.len() as u64,
        critical: records.iter().filter(|r| r.criticality == "Alto").count() as u64,
        automated: records
            .iter()
            .filter(|r| r.automation.as_deref() == Some("Sí"))
            .count() as u64,
    }
}
