//! In-memory [`RecordStore`] for tests.
//!
//! Mirrors the relational backend's semantics (stable identity, history,
//! newest-first ordering) without a database, so the query layer, the CLI
//! wiring, and the migration guard can be exercised in unit tests.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use censo_core::SurveyRecord;

use crate::diff::{self, RecordPatch};
use crate::error::StoreError;
use crate::history::ChangeEntry;
use crate::stats::StoreStatistics;
use crate::store::{scan_statistics, RecordStore};
use crate::RecordId;

#[derive(Default)]
struct Inner {
    records: Vec<SurveyRecord>,
    history: Vec<ChangeEntry>,
    next_record_id: RecordId,
    next_entry_id: i64,
}

/// Editing-capable in-memory store.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        // Lock poisoning cannot leave partially applied updates here; the
        // inner state is only mutated after the full diff is computed.
        self.inner.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn save(&self, record: &SurveyRecord) -> Result<Option<RecordId>, StoreError> {
        let mut inner = self.lock();
        inner.next_record_id += 1;
        let id = inner.next_record_id;

        let mut stored = record.clone();
        stored.id = Some(id);
        let now = Utc::now();
        stored.created_at = Some(now);
        stored.updated_at = Some(now);
        inner.records.push(stored);

        Ok(Some(id))
    }

    async fn load_all(&self) -> Result<Vec<SurveyRecord>, StoreError> {
        let inner = self.lock();
        let mut records = inner.records.clone();
        records.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
        Ok(records)
    }

    async fn load(&self, id: RecordId) -> Result<Option<SurveyRecord>, StoreError> {
        let inner = self.lock();
        Ok(inner.records.iter().find(|r| r.id == Some(id)).cloned())
    }

    async fn update(
        &self,
        id: RecordId,
        patch: &RecordPatch,
        actor: &str,
        reason: Option<&str>,
    ) -> Result<Vec<ChangeEntry>, StoreError> {
        let mut inner = self.lock();

        let position = inner
            .records
            .iter()
            .position(|r| r.id == Some(id))
            .ok_or(StoreError::NotFound(id))?;

        let changes = diff::diff(&inner.records[position], patch);
        if changes.is_empty() {
            return Ok(Vec::new());
        }

        let mut updated = inner.records[position].clone();
        diff::apply(&mut updated, &changes)?;
        let now = Utc::now();
        updated.updated_at = Some(now);
        inner.records[position] = updated;

        let mut written = Vec::with_capacity(changes.len());
        for change in changes {
            inner.next_entry_id += 1;
            let entry = ChangeEntry {
                id: Some(inner.next_entry_id),
                record_id: id,
                field: change.field,
                prior_value: change.prior,
                new_value: change.new,
                changed_by: actor.to_owned(),
                changed_at: now,
                reason: reason.map(str::to_owned),
            };
            inner.history.push(entry.clone());
            written.push(entry);
        }

        Ok(written)
    }

    async fn history(&self, id: RecordId) -> Result<Vec<ChangeEntry>, StoreError> {
        let inner = self.lock();
        let mut entries: Vec<ChangeEntry> = inner
            .history
            .iter()
            .filter(|e| e.record_id == id)
            .cloned()
            .collect();
        entries.reverse();
        Ok(entries)
    }

    async fn delete(&self, id: RecordId) -> Result<(), StoreError> {
        let mut inner = self.lock();
        let before = inner.records.len();
        inner.records.retain(|r| r.id != Some(id));
        if inner.records.len() == before {
            return Err(StoreError::NotFound(id));
        }
        inner.history.retain(|e| e.record_id != id);
        Ok(())
    }

    async fn statistics(&self) -> Result<StoreStatistics, StoreError> {
        let inner = self.lock();
        Ok(scan_statistics(&inner.records))
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }

    fn supports_editing(&self) -> bool {
        true
    }
}

/// A fully populated record for tests.
pub fn sample_record(name: &str) -> SurveyRecord {
    SurveyRecord {
        id: None,
        submitted_at: Utc::now(),
        report_name: name.to_owned(),
        periodicity: "Mensual".into(),
        source_system: "SAP".into(),
        responsible: "Ana Gómez".into(),
        responsible_email: "ana@example.com".into(),
        audit_usage: "Auditoría financiera".into(),
        audit_periodicity: None,
        department: "Finanzas".into(),
        criticality: "Medio".into(),
        delivery_formats: None,
        description: None,
        stakeholders: None,
        automation: Some("No".into()),
        observations: None,
        created_at: None,
        updated_at: None,
    }
}

#[cfg(test)]
mod tests {
    use censo_core::Field;

    use super::*;

    #[tokio::test]
    async fn save_then_load_roundtrips_values() {
        let store = MemoryStore::new();
        let record = sample_record("Cierre Diario");
        let id = store.save(&record).await.unwrap().unwrap();

        let loaded = store.load(id).await.unwrap().unwrap();
        for field in Field::ALL {
            assert_eq!(loaded.get(field), record.get(field), "{field}");
        }
    }

    #[tokio::test]
    async fn noop_update_writes_no_history() {
        let store = MemoryStore::new();
        let record = sample_record("Inventario");
        let id = store.save(&record).await.unwrap().unwrap();

        let patch = RecordPatch::new().with(Field::Criticality, "Medio");
        let written = store.update(id, &patch, "bob", None).await.unwrap();
        assert!(written.is_empty());
        assert!(store.history(id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_emits_one_entry_per_changed_field() {
        let store = MemoryStore::new();
        let id = store
            .save(&sample_record("Inventario"))
            .await
            .unwrap()
            .unwrap();

        let patch = RecordPatch::new().with(Field::Criticality, "Alto");
        let written = store.update(id, &patch, "bob", None).await.unwrap();
        assert_eq!(written.len(), 1);
        assert_eq!(written[0].prior_value, "Medio");
        assert_eq!(written[0].new_value, "Alto");
        assert_eq!(written[0].changed_by, "bob");

        let stored = store.load(id).await.unwrap().unwrap();
        assert_eq!(stored.criticality, "Alto");
    }

    #[tokio::test]
    async fn history_is_newest_first() {
        let store = MemoryStore::new();
        let id = store
            .save(&sample_record("Inventario"))
            .await
            .unwrap()
            .unwrap();

        store
            .update(id, &RecordPatch::new().with(Field::Criticality, "Alto"), "a", None)
            .await
            .unwrap();
        store
            .update(id, &RecordPatch::new().with(Field::Criticality, "Bajo"), "b", None)
            .await
            .unwrap();

        let history = store.history(id).await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].new_value, "Bajo");
        assert_eq!(history[1].new_value, "Alto");
    }

    #[tokio::test]
    async fn delete_cascades_history() {
        let store = MemoryStore::new();
        let id = store
            .save(&sample_record("Inventario"))
            .await
            .unwrap()
            .unwrap();
        store
            .update(id, &RecordPatch::new().with(Field::Criticality, "Alto"), "a", None)
            .await
            .unwrap();

        store.delete(id).await.unwrap();
        assert!(store.load(id).await.unwrap().is_none());
        assert!(store.history(id).await.unwrap().is_empty());
        assert!(matches!(
            store.delete(id).await,
            Err(StoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn statistics_match_a_scan() {
        let store = MemoryStore::new();
        let mut critical = sample_record("A");
        critical.criticality = "Alto".into();
        critical.automation = Some("Sí".into());
        store.save(&critical).await.unwrap();

        let mut other = sample_record("B");
        other.department = "IT".into();
        store.save(&other).await.unwrap();

        let stats = store.statistics().await.unwrap();
        assert_eq!(stats.total, 2);
        assert_eq!(stats.unique_departments, 2);
        assert_eq!(stats.unique_systems, 1);
        assert_eq!(stats.critical, 1);
        assert_eq!(stats.automated, 1);
    }
}
