use std::fs::{self, OpenOptions};
use std::io::Write;

use async_trait::async_trait;

use censo_core::{csv, SurveyRecord};
use censo_store::store::{scan_statistics, RecordStore};
use censo_store::{ChangeEntry, RecordId, RecordPatch, StoreError, StoreStatistics};
use tracing::{debug, warn};

use crate::backup;
use crate::config::FlatFileConfig;

const BACKEND: &str = "flatfile";

/// Flat-file implementation of [`RecordStore`].
///
/// Appends one delimited row per record; reads materialize the whole file.
/// There is no locking: single-writer semantics are assumed, matching the
/// backend's role as a degraded fallback.
pub struct FlatFileStore {
    config: FlatFileConfig,
}

impl FlatFileStore {
    /// Open the store, creating the data file with its header when absent.
    pub fn new(config: FlatFileConfig) -> Result<Self, StoreError> {
        let store = Self { config };
        store.ensure_data_file()?;
        Ok(store)
    }

    /// The configured data file path.
    pub fn data_path(&self) -> &std::path::Path {
        &self.config.data_path
    }

    fn ensure_data_file(&self) -> Result<(), StoreError> {
        if self.config.data_path.exists() {
            return Ok(());
        }
        if let Some(parent) = self.config.data_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| StoreError::Backend(e.to_string()))?;
            }
        }
        fs::write(&self.config.data_path, format!("{}\n", csv::header()))
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        debug!(path = %self.config.data_path.display(), "archivo de datos inicializado");
        Ok(())
    }

    fn read_records(&self) -> Vec<SurveyRecord> {
        let body = match fs::read_to_string(&self.config.data_path) {
            Ok(body) => body,
            Err(err) => {
                // Unreadable data is logged and treated as empty.
                warn!(error = %err, path = %self.config.data_path.display(),
                      "no se pudo leer el archivo de datos");
                return Vec::new();
            }
        };

        let mut records = Vec::new();
        for decoded in csv::decode(&body) {
            match decoded {
                Ok(record) => records.push(record),
                Err(err) => {
                    warn!(error = %err, "fila descartada del archivo de datos");
                }
            }
        }
        records
    }
}

#[async_trait]
impl RecordStore for FlatFileStore {
    async fn save(&self, record: &SurveyRecord) -> Result<Option<RecordId>, StoreError> {
        backup::create_backup(
            &self.config.data_path,
            &self.config.backup_dir,
            self.config.backup_retention,
        );
        self.ensure_data_file()?;

        let mut file = OpenOptions::new()
            .append(true)
            .open(&self.config.data_path)
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        writeln!(file, "{}", csv::encode_record(record))
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        debug!(report = %record.report_name, "encuesta agregada al archivo de datos");
        Ok(None)
    }

    async fn load_all(&self) -> Result<Vec<SurveyRecord>, StoreError> {
        // File order, oldest first: there is no ordering column to sort by.
        Ok(self.read_records())
    }

    async fn load(&self, _id: RecordId) -> Result<Option<SurveyRecord>, StoreError> {
        Ok(None)
    }

    async fn update(
        &self,
        _id: RecordId,
        _patch: &RecordPatch,
        _actor: &str,
        _reason: Option<&str>,
    ) -> Result<Vec<ChangeEntry>, StoreError> {
        Err(StoreError::unsupported(BACKEND, "update"))
    }

    async fn history(&self, _id: RecordId) -> Result<Vec<ChangeEntry>, StoreError> {
        Ok(Vec::new())
    }

    async fn delete(&self, _id: RecordId) -> Result<(), StoreError> {
        Err(StoreError::unsupported(BACKEND, "delete"))
    }

    async fn statistics(&self) -> Result<StoreStatistics, StoreError> {
        Ok(scan_statistics(&self.read_records()))
    }

    fn backend_name(&self) -> &'static str {
        BACKEND
    }

    fn supports_editing(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use censo_store::testing::sample_record;

    use super::*;

    fn store_in(dir: &std::path::Path) -> FlatFileStore {
        FlatFileStore::new(FlatFileConfig {
            data_path: dir.join("encuestas_reportes.csv"),
            backup_dir: dir.join("backups"),
            backup_retention: 10,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn new_store_writes_the_header() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());
        let body = fs::read_to_string(store.data_path()).unwrap();
        assert_eq!(body, format!("{}\n", csv::header()));
        assert!(store.load_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn save_preserves_file_order_oldest_first() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());

        store.save(&sample_record("Primero")).await.unwrap();
        store.save(&sample_record("Segundo")).await.unwrap();

        let records = store.load_all().await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].report_name, "Primero");
        assert_eq!(records[1].report_name, "Segundo");
        assert_eq!(records[0].id, None);
    }

    #[tokio::test]
    async fn fifteen_saves_leave_ten_most_recent_backups() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());

        for i in 0..15 {
            store.save(&sample_record(&format!("R{i}"))).await.unwrap();
        }

        let mut backups: Vec<String> = fs::read_dir(dir.path().join("backups"))
            .unwrap()
            .filter_map(Result::ok)
            .map(|e| e.file_name().into_string().unwrap())
            .collect();
        assert_eq!(backups.len(), 10);

        // The survivors are the most recent ones: the oldest retained
        // backup holds the file as of the 6th save, i.e. 5 data rows.
        backups.sort();
        let oldest = fs::read_to_string(dir.path().join("backups").join(&backups[0])).unwrap();
        assert_eq!(oldest.lines().count(), 6); // header + 5 rows
        let newest = fs::read_to_string(dir.path().join("backups").join(&backups[9])).unwrap();
        assert_eq!(newest.lines().count(), 15); // header + 14 rows
    }

    #[tokio::test]
    async fn corrupt_rows_are_skipped_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());
        store.save(&sample_record("Bueno")).await.unwrap();

        let mut file = OpenOptions::new()
            .append(true)
            .open(store.data_path())
            .unwrap();
        writeln!(file, "fila,corrupta").unwrap();
        drop(file);
        store.save(&sample_record("También bueno")).await.unwrap();

        let records = store.load_all().await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].report_name, "También bueno");
    }

    #[tokio::test]
    async fn identity_operations_are_unsupported() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());
        store.save(&sample_record("R")).await.unwrap();

        assert!(store.load(1).await.unwrap().is_none());
        assert!(store.history(1).await.unwrap().is_empty());
        assert!(matches!(
            store.update(1, &RecordPatch::new(), "x", None).await,
            Err(StoreError::Unsupported { .. })
        ));
        assert!(matches!(
            store.delete(1).await,
            Err(StoreError::Unsupported { .. })
        ));
        assert!(!store.supports_editing());
    }

    #[tokio::test]
    async fn statistics_scan_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());

        let mut critical = sample_record("A");
        critical.criticality = "Alto".into();
        critical.automation = Some("Sí".into());
        store.save(&critical).await.unwrap();
        store.save(&sample_record("B")).await.unwrap();

        let stats = store.statistics().await.unwrap();
        assert_eq!(stats.total, 2);
        assert_eq!(stats.critical, 1);
        assert_eq!(stats.automated, 1);
    }

    #[tokio::test]
    async fn missing_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());
        fs::remove_file(store.data_path()).unwrap();
        assert!(store.load_all().await.unwrap().is_empty());
        let stats = store.statistics().await.unwrap();
        assert_eq!(stats.total, 0);
    }
}
