//! Backend selection and one-time flat-file migration.

use std::path::Path;

use chrono::Utc;
use tracing::{info, warn};

use censo_store::RecordStore;
use censo_store_flatfile::{FlatFileConfig, FlatFileStore};
use censo_store_postgres::{PostgresConfig, PostgresStore};

/// Outcome of probing the relational backend.
pub enum Probe {
    Available(PostgresStore),
    Unavailable(String),
}

/// Try to bring up the Postgres backend from an optional connection URL.
pub async fn probe_postgres(database_url: Option<&str>) -> Probe {
    let Some(url) = database_url else {
        return Probe::Unavailable("DATABASE_URL sin configurar".to_owned());
    };

    match PostgresStore::new(PostgresConfig::from_url(url)).await {
        Ok(store) => Probe::Available(store),
        Err(err) => Probe::Unavailable(err.to_string()),
    }
}

/// Pick the backing store: Postgres when reachable, otherwise the flat
/// file. A reachable empty Postgres store absorbs any existing flat-file
/// data once, then the file is renamed out of the way.
pub async fn select_store(
    database_url: Option<&str>,
    flatfile: FlatFileConfig,
) -> anyhow::Result<Box<dyn RecordStore>> {
    match probe_postgres(database_url).await {
        Probe::Available(store) => {
            info!("backend relacional disponible");
            if let Err(err) = migrate_flat_file(&store, &flatfile.data_path).await {
                warn!(error = %err, "migración del archivo plano fallida, se continúa");
            }
            Ok(Box::new(store))
        }
        Probe::Unavailable(reason) => {
            warn!(reason = %reason, "backend relacional no disponible, usando archivo plano");
            Ok(Box::new(FlatFileStore::new(flatfile)?))
        }
    }
}

/// Copy flat-file records into an empty editing-capable store, then rename
/// the file so the migration never repeats. Returns how many records moved.
pub async fn migrate_flat_file(
    store: &dyn RecordStore,
    data_path: &Path,
) -> anyhow::Result<usize> {
    if !data_path.exists() {
        return Ok(0);
    }
    let stats = store.statistics().await?;
    if stats.total > 0 {
        return Ok(0);
    }

    let body = std::fs::read_to_string(data_path)?;
    let mut migrated = 0;
    for decoded in censo_core::csv::decode(&body) {
        match decoded {
            Ok(record) => {
                store.save(&record).await?;
                migrated += 1;
            }
            Err(err) => {
                warn!(error = %err, "fila descartada durante la migración");
            }
        }
    }

    let retired = data_path.with_extension(format!(
        "csv.migrado_{}.bak",
        Utc::now().format("%Y%m%d_%H%M%S")
    ));
    std::fs::rename(data_path, &retired)?;
    info!(
        migrated,
        retired = %retired.display(),
        "archivo plano migrado al backend relacional"
    );

    Ok(migrated)
}

#[cfg(test)]
mod tests {
    use censo_core::csv;
    use censo_store::testing::{sample_record, MemoryStore};

    use super::*;

    fn write_data_file(dir: &Path, records: &[censo_core::SurveyRecord]) -> std::path::PathBuf {
        let path = dir.join("encuestas_reportes.csv");
        let mut body = csv::header();
        body.push('\n');
        for record in records {
            body.push_str(&csv::encode_record(record));
            body.push('\n');
        }
        std::fs::write(&path, body).unwrap();
        path
    }

    #[tokio::test]
    async fn migration_moves_rows_and_retires_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_data_file(dir.path(), &[sample_record("A"), sample_record("B")]);
        let store = MemoryStore::new();

        let migrated = migrate_flat_file(&store, &path).await.unwrap();
        assert_eq!(migrated, 2);
        assert!(!path.exists());
        assert_eq!(store.statistics().await.unwrap().total, 2);

        let retired: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(retired.len(), 1);
        assert!(retired[0].starts_with("encuestas_reportes.csv.migrado_"));
        assert!(retired[0].ends_with(".bak"));
    }

    #[tokio::test]
    async fn migration_skips_a_populated_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_data_file(dir.path(), &[sample_record("A")]);
        let store = MemoryStore::new();
        store.save(&sample_record("Existente")).await.unwrap();

        let migrated = migrate_flat_file(&store, &path).await.unwrap();
        assert_eq!(migrated, 0);
        assert!(path.exists());
        assert_eq!(store.statistics().await.unwrap().total, 1);
    }

    #[tokio::test]
    async fn migration_without_a_data_file_is_a_noop() {
        let dir = tempfile::tempdir().unwrap();
        let store = MemoryStore::new();
        let migrated = migrate_flat_file(&store, &dir.path().join("no-existe.csv"))
            .await
            .unwrap();
        assert_eq!(migrated, 0);
    }

    #[tokio::test]
    async fn probe_without_url_reports_unavailable() {
        match probe_postgres(None).await {
            Probe::Unavailable(reason) => assert!(reason.contains("DATABASE_URL")),
            Probe::Available(_) => panic!("no debería haber backend"),
        }
    }
}
