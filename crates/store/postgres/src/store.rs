use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};
use tracing::{debug, warn};

use censo_core::model::parse_timestamp;
use censo_core::{Field, SurveyRecord};
use censo_store::diff::{self, RecordPatch};
use censo_store::store::RecordStore;
use censo_store::{ChangeEntry, RecordId, StoreError, StoreStatistics};

use crate::config::PostgresConfig;
use crate::migrations;

const BACKEND: &str = "postgres";

/// The survey table's data columns, in wire order (matching
/// [`Field::ALL`]).
const DATA_COLUMNS: &str = "fecha_envio, nombre_reporte, periodicidad_reporte, \
     sistema_origen, persona_responsable, email_responsable, \
     auditoria_utilizacion, periodicidad_auditoria, departamento, \
     criticidad, formato_entrega, descripcion_reporte, stakeholders, \
     automatizado, observaciones";

/// PostgreSQL-backed implementation of [`RecordStore`].
///
/// Uses `sqlx::PgPool` for connection pooling. Updates run in a single
/// transaction that applies the staged column changes together with their
/// history rows, so the record and its audit trail can never diverge.
pub struct PostgresStore {
    pool: PgPool,
    config: PostgresConfig,
}

impl PostgresStore {
    /// Connect to `PostgreSQL`, create the connection pool, and run
    /// migrations to ensure the required tables exist.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Connection`] if pool creation fails, or
    /// [`StoreError::Backend`] if migrations fail.
    pub async fn new(config: PostgresConfig) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.pool_size)
            .connect(&config.url)
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        Self::from_pool(pool, config).await
    }

    /// Create a store from an existing pool. Runs migrations on creation.
    pub async fn from_pool(pool: PgPool, config: PostgresConfig) -> Result<Self, StoreError> {
        migrations::run_migrations(&pool, &config)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        Ok(Self { pool, config })
    }
}

#[async_trait]
impl RecordStore for PostgresStore {
    async fn save(&self, record: &SurveyRecord) -> Result<Option<RecordId>, StoreError> {
        let query = format!(
            "INSERT INTO {} ({DATA_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15) \
             RETURNING id",
            self.config.records_table()
        );

        let (id,): (i64,) = sqlx::query_as(&query)
            .bind(record.submitted_at)
            .bind(&record.report_name)
            .bind(&record.periodicity)
            .bind(&record.source_system)
            .bind(&record.responsible)
            .bind(&record.responsible_email)
            .bind(&record.audit_usage)
            .bind(&record.audit_periodicity)
            .bind(&record.department)
            .bind(&record.criticality)
            .bind(&record.delivery_formats)
            .bind(&record.description)
            .bind(&record.stakeholders)
            .bind(&record.automation)
            .bind(&record.observations)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        debug!(id, report = %record.report_name, "encuesta guardada");
        Ok(Some(id))
    }

    async fn load_all(&self) -> Result<Vec<SurveyRecord>, StoreError> {
        let query = format!(
            "SELECT id, {DATA_COLUMNS}, created_at, updated_at FROM {} \
             ORDER BY fecha_envio DESC",
            self.config.records_table()
        );

        let rows: Vec<SurveyRow> = sqlx::query_as(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn load(&self, id: RecordId) -> Result<Option<SurveyRecord>, StoreError> {
        let query = format!(
            "SELECT id, {DATA_COLUMNS}, created_at, updated_at FROM {} WHERE id = $1",
            self.config.records_table()
        );

        let row: Option<SurveyRow> = sqlx::query_as(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        Ok(row.map(Into::into))
    }

    async fn update(
        &self,
        id: RecordId,
        patch: &RecordPatch,
        actor: &str,
        reason: Option<&str>,
    ) -> Result<Vec<ChangeEntry>, StoreError> {
        let records_table = self.config.records_table();
        let history_table = self.config.history_table();

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        let select = format!(
            "SELECT id, {DATA_COLUMNS}, created_at, updated_at FROM {records_table} \
             WHERE id = $1 FOR UPDATE"
        );
        let row: Option<SurveyRow> = sqlx::query_as(&select)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        let current: SurveyRecord = row.ok_or(StoreError::NotFound(id))?.into();

        let changes = diff::diff(&current, patch);
        if changes.is_empty() {
            // Nothing staged: skip the write entirely.
            return Ok(Vec::new());
        }

        // Stage all column updates in one statement, refreshing the
        // modification timestamp alongside.
        let assignments: Vec<String> = changes
            .iter()
            .enumerate()
            .map(|(i, change)| format!("{} = ${}", change.field.column_name(), i + 1))
            .collect();
        let update = format!(
            "UPDATE {records_table} SET {}, updated_at = NOW() WHERE id = ${}",
            assignments.join(", "),
            changes.len() + 1
        );

        let mut query = sqlx::query(&update);
        for change in &changes {
            if change.field == Field::SubmittedAt {
                let ts = parse_timestamp(&change.new).ok_or_else(|| {
                    StoreError::InvalidValue(censo_core::ValidationError::InvalidValue {
                        field: change.field,
                        value: change.new.clone(),
                    })
                })?;
                query = query.bind(ts);
            } else {
                // Empty strings clear the column rather than storing "".
                query = query.bind(non_empty(&change.new));
            }
        }
        query
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        let insert = format!(
            "INSERT INTO {history_table} \
             (encuesta_id, campo_modificado, valor_anterior, valor_nuevo, \
              usuario_modificacion, motivo_cambio) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING id, fecha_modificacion"
        );

        let mut written = Vec::with_capacity(changes.len());
        for change in &changes {
            let row = sqlx::query(&insert)
                .bind(id)
                .bind(change.field.column_name())
                .bind(&change.prior)
                .bind(&change.new)
                .bind(actor)
                .bind(reason)
                .fetch_one(&mut *tx)
                .await
                .map_err(|e| StoreError::Backend(e.to_string()))?;

            written.push(ChangeEntry {
                id: Some(row.get::<i64, _>("id")),
                record_id: id,
                field: change.field,
                prior_value: change.prior.clone(),
                new_value: change.new.clone(),
                changed_by: actor.to_owned(),
                changed_at: row.get::<DateTime<Utc>, _>("fecha_modificacion"),
                reason: reason.map(str::to_owned),
            });
        }

        tx.commit()
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        debug!(id, changes = written.len(), actor, "encuesta actualizada");
        Ok(written)
    }

    async fn history(&self, id: RecordId) -> Result<Vec<ChangeEntry>, StoreError> {
        let query = format!(
            "SELECT id, encuesta_id, campo_modificado, valor_anterior, valor_nuevo, \
                    usuario_modificacion, fecha_modificacion, motivo_cambio \
             FROM {} WHERE encuesta_id = $1 \
             ORDER BY fecha_modificacion DESC, id DESC",
            self.config.history_table()
        );

        let rows: Vec<HistoryRow> = sqlx::query_as(&query)
            .bind(id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        let mut entries = Vec::with_capacity(rows.len());
        for row in rows {
            match row.campo_modificado.parse::<Field>() {
                Ok(field) => entries.push(ChangeEntry {
                    id: Some(row.id),
                    record_id: row.encuesta_id,
                    field,
                    prior_value: row.valor_anterior.unwrap_or_default(),
                    new_value: row.valor_nuevo.unwrap_or_default(),
                    changed_by: row
                        .usuario_modificacion
                        .unwrap_or_else(|| censo_store::DEFAULT_ACTOR.to_owned()),
                    changed_at: row.fecha_modificacion,
                    reason: row.motivo_cambio,
                }),
                Err(err) => {
                    warn!(error = %err, entry = row.id, "entrada de historial descartada");
                }
            }
        }

        Ok(entries)
    }

    async fn delete(&self, id: RecordId) -> Result<(), StoreError> {
        // History rows go with the record via ON DELETE CASCADE.
        let query = format!("DELETE FROM {} WHERE id = $1", self.config.records_table());

        let result = sqlx::query(&query)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id));
        }
        debug!(id, "encuesta eliminada");
        Ok(())
    }

    async fn statistics(&self) -> Result<StoreStatistics, StoreError> {
        let table = self.config.records_table();
        let query = format!(
            "SELECT COUNT(*) AS total, \
                    COUNT(DISTINCT NULLIF(departamento, '')) AS departamentos, \
                    COUNT(DISTINCT NULLIF(sistema_origen, '')) AS sistemas, \
                    COUNT(*) FILTER (WHERE criticidad = 'Alto') AS criticos, \
                    COUNT(*) FILTER (WHERE automatizado = 'Sí') AS automatizados \
             FROM {table}"
        );

        let row = sqlx::query(&query)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        Ok(StoreStatistics {
            total: u64::try_from(row.get::<i64, _>("total")).unwrap_or(0),
            unique_departments: u64::try_from(row.get::<i64, _>("departamentos")).unwrap_or(0),
            unique_systems: u64::try_from(row.get::<i64, _>("sistemas")).unwrap_or(0),
            critical: u64::try_from(row.get::<i64, _>("criticos")).unwrap_or(0),
            automated: u64::try_from(row.get::<i64, _>("automatizados")).unwrap_or(0),
        })
    }

    fn backend_name(&self) -> &'static str {
        BACKEND
    }

    fn supports_editing(&self) -> bool {
        true
    }
}

fn non_empty(value: &str) -> Option<&str> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

#[derive(sqlx::FromRow)]
struct SurveyRow {
    id: i64,
    fecha_envio: DateTime<Utc>,
    nombre_reporte: String,
    periodicidad_reporte: Option<String>,
    sistema_origen: String,
    persona_responsable: String,
    email_responsable: String,
    auditoria_utilizacion: Option<String>,
    periodicidad_auditoria: Option<String>,
    departamento: Option<String>,
    criticidad: Option<String>,
    formato_entrega: Option<String>,
    descripcion_reporte: Option<String>,
    stakeholders: Option<String>,
    automatizado: Option<String>,
    observaciones: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<SurveyRow> for SurveyRecord {
    fn from(row: SurveyRow) -> Self {
        SurveyRecord {
            id: Some(row.id),
            submitted_at: row.fecha_envio,
            report_name: row.nombre_reporte,
            periodicity: row.periodicidad_reporte.unwrap_or_default(),
            source_system: row.sistema_origen,
            responsible: row.persona_responsable,
            responsible_email: row.email_responsable,
            audit_usage: row.auditoria_utilizacion.unwrap_or_default(),
            audit_periodicity: row.periodicidad_auditoria.filter(|v| !v.is_empty()),
            department: row.departamento.unwrap_or_default(),
            criticality: row.criticidad.unwrap_or_default(),
            delivery_formats: row.formato_entrega.filter(|v| !v.is_empty()),
            description: row.descripcion_reporte.filter(|v| !v.is_empty()),
            stakeholders: row.stakeholders.filter(|v| !v.is_empty()),
            automation: row.automatizado.filter(|v| !v.is_empty()),
            observations: row.observaciones.filter(|v| !v.is_empty()),
            created_at: Some(row.created_at),
            updated_at: Some(row.updated_at),
        }
    }
}

#[derive(sqlx::FromRow)]
struct HistoryRow {
    id: i64,
    encuesta_id: i64,
    campo_modificado: String,
    valor_anterior: Option<String>,
    valor_nuevo: Option<String>,
    usuario_modificacion: Option<String>,
    fecha_modificacion: DateTime<Utc>,
    motivo_cambio: Option<String>,
}

#[cfg(all(test, feature = "integration"))]
mod integration_tests {
    use censo_store::store::scan_statistics;
    use censo_store::testing::sample_record;

    use super::*;

    fn test_config() -> PostgresConfig {
        PostgresConfig {
            url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "postgres://localhost:5432/censo_test".to_string()),
            table_prefix: format!("t{}_", Utc::now().timestamp_nanos_opt().unwrap_or(0)),
            ..PostgresConfig::default()
        }
    }

    #[tokio::test]
    async fn save_then_load_roundtrips_every_field() {
        let store = PostgresStore::new(test_config()).await.expect("connect");
        let record = sample_record("Cierre Contable");
        let id = store.save(&record).await.unwrap().unwrap();

        let loaded = store.load(id).await.unwrap().unwrap();
        for field in Field::ALL {
            assert_eq!(loaded.get(field), record.get(field), "{field}");
        }
        assert!(loaded.created_at.is_some());
    }

    #[tokio::test]
    async fn load_all_orders_newest_first() {
        let store = PostgresStore::new(test_config()).await.expect("connect");
        let mut older = sample_record("Viejo");
        older.submitted_at = parse_timestamp("2024-01-01 00:00:00").unwrap();
        let mut newer = sample_record("Nuevo");
        newer.submitted_at = parse_timestamp("2024-06-01 00:00:00").unwrap();

        store.save(&older).await.unwrap();
        store.save(&newer).await.unwrap();

        let all = store.load_all().await.unwrap();
        assert_eq!(all[0].report_name, "Nuevo");
        assert_eq!(all[1].report_name, "Viejo");
    }

    #[tokio::test]
    async fn update_stages_columns_and_history_atomically() {
        let store = PostgresStore::new(test_config()).await.expect("connect");
        let id = store
            .save(&sample_record("Inventario"))
            .await
            .unwrap()
            .unwrap();

        let patch = RecordPatch::new()
            .with(Field::Criticality, "Alto")
            .with(Field::Department, "Finanzas"); // unchanged
        let written = store.update(id, &patch, "bob", None).await.unwrap();
        assert_eq!(written.len(), 1);
        assert_eq!(written[0].prior_value, "Medio");
        assert_eq!(written[0].new_value, "Alto");

        let stored = store.load(id).await.unwrap().unwrap();
        assert_eq!(stored.criticality, "Alto");

        let history = store.history(id).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].changed_by, "bob");
    }

    #[tokio::test]
    async fn noop_update_writes_nothing() {
        let store = PostgresStore::new(test_config()).await.expect("connect");
        let id = store
            .save(&sample_record("Inventario"))
            .await
            .unwrap()
            .unwrap();

        let patch = RecordPatch::new().with(Field::Criticality, "Medio");
        let written = store.update(id, &patch, "bob", None).await.unwrap();
        assert!(written.is_empty());
        assert!(store.history(id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn delete_cascades_history() {
        let store = PostgresStore::new(test_config()).await.expect("connect");
        let id = store.save(&sample_record("R")).await.unwrap().unwrap();
        store
            .update(
                id,
                &RecordPatch::new().with(Field::Criticality, "Alto"),
                "a",
                None,
            )
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
    async fn statistics_use_server_side_aggregation() {
        let store = PostgresStore::new(test_config()).await.expect("connect");
        let mut critical = sample_record("A");
        critical.criticality = "Alto".into();
        critical.automation = Some("Sí".into());
        store.save(&critical).await.unwrap();
        store.save(&sample_record("B")).await.unwrap();

        let stats = store.statistics().await.unwrap();
        assert_eq!(stats.total, 2);
        assert_eq!(stats.critical, 1);
        assert_eq!(stats.automated, 1);
        assert_eq!(stats.unique_departments, 1);
    }

    #[tokio::test]
    async fn statistics_ignore_blank_departments_and_systems() {
        let store = PostgresStore::new(test_config()).await.expect("connect");
        let mut blank = sample_record("Sin Clasificar");
        blank.department = String::new();
        blank.source_system = String::new();
        store.save(&blank).await.unwrap();
        store.save(&sample_record("Cierre")).await.unwrap();

        // Same counts a scan over the loaded records would produce.
        let stats = store.statistics().await.unwrap();
        let scanned = scan_statistics(&store.load_all().await.unwrap());
        assert_eq!(stats.total, 2);
        assert_eq!(stats.unique_departments, 1);
        assert_eq!(stats.unique_systems, 1);
        assert_eq!(stats.unique_departments, scanned.unique_departments);
        assert_eq!(stats.unique_systems, scanned.unique_systems);
    }
}
