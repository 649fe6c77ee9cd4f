use sqlx::PgPool;

use crate::config::PostgresConfig;

/// Run database migrations, creating tables and indexes if they do not
/// exist.
///
/// # Errors
///
/// Returns a [`sqlx::Error`] if any DDL statement fails.
pub async fn run_migrations(pool: &PgPool, config: &PostgresConfig) -> Result<(), sqlx::Error> {
    let records = config.records_table();
    let history = config.history_table();
    let prefix = &config.table_prefix;

    let create_records = format!(
        "CREATE TABLE IF NOT EXISTS {records} (
            id BIGSERIAL PRIMARY KEY,
            fecha_envio TIMESTAMPTZ NOT NULL,
            nombre_reporte TEXT NOT NULL,
            periodicidad_reporte TEXT,
            sistema_origen TEXT NOT NULL,
            persona_responsable TEXT NOT NULL,
            email_responsable TEXT NOT NULL,
            auditoria_utilizacion TEXT,
            periodicidad_auditoria TEXT,
            departamento TEXT,
            criticidad TEXT,
            formato_entrega TEXT,
            descripcion_reporte TEXT,
            stakeholders TEXT,
            automatizado TEXT,
            observaciones TEXT,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )"
    );

    let create_history = format!(
        "CREATE TABLE IF NOT EXISTS {history} (
            id BIGSERIAL PRIMARY KEY,
            encuesta_id BIGINT NOT NULL REFERENCES {records}(id) ON DELETE CASCADE,
            campo_modificado TEXT NOT NULL,
            valor_anterior TEXT,
            valor_nuevo TEXT,
            usuario_modificacion TEXT,
            fecha_modificacion TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            motivo_cambio TEXT
        )"
    );

    // Performance hints from the deployed schema, not correctness
    // requirements.
    let indexes = [
        format!("CREATE INDEX IF NOT EXISTS idx_{prefix}encuestas_departamento ON {records} (departamento)"),
        format!("CREATE INDEX IF NOT EXISTS idx_{prefix}encuestas_criticidad ON {records} (criticidad)"),
        format!("CREATE INDEX IF NOT EXISTS idx_{prefix}encuestas_fecha ON {records} (fecha_envio)"),
        format!("CREATE INDEX IF NOT EXISTS idx_{prefix}historial_encuesta ON {history} (encuesta_id)"),
    ];

    sqlx::query(&create_records).execute(pool).await?;
    sqlx::query(&create_history).execute(pool).await?;
    for index in &indexes {
        sqlx::query(index).execute(pool).await?;
    }

    Ok(())
}
