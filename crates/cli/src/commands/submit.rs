use chrono::Utc;
use clap::Args;
use tracing::warn;

use censo_core::SurveySubmission;
use censo_email::{MailConfig, Notifier};
use censo_store::RecordStore;

use crate::OutputFormat;

/// Intake form fields. All flags are optional at the parser level so
/// validation can report every missing mandatory field at once.
#[derive(Args, Debug)]
pub struct SubmitArgs {
    /// Nombre del reporte.
    #[arg(long)]
    pub report_name: Option<String>,
    /// Periodicidad del reporte (Diario, Semanal, Quincenal, Mensual, ...).
    #[arg(long)]
    pub periodicity: Option<String>,
    /// Sistema de origen.
    #[arg(long)]
    pub source_system: Option<String>,
    /// Persona responsable.
    #[arg(long)]
    pub responsible: Option<String>,
    /// Email del responsable.
    #[arg(long)]
    pub email: Option<String>,
    /// Utilización en auditoría.
    #[arg(long)]
    pub audit_usage: Option<String>,
    /// Periodicidad de auditoría.
    #[arg(long)]
    pub audit_periodicity: Option<String>,
    /// Departamento.
    #[arg(long)]
    pub department: Option<String>,
    /// Criticidad (Alto, Medio, Bajo).
    #[arg(long)]
    pub criticality: Option<String>,
    /// Formatos de entrega.
    #[arg(long)]
    pub delivery_formats: Option<String>,
    /// Descripción del reporte.
    #[arg(long)]
    pub description: Option<String>,
    /// Stakeholders / usuarios.
    #[arg(long)]
    pub stakeholders: Option<String>,
    /// Automatizado (Sí, No, Parcialmente).
    #[arg(long)]
    pub automation: Option<String>,
    /// Observaciones.
    #[arg(long)]
    pub observations: Option<String>,
}

impl SubmitArgs {
    fn to_submission(&self) -> SurveySubmission {
        SurveySubmission {
            report_name: self.report_name.clone(),
            periodicity: self.periodicity.clone(),
            source_system: self.source_system.clone(),
            responsible: self.responsible.clone(),
            responsible_email: self.email.clone(),
            audit_usage: self.audit_usage.clone(),
            audit_periodicity: self.audit_periodicity.clone(),
            department: self.department.clone(),
            criticality: self.criticality.clone(),
            delivery_formats: self.delivery_formats.clone(),
            description: self.description.clone(),
            stakeholders: self.stakeholders.clone(),
            automation: self.automation.clone(),
            observations: self.observations.clone(),
        }
    }
}

pub async fn run(
    store: &dyn RecordStore,
    args: &SubmitArgs,
    format: &OutputFormat,
) -> anyhow::Result<()> {
    let now = Utc::now();
    let record = args.to_submission().into_record(now)?;
    let id = store.save(&record).await?;

    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&serde_json::json!({
                    "saved": true,
                    "id": id,
                    "report_name": record.report_name,
                }))?
            );
        }
        OutputFormat::Text => match id {
            Some(id) => println!("Encuesta guardada (id {id}): {}", record.report_name),
            None => println!("Encuesta guardada: {}", record.report_name),
        },
    }

    // Best effort: a submission never fails because email does.
    if let Some(config) = MailConfig::from_env() {
        match Notifier::new(config) {
            Ok(notifier) => {
                if let Err(err) = notifier
                    .send_confirmation(&record.responsible_email, &record.report_name, now)
                    .await
                {
                    warn!(error = %err, "no se pudo enviar la confirmación");
                }
                if let Err(err) = notifier.notify_admin(&record).await {
                    warn!(error = %err, "no se pudo notificar al administrador");
                }
            }
            Err(err) => warn!(error = %err, "configuración SMTP inválida"),
        }
    }

    Ok(())
}
