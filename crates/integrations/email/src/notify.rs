use chrono::{DateTime, Utc};
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use thiserror::Error;
use tracing::{debug, error, info};

use censo_core::SurveyRecord;

use crate::config::MailConfig;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("configuración SMTP inválida: {0}")]
    Configuration(String),
    #[error("no se pudo construir el mensaje: {0}")]
    Message(String),
    #[error("fallo de envío SMTP: {0}")]
    Send(String),
}

/// SMTP notifier built on `lettre`'s async transport.
pub struct Notifier {
    config: MailConfig,
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl std::fmt::Debug for Notifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Notifier")
            .field("server", &self.config.server)
            .field("transport", &"<AsyncSmtpTransport>")
            .finish()
    }
}

impl Notifier {
    /// Build a STARTTLS transport from the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError::Configuration`] when the relay cannot be set
    /// up for the configured server.
    pub fn new(config: MailConfig) -> Result<Self, NotifyError> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.server)
            .map_err(|e| NotifyError::Configuration(e.to_string()))?
            .port(config.port)
            .credentials(Credentials::new(
                config.user.clone(),
                config.password.clone(),
            ))
            .build();
        Ok(Self { config, transport })
    }

    /// Create a notifier with a pre-built transport (for testing).
    #[must_use]
    pub fn with_transport(
        config: MailConfig,
        transport: AsyncSmtpTransport<Tokio1Executor>,
    ) -> Self {
        Self { config, transport }
    }

    /// Confirm a submission to the person who filed it.
    ///
    /// # Errors
    ///
    /// Fails when an address does not parse or the SMTP send fails.
    pub async fn send_confirmation(
        &self,
        recipient: &str,
        report_name: &str,
        now: DateTime<Utc>,
    ) -> Result<(), NotifyError> {
        let message = build_html_message(
            &self.config.from,
            recipient,
            "Confirmación - Encuesta de Reportes Corporativos Completada",
            &confirmation_body(report_name, now),
        )?;
        self.send(message, recipient).await
    }

    /// Notify the administrator of a new submission. Silently does nothing
    /// when no admin recipient is configured.
    ///
    /// # Errors
    ///
    /// Fails when an address does not parse or the SMTP send fails.
    pub async fn notify_admin(&self, record: &SurveyRecord) -> Result<(), NotifyError> {
        let Some(admin) = self.config.admin_email.as_deref() else {
            debug!("ADMIN_EMAIL sin configurar, se omite la notificación");
            return Ok(());
        };

        let subject = format!("Nueva Encuesta Recibida - {}", record.report_name);
        let message = build_html_message(
            &self.config.from,
            admin,
            &subject,
            &admin_body(record, Utc::now()),
        )?;
        self.send(message, admin).await
    }

    async fn send(&self, message: Message, recipient: &str) -> Result<(), NotifyError> {
        self.transport.send(message).await.map_err(|e| {
            error!(to = %recipient, error = %e, "fallo el envío SMTP");
            NotifyError::Send(e.to_string())
        })?;
        info!(to = %recipient, "notificación enviada");
        Ok(())
    }
}

fn build_html_message(
    from: &str,
    to: &str,
    subject: &str,
    html: &str,
) -> Result<Message, NotifyError> {
    let from_mailbox: Mailbox = from
        .parse()
        .map_err(|e| NotifyError::Configuration(format!("remitente inválido: {e}")))?;
    let to_mailbox: Mailbox = to
        .parse()
        .map_err(|e| NotifyError::Message(format!("destinatario inválido: {e}")))?;

    Message::builder()
        .from(from_mailbox)
        .to(to_mailbox)
        .subject(subject)
        .header(ContentType::TEXT_HTML)
        .body(html.to_owned())
        .map_err(|e| NotifyError::Message(e.to_string()))
}

fn confirmation_body(report_name: &str, now: DateTime<Utc>) -> String {
    format!(
        "<html><body>\
         <h2>Encuesta Completada Exitosamente</h2>\
         <p>Estimado/a colaborador/a,</p>\
         <p>Confirmamos que hemos recibido correctamente su encuesta sobre el \
         reporte corporativo:</p>\
         <p><strong>Reporte:</strong> {report_name}<br>\
         <strong>Fecha de envío:</strong> {}</p>\
         <p>Su respuesta ha sido registrada y será revisada por el equipo de \
         auditoría. Si necesita realizar alguna modificación, contacte al \
         administrador del sistema.</p>\
         <p>Este es un mensaje automático del Sistema de Gestión de Reportes \
         Corporativos. Por favor no responda directamente a este correo.</p>\
         </body></html>",
        now.format("%d/%m/%Y a las %H:%M")
    )
}

fn admin_body(record: &SurveyRecord, now: DateTime<Utc>) -> String {
    let row = |label: &str, value: &str| {
        let shown = if value.is_empty() { "N/A" } else { value };
        format!("<tr><td><strong>{label}:</strong></td><td>{shown}</td></tr>")
    };
    let rows = [
        row("Nombre del Reporte", &record.report_name),
        row("Responsable", &record.responsible),
        row("Email", &record.responsible_email),
        row("Departamento", &record.department),
        row("Criticidad", &record.criticality),
        row("Periodicidad", &record.periodicity),
        row("Sistema Origen", &record.source_system),
        row(
            "Fecha de Envío",
            &record.get(censo_core::Field::SubmittedAt),
        ),
    ]
    .concat();

    format!(
        "<html><body>\
         <h2>Nueva Encuesta de Reporte Recibida</h2>\
         <p>Se ha recibido una nueva encuesta en el sistema de gestión de \
         reportes corporativos.</p>\
         <table>{rows}</table>\
         <p>Revise la nueva encuesta en el panel de administración.</p>\
         <p>Mensaje generado el {}</p>\
         </body></html>",
        now.format("%d/%m/%Y a las %H:%M:%S")
    )
}
