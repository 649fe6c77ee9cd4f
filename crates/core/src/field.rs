use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The survey record's data fields, in wire order.
///
/// The order of [`Field::ALL`] is the column order of the flat-file format,
/// the Postgres insert statements, and the tabular exports. Column names are
/// the Spanish identifiers inherited from the deployed schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    /// Submission timestamp (`fecha_envio`).
    SubmittedAt,
    /// Report name (`nombre_reporte`).
    ReportName,
    /// Report periodicity (`periodicidad_reporte`).
    Periodicity,
    /// Originating system (`sistema_origen`).
    SourceSystem,
    /// Responsible person (`persona_responsable`).
    Responsible,
    /// Responsible person's email (`email_responsable`).
    ResponsibleEmail,
    /// Audits where the report is used (`auditoria_utilizacion`).
    AuditUsage,
    /// Audit periodicity (`periodicidad_auditoria`).
    AuditPeriodicity,
    /// Owning department (`departamento`).
    Department,
    /// Criticality tier (`criticidad`).
    Criticality,
    /// Delivery formats, comma-delimited tags (`formato_entrega`).
    DeliveryFormats,
    /// Free-text description (`descripcion_reporte`).
    Description,
    /// Stakeholders / consumers (`stakeholders`).
    Stakeholders,
    /// Automation status (`automatizado`).
    Automation,
    /// Free-text observations (`observaciones`).
    Observations,
}

impl Field {
    /// All fields in wire order.
    pub const ALL: [Field; 15] = [
        Field::SubmittedAt,
        Field::ReportName,
        Field::Periodicity,
        Field::SourceSystem,
        Field::Responsible,
        Field::ResponsibleEmail,
        Field::AuditUsage,
        Field::AuditPeriodicity,
        Field::Department,
        Field::Criticality,
        Field::DeliveryFormats,
        Field::Description,
        Field::Stakeholders,
        Field::Automation,
        Field::Observations,
    ];

    /// Fields that must be non-empty for a submission to be accepted.
    pub const MANDATORY: [Field; 8] = [
        Field::ReportName,
        Field::Periodicity,
        Field::SourceSystem,
        Field::Responsible,
        Field::ResponsibleEmail,
        Field::AuditUsage,
        Field::Department,
        Field::Criticality,
    ];

    /// The column name as it appears in the flat file and the database.
    pub fn column_name(self) -> &'static str {
        match self {
            Field::SubmittedAt => "fecha_envio",
            Field::ReportName => "nombre_reporte",
            Field::Periodicity => "periodicidad_reporte",
            Field::SourceSystem => "sistema_origen",
            Field::Responsible => "persona_responsable",
            Field::ResponsibleEmail => "email_responsable",
            Field::AuditUsage => "auditoria_utilizacion",
            Field::AuditPeriodicity => "periodicidad_auditoria",
            Field::Department => "departamento",
            Field::Criticality => "criticidad",
            Field::DeliveryFormats => "formato_entrega",
            Field::Description => "descripcion_reporte",
            Field::Stakeholders => "stakeholders",
            Field::Automation => "automatizado",
            Field::Observations => "observaciones",
        }
    }

    /// Human-facing label, used in validation messages.
    pub fn label(self) -> &'static str {
        match self {
            Field::SubmittedAt => "Fecha de Envío",
            Field::ReportName => "Nombre del Reporte",
            Field::Periodicity => "Periodicidad del Reporte",
            Field::SourceSystem => "Sistema de Origen",
            Field::Responsible => "Persona Responsable",
            Field::ResponsibleEmail => "Email del Responsable",
            Field::AuditUsage => "Auditoría donde se Utiliza",
            Field::AuditPeriodicity => "Periodicidad de la Auditoría",
            Field::Department => "Departamento",
            Field::Criticality => "Nivel de Criticidad",
            Field::DeliveryFormats => "Formato de Entrega",
            Field::Description => "Descripción del Reporte",
            Field::Stakeholders => "Stakeholders/Usuarios",
            Field::Automation => "¿Está Automatizado?",
            Field::Observations => "Observaciones",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_name())
    }
}

/// Error returned when a column name does not match any field.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown field: {0}")]
pub struct UnknownField(pub String);

impl FromStr for Field {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Field::ALL
            .into_iter()
            .find(|f| f.column_name() == s)
            .ok_or_else(|| UnknownField(s.to_owned()))
    }
}
