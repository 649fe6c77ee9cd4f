use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::field::Field;
use crate::TIMESTAMP_FORMAT;

/// A single submitted survey response describing one corporate report.
///
/// `id` is store-assigned and only present in relational mode; the flat-file
/// backend is append-only and identifies records by position alone.
/// Optional attributes normalize to the empty string on the wire and in
/// diffs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurveyRecord {
    /// Store-assigned identifier (relational backend only).
    #[serde(default)]
    pub id: Option<i64>,

    /// When the submission was received.
    pub submitted_at: DateTime<Utc>,

    /// Report name.
    pub report_name: String,
    /// Generation frequency of the report (`Diario`, `Semanal`, ...).
    pub periodicity: String,
    /// System or application that produces the report.
    pub source_system: String,
    /// Person responsible for the report.
    pub responsible: String,
    /// Responsible person's email.
    pub responsible_email: String,
    /// Audits or processes the report feeds.
    pub audit_usage: String,
    /// Frequency of the audit, if known.
    #[serde(default)]
    pub audit_periodicity: Option<String>,
    /// Owning department.
    pub department: String,
    /// Business criticality (`Alto`, `Medio`, `Bajo`).
    pub criticality: String,
    /// Delivery formats as a comma-delimited tag list.
    #[serde(default)]
    pub delivery_formats: Option<String>,
    /// Free-text description of content and purpose.
    #[serde(default)]
    pub description: Option<String>,
    /// People or departments consuming the report.
    #[serde(default)]
    pub stakeholders: Option<String>,
    /// Automation status (`Sí`, `No`, `Parcialmente`).
    #[serde(default)]
    pub automation: Option<String>,
    /// Additional observations.
    #[serde(default)]
    pub observations: Option<String>,

    /// Row creation timestamp (relational backend only).
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Last modification timestamp (relational backend only).
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl SurveyRecord {
    /// The stringified value of a field, with absent values normalized to
    /// the empty string. This is the representation used for the flat file,
    /// the exports, and change diffing.
    pub fn get(&self, field: Field) -> String {
        match field {
            Field::SubmittedAt => self.submitted_at.format(TIMESTAMP_FORMAT).to_string(),
            Field::ReportName => self.report_name.clone(),
            Field::Periodicity => self.periodicity.clone(),
            Field::SourceSystem => self.source_system.clone(),
            Field::Responsible => self.responsible.clone(),
            Field::ResponsibleEmail => self.responsible_email.clone(),
            Field::AuditUsage => self.audit_usage.clone(),
            Field::AuditPeriodicity => self.audit_periodicity.clone().unwrap_or_default(),
            Field::Department => self.department.clone(),
            Field::Criticality => self.criticality.clone(),
            Field::DeliveryFormats => self.delivery_formats.clone().unwrap_or_default(),
            Field::Description => self.description.clone().unwrap_or_default(),
            Field::Stakeholders => self.stakeholders.clone().unwrap_or_default(),
            Field::Automation => self.automation.clone().unwrap_or_default(),
            Field::Observations => self.observations.clone().unwrap_or_default(),
        }
    }

    /// Assign a field from its wire representation.
    ///
    /// Empty strings clear optional fields. The submission timestamp must
    /// parse with [`TIMESTAMP_FORMAT`].
    pub fn set(&mut self, field: Field, value: &str) -> Result<(), ValidationError> {
        match field {
            Field::SubmittedAt => {
                self.submitted_at = parse_timestamp(value).ok_or_else(|| {
                    ValidationError::InvalidValue {
                        field,
                        value: value.to_owned(),
                    }
                })?;
            }
            Field::ReportName => self.report_name = value.to_owned(),
            Field::Periodicity => self.periodicity = value.to_owned(),
            Field::SourceSystem => self.source_system = value.to_owned(),
            Field::Responsible => self.responsible = value.to_owned(),
            Field::ResponsibleEmail => self.responsible_email = value.to_owned(),
            Field::AuditUsage => self.audit_usage = value.to_owned(),
            Field::AuditPeriodicity => self.audit_periodicity = optional(value),
            Field::Department => self.department = value.to_owned(),
            Field::Criticality => self.criticality = value.to_owned(),
            Field::DeliveryFormats => self.delivery_formats = optional(value),
            Field::Description => self.description = optional(value),
            Field::Stakeholders => self.stakeholders = optional(value),
            Field::Automation => self.automation = optional(value),
            Field::Observations => self.observations = optional(value),
        }
        Ok(())
    }
}

/// Parse a wire timestamp (`YYYY-MM-DD HH:MM:SS`, taken as UTC).
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(value.trim(), TIMESTAMP_FORMAT)
        .ok()
        .map(|naive| naive.and_utc())
}

fn optional(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_owned())
    }
}
