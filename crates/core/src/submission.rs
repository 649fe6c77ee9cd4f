use chrono::{DateTime, Utc};

use crate::error::ValidationError;
use crate::field::Field;
use crate::model::SurveyRecord;

/// An intake form payload, prior to validation.
///
/// Every attribute is optional at this stage; [`SurveySubmission::validate`]
/// enforces the mandatory set and the email check before anything reaches a
/// store.
#[derive(Debug, Clone, Default)]
pub struct SurveySubmission {
    pub report_name: Option<String>,
    pub periodicity: Option<String>,
    pub source_system: Option<String>,
    pub responsible: Option<String>,
    pub responsible_email: Option<String>,
    pub audit_usage: Option<String>,
    pub audit_periodicity: Option<String>,
    pub department: Option<String>,
    pub criticality: Option<String>,
    pub delivery_formats: Option<String>,
    pub description: Option<String>,
    pub stakeholders: Option<String>,
    pub automation: Option<String>,
    pub observations: Option<String>,
}

impl SurveySubmission {
    /// Check the mandatory fields and the email syntax.
    ///
    /// All missing mandatory fields are reported together, matching the
    /// intake form's behavior of naming every incomplete field at once.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let missing: Vec<Field> = Field::MANDATORY
            .into_iter()
            .filter(|field| {
                self.mandatory_value(*field)
                    .map_or(true, |v| v.trim().is_empty())
            })
            .collect();

        if !missing.is_empty() {
            return Err(ValidationError::MissingFields(missing));
        }

        // Syntactic check only, not RFC validation.
        let email = self.responsible_email.as_deref().unwrap_or_default();
        if !email.contains('@') || !email.contains('.') {
            return Err(ValidationError::InvalidEmail(email.to_owned()));
        }

        Ok(())
    }

    /// Validate and convert into a [`SurveyRecord`] stamped at `now`.
    pub fn into_record(self, now: DateTime<Utc>) -> Result<SurveyRecord, ValidationError> {
        self.validate()?;

        Ok(SurveyRecord {
            id: None,
            submitted_at: now,
            report_name: self.report_name.unwrap_or_default(),
            periodicity: self.periodicity.unwrap_or_default(),
            source_system: self.source_system.unwrap_or_default(),
            responsible: self.responsible.unwrap_or_default(),
            responsible_email: self.responsible_email.unwrap_or_default(),
            audit_usage: self.audit_usage.unwrap_or_default(),
            audit_periodicity: non_empty(self.audit_periodicity),
            department: self.department.unwrap_or_default(),
            criticality: self.criticality.unwrap_or_default(),
            delivery_formats: non_empty(self.delivery_formats),
            description: non_empty(self.description),
            stakeholders: non_empty(self.stakeholders),
            automation: non_empty(self.automation),
            observations: non_empty(self.observations),
            created_at: None,
            updated_at: None,
        })
    }

    fn mandatory_value(&self, field: Field) -> Option<&str> {
        match field {
            Field::ReportName => self.report_name.as_deref(),
            Field::Periodicity => self.periodicity.as_deref(),
            Field::SourceSystem => self.source_system.as_deref(),
            Field::Responsible => self.responsible.as_deref(),
            Field::ResponsibleEmail => self.responsible_email.as_deref(),
            Field::AuditUsage => self.audit_usage.as_deref(),
            Field::Department => self.department.as_deref(),
            Field::Criticality => self.criticality.as_deref(),
            // Not in Field::MANDATORY.
            _ => None,
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
