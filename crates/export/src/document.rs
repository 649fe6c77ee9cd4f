//! Paginated document content model.
//!
//! Two shapes: a full listing (executive summary plus a detail table of all
//! records) and a single-record detail page. A renderer walks the section
//! list in order.

use chrono::{DateTime, Utc};
use serde::Serialize;

use censo_core::{Field, SurveyRecord};
use censo_store::StoreStatistics;

/// Listing cells longer than this are shortened with an ellipsis.
const MAX_CELL: usize = 30;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TableSection {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub enum Section {
    Heading(String),
    Paragraph(String),
    Table(TableSection),
    PageBreak,
}

#[derive(Debug, Clone, Serialize)]
pub struct Document {
    pub title: String,
    pub generated_at: DateTime<Utc>,
    pub sections: Vec<Section>,
}

impl Document {
    /// Full listing: executive summary followed by a condensed table of
    /// every record.
    #[must_use]
    pub fn full_listing(
        records: &[SurveyRecord],
        stats: &StoreStatistics,
        now: DateTime<Utc>,
    ) -> Self {
        let mut sections = Vec::new();

        if !records.is_empty() {
            sections.push(Section::Heading("Resumen Ejecutivo".to_owned()));
            let metric = |name: &str, value: u64| vec![name.to_owned(), value.to_string()];
            sections.push(Section::Table(TableSection {
                header: vec!["Métrica".to_owned(), "Valor".to_owned()],
                rows: vec![
                    metric("Total de Reportes", stats.total),
                    metric("Departamentos Únicos", stats.unique_departments),
                    metric("Sistemas Únicos", stats.unique_systems),
                    metric("Reportes Críticos", stats.critical),
                    metric("Reportes Automatizados", stats.automated),
                ],
            }));
        }

        sections.push(Section::PageBreak);
        sections.push(Section::Heading("Listado Detallado de Reportes".to_owned()));
        if records.is_empty() {
            sections.push(Section::Paragraph("No hay datos disponibles".to_owned()));
        } else {
            let listing_fields = [
                Field::ReportName,
                Field::Responsible,
                Field::Department,
                Field::Periodicity,
                Field::Criticality,
                Field::Automation,
            ];
            sections.push(Section::Table(TableSection {
                header: vec![
                    "Reporte".to_owned(),
                    "Responsable".to_owned(),
                    "Departamento".to_owned(),
                    "Periodicidad".to_owned(),
                    "Criticidad".to_owned(),
                    "Automatizado".to_owned(),
                ],
                rows: records
                    .iter()
                    .map(|record| {
                        listing_fields
                            .iter()
                            .map(|f| shorten(&record.get(*f)))
                            .collect()
                    })
                    .collect(),
            }));
        }

        Self {
            title: "Reporte de Encuestas de Reportes Corporativos".to_owned(),
            generated_at: now,
            sections,
        }
    }

    /// Single-record detail page.
    #[must_use]
    pub fn record_detail(record: &SurveyRecord, now: DateTime<Utc>) -> Self {
        let mut sections = Vec::new();

        sections.push(Section::Heading("Información General".to_owned()));
        let general = [
            ("Nombre del Reporte", Field::ReportName),
            ("Periodicidad", Field::Periodicity),
            ("Sistema de Origen", Field::SourceSystem),
            ("Responsable", Field::Responsible),
            ("Email", Field::ResponsibleEmail),
            ("Departamento", Field::Department),
            ("Criticidad", Field::Criticality),
            ("Automatizado", Field::Automation),
        ];
        sections.push(Section::Table(TableSection {
            header: vec!["Campo".to_owned(), "Valor".to_owned()],
            rows: general
                .iter()
                .map(|(label, field)| vec![(*label).to_owned(), or_na(&record.get(*field))])
                .collect(),
        }));

        sections.push(Section::Heading("Información de Auditoría".to_owned()));
        sections.push(Section::Paragraph(or_na(&record.audit_usage)));
        if let Some(audit_periodicity) = non_empty(record.audit_periodicity.as_deref()) {
            sections.push(Section::Paragraph(format!(
                "Periodicidad de Auditoría: {audit_periodicity}"
            )));
        }

        if let Some(description) = non_empty(record.description.as_deref()) {
            sections.push(Section::Heading("Descripción del Reporte".to_owned()));
            sections.push(Section::Paragraph(description.to_owned()));
        }
        if let Some(stakeholders) = non_empty(record.stakeholders.as_deref()) {
            sections.push(Section::Heading("Stakeholders/Usuarios".to_owned()));
            sections.push(Section::Paragraph(stakeholders.to_owned()));
        }
        if let Some(observations) = non_empty(record.observations.as_deref()) {
            sections.push(Section::Heading("Observaciones".to_owned()));
            sections.push(Section::Paragraph(observations.to_owned()));
        }

        Self {
            title: format!("Detalle de Reporte: {}", record.report_name),
            generated_at: now,
            sections,
        }
    }
}

fn shorten(value: &str) -> String {
    if value.chars().count() > MAX_CELL {
        let cut: String = value.chars().take(MAX_CELL - 3).collect();
        format!("{cut}...")
    } else {
        value.to_owned()
    }
}

fn or_na(value: &str) -> String {
    if value.is_empty() {
        "N/A".to_owned()
    } else {
        value.to_owned()
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
