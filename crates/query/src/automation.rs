//! Automation-opportunity ranking.
//!
//! Non-automated reports are scored by how often they run and how critical
//! they are, so the most valuable automation candidates surface first.

use serde::Serialize;

use censo_core::SurveyRecord;

/// How many candidates a ranking returns by default.
pub const DEFAULT_OPPORTUNITY_LIMIT: usize = 10;

/// Priority weight per periodicity. Unlisted values weigh nothing.
pub const PERIODICITY_WEIGHTS: &[(&str, u32)] = &[
    ("Diario", 5),
    ("Semanal", 4),
    ("Quincenal", 3),
    ("Mensual", 2),
    ("Bimestral", 1),
    ("Trimestral", 1),
];

/// Priority weight per criticality level.
pub const CRITICALITY_WEIGHTS: &[(&str, u32)] = &[("Alto", 3), ("Medio", 2), ("Bajo", 1)];

#[must_use]
pub fn periodicity_weight(periodicity: &str) -> u32 {
    lookup(PERIODICITY_WEIGHTS, periodicity)
}

#[must_use]
pub fn criticality_weight(criticality: &str) -> u32 {
    lookup(CRITICALITY_WEIGHTS, criticality)
}

fn lookup(table: &[(&str, u32)], key: &str) -> u32 {
    table
        .iter()
        .find(|(name, _)| *name == key)
        .map_or(0, |(_, weight)| *weight)
}

/// A non-automated report with its computed priority.
#[derive(Debug, Clone, Serialize)]
pub struct Opportunity<'a> {
    pub record: &'a SurveyRecord,
    pub priority: u32,
}

impl Opportunity<'_> {
    fn score(record: &SurveyRecord) -> u32 {
        periodicity_weight(&record.periodicity) + criticality_weight(&record.criticality)
    }
}

/// Rank automation candidates, highest priority first.
///
/// Only records explicitly marked as not automated participate; partially
/// automated ones already have tooling. Ties keep the input order.
#[must_use]
pub fn rank_opportunities(records: &[SurveyRecord], limit: usize) -> Vec<Opportunity<'_>> {
    let mut candidates: Vec<Opportunity<'_>> = records
        .iter()
        .filter(|r| r.automation.as_deref() == Some("No"))
        .map(|record| Opportunity {
            record,
            priority: Opportunity::score(record),
        })
        .collect();

    candidates.sort_by(|a, b| b.priority.cmp(&a.priority));
    candidates.truncate(limit);
    candidates
}
