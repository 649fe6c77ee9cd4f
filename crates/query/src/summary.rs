//! Grouped summaries for the statistics views.

use std::collections::BTreeMap;

use serde::Serialize;

use censo_core::SurveyRecord;

/// Per-department rollup.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct DepartmentSummary {
    pub department: String,
    pub total: u64,
    pub critical: u64,
    pub automated: u64,
}

/// Per-periodicity rollup.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PeriodicitySummary {
    pub periodicity: String,
    pub total: u64,
    pub critical: u64,
}

/// Automation status counts over a record set.
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct AutomationBreakdown {
    pub automated: u64,
    pub partial: u64,
    pub manual: u64,
    pub unspecified: u64,
}

impl AutomationBreakdown {
    #[must_use]
    pub fn total(&self) -> u64 {
        self.automated + self.partial + self.manual + self.unspecified
    }

    /// Share of fully automated records, as a percentage. Zero when empty.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn automated_pct(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            0.0
        } else {
            self.automated as f64 / total as f64 * 100.0
        }
    }
}

/// Group records by department, largest group first. Records without a
/// department are skipped.
#[must_use]
pub fn per_department(records: &[SurveyRecord]) -> Vec<DepartmentSummary> {
    let mut groups: BTreeMap<&str, DepartmentSummary> = BTreeMap::new();
    for record in records {
        if record.department.is_empty() {
            continue;
        }
        let entry = groups
            .entry(record.department.as_str())
            .or_insert_with(|| DepartmentSummary {
                department: record.department.clone(),
                total: 0,
                critical: 0,
                automated: 0,
            });
        entry.total += 1;
        if record.criticality == "Alto" {
            entry.critical += 1;
        }
        if record.automation.as_deref() == Some("Sí") {
            entry.automated += 1;
        }
    }

    let mut summaries: Vec<DepartmentSummary> = groups.into_values().collect();
    summaries.sort_by(|a, b| b.total.cmp(&a.total));
    summaries
}

/// Group records by periodicity, largest group first.
#[must_use]
pub fn per_periodicity(records: &[SurveyRecord]) -> Vec<PeriodicitySummary> {
    let mut groups: BTreeMap<&str, PeriodicitySummary> = BTreeMap::new();
    for record in records {
        if record.periodicity.is_empty() {
            continue;
        }
        let entry = groups
            .entry(record.periodicity.as_str())
            .or_insert_with(|| PeriodicitySummary {
                periodicity: record.periodicity.clone(),
                total: 0,
                critical: 0,
            });
        entry.total += 1;
        if record.criticality == "Alto" {
            entry.critical += 1;
        }
    }

    let mut summaries: Vec<PeriodicitySummary> = groups.into_values().collect();
    summaries.sort_by(|a, b| b.total.cmp(&a.total));
    summaries
}

#[must_use]
pub fn automation_breakdown(records: &[SurveyRecord]) -> AutomationBreakdown {
    let mut breakdown = AutomationBreakdown::default();
    for record in records {
        match record.automation.as_deref() {
            Some("Sí") => breakdown.automated += 1,
            Some("Parcialmente") => breakdown.partial += 1,
            Some("No") => breakdown.manual += 1,
            _ => breakdown.unspecified += 1,
        }
    }
    breakdown
}
