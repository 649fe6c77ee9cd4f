use serde::{Deserialize, Serialize};

/// Aggregate counts over the whole record set.
///
/// The Postgres backend computes these with SQL aggregation; the flat-file
/// backend scans the materialized list. Both produce identical values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreStatistics {
    /// Total number of records.
    pub total: u64,
    /// Number of distinct non-empty departments.
    pub unique_departments: u64,
    /// Number of distinct non-empty source systems.
    pub unique_systems: u64,
    /// Records with criticality `Alto`.
    pub critical: u64,
    /// Records with automation status `Sí`.
    pub automated: u64,
}
