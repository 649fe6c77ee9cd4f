//! Read-side analysis over survey records.
//!
//! Everything here operates on in-memory slices of
//! [`censo_core::SurveyRecord`], independent of which backend produced
//! them: composable filters, per-department and per-periodicity
//! summaries, and the automation-opportunity ranking.

pub mod automation;
pub mod filter;
pub mod summary;

pub use automation::{rank_opportunities, Opportunity, DEFAULT_OPPORTUNITY_LIMIT};
pub use filter::RecordFilter;
pub use summary::{
    automation_breakdown, per_department, per_periodicity, AutomationBreakdown,
    DepartmentSummary, PeriodicitySummary,
};
