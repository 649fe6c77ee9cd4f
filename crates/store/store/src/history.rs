use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use censo_core::Field;

use crate::RecordId;

/// An audit-log row capturing one field-level change to a record.
///
/// Entries are created only as a side effect of an update, are immutable
/// once written, and are deleted only by cascading deletion of the owning
/// record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeEntry {
    /// Store-assigned identifier.
    #[serde(default)]
    pub id: Option<i64>,
    /// The record this entry belongs to.
    pub record_id: RecordId,
    /// The field that changed.
    pub field: Field,
    /// Stringified value before the change (empty if absent).
    pub prior_value: String,
    /// Stringified value after the change.
    pub new_value: String,
    /// Who made the change (free text; `Sistema` when unknown).
    pub changed_by: String,
    /// Store-assigned modification timestamp.
    pub changed_at: DateTime<Utc>,
    /// Optional free-text reason for the change.
    #[serde(default)]
    pub reason: Option<String>,
}
