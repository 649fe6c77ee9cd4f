//! Field-level change tracking.
//!
//! An update call carries a [`RecordPatch`]; [`diff`] compares each patched
//! field's stringified current value against the proposed one and yields a
//! [`FieldChange`] only where they differ. Absent values normalize to the
//! empty string before comparison, and numeric-looking values are compared
//! as their string representation with no coercion.

use censo_core::{Field, SurveyRecord, ValidationError};

/// A set of proposed field assignments, keyed by field.
///
/// Later assignments to the same field replace earlier ones, preserving map
/// semantics while keeping a deterministic field order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordPatch {
    entries: Vec<(Field, String)>,
}

impl RecordPatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field's proposed value, replacing any earlier assignment.
    pub fn set(&mut self, field: Field, value: impl Into<String>) -> &mut Self {
        let value = value.into();
        if let Some(entry) = self.entries.iter_mut().find(|(f, _)| *f == field) {
            entry.1 = value;
        } else {
            self.entries.push((field, value));
        }
        self
    }

    /// Builder-style [`RecordPatch::set`].
    #[must_use]
    pub fn with(mut self, field: Field, value: impl Into<String>) -> Self {
        self.set(field, value);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The proposed assignments in insertion order.
    pub fn entries(&self) -> &[(Field, String)] {
        &self.entries
    }
}

impl FromIterator<(Field, String)> for RecordPatch {
    fn from_iter<T: IntoIterator<Item = (Field, String)>>(iter: T) -> Self {
        let mut patch = RecordPatch::new();
        for (field, value) in iter {
            patch.set(field, value);
        }
        patch
    }
}

/// One staged field change: the prior and proposed stringified values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldChange {
    pub field: Field,
    pub prior: String,
    pub new: String,
}

/// Compare a record against a patch and return the fields that actually
/// change. Unchanged fields never produce an entry.
pub fn diff(record: &SurveyRecord, patch: &RecordPatch) -> Vec<FieldChange> {
    patch
        .entries()
        .iter()
        .filter_map(|(field, proposed)| {
            let prior = record.get(*field);
            if prior == *proposed {
                None
            } else {
                Some(FieldChange {
                    field: *field,
                    prior,
                    new: proposed.clone(),
                })
            }
        })
        .collect()
}

/// Apply a set of staged changes to a record in place.
pub fn apply(record: &mut SurveyRecord, changes: &[FieldChange]) -> Result<(), ValidationError> {
    for change in changes {
        record.set(change.field, &change.new)?;
    }
    Ok(())
}
