//! Core model types for the Censo survey system.
//!
//! This crate defines the [`SurveyRecord`] entity, the typed
//! [`field::Field`] registry that fixes the 15-column wire layout shared by
//! the flat-file backend and the exports, submission validation, and the
//! delimited-text codec.

pub mod csv;
pub mod error;
pub mod field;
pub mod model;
pub mod submission;

pub use error::ValidationError;
pub use field::Field;
pub use model::SurveyRecord;
pub use submission::SurveySubmission;

/// Timestamp format used on the wire (flat file, exports, diffs).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
