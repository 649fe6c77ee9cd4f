//! Storage contract for Censo survey records.
//!
//! Defines the [`store::RecordStore`] trait satisfied by the flat-file and
//! Postgres backends, the per-field change history types, the typed diff
//! that drives history emission, and an in-memory store for tests.

pub mod diff;
pub mod error;
pub mod history;
pub mod stats;
pub mod store;
pub mod testing;

pub use diff::{FieldChange, RecordPatch};
pub use error::StoreError;
pub use history::ChangeEntry;
pub use stats::StoreStatistics;
pub use store::RecordStore;

/// Store-assigned record identifier (relational backend only).
pub type RecordId = i64;

/// Acting user recorded on history entries when none is supplied.
pub const DEFAULT_ACTOR: &str = "Sistema";
