//! Append-only flat-file backend.
//!
//! The fallback store used when no relational backend is reachable: a
//! single delimited text file with a fixed 15-column header, one row per
//! record, plus a rotating backup directory. Records have no stable
//! identity here, so the identity-dependent operations report themselves
//! as unsupported.

mod backup;
mod config;
mod store;

pub use config::FlatFileConfig;
pub use store::FlatFileStore;
