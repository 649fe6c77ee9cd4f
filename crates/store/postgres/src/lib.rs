//! PostgreSQL backend.
//!
//! The editing-capable store: stable identifiers, transactional updates
//! with change history, cascading deletes, and server-side aggregation for
//! statistics. Schema migrations run at connection time.

mod config;
mod migrations;
mod store;

pub use config::PostgresConfig;
pub use store::PostgresStore;
