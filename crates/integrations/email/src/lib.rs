//! SMTP notification adapter.
//!
//! Sends the submitter a confirmation and the administrator a heads-up
//! after each survey submission. Notifications are best effort: when the
//! mail environment is not configured, [`MailConfig::from_env`] yields
//! `None` and the caller simply skips sending.

pub mod config;
pub mod notify;

pub use config::MailConfig;
pub use notify::{NotifyError, Notifier};
