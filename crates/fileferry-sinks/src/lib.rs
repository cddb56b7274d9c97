//! Log, event, and notification sinks for fileferry
//!
//! Implementations of the collaborator traits consumed by the orchestration
//! engine: a JSON artifact writer for run logs, a JSON-lines system event log,
//! and an SMTP notification transport.

#![deny(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod artifact;
pub mod eventlog;
pub mod mailer;

pub use artifact::JsonArtifactWriter;
pub use eventlog::JsonlEventLog;
pub use mailer::SmtpNotifier;
