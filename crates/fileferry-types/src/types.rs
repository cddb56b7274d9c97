//! Core data types for fileferry
//!
//! This module provides the record types produced by a transfer run: per-file
//! action outcomes, task- and run-level system errors, operational events, and
//! the aggregated run report consumed by the reporting and notification layers.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::{Duration, SystemTime};

/// Well-known operational event codes written to the system event log
pub mod event_code {
    /// A transfer run started
    pub const RUN_STARTED: u32 = 1000;
    /// A task finished selecting its candidate files
    pub const FILES_SELECTED: u32 = 1001;
    /// A transfer run completed
    pub const RUN_COMPLETED: u32 = 1002;
}

/// File transfer action applied to each selected file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransferAction {
    /// Copy the file, leaving the source in place
    Copy,
    /// Move the file, removing the source after transfer
    Move,
}

impl std::fmt::Display for TransferAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Copy => write!(f, "copy"),
            Self::Move => write!(f, "move"),
        }
    }
}

/// Severity of an operational event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventSeverity {
    /// Informational event
    Information,
    /// Warning event
    Warning,
    /// Error event
    Error,
}

/// A file selected for processing by a task
///
/// Produced by the selector and consumed once by the task runner; not retained
/// after the action completes.
#[derive(Debug, Clone)]
pub struct FileCandidate {
    /// Full path of the source file
    pub path: PathBuf,
    /// File name without any directory component
    pub name: String,
    /// Creation time of the file (modification time where creation is unavailable)
    pub created: DateTime<Local>,
}

/// Outcome of one file action
///
/// Exactly one record exists per processed candidate, whether the action
/// succeeded or failed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionOutcome {
    /// When the action finished
    pub timestamp: DateTime<Local>,
    /// The action that was applied
    pub action: TransferAction,
    /// Source file path
    pub source: PathBuf,
    /// Destination file path
    pub destination: PathBuf,
    /// Whether overwriting an existing destination was allowed
    pub overwrite: bool,
    /// Whether the action succeeded
    pub success: bool,
    /// Error message if the action failed
    pub error: Option<String>,
}

impl ActionOutcome {
    /// Create a successful outcome record
    pub fn succeeded(
        action: TransferAction,
        source: PathBuf,
        destination: PathBuf,
        overwrite: bool,
    ) -> Self {
        Self {
            timestamp: Local::now(),
            action,
            source,
            destination,
            overwrite,
            success: true,
            error: None,
        }
    }

    /// Create a failed outcome record
    pub fn failed(
        action: TransferAction,
        source: PathBuf,
        destination: PathBuf,
        overwrite: bool,
        error: String,
    ) -> Self {
        Self {
            timestamp: Local::now(),
            action,
            source,
            destination,
            overwrite,
            success: false,
            error: Some(error),
        }
    }

    /// Check if this outcome records a failure
    pub fn is_failure(&self) -> bool {
        !self.success
    }
}

/// A failure that prevented a task or the run from completing normally
///
/// Distinct from a single file's failure: a missing folder, an invalid
/// configuration, or a reporting sink failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemError {
    /// When the failure occurred
    pub timestamp: DateTime<Local>,
    /// Description of the failure
    pub message: String,
}

impl SystemError {
    /// Create a new system error record
    pub fn new<S: Into<String>>(message: S) -> Self {
        Self {
            timestamp: Local::now(),
            message: message.into(),
        }
    }
}

/// An operational event destined for the system event log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InfoEvent {
    /// When the event occurred
    pub timestamp: DateTime<Local>,
    /// Event message
    pub message: String,
    /// Event severity
    pub severity: EventSeverity,
    /// Numeric event code
    pub code: u32,
}

impl InfoEvent {
    /// Create an informational event
    pub fn info<S: Into<String>>(code: u32, message: S) -> Self {
        Self {
            timestamp: Local::now(),
            message: message.into(),
            severity: EventSeverity::Information,
            code,
        }
    }

    /// Create a warning event
    pub fn warning<S: Into<String>>(code: u32, message: S) -> Self {
        Self {
            timestamp: Local::now(),
            message: message.into(),
            severity: EventSeverity::Warning,
            code,
        }
    }
}

/// Result bundle produced by running a single task
///
/// Each task owns its buffers exclusively while running; the orchestrator
/// merges them into the run report after the task completes.
#[derive(Debug, Clone, Default)]
pub struct TaskReport {
    /// One outcome per processed file
    pub outcomes: Vec<ActionOutcome>,
    /// Task-level failures, if any
    pub system_errors: Vec<SystemError>,
    /// Operational events emitted by the task
    pub events: Vec<InfoEvent>,
}

impl TaskReport {
    /// Create an empty task report
    pub fn new() -> Self {
        Self::default()
    }
}

/// Aggregated report of a whole transfer run
///
/// Counts are always derived from the underlying collections, so they cannot
/// drift from the records they describe.
#[derive(Debug, Clone)]
pub struct RunReport {
    /// When the run started
    pub started_at: DateTime<Local>,
    /// Total wall-clock duration of the run
    pub duration: Duration,
    /// All file action outcomes, in configuration order
    pub outcomes: Vec<ActionOutcome>,
    /// All task- and run-level system errors, in configuration order
    pub system_errors: Vec<SystemError>,
    /// All operational events, in configuration order
    pub events: Vec<InfoEvent>,
}

impl RunReport {
    /// Create an empty report with the given start time
    pub fn new(started_at: DateTime<Local>) -> Self {
        Self {
            started_at,
            duration: Duration::ZERO,
            outcomes: Vec::new(),
            system_errors: Vec::new(),
            events: Vec::new(),
        }
    }

    /// Append one task's buffers to the report
    pub fn merge_task(&mut self, task: TaskReport) {
        self.outcomes.extend(task.outcomes);
        self.system_errors.extend(task.system_errors);
        self.events.extend(task.events);
    }

    /// Record a run-level system error
    pub fn push_system_error<S: Into<String>>(&mut self, message: S) {
        self.system_errors.push(SystemError::new(message));
    }

    /// Record a run-level operational event
    pub fn push_event(&mut self, event: InfoEvent) {
        self.events.push(event);
    }

    /// Total number of file actions attempted
    pub fn total_actions(&self) -> usize {
        self.outcomes.len()
    }

    /// Number of file actions that failed
    pub fn action_errors(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_failure()).count()
    }

    /// Number of system errors recorded
    pub fn system_error_count(&self) -> usize {
        self.system_errors.len()
    }

    /// Iterate over the failed action outcomes
    pub fn failed_outcomes(&self) -> impl Iterator<Item = &ActionOutcome> {
        self.outcomes.iter().filter(|o| o.is_failure())
    }

    /// Derive the summary counts for this report
    pub fn summary(&self) -> RunSummary {
        RunSummary {
            total_actions: self.total_actions(),
            action_errors: self.action_errors(),
            system_errors: self.system_error_count(),
        }
    }

    /// Whether the run failed for exit-status purposes
    ///
    /// A run fails exactly when its system error collection is non-empty.
    pub fn is_failure(&self) -> bool {
        !self.system_errors.is_empty()
    }
}

/// Summary counts derived from a run report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Total number of file actions attempted
    pub total_actions: usize,
    /// Number of file actions that failed
    pub action_errors: usize,
    /// Number of system errors recorded
    pub system_errors: usize,
}

impl RunSummary {
    /// Whether any error of either kind occurred
    pub fn has_errors(&self) -> bool {
        self.action_errors > 0 || self.system_errors > 0
    }

    /// Total number of errors of both kinds
    pub fn error_count(&self) -> usize {
        self.action_errors + self.system_errors
    }
}

/// Kind of log artifact a run can produce
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    /// All system error records
    SystemErrors,
    /// Every action outcome
    AllActions,
    /// Only the failed action outcomes
    ActionErrors,
}

/// Records carried by a log artifact
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ArtifactRecords {
    /// Action outcome records
    Actions(Vec<ActionOutcome>),
    /// System error records
    Errors(Vec<SystemError>),
}

impl ArtifactRecords {
    /// Number of records in the artifact
    pub fn len(&self) -> usize {
        match self {
            Self::Actions(records) => records.len(),
            Self::Errors(records) => records.len(),
        }
    }

    /// Whether the artifact carries no records
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A log artifact requested by the reporting policy
#[derive(Debug, Clone)]
pub struct Artifact {
    /// Kind of artifact
    pub kind: ArtifactKind,
    /// Base file name (without extension) for the rendered files
    pub file_stem: String,
    /// The records to persist
    pub records: ArtifactRecords,
}

/// An existing artifact file found in the log directory
#[derive(Debug, Clone)]
pub struct ArtifactFile {
    /// Path of the file
    pub path: PathBuf,
    /// Last modification time
    pub modified: SystemTime,
}

/// Priority of a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyPriority {
    /// Normal priority
    Normal,
    /// High priority, used when the run recorded errors
    High,
}

/// Content of a run notification, independent of the transport
#[derive(Debug, Clone)]
pub struct NotificationEnvelope {
    /// Subject line encoding the run's counts
    pub subject: String,
    /// Message priority
    pub priority: NotifyPriority,
    /// Rendered message body
    pub body: String,
    /// Artifact files to attach, deduplicated
    pub attachments: Vec<PathBuf>,
}
