//! Configuration management system for fileferry
//!
//! This crate provides the configuration model for a transfer run: the task
//! list, the execution policy, the logging policy, the notification policy,
//! and the event log settings. It supports multiple configuration formats
//! (YAML, TOML, JSON), environment variable overrides, secret references, and
//! an up-front validation pass that reports every issue at once.
//!
//! # Examples
//!
//! ```rust
//! use fileferry_config::{Config, ConfigBuilder};
//!
//! let config = ConfigBuilder::new()
//!     .add_defaults()
//!     .add_env_prefix("FILEFERRY")
//!     .build()
//!     .expect("Failed to load configuration");
//!
//! assert!(config.tasks.is_empty());
//! ```

#![deny(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

use fileferry_types::{RetryPolicy, TransferAction};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub mod builder;
pub mod error;
pub mod loader;
pub mod secret;
pub mod validate;

pub use builder::ConfigBuilder;
pub use error::{ConfigError, ConfigResult};
pub use loader::ConfigLoader;
pub use secret::{resolve_value, EnvSecretResolver};
pub use validate::{validate, ValidationIssue};

/// Main configuration structure for a fileferry run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// The configured transfer tasks, in execution order
    #[serde(default)]
    pub tasks: Vec<TaskSpec>,
    /// Execution policy: concurrency and retry
    #[serde(default)]
    pub execution: ExecutionConfig,
    /// Log artifact policy
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Notification policy
    #[serde(default)]
    pub notification: NotificationConfig,
    /// System event log settings
    #[serde(default)]
    pub event_log: EventLogConfig,
}

/// One configured copy-or-move task
///
/// Immutable once loaded; the orchestrator owns the task list for the run's
/// lifetime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskSpec {
    /// The action applied to every selected file
    pub action: TransferAction,
    /// Folder the task reads from
    pub source_folder: PathBuf,
    /// Regular expression matched against each file name
    #[serde(default = "default_match_pattern")]
    pub match_pattern: String,
    /// Whether to enumerate subfolders of the source folder
    #[serde(default)]
    pub recurse: bool,
    /// Maximum file age in days; 0 means no age filtering
    #[serde(default)]
    pub max_age_days: u32,
    /// Folder the task writes into
    pub dest_folder: PathBuf,
    /// Whether an existing destination file may be replaced
    #[serde(default)]
    pub overwrite: bool,
}

impl TaskSpec {
    /// Short description of the task used in diagnostics and system errors
    pub fn describe(&self) -> String {
        format!(
            "{} '{}' -> '{}'",
            self.action,
            self.source_folder.display(),
            self.dest_folder.display()
        )
    }
}

fn default_match_pattern() -> String {
    ".*".to_string()
}

/// Execution policy configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionConfig {
    /// Maximum number of tasks running at once; 0 or 1 means sequential
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,
    /// Retry policy for each file action
    #[serde(default)]
    pub retry: RetryPolicy,
}

fn default_max_concurrency() -> usize {
    1
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            max_concurrency: 1,
            retry: RetryPolicy::default(),
        }
    }
}

/// Format of a rendered log artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Pretty-printed JSON array
    Json,
    /// One JSON record per line
    Jsonl,
}

impl LogFormat {
    /// File extension for the format
    pub fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Jsonl => "jsonl",
        }
    }
}

/// Log artifact policy configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Directory where log artifacts are written
    #[serde(default = "default_log_directory")]
    pub directory: PathBuf,
    /// Persist a system errors artifact when any system error occurred
    #[serde(default = "default_true")]
    pub write_system_errors: bool,
    /// Persist an artifact with every action outcome
    #[serde(default)]
    pub write_all_actions: bool,
    /// Persist an artifact with only the failed action outcomes
    ///
    /// Ignored whenever `write_all_actions` applies; the broader artifact
    /// supersedes the narrower one.
    #[serde(default = "default_true")]
    pub write_only_action_errors: bool,
    /// Days to keep old artifacts; 0 disables deletion
    #[serde(default)]
    pub retention_days: u32,
    /// Formats to render each artifact in
    #[serde(default = "default_formats")]
    pub formats: Vec<LogFormat>,
}

fn default_log_directory() -> PathBuf {
    PathBuf::from("logs")
}

fn default_true() -> bool {
    true
}

fn default_formats() -> Vec<LogFormat> {
    vec![LogFormat::Json]
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("logs"),
            write_system_errors: true,
            write_all_actions: false,
            write_only_action_errors: true,
            retention_days: 0,
            formats: vec![LogFormat::Json],
        }
    }
}

/// Rule determining whether a run's notification is sent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotifyTrigger {
    /// Never send a notification
    Never,
    /// Send a notification after every run
    Always,
    /// Send only when an action error or system error occurred
    OnError,
    /// Send when any error occurred or any file action was attempted
    OnErrorOrAction,
}

impl Default for NotifyTrigger {
    fn default() -> Self {
        Self::Never
    }
}

/// Notification policy configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotificationConfig {
    /// When to send the run notification
    #[serde(default)]
    pub trigger: NotifyTrigger,
    /// Optional prefix prepended to the notification subject
    #[serde(default)]
    pub subject_prefix: Option<String>,
    /// SMTP transport settings, required unless the trigger is `never`
    #[serde(default)]
    pub smtp: Option<SmtpConfig>,
}

/// SMTP transport settings
///
/// The password may be a secret reference of the form `${env:NAME}`, resolved
/// at transport construction time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmtpConfig {
    /// Mail relay host name
    pub host: String,
    /// Mail relay port
    #[serde(default = "default_smtp_port")]
    pub port: u16,
    /// Optional relay user name
    #[serde(default)]
    pub username: Option<String>,
    /// Optional relay password or secret reference
    #[serde(default)]
    pub password: Option<String>,
    /// Sender address
    pub from: String,
    /// Recipient addresses
    pub to: Vec<String>,
}

fn default_smtp_port() -> u16 {
    587
}

/// System event log settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventLogConfig {
    /// Whether operational events are written at all
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Source name stamped on every event
    #[serde(default = "default_event_source")]
    pub source: String,
    /// Logical log the events belong to
    #[serde(default = "default_event_log_name")]
    pub log_name: String,
    /// Event log file; defaults to `events.jsonl` under the log directory
    #[serde(default)]
    pub path: Option<PathBuf>,
}

fn default_event_source() -> String {
    "fileferry".to_string()
}

fn default_event_log_name() -> String {
    "application".to_string()
}

impl Default for EventLogConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            source: "fileferry".to_string(),
            log_name: "application".to_string(),
            path: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.tasks.is_empty());
        assert_eq!(config.execution.max_concurrency, 1);
        assert_eq!(config.execution.retry.attempts.get(), 5);
        assert!(config.logging.write_system_errors);
        assert!(!config.logging.write_all_actions);
        assert_eq!(config.logging.retention_days, 0);
        assert_eq!(config.notification.trigger, NotifyTrigger::Never);
        assert!(config.event_log.enabled);
    }

    #[test]
    fn test_task_spec_deserialization_defaults() {
        let yaml = r"
action: copy
source_folder: /data/in
dest_folder: /data/out
";
        let task: TaskSpec = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(task.action, TransferAction::Copy);
        assert_eq!(task.match_pattern, ".*");
        assert!(!task.recurse);
        assert_eq!(task.max_age_days, 0);
        assert!(!task.overwrite);
    }

    #[test]
    fn test_trigger_serialization() {
        let yaml = serde_yaml::to_string(&NotifyTrigger::OnErrorOrAction).unwrap();
        assert_eq!(yaml.trim(), "on_error_or_action");
        let back: NotifyTrigger = serde_yaml::from_str("on_error").unwrap();
        assert_eq!(back, NotifyTrigger::OnError);
    }

    #[test]
    fn test_log_format_extension() {
        assert_eq!(LogFormat::Json.extension(), "json");
        assert_eq!(LogFormat::Jsonl.extension(), "jsonl");
    }

    #[test]
    fn test_task_describe() {
        let task = TaskSpec {
            action: TransferAction::Move,
            source_folder: PathBuf::from("/in"),
            match_pattern: ".*".to_string(),
            recurse: false,
            max_age_days: 0,
            dest_folder: PathBuf::from("/out"),
            overwrite: false,
        };
        assert_eq!(task.describe(), "move '/in' -> '/out'");
    }
}
