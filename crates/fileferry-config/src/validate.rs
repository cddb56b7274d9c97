//! Up-front configuration validation
//!
//! Validation is a declarative list of (field path, predicate, message) rules
//! evaluated in one pass. Every failing rule produces an issue; validation
//! never stops at the first problem, so a run rejected for configuration
//! reasons reports everything that needs fixing at once.

use crate::{Config, NotifyTrigger, TaskSpec};
use fileferry_types::{RetryAttempts, RetryDelay};
use regex::Regex;

/// One problem found by the validation pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    /// Path of the offending field, e.g. `tasks[2].match_pattern`
    pub field: String,
    /// What is wrong with the value
    pub message: String,
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// A top-level validation rule
struct Rule {
    field: &'static str,
    check: fn(&Config) -> bool,
    message: &'static str,
}

/// Rules over the whole configuration; the predicate returns true when valid
const RULES: &[Rule] = &[
    Rule {
        field: "execution.retry.attempts",
        check: |config| RetryAttempts::new(config.execution.retry.attempts.get()).is_ok(),
        message: "must be between 1 and 25",
    },
    Rule {
        field: "execution.retry.delay",
        check: |config| RetryDelay::new(config.execution.retry.delay.get()).is_ok(),
        message: "must be between 1 and 30 seconds",
    },
    Rule {
        field: "logging.directory",
        check: |config| !config.logging.directory.as_os_str().is_empty(),
        message: "must not be empty",
    },
    Rule {
        field: "logging.formats",
        check: |config| !config.logging.formats.is_empty(),
        message: "at least one artifact format is required",
    },
    Rule {
        field: "notification.smtp",
        check: |config| {
            config.notification.trigger == NotifyTrigger::Never
                || config.notification.smtp.is_some()
        },
        message: "smtp settings are required when the trigger is not 'never'",
    },
    Rule {
        field: "event_log.source",
        check: |config| !config.event_log.enabled || !config.event_log.source.is_empty(),
        message: "must not be empty while the event log is enabled",
    },
];

/// A per-task validation rule
struct TaskRule {
    field: &'static str,
    check: fn(&TaskSpec) -> bool,
    message: &'static str,
}

const TASK_RULES: &[TaskRule] = &[
    TaskRule {
        field: "source_folder",
        check: |task| !task.source_folder.as_os_str().is_empty(),
        message: "must not be empty",
    },
    TaskRule {
        field: "dest_folder",
        check: |task| !task.dest_folder.as_os_str().is_empty(),
        message: "must not be empty",
    },
    TaskRule {
        field: "match_pattern",
        check: |task| Regex::new(&task.match_pattern).is_ok(),
        message: "is not a valid regular expression",
    },
];

/// Validate a configuration, returning every issue found
pub fn validate(config: &Config) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    for rule in RULES {
        if !(rule.check)(config) {
            issues.push(ValidationIssue {
                field: rule.field.to_string(),
                message: rule.message.to_string(),
            });
        }
    }

    for (index, task) in config.tasks.iter().enumerate() {
        for rule in TASK_RULES {
            if !(rule.check)(task) {
                issues.push(ValidationIssue {
                    field: format!("tasks[{index}].{}", rule.field),
                    message: rule.message.to_string(),
                });
            }
        }
    }

    if let Some(smtp) = &config.notification.smtp {
        if smtp.host.is_empty() {
            issues.push(ValidationIssue {
                field: "notification.smtp.host".to_string(),
                message: "must not be empty".to_string(),
            });
        }
        if smtp.from.is_empty() {
            issues.push(ValidationIssue {
                field: "notification.smtp.from".to_string(),
                message: "must not be empty".to_string(),
            });
        }
        if smtp.to.is_empty() {
            issues.push(ValidationIssue {
                field: "notification.smtp.to".to_string(),
                message: "at least one recipient is required".to_string(),
            });
        }
    }

    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SmtpConfig;
    use fileferry_types::TransferAction;
    use std::path::PathBuf;

    fn task(pattern: &str) -> TaskSpec {
        TaskSpec {
            action: TransferAction::Copy,
            source_folder: PathBuf::from("/in"),
            match_pattern: pattern.to_string(),
            recurse: false,
            max_age_days: 0,
            dest_folder: PathBuf::from("/out"),
            overwrite: false,
        }
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate(&Config::default()).is_empty());
    }

    #[test]
    fn test_invalid_pattern_is_reported_with_index() {
        let mut config = Config::default();
        config.tasks.push(task(".*"));
        config.tasks.push(task("[unclosed"));

        let issues = validate(&config);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].field, "tasks[1].match_pattern");
    }

    #[test]
    fn test_all_issues_are_collected() {
        let mut config = Config::default();
        config.logging.directory = PathBuf::new();
        config.logging.formats.clear();
        let mut bad_task = task("[broken");
        bad_task.source_folder = PathBuf::new();
        config.tasks.push(bad_task);

        let issues = validate(&config);
        let fields: Vec<&str> = issues.iter().map(|i| i.field.as_str()).collect();
        assert!(fields.contains(&"logging.directory"));
        assert!(fields.contains(&"logging.formats"));
        assert!(fields.contains(&"tasks[0].source_folder"));
        assert!(fields.contains(&"tasks[0].match_pattern"));
        assert_eq!(issues.len(), 4);
    }

    #[test]
    fn test_trigger_requires_smtp() {
        let mut config = Config::default();
        config.notification.trigger = NotifyTrigger::OnError;

        let issues = validate(&config);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].field, "notification.smtp");

        config.notification.smtp = Some(SmtpConfig {
            host: "mail.example.com".to_string(),
            port: 587,
            username: None,
            password: None,
            from: "ferry@example.com".to_string(),
            to: vec!["ops@example.com".to_string()],
        });
        assert!(validate(&config).is_empty());
    }

    #[test]
    fn test_smtp_recipients_required() {
        let mut config = Config::default();
        config.notification.trigger = NotifyTrigger::Always;
        config.notification.smtp = Some(SmtpConfig {
            host: "mail.example.com".to_string(),
            port: 587,
            username: None,
            password: None,
            from: "ferry@example.com".to_string(),
            to: Vec::new(),
        });

        let issues = validate(&config);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].field, "notification.smtp.to");
    }

    #[test]
    fn test_retry_bounds_checked_after_deserialization() {
        // serde bypasses the newtype constructors, so out-of-range values can
        // only be caught here
        let yaml = r"
execution:
  retry:
    attempts: 40
    delay: 0
";
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        let issues = validate(&config);
        let fields: Vec<&str> = issues.iter().map(|i| i.field.as_str()).collect();
        assert!(fields.contains(&"execution.retry.attempts"));
        assert!(fields.contains(&"execution.retry.delay"));
    }
}
