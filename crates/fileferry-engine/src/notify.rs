//! Notification decision and envelope construction
//!
//! Evaluates the configured trigger policy against the run's summary counts
//! and, when a notification fires, builds the transport-independent envelope:
//! subject, priority, rendered body, and deduplicated attachment list.

use fileferry_config::{NotificationConfig, NotifyTrigger};
use fileferry_types::{NotificationEnvelope, NotifyPriority, RunReport, RunSummary};
use std::path::PathBuf;

/// Decide whether the run's notification should be sent
pub fn should_notify(trigger: NotifyTrigger, summary: &RunSummary) -> bool {
    match trigger {
        NotifyTrigger::Never => false,
        NotifyTrigger::Always => true,
        NotifyTrigger::OnError => summary.has_errors(),
        NotifyTrigger::OnErrorOrAction => summary.has_errors() || summary.total_actions > 0,
    }
}

/// Build the notification envelope for a finished run
///
/// The subject always encodes the total action count; when any error occurred
/// it gains a leading error segment and the priority is raised to high.
pub fn build_envelope(
    config: &NotificationConfig,
    report: &RunReport,
    attachments: &[PathBuf],
) -> NotificationEnvelope {
    let summary = report.summary();

    let mut subject = String::new();
    if let Some(prefix) = &config.subject_prefix {
        subject.push_str(prefix);
        subject.push_str(": ");
    }
    if summary.has_errors() {
        subject.push_str(&format!("{} error(s), ", summary.error_count()));
    }
    subject.push_str(&format!("{} file action(s)", summary.total_actions));

    let priority = if summary.has_errors() {
        NotifyPriority::High
    } else {
        NotifyPriority::Normal
    };

    NotificationEnvelope {
        subject,
        priority,
        body: render_body(report, &summary),
        attachments: dedup_paths(attachments),
    }
}

fn render_body(report: &RunReport, summary: &RunSummary) -> String {
    let mut body = format!(
        "Transfer run started {} and took {:.1}s.\n\n\
         File actions: {}\nAction errors: {}\nSystem errors: {}\n",
        report.started_at.format("%Y-%m-%d %H:%M:%S"),
        report.duration.as_secs_f64(),
        summary.total_actions,
        summary.action_errors,
        summary.system_errors,
    );

    if summary.action_errors > 0 {
        body.push_str("\nFailed actions:\n");
        for outcome in report.failed_outcomes() {
            body.push_str(&format!(
                "  {} '{}' -> '{}': {}\n",
                outcome.action,
                outcome.source.display(),
                outcome.destination.display(),
                outcome.error.as_deref().unwrap_or("unknown error"),
            ));
        }
    }

    if summary.system_errors > 0 {
        body.push_str("\nSystem errors:\n");
        for error in &report.system_errors {
            body.push_str(&format!("  {}\n", error.message));
        }
    }

    body
}

fn dedup_paths(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut seen = Vec::with_capacity(paths.len());
    for path in paths {
        if !seen.contains(path) {
            seen.push(path.clone());
        }
    }
    seen
}
