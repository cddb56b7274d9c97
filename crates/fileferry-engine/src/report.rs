//! Report aggregation and artifact policy
//!
//! Pure decision logic over a finished run report: which log artifacts to
//! produce, and which existing log files have outlived their retention. No
//! I/O happens here; the sink layer renders and deletes files.

use fileferry_config::LoggingConfig;
use fileferry_types::{
    Artifact, ArtifactFile, ArtifactKind, ArtifactRecords, RunReport, RunSummary,
};
use std::path::PathBuf;
use std::time::{Duration, SystemTime};

const SECONDS_PER_DAY: u64 = 24 * 60 * 60;

/// Derive the summary counts for a run report
pub fn summarize(report: &RunReport) -> RunSummary {
    report.summary()
}

/// Decide which log artifacts the run should persist
///
/// The rules are independent flags, with one exception that must be preserved
/// exactly: when both action artifacts are enabled, `write_all_actions`
/// supersedes `write_only_action_errors`. The overlap between the two flags is
/// a smell inherited from the configuration surface, not a meaningful choice.
pub fn decide_artifacts(report: &RunReport, policy: &LoggingConfig) -> Vec<Artifact> {
    let mut artifacts = Vec::new();
    let summary = report.summary();

    if policy.write_system_errors && summary.system_errors > 0 {
        artifacts.push(Artifact {
            kind: ArtifactKind::SystemErrors,
            file_stem: "system-errors".to_string(),
            records: ArtifactRecords::Errors(report.system_errors.clone()),
        });
    }

    if policy.write_all_actions && summary.total_actions > 0 {
        // The suffix is cosmetic; the artifact always carries every outcome
        let file_stem = if summary.action_errors > 0 {
            "actions-with-errors"
        } else {
            "actions"
        };
        artifacts.push(Artifact {
            kind: ArtifactKind::AllActions,
            file_stem: file_stem.to_string(),
            records: ArtifactRecords::Actions(report.outcomes.clone()),
        });
    } else if policy.write_only_action_errors && summary.action_errors > 0 {
        artifacts.push(Artifact {
            kind: ArtifactKind::ActionErrors,
            file_stem: "action-errors".to_string(),
            records: ArtifactRecords::Actions(report.failed_outcomes().cloned().collect()),
        });
    }

    artifacts
}

/// Select log files that have outlived the retention window
///
/// A file whose modification time precedes `now - retention_days` is a
/// deletion candidate. `retention_days = 0` disables deletion entirely.
pub fn select_expired_logs(
    existing: &[ArtifactFile],
    now: SystemTime,
    retention_days: u32,
) -> Vec<PathBuf> {
    if retention_days == 0 {
        return Vec::new();
    }

    let window = Duration::from_secs(u64::from(retention_days) * SECONDS_PER_DAY);
    let Some(cutoff) = now.checked_sub(window) else {
        return Vec::new();
    };

    existing
        .iter()
        .filter(|file| file.modified < cutoff)
        .map(|file| file.path.clone())
        .collect()
}
