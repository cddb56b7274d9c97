//! Single task execution
//!
//! Runs one configured task end to end: validates its folders, selects the
//! candidate files, applies the retried copy-or-move action to each, and
//! records one outcome per file. A file failure never aborts the task; a
//! failure outside the per-file loop abandons the task with a single system
//! error and leaves sibling tasks untouched.

use crate::retry::Retrier;
use crate::selector::FileSelector;
use fileferry_config::TaskSpec;
use fileferry_types::{
    event_code, ActionOutcome, Error, FileTransfer, InfoEvent, Result, RetryPolicy, SystemError,
    TaskReport,
};
use regex::Regex;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, error, info};

/// Executes one task and produces its isolated result buffers
#[derive(Clone)]
pub struct TaskRunner {
    transfer: Arc<dyn FileTransfer>,
    retry: RetryPolicy,
    selector: FileSelector,
}

impl TaskRunner {
    /// Create a new task runner
    pub fn new(transfer: Arc<dyn FileTransfer>, retry: RetryPolicy) -> Self {
        Self {
            transfer,
            retry,
            selector: FileSelector::new(),
        }
    }

    /// Run the task to completion
    ///
    /// Always returns a report; failures are captured in its buffers rather
    /// than propagated.
    pub async fn run(&self, spec: &TaskSpec) -> TaskReport {
        let mut report = TaskReport::new();

        if let Err(e) = self.run_inner(spec, &mut report).await {
            error!("Task {} abandoned: {}", spec.describe(), e);
            report.system_errors.push(SystemError::new(format!(
                "Task {} abandoned: {}",
                spec.describe(),
                e
            )));
        }

        report
    }

    async fn run_inner(&self, spec: &TaskSpec, report: &mut TaskReport) -> Result<()> {
        Self::require_directory(&spec.source_folder).await?;
        Self::require_directory(&spec.dest_folder).await?;

        // Pattern validity is enforced at configuration load; a failure here
        // means the task bypassed that check
        let pattern = Regex::new(&spec.match_pattern)
            .map_err(|e| Error::config(format!("Invalid match pattern: {e}")))?;

        let candidates =
            self.selector
                .select(&spec.source_folder, &pattern, spec.recurse, spec.max_age_days)?;

        let message = format!(
            "Task {}: found {} file(s) to process",
            spec.describe(),
            candidates.len()
        );
        info!("{message}");
        report
            .events
            .push(InfoEvent::info(event_code::FILES_SELECTED, message));

        // No matching files is a normal outcome, not an error
        if candidates.is_empty() {
            return Ok(());
        }

        let retrier = Retrier::new(self.retry);
        for candidate in candidates {
            let destination = spec.dest_folder.join(&candidate.name);

            let result = retrier
                .run(|| {
                    self.transfer
                        .transfer(spec.action, &candidate.path, &destination, spec.overwrite)
                })
                .await;

            let outcome = match result {
                Ok(()) => {
                    debug!(
                        "{} '{}' -> '{}'",
                        spec.action,
                        candidate.path.display(),
                        destination.display()
                    );
                    ActionOutcome::succeeded(
                        spec.action,
                        candidate.path.clone(),
                        destination,
                        spec.overwrite,
                    )
                }
                Err(e) => {
                    error!(
                        "Failed to {} '{}' -> '{}': {}",
                        spec.action,
                        candidate.path.display(),
                        destination.display(),
                        e
                    );
                    ActionOutcome::failed(
                        spec.action,
                        candidate.path.clone(),
                        destination,
                        spec.overwrite,
                        e.to_string(),
                    )
                }
            };
            report.outcomes.push(outcome);
        }

        Ok(())
    }

    async fn require_directory(path: &Path) -> Result<()> {
        match tokio::fs::metadata(path).await {
            Ok(metadata) if metadata.is_dir() => Ok(()),
            _ => Err(Error::DirectoryNotFound {
                path: path.to_path_buf(),
            }),
        }
    }
}
