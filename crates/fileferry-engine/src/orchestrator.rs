//! Run-level task orchestration
//!
//! Runs every configured task either strictly sequentially or on a bounded
//! worker pool, then merges each task's isolated buffers into one run report.
//! The merge always walks tasks in configuration order, so the report's record
//! order is identical no matter how task completion interleaves under
//! concurrency. No two tasks ever share a mutable buffer.

use crate::runner::TaskRunner;
use chrono::Local;
use fileferry_config::TaskSpec;
use fileferry_types::{
    event_code, FileTransfer, InfoEvent, RetryPolicy, RunReport, SystemError, TaskReport,
};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

/// Orchestrates a whole run over the configured task list
pub struct Orchestrator {
    runner: TaskRunner,
}

impl Orchestrator {
    /// Create a new orchestrator
    pub fn new(transfer: Arc<dyn FileTransfer>, retry: RetryPolicy) -> Self {
        Self {
            runner: TaskRunner::new(transfer, retry),
        }
    }

    /// Run all tasks and build the merged run report
    ///
    /// With `max_concurrency <= 1` tasks run sequentially in configuration
    /// order. Otherwise a worker pool of `min(max_concurrency, tasks)` runs
    /// them; each task's file processing stays sequential internally.
    pub async fn run_all(&self, specs: &[TaskSpec], max_concurrency: usize) -> RunReport {
        let started_at = Local::now();
        let clock = Instant::now();
        let mut report = RunReport::new(started_at);

        report.push_event(InfoEvent::info(
            event_code::RUN_STARTED,
            format!("Run started with {} task(s)", specs.len()),
        ));

        if specs.is_empty() {
            report.duration = clock.elapsed();
            return report;
        }

        let task_reports = if max_concurrency <= 1 {
            self.run_sequential(specs).await
        } else {
            self.run_pooled(specs, max_concurrency).await
        };

        for task_report in task_reports {
            report.merge_task(task_report);
        }

        report.duration = clock.elapsed();
        info!(
            "Run finished: {} action(s), {} action error(s), {} system error(s) in {:.1}s",
            report.total_actions(),
            report.action_errors(),
            report.system_error_count(),
            report.duration.as_secs_f64()
        );
        report
    }

    async fn run_sequential(&self, specs: &[TaskSpec]) -> Vec<TaskReport> {
        let mut reports = Vec::with_capacity(specs.len());
        for (index, spec) in specs.iter().enumerate() {
            debug!("Running task {} of {}: {}", index + 1, specs.len(), spec.describe());
            reports.push(self.runner.run(spec).await);
        }
        reports
    }

    async fn run_pooled(&self, specs: &[TaskSpec], max_concurrency: usize) -> Vec<TaskReport> {
        let pool_size = max_concurrency.min(specs.len());
        let semaphore = Arc::new(Semaphore::new(pool_size));
        debug!(
            "Running {} task(s) on a pool of {} worker(s)",
            specs.len(),
            pool_size
        );

        let mut handles = Vec::with_capacity(specs.len());
        for spec in specs.iter().cloned() {
            let runner = self.runner.clone();
            let semaphore = Arc::clone(&semaphore);

            handles.push(tokio::spawn(async move {
                let _permit = match semaphore.acquire_owned().await {
                    Ok(permit) => permit,
                    Err(e) => {
                        let mut failed = TaskReport::new();
                        failed.system_errors.push(SystemError::new(format!(
                            "Task {} never started: {}",
                            spec.describe(),
                            e
                        )));
                        return failed;
                    }
                };
                runner.run(&spec).await
            }));
        }

        // Collect in spawn order, which is configuration order; completion
        // order under the pool is irrelevant to the merged report
        let mut reports = Vec::with_capacity(handles.len());
        for (index, handle) in handles.into_iter().enumerate() {
            match handle.await {
                Ok(task_report) => reports.push(task_report),
                Err(join_error) => {
                    warn!("Task {} aborted: {}", index, join_error);
                    let mut failed = TaskReport::new();
                    failed.system_errors.push(SystemError::new(format!(
                        "Task {index} aborted before completion: {join_error}"
                    )));
                    reports.push(failed);
                }
            }
        }
        reports
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fileferry_fs::LocalFileTransfer;
    use fileferry_types::TransferAction;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    fn orchestrator() -> Orchestrator {
        Orchestrator::new(Arc::new(LocalFileTransfer::new()), RetryPolicy::default())
    }

    fn spec(source: &Path, dest: &Path) -> TaskSpec {
        TaskSpec {
            action: TransferAction::Copy,
            source_folder: source.to_path_buf(),
            match_pattern: ".*".to_string(),
            recurse: false,
            max_age_days: 0,
            dest_folder: dest.to_path_buf(),
            overwrite: false,
        }
    }

    /// Build N tasks, each with its own folders and a known file set
    fn build_tasks(temp_dir: &TempDir, count: usize) -> Vec<TaskSpec> {
        let mut specs = Vec::new();
        for i in 0..count {
            let source = temp_dir.path().join(format!("in-{i}"));
            let dest = temp_dir.path().join(format!("out-{i}"));
            std::fs::create_dir(&source).unwrap();
            std::fs::create_dir(&dest).unwrap();
            for j in 0..3 {
                std::fs::write(source.join(format!("file-{i}-{j}.txt")), b"data").unwrap();
            }
            specs.push(spec(&source, &dest));
        }
        specs
    }

    fn record_order(report: &RunReport) -> Vec<PathBuf> {
        report.outcomes.iter().map(|o| o.source.clone()).collect()
    }

    #[tokio::test]
    async fn test_empty_task_list() {
        let report = orchestrator().run_all(&[], 4).await;
        assert_eq!(report.total_actions(), 0);
        assert!(!report.is_failure());
        assert_eq!(report.events.len(), 1);
    }

    #[tokio::test]
    async fn test_sequential_run_processes_all_tasks() {
        let temp_dir = TempDir::new().unwrap();
        let specs = build_tasks(&temp_dir, 3);

        let report = orchestrator().run_all(&specs, 1).await;

        assert_eq!(report.total_actions(), 9);
        assert_eq!(report.action_errors(), 0);
        assert!(!report.is_failure());
    }

    #[tokio::test]
    async fn test_pooled_run_processes_all_tasks() {
        let temp_dir = TempDir::new().unwrap();
        let specs = build_tasks(&temp_dir, 5);

        let report = orchestrator().run_all(&specs, 3).await;

        assert_eq!(report.total_actions(), 15);
        assert_eq!(report.action_errors(), 0);
    }

    #[tokio::test]
    async fn test_merge_order_is_invariant_under_concurrency() {
        let temp_dir = TempDir::new().unwrap();
        let specs = build_tasks(&temp_dir, 4);

        let sequential = orchestrator().run_all(&specs, 1).await;

        // Re-create destination folders so the concurrent run starts clean
        for (i, _) in specs.iter().enumerate() {
            let dest = temp_dir.path().join(format!("out-{i}"));
            std::fs::remove_dir_all(&dest).unwrap();
            std::fs::create_dir(&dest).unwrap();
        }
        let concurrent = orchestrator().run_all(&specs, specs.len()).await;

        assert_eq!(record_order(&sequential), record_order(&concurrent));
    }

    #[tokio::test]
    async fn test_failing_task_does_not_affect_siblings() {
        let temp_dir = TempDir::new().unwrap();
        let mut specs = build_tasks(&temp_dir, 2);
        // Middle task points at a folder that does not exist
        specs.insert(
            1,
            spec(&temp_dir.path().join("missing"), temp_dir.path()),
        );

        let report = orchestrator().run_all(&specs, 3).await;

        assert_eq!(report.total_actions(), 6, "both healthy tasks completed");
        assert_eq!(report.system_error_count(), 1);
        assert!(report.is_failure());
    }

    #[tokio::test]
    async fn test_pool_size_is_capped_by_task_count() {
        let temp_dir = TempDir::new().unwrap();
        let specs = build_tasks(&temp_dir, 2);

        // A pool wider than the task list must not misbehave
        let report = orchestrator().run_all(&specs, 64).await;
        assert_eq!(report.total_actions(), 6);
    }
}
