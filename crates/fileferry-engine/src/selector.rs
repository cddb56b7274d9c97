//! Candidate file selection for a task
//!
//! Enumerates the files of a source folder, filters them by a name pattern and
//! an optional age cutoff, and produces the ordered candidate list a task will
//! process. Selection has no side effects; invoking it again re-enumerates.

use chrono::{DateTime, Days, Local, NaiveDate};
use fileferry_types::{Error, FileCandidate, Result};
use regex::Regex;
use std::path::Path;
use tracing::{debug, trace};
use walkdir::WalkDir;

/// Selector for the candidate files of a task
#[derive(Debug, Clone, Copy, Default)]
pub struct FileSelector;

impl FileSelector {
    /// Create a new file selector
    pub fn new() -> Self {
        Self
    }

    /// Select the candidate files under `source_folder`
    ///
    /// Fails when `source_folder` does not exist or is not a directory. The
    /// pattern is searched against the file name only, never the full path.
    /// With `max_age_days = 0` every matching file is returned; otherwise only
    /// files created on or after the cutoff date, compared at date
    /// granularity. The returned list is ordered by file name for a
    /// deterministic sequence.
    pub fn select(
        &self,
        source_folder: &Path,
        pattern: &Regex,
        recurse: bool,
        max_age_days: u32,
    ) -> Result<Vec<FileCandidate>> {
        let metadata = std::fs::metadata(source_folder).map_err(|_| Error::DirectoryNotFound {
            path: source_folder.to_path_buf(),
        })?;
        if !metadata.is_dir() {
            return Err(Error::DirectoryNotFound {
                path: source_folder.to_path_buf(),
            });
        }

        let today = Local::now().date_naive();
        let mut walker = WalkDir::new(source_folder).min_depth(1).sort_by_file_name();
        if !recurse {
            walker = walker.max_depth(1);
        }

        let mut candidates = Vec::new();
        for entry in walker {
            let entry = entry.map_err(|e| {
                Error::io(format!(
                    "Failed to enumerate '{}': {}",
                    source_folder.display(),
                    e
                ))
            })?;
            if !entry.file_type().is_file() {
                continue;
            }

            let name = entry.file_name().to_string_lossy().into_owned();
            if !pattern.is_match(&name) {
                trace!("Skipping '{}': name does not match pattern", name);
                continue;
            }

            let metadata = entry.metadata().map_err(|e| {
                Error::io(format!(
                    "Failed to read metadata for '{}': {}",
                    entry.path().display(),
                    e
                ))
            })?;
            // Creation time is not available on every filesystem; fall back
            // to the modification time for the age cutoff
            let created_system = metadata.created().or_else(|_| metadata.modified())?;
            let created: DateTime<Local> = created_system.into();

            if !is_within_age(created.date_naive(), today, max_age_days) {
                trace!("Skipping '{}': older than {} day(s)", name, max_age_days);
                continue;
            }

            candidates.push(FileCandidate {
                path: entry.into_path(),
                name,
                created,
            });
        }

        debug!(
            "Selected {} candidate(s) under '{}'",
            candidates.len(),
            source_folder.display()
        );
        Ok(candidates)
    }
}

/// Check whether a file creation date passes the age cutoff
///
/// `max_age_days = 0` disables filtering. Otherwise the cutoff date is
/// `today - (max_age_days - 1)` days, so `max_age_days = 1` keeps only files
/// created today. The comparison is at date granularity, not time of day.
pub fn is_within_age(created: NaiveDate, today: NaiveDate, max_age_days: u32) -> bool {
    if max_age_days == 0 {
        return true;
    }
    let cutoff = today
        .checked_sub_days(Days::new(u64::from(max_age_days - 1)))
        .unwrap_or(NaiveDate::MIN);
    created >= cutoff
}
