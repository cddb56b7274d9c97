//! JSON log artifact writer
//!
//! Renders artifact record sets into timestamped files under the configured
//! log directory, one file per enabled format, and provides the listing and
//! deletion operations the retention policy needs.

use async_trait::async_trait;
use chrono::Local;
use fileferry_config::LogFormat;
use fileferry_types::{Artifact, ArtifactFile, ArtifactRecords, ArtifactWriter, Error, Result};
use std::path::PathBuf;
use tracing::{debug, warn};

/// Artifact writer rendering records as JSON or JSON lines
#[derive(Debug, Clone)]
pub struct JsonArtifactWriter {
    directory: PathBuf,
    formats: Vec<LogFormat>,
}

impl JsonArtifactWriter {
    /// Create a writer for the given log directory and formats
    pub fn new(directory: PathBuf, formats: Vec<LogFormat>) -> Self {
        Self { directory, formats }
    }

    fn render(records: &ArtifactRecords, format: LogFormat) -> Result<String> {
        let rendered = match format {
            LogFormat::Json => serde_json::to_string_pretty(records)
                .map_err(|e| Error::artifact_write(format!("Failed to render JSON: {e}")))?,
            LogFormat::Jsonl => {
                let mut lines = Vec::with_capacity(records.len());
                match records {
                    ArtifactRecords::Actions(actions) => {
                        for record in actions {
                            lines.push(serde_json::to_string(record).map_err(|e| {
                                Error::artifact_write(format!("Failed to render record: {e}"))
                            })?);
                        }
                    }
                    ArtifactRecords::Errors(errors) => {
                        for record in errors {
                            lines.push(serde_json::to_string(record).map_err(|e| {
                                Error::artifact_write(format!("Failed to render record: {e}"))
                            })?);
                        }
                    }
                }
                let mut content = lines.join("\n");
                content.push('\n');
                content
            }
        };
        Ok(rendered)
    }

    fn is_artifact_file(path: &std::path::Path) -> bool {
        matches!(
            path.extension().and_then(|ext| ext.to_str()),
            Some("json") | Some("jsonl")
        )
    }
}

#[async_trait]
impl ArtifactWriter for JsonArtifactWriter {
    async fn write_artifact(&self, artifact: &Artifact) -> Result<Vec<PathBuf>> {
        tokio::fs::create_dir_all(&self.directory)
            .await
            .map_err(|e| {
                Error::artifact_write(format!(
                    "Failed to create log directory '{}': {}",
                    self.directory.display(),
                    e
                ))
            })?;

        let timestamp = Local::now().format("%Y%m%d-%H%M%S");
        let mut written = Vec::with_capacity(self.formats.len());

        for format in &self.formats {
            let file_name = format!(
                "{}-{}.{}",
                artifact.file_stem,
                timestamp,
                format.extension()
            );
            let path = self.directory.join(file_name);
            let content = Self::render(&artifact.records, *format)?;

            tokio::fs::write(&path, content).await.map_err(|e| {
                Error::artifact_write(format!("Failed to write '{}': {}", path.display(), e))
            })?;
            debug!("Wrote artifact file '{}'", path.display());
            written.push(path);
        }

        Ok(written)
    }

    async fn existing_artifacts(&self) -> Result<Vec<ArtifactFile>> {
        let mut entries = match tokio::fs::read_dir(&self.directory).await {
            Ok(entries) => entries,
            // A log directory that does not exist yet simply has no artifacts
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(Error::artifact_write(format!(
                    "Failed to read log directory '{}': {}",
                    self.directory.display(),
                    e
                )))
            }
        };

        let mut files = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(|e| {
            Error::artifact_write(format!("Failed to enumerate log directory: {e}"))
        })? {
            let path = entry.path();
            if !Self::is_artifact_file(&path) {
                continue;
            }
            let metadata = match entry.metadata().await {
                Ok(metadata) if metadata.is_file() => metadata,
                _ => continue,
            };
            let modified = metadata.modified().map_err(|e| {
                Error::artifact_write(format!(
                    "Failed to read modification time of '{}': {}",
                    path.display(),
                    e
                ))
            })?;
            files.push(ArtifactFile { path, modified });
        }

        Ok(files)
    }

    async fn remove_artifacts(&self, paths: &[PathBuf]) -> Result<()> {
        let mut failures = 0usize;
        for path in paths {
            if let Err(e) = tokio::fs::remove_file(path).await {
                warn!("Failed to delete log file '{}': {}", path.display(), e);
                failures += 1;
            } else {
                debug!("Deleted expired log file '{}'", path.display());
            }
        }

        if failures > 0 {
            return Err(Error::artifact_write(format!(
                "Failed to delete {failures} of {} log file(s)",
                paths.len()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fileferry_types::{ActionOutcome, ArtifactKind, SystemError, TransferAction};
    use tempfile::TempDir;

    fn actions_artifact() -> Artifact {
        Artifact {
            kind: ArtifactKind::AllActions,
            file_stem: "actions".to_string(),
            records: ArtifactRecords::Actions(vec![
                ActionOutcome::succeeded(
                    TransferAction::Copy,
                    "/in/a.txt".into(),
                    "/out/a.txt".into(),
                    false,
                ),
                ActionOutcome::failed(
                    TransferAction::Copy,
                    "/in/b.txt".into(),
                    "/out/b.txt".into(),
                    false,
                    "locked".to_string(),
                ),
            ]),
        }
    }

    #[tokio::test]
    async fn test_write_json_artifact() {
        let temp_dir = TempDir::new().unwrap();
        let writer =
            JsonArtifactWriter::new(temp_dir.path().to_path_buf(), vec![LogFormat::Json]);

        let paths = writer.write_artifact(&actions_artifact()).await.unwrap();
        assert_eq!(paths.len(), 1);
        assert!(paths[0].exists());

        let content = std::fs::read_to_string(&paths[0]).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed.as_array().unwrap().len(), 2);
        assert_eq!(parsed[1]["error"], "locked");
    }

    #[tokio::test]
    async fn test_write_both_formats() {
        let temp_dir = TempDir::new().unwrap();
        let writer = JsonArtifactWriter::new(
            temp_dir.path().to_path_buf(),
            vec![LogFormat::Json, LogFormat::Jsonl],
        );

        let paths = writer.write_artifact(&actions_artifact()).await.unwrap();
        assert_eq!(paths.len(), 2);

        let jsonl = std::fs::read_to_string(&paths[1]).unwrap();
        assert_eq!(jsonl.trim().lines().count(), 2);
        for line in jsonl.trim().lines() {
            let _: serde_json::Value = serde_json::from_str(line).unwrap();
        }
    }

    #[tokio::test]
    async fn test_write_errors_artifact() {
        let temp_dir = TempDir::new().unwrap();
        let writer =
            JsonArtifactWriter::new(temp_dir.path().to_path_buf(), vec![LogFormat::Json]);

        let artifact = Artifact {
            kind: ArtifactKind::SystemErrors,
            file_stem: "system-errors".to_string(),
            records: ArtifactRecords::Errors(vec![SystemError::new("folder missing")]),
        };
        let paths = writer.write_artifact(&artifact).await.unwrap();

        let content = std::fs::read_to_string(&paths[0]).unwrap();
        assert!(content.contains("folder missing"));
    }

    #[tokio::test]
    async fn test_creates_missing_log_directory() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("deep").join("logs");
        let writer = JsonArtifactWriter::new(nested.clone(), vec![LogFormat::Json]);

        writer.write_artifact(&actions_artifact()).await.unwrap();
        assert!(nested.exists());
    }

    #[tokio::test]
    async fn test_listing_missing_directory_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let writer = JsonArtifactWriter::new(
            temp_dir.path().join("never-created"),
            vec![LogFormat::Json],
        );
        let files = writer.existing_artifacts().await.unwrap();
        assert!(files.is_empty());
    }

    #[tokio::test]
    async fn test_listing_ignores_foreign_files() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("artifact.json"), b"[]").unwrap();
        std::fs::write(temp_dir.path().join("notes.txt"), b"hi").unwrap();

        let writer =
            JsonArtifactWriter::new(temp_dir.path().to_path_buf(), vec![LogFormat::Json]);
        let files = writer.existing_artifacts().await.unwrap();
        assert_eq!(files.len(), 1);
        assert!(files[0].path.ends_with("artifact.json"));
    }

    #[tokio::test]
    async fn test_remove_artifacts() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("old.json");
        std::fs::write(&target, b"[]").unwrap();

        let writer =
            JsonArtifactWriter::new(temp_dir.path().to_path_buf(), vec![LogFormat::Json]);
        writer.remove_artifacts(&[target.clone()]).await.unwrap();
        assert!(!target.exists());
    }

    #[tokio::test]
    async fn test_remove_missing_file_reports_failure() {
        let temp_dir = TempDir::new().unwrap();
        let writer =
            JsonArtifactWriter::new(temp_dir.path().to_path_buf(), vec![LogFormat::Json]);

        let result = writer
            .remove_artifacts(&[temp_dir.path().join("ghost.json")])
            .await;
        assert!(result.is_err());
    }
}
