//! Persists a run's two tables.

use std::io::Write;
use std::path::{Path, PathBuf};

use log::info;
use serde::Serialize;

use crate::engine::RunOutput;
use crate::error::StorageError;
use crate::failure::FailureRecord;
use crate::record::ApplicationRecord;

const MAX_VARIANTS: usize = 1000;

/// Paths of the artifacts written for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenArtifacts {
    pub applications: PathBuf,
    pub failures: PathBuf,
}

/// Destination for a finished run.
pub trait ArtifactWriter {
    /// Writes both tables. Empty tables are still written.
    fn write(&self, output: &RunOutput) -> Result<WrittenArtifacts, StorageError>;
}

#[derive(Serialize)]
struct ApplicationsDocument<'a> {
    batch_id: &'a str,
    date_range: String,
    sections: Vec<Section<'a>>,
}

#[derive(Serialize)]
struct Section<'a> {
    status: &'a str,
    records: &'a [ApplicationRecord],
}

#[derive(Serialize)]
struct FailuresDocument<'a> {
    batch_id: &'a str,
    date_range: String,
    failures: &'a [FailureRecord],
}

/// Writes pretty-printed JSON files into one directory, never replacing an
/// existing file.
pub struct JsonArtifactWriter {
    output_directory: PathBuf,
}

impl JsonArtifactWriter {
    pub fn new<P: AsRef<Path>>(output_directory: P) -> Self {
        Self {
            output_directory: output_directory.as_ref().to_path_buf(),
        }
    }

    fn ensure_directory(&self) -> Result<(), StorageError> {
        if !self.output_directory.exists() {
            std::fs::create_dir_all(&self.output_directory).map_err(|e| {
                StorageError::CreateDirectory {
                    path: self.output_directory.clone(),
                    source: e,
                }
            })?;
        }
        Ok(())
    }

    fn write_json<T: Serialize>(&self, stem: &str, value: &T) -> Result<PathBuf, StorageError> {
        let content = serde_json::to_vec_pretty(value).map_err(|e| StorageError::Serialize {
            name: stem.to_string(),
            source: e,
        })?;
        self.create_exclusive(stem, "json", &content)
    }

    /// Creates `{stem}.{ext}`, or the first free `{stem}_{n}.{ext}`.
    fn create_exclusive(
        &self,
        stem: &str,
        ext: &str,
        content: &[u8],
    ) -> Result<PathBuf, StorageError> {
        for counter in 1..=MAX_VARIANTS {
            let filename = if counter == 1 {
                format!("{}.{}", stem, ext)
            } else {
                format!("{}_{}.{}", stem, counter, ext)
            };
            let path = self.output_directory.join(&filename);

            match std::fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
            {
                Ok(mut file) => {
                    file.write_all(content)
                        .map_err(|e| StorageError::WriteFile {
                            path: path.clone(),
                            source: e,
                        })?;
                    return Ok(path);
                }
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(StorageError::WriteFile { path, source: e }),
            }
        }

        Err(StorageError::FileExists(
            self.output_directory.join(format!("{}.{}", stem, ext)),
        ))
    }
}

impl ArtifactWriter for JsonArtifactWriter {
    fn write(&self, output: &RunOutput) -> Result<WrittenArtifacts, StorageError> {
        self.ensure_directory()?;

        let timestamp = output.started_at.format("%Y%m%d_%H%M%S").to_string();
        let date_range = output.date_range.description();

        let applications = ApplicationsDocument {
            batch_id: &output.batch_id,
            date_range: date_range.clone(),
            sections: output
                .applications
                .groups
                .iter()
                .map(|group| Section {
                    status: group.status.as_str(),
                    records: &group.records,
                })
                .collect(),
        };
        let applications_path = self.write_json(
            &format!(
                "job_application_status_{}_{}",
                output.date_range.file_suffix(),
                timestamp
            ),
            &applications,
        )?;

        let failures = FailuresDocument {
            batch_id: &output.batch_id,
            date_range,
            failures: &output.failures,
        };
        let failures_path =
            self.write_json(&format!("failed_verifications_{}", timestamp), &failures)?;

        info!(
            "Wrote {} applications to {} and {} failures to {}",
            output.applications.len(),
            applications_path.display(),
            output.failures.len(),
            failures_path.display()
        );

        Ok(WrittenArtifacts {
            applications: applications_path,
            failures: failures_path,
        })
    }
}
