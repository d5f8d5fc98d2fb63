//! Test harness running the engine against an isolated output directory.

#![allow(dead_code)]

use std::path::PathBuf;

use chrono::{DateTime, Local, TimeZone};
use tempfile::TempDir;

use jobtrail::config::Config;
use jobtrail::engine::{Engine, LabelBatch, RunOutput};
use jobtrail::pipeline::NoopProgress;
use jobtrail::storage::{ArtifactWriter, JsonArtifactWriter, WrittenArtifacts};

pub struct TestHarness {
    /// Keeps the directory alive for the harness lifetime.
    temp_dir: TempDir,
    pub output_dir: PathBuf,
    pub engine: Engine,
}

impl TestHarness {
    pub fn new(config: Config) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let output_dir = temp_dir.path().join("processed");
        let engine = Engine::new(&config).expect("Config should be valid");

        Self {
            temp_dir,
            output_dir,
            engine,
        }
    }

    /// Fixed start time so artifact names are predictable.
    pub fn started_at() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 2, 2, 8, 30, 0).unwrap()
    }

    pub fn run(&self, batches: Vec<LabelBatch>) -> RunOutput {
        self.engine
            .run_at(batches, &NoopProgress, Self::started_at())
            .expect("Run should complete")
    }

    pub fn write(&self, output: &RunOutput) -> WrittenArtifacts {
        JsonArtifactWriter::new(&self.output_dir)
            .write(output)
            .expect("Artifacts should be written")
    }

    pub fn read_json(path: &PathBuf) -> serde_json::Value {
        let bytes = std::fs::read(path).expect("Artifact should exist");
        serde_json::from_slice(&bytes).expect("Artifact should be JSON")
    }
}
