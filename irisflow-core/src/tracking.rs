//! File-backed experiment tracking.
//!
//! A [`TrackingStore`] owns a directory of experiments; each pipeline
//! execution becomes a [`Run`] directory underneath it holding
//! `meta.json`, one file per parameter, one append-only file per metric,
//! and an `artifacts/` tree. The layout follows the MLflow file store
//! closely enough that the directories read naturally, but nothing here
//! speaks the MLflow API.
//!
//! Only `file:` URIs (or bare directory paths) are supported; anything
//! with a real scheme is rejected up front.

use crate::config::TrackingConfig;
use crate::error::{ConfigError, Result};
use crate::persist::{atomic_write, atomic_write_json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Lifecycle state of a tracked run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Running,
    Finished,
    Failed,
}

/// Run metadata persisted as `meta.json` in the run directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunMeta {
    pub run_id: String,
    pub experiment: String,
    pub status: RunStatus,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
}

impl RunMeta {
    /// Read the metadata of an existing run directory.
    pub fn load(run_dir: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(run_dir.join("meta.json"))?;
        Ok(serde_json::from_str(&text)?)
    }
}

/// Root of the tracking data for one experiment.
#[derive(Debug, Clone)]
pub struct TrackingStore {
    root: PathBuf,
    experiment: String,
}

impl TrackingStore {
    /// Open (and create if needed) the store a `TrackingConfig` points
    /// at. URIs with a scheme other than `file:` are rejected.
    pub fn open(config: &TrackingConfig) -> Result<Self> {
        let raw = config.uri.trim();
        let path = if let Some(rest) = raw.strip_prefix("file://") {
            rest
        } else if let Some(rest) = raw.strip_prefix("file:") {
            rest
        } else if raw.contains("://") {
            return Err(ConfigError::UnsupportedTrackingScheme { uri: raw.into() }.into());
        } else {
            raw
        };
        let store = Self {
            root: PathBuf::from(path),
            experiment: config.experiment_name.clone(),
        };
        std::fs::create_dir_all(store.experiment_dir())?;
        Ok(store)
    }

    pub fn experiment(&self) -> &str {
        &self.experiment
    }

    pub fn experiment_dir(&self) -> PathBuf {
        self.root.join(&self.experiment)
    }

    /// Create a new run directory and mark it running.
    pub fn start_run(&self) -> Result<Run> {
        let id = uuid::Uuid::new_v4().simple().to_string();
        let dir = self.experiment_dir().join(&id);
        std::fs::create_dir_all(dir.join("params"))?;
        std::fs::create_dir_all(dir.join("metrics"))?;
        std::fs::create_dir_all(dir.join("artifacts"))?;

        let meta = RunMeta {
            run_id: id.clone(),
            experiment: self.experiment.clone(),
            status: RunStatus::Running,
            start_time: Utc::now(),
            end_time: None,
        };
        atomic_write_json(&dir.join("meta.json"), &meta)?;
        tracing::info!(run_id = %id, experiment = %self.experiment, "started tracked run");
        Ok(Run { meta, dir })
    }
}

/// A live tracked run.
///
/// Logging methods take `&self`; [`Run::finish`] consumes the run so no
/// parameter or metric can land after the final status is written. A
/// run that is dropped without `finish` keeps its `running` status on
/// disk, which is how aborted processes look in the store.
#[derive(Debug)]
pub struct Run {
    meta: RunMeta,
    dir: PathBuf,
}

impl Run {
    pub fn id(&self) -> &str {
        &self.meta.run_id
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Record a parameter. Parameters are write-once per name; a second
    /// write replaces the first.
    pub fn log_param(&self, name: &str, value: impl std::fmt::Display) -> Result<()> {
        let payload = format!("{value}\n");
        atomic_write(&self.dir.join("params").join(name), payload.as_bytes())?;
        tracing::debug!(run_id = %self.meta.run_id, param = name, %value, "logged param");
        Ok(())
    }

    /// Append one observation to a metric. Each line in the metric file
    /// is `<unix millis> <value>`.
    pub fn log_metric(&self, name: &str, value: f64) -> Result<()> {
        let line = format!("{} {}\n", Utc::now().timestamp_millis(), value);
        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.dir.join("metrics").join(name))?;
        file.write_all(line.as_bytes())?;
        tracing::debug!(run_id = %self.meta.run_id, metric = name, value, "logged metric");
        Ok(())
    }

    /// Store raw bytes under `artifacts/<rel_path>`.
    pub fn log_artifact(&self, rel_path: &str, bytes: &[u8]) -> Result<()> {
        atomic_write(&self.dir.join("artifacts").join(rel_path), bytes)?;
        tracing::debug!(run_id = %self.meta.run_id, artifact = rel_path, "logged artifact");
        Ok(())
    }

    /// Write the terminal status and close the run.
    pub fn finish(mut self, status: RunStatus) -> Result<()> {
        self.meta.status = status;
        self.meta.end_time = Some(Utc::now());
        atomic_write_json(&self.dir.join("meta.json"), &self.meta)?;
        tracing::info!(run_id = %self.meta.run_id, status = ?status, "finished tracked run");
        Ok(())
    }
}
