//! Layered pipeline configuration.
//!
//! Uses `figment` for layered configuration: struct defaults -> declared
//! YAML files (merged in declaration order, later files win) ->
//! `IRISFLOW_`-prefixed environment variables -> fixed environment
//! overrides (`MLFLOW_TRACKING_URI`, `MLFLOW_EXPERIMENT`, `MODEL_PATH`).
//!
//! Every declared file must exist before any merging starts; a missing
//! file aborts the whole load with an error naming its path.

use crate::error::{ConfigError, Result};
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Yaml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable that replaces the preprocessing config path.
pub const PREPROC_CONFIG_ENV: &str = "PREPROC_CONFIG";
/// Environment variable that replaces the modeling config path.
pub const MODEL_CONFIG_ENV: &str = "MODEL_CONFIG";
/// Environment variable that replaces the plotting config path.
pub const PLOT_CONFIG_ENV: &str = "PLOT_CONFIG";

/// Top-level configuration for pipeline runs and the serving API.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineConfig {
    #[serde(default)]
    pub preprocessing: PreprocessingConfig,
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub plotting: PlottingConfig,
    #[serde(default)]
    pub tracking: TrackingConfig,
    #[serde(default)]
    pub serving: ServingConfig,
}

/// Preprocessing stage configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PreprocessingConfig {
    /// Columns checked for missing values; rows with a null in any of
    /// them are dropped. Empty means the cleaning step is a no-op.
    #[serde(default)]
    pub dropna_columns: Vec<String>,
}

/// Model training configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "ModelConfigShadow")]
pub struct ModelConfig {
    /// Number of trees in the forest.
    pub n_estimators: usize,
    /// Maximum tree depth; `None` grows trees until leaves are pure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_depth: Option<usize>,
    /// Seed for bootstrap sampling and per-split feature subsetting.
    pub seed: u64,
    /// Name of the label column. `target_column` is accepted as an
    /// alternative key and wins when both are present.
    pub target: String,
}

/// Accepts both `target` and its legacy spelling `target_column`.
#[derive(Deserialize)]
struct ModelConfigShadow {
    #[serde(default = "default_n_estimators")]
    n_estimators: usize,
    #[serde(default)]
    max_depth: Option<usize>,
    #[serde(default = "default_seed")]
    seed: u64,
    #[serde(default)]
    target: Option<String>,
    #[serde(default)]
    target_column: Option<String>,
}

impl From<ModelConfigShadow> for ModelConfig {
    fn from(raw: ModelConfigShadow) -> Self {
        Self {
            n_estimators: raw.n_estimators,
            max_depth: raw.max_depth,
            seed: raw.seed,
            target: raw
                .target_column
                .or(raw.target)
                .unwrap_or_else(default_target),
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            n_estimators: default_n_estimators(),
            max_depth: None,
            seed: default_seed(),
            target: default_target(),
        }
    }
}

/// Reporting stage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlottingConfig {
    /// File name the chart is logged under (inside the run's `plots/`).
    #[serde(default = "default_plot_filename")]
    pub filename: String,
    /// Chart title.
    #[serde(default = "default_plot_title")]
    pub title: String,
}

impl Default for PlottingConfig {
    fn default() -> Self {
        Self {
            filename: default_plot_filename(),
            title: default_plot_title(),
        }
    }
}

/// Experiment tracking configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackingConfig {
    /// Tracking store URI. Only the `file:` scheme (or a bare directory
    /// path) is supported.
    #[serde(default = "default_tracking_uri")]
    pub uri: String,
    /// Experiment the runs are grouped under.
    #[serde(default = "default_experiment_name")]
    pub experiment_name: String,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            uri: default_tracking_uri(),
            experiment_name: default_experiment_name(),
        }
    }
}

/// Serving API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServingConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Explicit model file to serve. When unset, the model comes from
    /// the catalog's `model` entry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_path: Option<PathBuf>,
}

impl Default for ServingConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            model_path: None,
        }
    }
}

fn default_n_estimators() -> usize {
    100
}

fn default_seed() -> u64 {
    42
}

fn default_target() -> String {
    "target".to_string()
}

fn default_plot_filename() -> String {
    "accuracy.svg".to_string()
}

fn default_plot_title() -> String {
    "Training metrics".to_string()
}

fn default_tracking_uri() -> String {
    "file:./mlruns".to_string()
}

fn default_experiment_name() -> String {
    "Default".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

/// An ordered list of configuration files to merge.
///
/// The loader is cheap to build and owns no state beyond the resolved
/// paths, so callers construct one per load.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    paths: Vec<PathBuf>,
}

impl ConfigLoader {
    /// Loader over an explicit list of YAML files. An empty list is
    /// legal and yields defaults plus environment overrides.
    pub fn with_paths(paths: Vec<PathBuf>) -> Self {
        Self { paths }
    }

    /// Loader over the conventional files under a config directory:
    /// `preprocessing.yaml`, `modeling.yaml`, `plotting.yaml`. Each path
    /// can be replaced individually through `PREPROC_CONFIG`,
    /// `MODEL_CONFIG`, and `PLOT_CONFIG`.
    pub fn from_dir(dir: &Path) -> Self {
        let paths = vec![
            path_from_env(PREPROC_CONFIG_ENV, dir.join("preprocessing.yaml")),
            path_from_env(MODEL_CONFIG_ENV, dir.join("modeling.yaml")),
            path_from_env(PLOT_CONFIG_ENV, dir.join("plotting.yaml")),
        ];
        Self { paths }
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    /// Merge defaults, files, and environment into one immutable config.
    ///
    /// Later files win key-for-key over earlier ones; the environment
    /// wins over every file. The first missing file aborts the load
    /// before any merging happens, so there is no partial success.
    pub fn load(&self) -> Result<PipelineConfig> {
        for path in &self.paths {
            if !path.exists() {
                return Err(ConfigError::FileNotFound { path: path.clone() }.into());
            }
        }

        let mut figment = Figment::from(Serialized::defaults(PipelineConfig::default()));
        for path in &self.paths {
            figment = figment.merge(Yaml::file(path));
        }
        figment = figment.merge(Env::prefixed("IRISFLOW_").split("__"));

        if let Ok(uri) = std::env::var("MLFLOW_TRACKING_URI") {
            figment = figment.merge(Serialized::default("tracking.uri", uri));
        }
        if let Ok(name) = std::env::var("MLFLOW_EXPERIMENT") {
            figment = figment.merge(Serialized::default("tracking.experiment_name", name));
        }
        if let Ok(path) = std::env::var("MODEL_PATH") {
            figment = figment.merge(Serialized::default("serving.model_path", path));
        }

        let config = figment.extract().map_err(|e| ConfigError::ParseError {
            message: e.to_string(),
        })?;
        Ok(config)
    }
}

fn path_from_env(var: &str, fallback: PathBuf) -> PathBuf {
    std::env::var(var).map(PathBuf::from).unwrap_or(fallback)
}
