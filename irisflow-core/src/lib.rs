//! # Irisflow Core
//!
//! Core library for the irisflow ML pipeline.
//! Provides layered configuration, the name-addressed artifact catalog,
//! the tabular frame type, file-backed run tracking, and the shared
//! error taxonomy.

pub mod catalog;
pub mod config;
pub mod error;
pub mod frame;
pub mod persist;
pub mod tracking;

// Re-export commonly used types at the crate root.
pub use catalog::{Artifact, ArtifactFormat, Catalog, CatalogEntry};
pub use config::{
    ConfigLoader, ModelConfig, PipelineConfig, PlottingConfig, PreprocessingConfig, ServingConfig,
    TrackingConfig,
};
pub use error::{CatalogError, ConfigError, DataError, FlowError, ModelError, Result};
pub use frame::Frame;
pub use tracking::{Run, RunMeta, RunStatus, TrackingStore};
