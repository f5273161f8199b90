//! Error types for the irisflow core library.
//!
//! Uses `thiserror` for public API error types with structured variants
//! covering configuration, catalog, tabular data, model, and IO domains.

use std::path::PathBuf;

/// Top-level error type for the irisflow core library.
#[derive(Debug, thiserror::Error)]
pub enum FlowError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Data error: {0}")]
    Data(#[from] DataError),

    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors from the configuration system.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Configuration parse error: {message}")]
    ParseError { message: String },

    #[error("Unsupported tracking URI scheme: {uri}")]
    UnsupportedTrackingScheme { uri: String },
}

/// Errors from the artifact catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Dataset not found in catalog: {name}")]
    DatasetNotFound { name: String },

    #[error("Catalog entry '{name}' holds no {expected} artifact")]
    FormatMismatch { name: String, expected: String },

    #[error("Invalid catalog definition: {message}")]
    Definition { message: String },
}

/// Errors from tabular frame operations.
#[derive(Debug, thiserror::Error)]
pub enum DataError {
    #[error("Column not found: {column}")]
    ColumnMissing { column: String },

    #[error("Row {row} has {actual} cells, expected {expected}")]
    RowWidth {
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error("Non-numeric value at row {row}, column '{column}'")]
    NonNumeric { row: usize, column: String },

    #[error("Frame has no rows")]
    EmptyFrame,
}

/// Errors from model fitting, loading, and prediction.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("Failed to load model from {location}: {message}")]
    LoadFailed { location: String, message: String },

    #[error("Model has no fitted trees")]
    NotFitted,

    #[error("Input has {actual} features, model expects {expected}")]
    FeatureWidth { expected: usize, actual: usize },

    #[error("Training data has {rows} rows but {labels} labels")]
    LabelMismatch { rows: usize, labels: usize },

    #[error("Training data is empty")]
    EmptyTraining,
}

/// A type alias for results using the top-level `FlowError`.
pub type Result<T> = std::result::Result<T, FlowError>;
