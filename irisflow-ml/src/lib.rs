//! # Irisflow ML
//!
//! Learning side of the irisflow pipeline: the embedded iris dataset,
//! a from-scratch random forest, evaluation metrics, SVG reporting, and
//! the stage functions plus the orchestrator that runs them in order.

pub mod dataset;
pub mod forest;
pub mod metrics;
pub mod pipeline;
pub mod plot;
pub mod tasks;

// Re-export commonly used types at the crate root.
pub use forest::{ForestClassifier, ForestConfig};
pub use pipeline::{Pipeline, PipelineReport, PipelineState};
