//! The iris dataset, embedded in the binary.
//!
//! Extraction is deliberately fixed: the pipeline always starts from
//! this copy of the classic 150-flower table, so every run begins from
//! identical raw data.

use irisflow_core::{Frame, Result};

/// Feature columns, in dataset order.
pub const FEATURE_NAMES: [&str; 4] = [
    "sepal length (cm)",
    "sepal width (cm)",
    "petal length (cm)",
    "petal width (cm)",
];

/// Label column name in the embedded data.
pub const TARGET_COLUMN: &str = "target";

const IRIS_CSV: &str = include_str!("../data/iris.csv");

/// Parse the embedded CSV into a frame.
pub fn load_raw_data() -> Result<Frame> {
    Frame::from_csv(IRIS_CSV)
}

/// Human-readable species for a class label.
pub fn class_name(label: i64) -> Option<&'static str> {
    match label {
        0 => Some("setosa"),
        1 => Some("versicolor"),
        2 => Some("virginica"),
        _ => None,
    }
}
