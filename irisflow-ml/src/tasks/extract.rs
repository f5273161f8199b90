//! Extraction stage: materialize the embedded iris data.

use crate::dataset;
use irisflow_core::{Catalog, Frame, Result};

/// Parse the embedded dataset and save it as `raw_data`.
pub fn extract_data(catalog: &Catalog) -> Result<Frame> {
    let frame = dataset::load_raw_data()?;
    catalog.save_frame("raw_data", &frame)?;
    tracing::info!(rows = frame.n_rows(), cols = frame.n_cols(), "extracted raw data");
    Ok(frame)
}
