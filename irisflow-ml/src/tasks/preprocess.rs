//! Preprocessing stage: drop incomplete rows.

use irisflow_core::{Catalog, Frame, PreprocessingConfig, Result};

/// Drop rows with nulls in the configured columns and save the result
/// as `processed_data`. With no configured columns this is a pass-through
/// that still materializes the processed copy.
pub fn clean_data(
    frame: &Frame,
    config: &PreprocessingConfig,
    catalog: &Catalog,
) -> Result<Frame> {
    let cleaned = frame.drop_null_rows(&config.dropna_columns)?;
    catalog.save_frame("processed_data", &cleaned)?;
    tracing::info!(
        rows_in = frame.n_rows(),
        rows_out = cleaned.n_rows(),
        dropped = frame.n_rows() - cleaned.n_rows(),
        "cleaned data"
    );
    Ok(cleaned)
}
