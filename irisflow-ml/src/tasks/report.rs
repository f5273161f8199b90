//! Reporting stage: recompute the score and render the chart.

use crate::forest::ForestClassifier;
use crate::{metrics, plot};
use irisflow_core::tracking::Run;
use irisflow_core::{Catalog, Frame, ModelConfig, PlottingConfig, Result};

/// Re-evaluate the model on the processed frame, render the accuracy
/// chart, and store it both in the catalog and as a run artifact under
/// `plots/`.
///
/// The score is recomputed from the model rather than read back from
/// the run, so the chart stays truthful even if metric files are
/// edited or lost.
pub fn generate_report(
    model: &ForestClassifier,
    frame: &Frame,
    model_config: &ModelConfig,
    plot_config: &PlottingConfig,
    catalog: &Catalog,
    run: &Run,
) -> Result<f64> {
    let (features, labels) = frame.split_features_target(&model_config.target)?;
    let predictions = model.predict(&features)?;
    let accuracy = metrics::accuracy(&labels, &predictions);

    let svg = plot::render_metric_chart(&plot_config.title, "train_accuracy", accuracy);
    catalog.save_svg("accuracy_plot", &svg)?;
    run.log_artifact(&format!("plots/{}", plot_config.filename), svg.as_bytes())?;

    tracing::info!(accuracy, filename = %plot_config.filename, "generated report");
    Ok(accuracy)
}
