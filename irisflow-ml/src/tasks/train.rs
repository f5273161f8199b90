//! Training stage: fit the forest and log the training score.

use crate::forest::{ForestClassifier, ForestConfig};
use crate::metrics;
use irisflow_core::tracking::Run;
use irisflow_core::{Catalog, Frame, ModelConfig, Result};

/// Fit a forest on the processed frame, log `n_estimators` and
/// `train_accuracy` to the run, and save the model to the catalog.
///
/// The score is training accuracy, measured on the same rows the model
/// was fitted on. There is no holdout split; the number is an upper
/// bound, not a generalization estimate.
pub fn train_model(
    frame: &Frame,
    config: &ModelConfig,
    catalog: &Catalog,
    run: &Run,
) -> Result<(ForestClassifier, f64)> {
    let (features, labels) = frame.split_features_target(&config.target)?;
    let forest_config = ForestConfig::from(config);
    let forest = ForestClassifier::fit(&features, &labels, &forest_config)?;

    let predictions = forest.predict(&features)?;
    let train_accuracy = metrics::accuracy(&labels, &predictions);

    run.log_param("n_estimators", forest_config.n_estimators)?;
    run.log_metric("train_accuracy", train_accuracy)?;
    catalog.save_json("model", &forest.to_value()?)?;

    tracing::info!(
        n_estimators = forest_config.n_estimators,
        train_accuracy,
        "trained model"
    );
    Ok((forest, train_accuracy))
}
