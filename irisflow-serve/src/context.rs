//! Immutable serving context.
//!
//! The model is resolved once at startup and never replaced while the
//! server runs. When no model can be loaded the context degrades to an
//! untrained stub and records why; the service stays up and `/health`
//! carries the warning instead of the process refusing to start.

use irisflow_core::error::ModelError;
use irisflow_core::{Catalog, PipelineConfig, Result};
use irisflow_ml::ForestClassifier;
use irisflow_ml::dataset::FEATURE_NAMES;

/// Environment variable naming the API base the explorer page targets.
/// Unset means same-origin.
pub const API_URL_ENV: &str = "API_URL";

/// Read-only state shared by every request handler.
///
/// Built once by [`ServeContext::load`], then wrapped in an `Arc` and
/// handed to the router. Handlers only ever take `&self`; there is no
/// lock because nothing mutates after startup.
#[derive(Debug, Clone)]
pub struct ServeContext {
    model: ForestClassifier,
    warning: Option<String>,
    api_base: Option<String>,
}

impl ServeContext {
    /// Resolve the model and build the context.
    ///
    /// The model comes from `serving.model_path` when set, otherwise
    /// from the catalog's `model` entry. Any load failure falls back to
    /// [`ForestClassifier::untrained_stub`] with the failure text kept
    /// as the warning; this constructor itself never fails.
    pub fn load(config: &PipelineConfig, catalog: &Catalog) -> Self {
        let api_base = std::env::var(API_URL_ENV).ok();
        match resolve_model(config, catalog) {
            Ok(model) => {
                tracing::info!(
                    n_trees = model.n_trees(),
                    n_features = model.n_features(),
                    "model loaded"
                );
                Self {
                    model,
                    warning: None,
                    api_base,
                }
            }
            Err(e) => {
                let warning = e.to_string();
                tracing::warn!(error = %warning, "model load failed, serving untrained stub");
                Self {
                    model: ForestClassifier::untrained_stub(FEATURE_NAMES.len()),
                    warning: Some(warning),
                    api_base,
                }
            }
        }
    }

    /// Context around an already-fitted model, for embedding the server
    /// in another process.
    pub fn with_model(model: ForestClassifier) -> Self {
        Self {
            model,
            warning: None,
            api_base: None,
        }
    }

    pub fn model(&self) -> &ForestClassifier {
        &self.model
    }

    /// The recorded load failure, if the stub fallback engaged.
    pub fn warning(&self) -> Option<&str> {
        self.warning.as_deref()
    }

    pub fn is_degraded(&self) -> bool {
        self.warning.is_some()
    }

    pub fn api_base(&self) -> Option<&str> {
        self.api_base.as_deref()
    }

    /// Predict a class for every feature row.
    ///
    /// Width validation happens per row, so the error names the first
    /// offending row's width.
    pub fn predict(&self, rows: &[Vec<f64>]) -> Result<Vec<i64>> {
        let mut predictions = Vec::with_capacity(rows.len());
        for row in rows {
            predictions.push(self.model.predict_one(row)?);
        }
        Ok(predictions)
    }
}

/// Pick the model source and deserialize it.
fn resolve_model(config: &PipelineConfig, catalog: &Catalog) -> Result<ForestClassifier> {
    if let Some(path) = &config.serving.model_path {
        let text = std::fs::read_to_string(path).map_err(|e| ModelError::LoadFailed {
            location: path.display().to_string(),
            message: e.to_string(),
        })?;
        let value = serde_json::from_str(&text).map_err(|e| ModelError::LoadFailed {
            location: path.display().to_string(),
            message: e.to_string(),
        })?;
        return ForestClassifier::from_value(value).map_err(|e| {
            ModelError::LoadFailed {
                location: path.display().to_string(),
                message: e.to_string(),
            }
            .into()
        });
    }
    let value = catalog.load_json("model")?;
    ForestClassifier::from_value(value).map_err(|e| {
        ModelError::LoadFailed {
            location: "catalog entry 'model'".into(),
            message: e.to_string(),
        }
        .into()
    })
}
