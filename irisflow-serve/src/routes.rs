//! Axum routes: health, prediction, and the model explorer page.

use crate::context::ServeContext;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use irisflow_ml::dataset;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Thread-safe shared context for axum handlers.
pub type SharedContext = Arc<ServeContext>;

/// Build the router with `/`, `/health`, and `/predict`.
pub fn router(context: SharedContext) -> Router {
    Router::new()
        .route("/", get(explorer_handler))
        .route("/health", get(health_handler))
        .route("/predict", post(predict_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(context)
}

/// Health check endpoint. Always 200; a `warning` key is present iff
/// the server fell back to the untrained stub at startup.
async fn health_handler(State(ctx): State<SharedContext>) -> impl IntoResponse {
    let body = match ctx.warning() {
        Some(warning) => json!({ "status": "ok", "warning": warning }),
        None => json!({ "status": "ok" }),
    };
    Json(body)
}

#[derive(Debug, Deserialize)]
struct PredictRequest {
    features: Vec<Vec<f64>>,
}

/// Prediction endpoint.
///
/// A malformed body is rejected by the `Json` extractor (422); a
/// well-formed body with the wrong feature width gets a 400 with a
/// JSON error. A degraded server still answers with the stub's
/// predictions rather than an error.
async fn predict_handler(
    State(ctx): State<SharedContext>,
    Json(request): Json<PredictRequest>,
) -> Response {
    match ctx.predict(&request.features) {
        Ok(predictions) => {
            let labels: Vec<&str> = predictions
                .iter()
                .map(|&p| dataset::class_name(p).unwrap_or("unknown"))
                .collect();
            Json(json!({ "predictions": predictions, "labels": labels })).into_response()
        }
        Err(e) => {
            tracing::debug!(error = %e, "rejected prediction request");
            (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": e.to_string() })),
            )
                .into_response()
        }
    }
}

/// The model explorer: one number input per feature, a predict button,
/// and the predicted species rendered in place.
async fn explorer_handler(State(ctx): State<SharedContext>) -> Html<String> {
    Html(explorer_page(&ctx))
}

fn explorer_page(ctx: &ServeContext) -> String {
    let inputs: String = dataset::FEATURE_NAMES
        .iter()
        .enumerate()
        .map(|(i, name)| {
            format!(
                "    <label>{name}\n      <input type=\"number\" step=\"0.1\" id=\"f{i}\" value=\"0.0\">\n    </label>\n"
            )
        })
        .collect();
    let api_base = ctx.api_base().unwrap_or("");
    let banner = match ctx.warning() {
        Some(warning) => format!("  <p class=\"warning\">Degraded: {warning}</p>\n"),
        None => String::new(),
    };
    format!(
        r#"<!doctype html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>Iris model explorer</title>
  <style>
    body {{ font-family: sans-serif; max-width: 28rem; margin: 2rem auto; }}
    label {{ display: block; margin: 0.5rem 0; }}
    input {{ float: right; width: 6rem; }}
    .warning {{ color: #b45309; }}
    #result {{ font-weight: bold; margin-top: 1rem; }}
  </style>
</head>
<body>
  <h1>Iris model explorer</h1>
{banner}  <form id="explorer">
{inputs}    <button type="submit">Predict</button>
  </form>
  <p id="result"></p>
  <script>
    const API_BASE = "{api_base}";
    document.getElementById("explorer").addEventListener("submit", async (e) => {{
      e.preventDefault();
      const features = [[0, 1, 2, 3].map(i => parseFloat(document.getElementById("f" + i).value))];
      const resp = await fetch(API_BASE + "/predict", {{
        method: "POST",
        headers: {{ "content-type": "application/json" }},
        body: JSON.stringify({{ features }}),
      }});
      const body = await resp.json();
      document.getElementById("result").textContent =
        resp.ok ? "Predicted species: " + body.labels[0] : "Error: " + body.error;
    }});
  </script>
</body>
</html>
"#
    )
}
