//! Integration tests for the serving API endpoints.

use axum::body::Body;
use irisflow_core::{Catalog, PipelineConfig};
use irisflow_ml::dataset::load_raw_data;
use irisflow_ml::{ForestClassifier, ForestConfig};
use irisflow_serve::{ServeContext, SharedContext, router};
use std::sync::Arc;
use tempfile::tempdir;
use tower::ServiceExt;

fn fitted_context() -> SharedContext {
    let frame = load_raw_data().unwrap();
    let (x, y) = frame.split_features_target("target").unwrap();
    let config = ForestConfig {
        n_estimators: 5,
        ..ForestConfig::default()
    };
    let model = ForestClassifier::fit(&x, &y, &config).unwrap();
    Arc::new(ServeContext::with_model(model))
}

fn degraded_context(dir: &std::path::Path) -> SharedContext {
    // An empty catalog has a `model` entry but no file behind it.
    let catalog = Catalog::in_dir(dir);
    Arc::new(ServeContext::load(&PipelineConfig::default(), &catalog))
}

fn make_request(uri: &str) -> axum::http::Request<Body> {
    axum::http::Request::builder()
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn make_post_request(uri: &str, body: serde_json::Value) -> axum::http::Request<Body> {
    axum::http::Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

async fn send(
    ctx: SharedContext,
    request: axum::http::Request<Body>,
) -> (axum::http::StatusCode, serde_json::Value) {
    let app = router(ctx);
    let resp = ServiceExt::<axum::http::Request<Body>>::oneshot(app, request)
        .await
        .unwrap();
    let status = resp.status();
    let body = axum::body::to_bytes(resp.into_body(), 100_000)
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    (status, json)
}

// --- /health ---

#[tokio::test]
async fn test_health_is_ok_without_warning() {
    let (status, json) = send(fitted_context(), make_request("/health")).await;
    assert_eq!(status, 200);
    assert_eq!(json["status"], "ok");
    assert!(json.get("warning").is_none());
}

#[tokio::test]
async fn test_health_carries_warning_when_degraded() {
    let dir = tempdir().unwrap();
    let (status, json) = send(degraded_context(dir.path()), make_request("/health")).await;
    assert_eq!(status, 200);
    assert_eq!(json["status"], "ok");
    assert!(json["warning"].as_str().unwrap().contains("model"));
}

// --- /predict ---

#[tokio::test]
async fn test_predict_returns_labels() {
    let body = serde_json::json!({
        "features": [[5.1, 3.5, 1.4, 0.2], [6.7, 3.0, 5.2, 2.3]]
    });
    let (status, json) = send(fitted_context(), make_post_request("/predict", body)).await;
    assert_eq!(status, 200);
    let predictions = json["predictions"].as_array().unwrap();
    assert_eq!(predictions.len(), 2);
    // The first row is a textbook setosa.
    assert_eq!(predictions[0], 0);
    assert_eq!(json["labels"][0], "setosa");
}

#[tokio::test]
async fn test_predict_wrong_width_is_bad_request() {
    let body = serde_json::json!({ "features": [[5.1, 3.5]] });
    let (status, json) = send(fitted_context(), make_post_request("/predict", body)).await;
    assert_eq!(status, 400);
    assert!(json["error"].as_str().unwrap().contains("expects 4"));
}

#[tokio::test]
async fn test_predict_malformed_body_is_unprocessable() {
    let body = serde_json::json!({ "rows": [[1.0]] });
    let app = router(fitted_context());
    let resp = ServiceExt::<axum::http::Request<Body>>::oneshot(
        app,
        make_post_request("/predict", body),
    )
    .await
    .unwrap();
    assert_eq!(resp.status(), 422);
}

#[tokio::test]
async fn test_predict_still_answers_when_degraded() {
    let dir = tempdir().unwrap();
    let body = serde_json::json!({ "features": [[5.1, 3.5, 1.4, 0.2]] });
    let (status, json) = send(
        degraded_context(dir.path()),
        make_post_request("/predict", body),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(json["predictions"], serde_json::json!([0]));
    assert_eq!(json["labels"][0], "setosa");
}

// --- / ---

#[tokio::test]
async fn test_explorer_page_renders() {
    let app = router(fitted_context());
    let resp = ServiceExt::<axum::http::Request<Body>>::oneshot(app, make_request("/"))
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body = axum::body::to_bytes(resp.into_body(), 100_000)
        .await
        .unwrap();
    let page = String::from_utf8(body.to_vec()).unwrap();
    assert!(page.contains("Iris model explorer"));
    assert!(page.contains("sepal length (cm)"));
}
