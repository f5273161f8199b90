//! End-to-end pipeline tests over the embedded iris data.

use std::path::{Path, PathBuf};

use irisflow_core::error::DataError;
use irisflow_core::{Catalog, ConfigLoader, FlowError, RunMeta, RunStatus};
use irisflow_ml::{ForestClassifier, Pipeline, PipelineState};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

/// Write the three conventional config files under `<root>/configs`,
/// with the tracking store pointed into the temp directory.
fn write_configs(root: &Path, modeling_extra: &str) -> PathBuf {
    let configs = root.join("configs");
    std::fs::create_dir_all(&configs).unwrap();
    std::fs::write(
        configs.join("preprocessing.yaml"),
        "preprocessing:\n  dropna_columns:\n    - \"sepal length (cm)\"\n    - \"sepal width (cm)\"\n    - \"petal length (cm)\"\n    - \"petal width (cm)\"\n",
    )
    .unwrap();
    std::fs::write(
        configs.join("modeling.yaml"),
        format!(
            "model:\n  target: target\n{modeling_extra}tracking:\n  uri: file:{}\n  experiment_name: iris-e2e\n",
            root.join("mlruns").display()
        ),
    )
    .unwrap();
    std::fs::write(
        configs.join("plotting.yaml"),
        "plotting:\n  filename: accuracy.svg\n  title: Training metrics\n",
    )
    .unwrap();
    configs
}

fn single_run_dir(experiment_dir: &Path) -> PathBuf {
    let mut runs: Vec<PathBuf> = std::fs::read_dir(experiment_dir)
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .filter(|path| path.is_dir())
        .collect();
    assert_eq!(runs.len(), 1, "expected exactly one run in {experiment_dir:?}");
    runs.pop().unwrap()
}

#[test]
fn test_full_run_trains_and_reports() {
    let tmp = TempDir::new().unwrap();
    let configs = write_configs(tmp.path(), "");
    let loader = ConfigLoader::from_dir(&configs);
    let catalog = Catalog::in_dir(&tmp.path().join("data"));

    let mut pipeline = Pipeline::new(loader, catalog.clone());
    let report = pipeline.run().expect("pipeline should succeed");

    assert_eq!(pipeline.state(), PipelineState::Done);
    assert_eq!(report.rows_raw, 150);
    assert_eq!(report.rows_clean, 150);
    assert!(
        report.train_accuracy >= 0.9,
        "train accuracy {} below 0.9",
        report.train_accuracy
    );

    // Every stage output is loadable back through the catalog.
    assert_eq!(catalog.load_frame("raw_data").unwrap().n_rows(), 150);
    assert_eq!(catalog.load_frame("processed_data").unwrap().n_rows(), 150);
    let model = ForestClassifier::from_value(catalog.load_json("model").unwrap()).unwrap();
    assert_eq!(model.n_features(), 4);
    assert_eq!(model.n_trees(), 100);
    assert_eq!(model.predict_one(&[5.1, 3.5, 1.4, 0.2]).unwrap(), 0);
    let svg = catalog.load_svg("accuracy_plot").unwrap();
    assert!(svg.contains("train_accuracy"));

    // The tracked run holds the param, the metric, and the chart.
    let run_dir = single_run_dir(&tmp.path().join("mlruns/iris-e2e"));
    assert_eq!(
        run_dir.file_name().unwrap().to_str().unwrap(),
        report.run_id
    );
    let meta = RunMeta::load(&run_dir).unwrap();
    assert_eq!(meta.status, RunStatus::Finished);
    assert!(meta.end_time.is_some());

    let param = std::fs::read_to_string(run_dir.join("params/n_estimators")).unwrap();
    assert_eq!(param.trim(), "100");

    let metric = std::fs::read_to_string(run_dir.join("metrics/train_accuracy")).unwrap();
    let logged: f64 = metric
        .split_whitespace()
        .nth(1)
        .unwrap()
        .parse()
        .unwrap();
    assert!((logged - report.train_accuracy).abs() < 1e-12);

    assert!(run_dir.join("artifacts/plots/accuracy.svg").is_file());
}

#[test]
fn test_same_config_reproduces_accuracy() {
    let mut accuracies = Vec::new();
    for _ in 0..2 {
        let tmp = TempDir::new().unwrap();
        let configs = write_configs(tmp.path(), "  n_estimators: 30\n");
        let loader = ConfigLoader::from_dir(&configs);
        let catalog = Catalog::in_dir(&tmp.path().join("data"));
        let mut pipeline = Pipeline::new(loader, catalog);
        accuracies.push(pipeline.run().unwrap().train_accuracy);
    }
    assert_eq!(accuracies[0], accuracies[1]);
}

#[test]
fn test_missing_target_column_fails_run() {
    let tmp = TempDir::new().unwrap();
    // target_column wins over target, and no such column exists.
    let configs = write_configs(tmp.path(), "  target_column: species\n");
    let loader = ConfigLoader::from_dir(&configs);
    let catalog = Catalog::in_dir(&tmp.path().join("data"));

    let mut pipeline = Pipeline::new(loader, catalog.clone());
    let err = pipeline.run().unwrap_err();
    match err {
        FlowError::Data(DataError::ColumnMissing { column }) => {
            assert_eq!(column, "species");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(pipeline.state(), PipelineState::Failed);

    // Earlier stage outputs stay; the model was never written.
    assert!(catalog.load_frame("raw_data").is_ok());
    assert!(catalog.load_frame("processed_data").is_ok());
    assert!(catalog.load_json("model").is_err());

    let run_dir = single_run_dir(&tmp.path().join("mlruns/iris-e2e"));
    assert_eq!(RunMeta::load(&run_dir).unwrap().status, RunStatus::Failed);
}
