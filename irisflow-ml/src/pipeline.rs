//! Linear pipeline orchestration.
//!
//! One execution is one tracked run: extract -> clean -> train ->
//! report, in that order, with the stage outputs flowing through the
//! catalog. The pipeline is fail-fast; the first stage error closes the
//! run as failed and leaves whatever artifacts were already written.

use crate::tasks;
use irisflow_core::{
    Catalog, ConfigLoader, PipelineConfig, Result, Run, RunStatus, TrackingStore,
};

/// Observable progress of a pipeline execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    NotStarted,
    ConfigLoaded,
    DataExtracted,
    DataCleaned,
    ModelTrained,
    ReportGenerated,
    Done,
    Failed,
}

/// Summary of a completed execution.
#[derive(Debug, Clone)]
pub struct PipelineReport {
    pub run_id: String,
    pub train_accuracy: f64,
    pub rows_raw: usize,
    pub rows_clean: usize,
}

/// The end-to-end training pipeline.
pub struct Pipeline {
    loader: ConfigLoader,
    catalog: Catalog,
    state: PipelineState,
}

impl Pipeline {
    pub fn new(loader: ConfigLoader, catalog: Catalog) -> Self {
        Self {
            loader,
            catalog,
            state: PipelineState::NotStarted,
        }
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Execute all stages inside one tracked run.
    ///
    /// Any error aborts the remaining stages, marks the tracked run
    /// failed, and leaves the pipeline in [`PipelineState::Failed`].
    /// There is no rollback and no retry.
    pub fn run(&mut self) -> Result<PipelineReport> {
        self.state = PipelineState::NotStarted;
        match self.execute() {
            Ok(report) => {
                self.state = PipelineState::Done;
                tracing::info!(
                    run_id = %report.run_id,
                    train_accuracy = report.train_accuracy,
                    "pipeline finished"
                );
                Ok(report)
            }
            Err(e) => {
                self.state = PipelineState::Failed;
                tracing::error!(error = %e, "pipeline failed");
                Err(e)
            }
        }
    }

    fn execute(&mut self) -> Result<PipelineReport> {
        let config = self.loader.load()?;
        self.state = PipelineState::ConfigLoaded;

        let store = TrackingStore::open(&config.tracking)?;
        let run = store.start_run()?;
        let run_id = run.id().to_string();

        match self.run_stages(&config, &run) {
            Ok((train_accuracy, rows_raw, rows_clean)) => {
                run.finish(RunStatus::Finished)?;
                Ok(PipelineReport {
                    run_id,
                    train_accuracy,
                    rows_raw,
                    rows_clean,
                })
            }
            Err(e) => {
                if let Err(finish_err) = run.finish(RunStatus::Failed) {
                    tracing::error!(error = %finish_err, "could not close failed run");
                }
                Err(e)
            }
        }
    }

    fn run_stages(&mut self, config: &PipelineConfig, run: &Run) -> Result<(f64, usize, usize)> {
        let raw = tasks::extract_data(&self.catalog)?;
        self.state = PipelineState::DataExtracted;

        let cleaned = tasks::clean_data(&raw, &config.preprocessing, &self.catalog)?;
        self.state = PipelineState::DataCleaned;

        let (model, train_accuracy) =
            tasks::train_model(&cleaned, &config.model, &self.catalog, run)?;
        self.state = PipelineState::ModelTrained;

        tasks::generate_report(
            &model,
            &cleaned,
            &config.model,
            &config.plotting,
            &self.catalog,
            run,
        )?;
        self.state = PipelineState::ReportGenerated;

        Ok((train_accuracy, raw.n_rows(), cleaned.n_rows()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::tempdir;

    #[test]
    fn test_new_pipeline_is_not_started() {
        let pipeline = Pipeline::new(
            ConfigLoader::with_paths(Vec::new()),
            Catalog::new(),
        );
        assert_eq!(pipeline.state(), PipelineState::NotStarted);
    }

    #[test]
    fn test_missing_config_file_fails_fast() {
        let loader = ConfigLoader::with_paths(vec![PathBuf::from("missing.yaml")]);
        let mut pipeline = Pipeline::new(loader, Catalog::new());
        assert!(pipeline.run().is_err());
        assert_eq!(pipeline.state(), PipelineState::Failed);
    }

    #[test]
    fn test_pipeline_runs_to_done() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("modeling.yaml");
        std::fs::write(
            &config_path,
            format!(
                "model:\n  n_estimators: 3\ntracking:\n  uri: file:{}\n  experiment_name: unit\n",
                dir.path().join("mlruns").display()
            ),
        )
        .unwrap();
        let loader = ConfigLoader::with_paths(vec![config_path]);
        let catalog = Catalog::in_dir(&dir.path().join("data"));

        let mut pipeline = Pipeline::new(loader, catalog);
        let report = pipeline.run().unwrap();
        assert_eq!(pipeline.state(), PipelineState::Done);
        assert_eq!(report.rows_raw, 150);
        assert_eq!(report.rows_clean, 150);
        assert!(report.train_accuracy >= 0.9);
    }

    #[test]
    fn test_stage_error_leaves_failed_state() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("preprocessing.yaml");
        std::fs::write(
            &config_path,
            format!(
                "preprocessing:\n  dropna_columns: [ghost]\ntracking:\n  uri: file:{}\n",
                dir.path().join("mlruns").display()
            ),
        )
        .unwrap();
        let loader = ConfigLoader::with_paths(vec![config_path]);
        let catalog = Catalog::in_dir(&dir.path().join("data"));

        let mut pipeline = Pipeline::new(loader, catalog);
        assert!(pipeline.run().is_err());
        assert_eq!(pipeline.state(), PipelineState::Failed);
        // The raw extraction had already happened and is left in place.
        assert!(pipeline.catalog().load_frame("raw_data").is_ok());
    }
}
