//! Name-addressed artifact catalog.
//!
//! Pipeline stages exchange artifacts exclusively through the catalog:
//! a stage saves under a registered name, the next stage loads by that
//! name, and nobody hardcodes file paths. Entries map a name to a path
//! on disk plus the serialization format stored there.

use crate::error::{CatalogError, Result};
use crate::frame::Frame;
use crate::persist::atomic_write;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// On-disk serialization format of a catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactFormat {
    Csv,
    Json,
    Svg,
}

impl ArtifactFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArtifactFormat::Csv => "csv",
            ArtifactFormat::Json => "json",
            ArtifactFormat::Svg => "svg",
        }
    }
}

/// A materialized artifact, tagged with its in-memory shape.
#[derive(Debug, Clone, PartialEq)]
pub enum Artifact {
    Frame(Frame),
    Json(serde_json::Value),
    Svg(String),
}

impl Artifact {
    fn format(&self) -> ArtifactFormat {
        match self {
            Artifact::Frame(_) => ArtifactFormat::Csv,
            Artifact::Json(_) => ArtifactFormat::Json,
            Artifact::Svg(_) => ArtifactFormat::Svg,
        }
    }
}

/// One named slot in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub path: PathBuf,
    pub format: ArtifactFormat,
}

impl CatalogEntry {
    pub fn new(path: impl Into<PathBuf>, format: ArtifactFormat) -> Self {
        Self {
            path: path.into(),
            format,
        }
    }
}

/// Registry of named artifacts backed by files.
///
/// Loading a name that was never registered, or registered but never
/// written, yields [`CatalogError::DatasetNotFound`]; the caller cannot
/// tell the two apart and does not need to.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: BTreeMap<String, CatalogEntry>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog with the conventional entries rooted at `data_root`:
    /// `raw_data`, `processed_data`, `model`, and `accuracy_plot`.
    pub fn in_dir(data_root: &Path) -> Self {
        let mut catalog = Self::new();
        catalog.register(
            "raw_data",
            CatalogEntry::new(data_root.join("01_raw/iris.csv"), ArtifactFormat::Csv),
        );
        catalog.register(
            "processed_data",
            CatalogEntry::new(
                data_root.join("02_processed/iris_clean.csv"),
                ArtifactFormat::Csv,
            ),
        );
        catalog.register(
            "model",
            CatalogEntry::new(data_root.join("03_models/model.json"), ArtifactFormat::Json),
        );
        catalog.register(
            "accuracy_plot",
            CatalogEntry::new(
                data_root.join("04_reports/accuracy.svg"),
                ArtifactFormat::Svg,
            ),
        );
        catalog
    }

    /// Catalog parsed from a YAML definition file. Relative entry paths
    /// are resolved against `data_root`.
    pub fn from_config(path: &Path, data_root: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let defs: BTreeMap<String, CatalogEntry> =
            serde_yaml::from_str(&text).map_err(|e| CatalogError::Definition {
                message: e.to_string(),
            })?;
        let mut catalog = Self::new();
        for (name, mut entry) in defs {
            if entry.path.is_relative() {
                entry.path = data_root.join(&entry.path);
            }
            catalog.register(name, entry);
        }
        Ok(catalog)
    }

    pub fn register(&mut self, name: impl Into<String>, entry: CatalogEntry) {
        self.entries.insert(name.into(), entry);
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entry(&self, name: &str) -> Result<&CatalogEntry> {
        self.entries
            .get(name)
            .ok_or_else(|| CatalogError::DatasetNotFound { name: name.into() }.into())
    }

    /// Write `artifact` under `name`. The artifact's shape must match
    /// the entry's declared format.
    pub fn save(&self, name: &str, artifact: &Artifact) -> Result<()> {
        let entry = self.entry(name)?;
        if artifact.format() != entry.format {
            return Err(CatalogError::FormatMismatch {
                name: name.into(),
                expected: entry.format.as_str().into(),
            }
            .into());
        }
        let bytes = match artifact {
            Artifact::Frame(frame) => frame.to_csv().into_bytes(),
            Artifact::Json(value) => serde_json::to_string_pretty(value)?.into_bytes(),
            Artifact::Svg(svg) => svg.clone().into_bytes(),
        };
        atomic_write(&entry.path, &bytes)?;
        tracing::debug!(dataset = name, path = %entry.path.display(), "saved artifact");
        Ok(())
    }

    /// Read the artifact registered under `name` back from disk.
    pub fn load(&self, name: &str) -> Result<Artifact> {
        let entry = self.entry(name)?;
        if !entry.path.exists() {
            return Err(CatalogError::DatasetNotFound { name: name.into() }.into());
        }
        let text = std::fs::read_to_string(&entry.path)?;
        let artifact = match entry.format {
            ArtifactFormat::Csv => Artifact::Frame(Frame::from_csv(&text)?),
            ArtifactFormat::Json => Artifact::Json(serde_json::from_str(&text)?),
            ArtifactFormat::Svg => Artifact::Svg(text),
        };
        Ok(artifact)
    }

    pub fn save_frame(&self, name: &str, frame: &Frame) -> Result<()> {
        self.save(name, &Artifact::Frame(frame.clone()))
    }

    pub fn load_frame(&self, name: &str) -> Result<Frame> {
        match self.load(name)? {
            Artifact::Frame(frame) => Ok(frame),
            _ => Err(CatalogError::FormatMismatch {
                name: name.into(),
                expected: ArtifactFormat::Csv.as_str().into(),
            }
            .into()),
        }
    }

    pub fn save_json(&self, name: &str, value: &serde_json::Value) -> Result<()> {
        self.save(name, &Artifact::Json(value.clone()))
    }

    pub fn load_json(&self, name: &str) -> Result<serde_json::Value> {
        match self.load(name)? {
            Artifact::Json(value) => Ok(value),
            _ => Err(CatalogError::FormatMismatch {
                name: name.into(),
                expected: ArtifactFormat::Json.as_str().into(),
            }
            .into()),
        }
    }

    pub fn save_svg(&self, name: &str, svg: &str) -> Result<()> {
        self.save(name, &Artifact::Svg(svg.to_string()))
    }

    pub fn load_svg(&self, name: &str) -> Result<String> {
        match self.load(name)? {
            Artifact::Svg(svg) => Ok(svg),
            _ => Err(CatalogError::FormatMismatch {
                name: name.into(),
                expected: ArtifactFormat::Svg.as_str().into(),
            }
            .into()),
        }
    }
}
