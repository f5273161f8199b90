//! In-memory tabular dataset with JSON-typed cells.
//!
//! A [`Frame`] is a named-column table where each cell is a
//! `serde_json::Value` and `Value::Null` marks a missing observation.
//! This is the unit of exchange between extraction, preprocessing,
//! training, and the catalog.

use crate::error::{DataError, Result};
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A batch of rows under a shared column header.
///
/// Invariant: every row holds exactly `columns.len()` cells. Constructors
/// validate this; direct field construction is not exposed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl Frame {
    /// Build a frame, checking that every row matches the header width.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Result<Self> {
        let expected = columns.len();
        for (i, row) in rows.iter().enumerate() {
            if row.len() != expected {
                return Err(DataError::RowWidth {
                    row: i,
                    expected,
                    actual: row.len(),
                }
                .into());
            }
        }
        Ok(Self { columns, rows })
    }

    /// A frame with a header and no rows.
    pub fn empty(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a column by name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Number of null cells in the named column.
    pub fn null_count(&self, name: &str) -> Result<usize> {
        let idx = self
            .column_index(name)
            .ok_or_else(|| DataError::ColumnMissing {
                column: name.to_string(),
            })?;
        Ok(self.rows.iter().filter(|r| r[idx].is_null()).count())
    }

    /// Remove every row that has a null in any of the named columns.
    ///
    /// Only the named columns are inspected; nulls elsewhere survive. An
    /// empty `columns` list returns the frame unchanged. Row and column
    /// order are preserved. Naming an absent column is an error.
    pub fn drop_null_rows(&self, columns: &[String]) -> Result<Frame> {
        let mut indices = Vec::with_capacity(columns.len());
        for name in columns {
            let idx = self
                .column_index(name)
                .ok_or_else(|| DataError::ColumnMissing {
                    column: name.clone(),
                })?;
            indices.push(idx);
        }
        if indices.is_empty() {
            return Ok(self.clone());
        }
        let rows = self
            .rows
            .iter()
            .filter(|row| indices.iter().all(|&i| !row[i].is_null()))
            .cloned()
            .collect();
        Ok(Frame {
            columns: self.columns.clone(),
            rows,
        })
    }

    /// Split into a numeric feature matrix and an integer label vector.
    ///
    /// Every column except `target` becomes a feature, in header order.
    /// Fails with `ColumnMissing` if the target is absent and with
    /// `NonNumeric` naming the offending cell if a value cannot be read
    /// as a number.
    pub fn split_features_target(&self, target: &str) -> Result<(Array2<f64>, Vec<i64>)> {
        let target_idx = self
            .column_index(target)
            .ok_or_else(|| DataError::ColumnMissing {
                column: target.to_string(),
            })?;
        let feature_idx: Vec<usize> = (0..self.columns.len())
            .filter(|&i| i != target_idx)
            .collect();

        let mut x = Array2::<f64>::zeros((self.rows.len(), feature_idx.len()));
        let mut y = Vec::with_capacity(self.rows.len());
        for (r, row) in self.rows.iter().enumerate() {
            for (slot, &c) in feature_idx.iter().enumerate() {
                x[[r, slot]] = as_float(&row[c]).ok_or_else(|| DataError::NonNumeric {
                    row: r,
                    column: self.columns[c].clone(),
                })?;
            }
            y.push(
                as_label(&row[target_idx]).ok_or_else(|| DataError::NonNumeric {
                    row: r,
                    column: self.columns[target_idx].clone(),
                })?,
            );
        }
        Ok((x, y))
    }

    /// Names of every column except `target`, in header order.
    pub fn feature_names(&self, target: &str) -> Vec<String> {
        self.columns
            .iter()
            .filter(|c| c.as_str() != target)
            .cloned()
            .collect()
    }

    /// Encode as CSV: header line, one line per row, empty cell for null.
    ///
    /// Cells are written verbatim; the codec assumes values free of commas
    /// and newlines, which holds for numeric frames like ours.
    pub fn to_csv(&self) -> String {
        let mut out = String::new();
        out.push_str(&self.columns.join(","));
        out.push('\n');
        for row in &self.rows {
            let line: Vec<String> = row.iter().map(cell_to_csv).collect();
            out.push_str(&line.join(","));
            out.push('\n');
        }
        out
    }

    /// Decode CSV produced by [`Frame::to_csv`] (or any plain CSV without
    /// quoting). Empty cells become null; numeric-looking cells become
    /// numbers; everything else stays a string. Blank lines are skipped,
    /// except in single-column data where a blank line is a null cell.
    pub fn from_csv(text: &str) -> Result<Frame> {
        let mut lines = text.lines();
        let header = match lines.next() {
            Some(h) if !h.trim().is_empty() => h,
            _ => return Ok(Frame::empty(Vec::new())),
        };
        let columns: Vec<String> = header.split(',').map(|s| s.trim().to_string()).collect();
        let width = columns.len();

        let mut rows = Vec::new();
        for (i, line) in lines.enumerate() {
            if line.trim().is_empty() && width != 1 {
                continue;
            }
            let row: Vec<Value> = line.split(',').map(|s| cell_from_csv(s.trim())).collect();
            if row.len() != width {
                return Err(DataError::RowWidth {
                    row: i,
                    expected: width,
                    actual: row.len(),
                }
                .into());
            }
            rows.push(row);
        }
        Ok(Frame { columns, rows })
    }
}

fn as_float(value: &Value) -> Option<f64> {
    value.as_f64()
}

/// Read a class label as an integer, accepting whole-valued floats.
fn as_label(value: &Value) -> Option<i64> {
    if let Some(i) = value.as_i64() {
        return Some(i);
    }
    match value.as_f64() {
        Some(f) if f.fract() == 0.0 => Some(f as i64),
        _ => None,
    }
}

fn cell_to_csv(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn cell_from_csv(cell: &str) -> Value {
    if cell.is_empty() {
        return Value::Null;
    }
    if let Ok(i) = cell.parse::<i64>() {
        return Value::Number(i.into());
    }
    if let Ok(f) = cell.parse::<f64>() {
        if let Some(n) = serde_json::Number::from_f64(f) {
            return Value::Number(n);
        }
    }
    Value::String(cell.to_string())
}
