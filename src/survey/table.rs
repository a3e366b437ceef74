//! Tabular survey input
//!
//! A minimal named-column numeric table. Survey data arrives either as an
//! in-memory table built by the caller or as delimited text; column names
//! are configurable (defaults `MD`, `DIP`, `AZI`). Full file-format
//! handling (LAS/DLIS, units, comments) belongs to the data-loading layer,
//! not here.

use super::{stations_from_columns, SurveyError, SurveyStation};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// In-memory table of named f64 columns with equal lengths.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SurveyTable {
    columns: Vec<String>,
    /// Column-major storage, one Vec per column
    data: Vec<Vec<f64>>,
}

impl SurveyTable {
    /// Create an empty table with the given column names.
    pub fn new<S: Into<String>>(columns: Vec<S>) -> Self {
        let columns: Vec<String> = columns.into_iter().map(Into::into).collect();
        let data = vec![Vec::new(); columns.len()];
        Self { columns, data }
    }

    /// Build a table directly from parallel columns of equal length.
    /// Crate-internal; external callers go through `new` + `push_row`.
    pub(crate) fn from_parallel_columns(columns: Vec<String>, data: Vec<Vec<f64>>) -> Self {
        debug_assert_eq!(columns.len(), data.len());
        Self { columns, data }
    }

    /// Append one row. The row length must match the column count.
    pub fn push_row(&mut self, row: &[f64]) -> Result<(), SurveyError> {
        if row.len() != self.columns.len() {
            return Err(SurveyError::RaggedRow {
                line: self.len() + 1,
                expected: self.columns.len(),
                got: row.len(),
            });
        }
        for (column, &value) in self.data.iter_mut().zip(row.iter()) {
            column.push(value);
        }
        Ok(())
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.data.first().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Column names in order.
    pub fn column_names(&self) -> &[String] {
        &self.columns
    }

    /// Values of a named column, if present.
    pub fn column(&self, name: &str) -> Option<&[f64]> {
        let idx = self.columns.iter().position(|c| c == name)?;
        Some(&self.data[idx])
    }

    /// Values of a named column, or a `MissingColumn` error naming it.
    pub fn require_column(&self, name: &str) -> Result<&[f64], SurveyError> {
        self.column(name)
            .ok_or_else(|| SurveyError::MissingColumn(name.to_string()))
    }

    /// Extract validated survey stations using the given column names.
    pub fn stations(
        &self,
        md_column: &str,
        dip_column: &str,
        azimuth_column: &str,
    ) -> Result<Vec<SurveyStation>, SurveyError> {
        let md = self.require_column(md_column)?;
        let inc = self.require_column(dip_column)?;
        let azi = self.require_column(azimuth_column)?;
        stations_from_columns(md, inc, azi)
    }

    /// Parse delimited text (first line is the header row).
    ///
    /// Quote-aware: delimiters inside double quotes do not split, and `""`
    /// inside a quoted field is an escaped quote. Empty lines are skipped.
    pub fn from_delimited(text: &str, delimiter: char) -> Result<Self, SurveyError> {
        let mut lines = text
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty());

        let (_, header) = lines.next().ok_or(SurveyError::EmptyInput)?;
        let columns: Vec<String> = split_delimited(header, delimiter)
            .into_iter()
            .map(|field| field.trim().to_string())
            .collect();
        let mut table = Self::new(columns.clone());

        for (line_idx, line) in lines {
            let fields = split_delimited(line, delimiter);
            if fields.len() != columns.len() {
                return Err(SurveyError::RaggedRow {
                    line: line_idx + 1,
                    expected: columns.len(),
                    got: fields.len(),
                });
            }

            let mut row = Vec::with_capacity(fields.len());
            for (field, column) in fields.iter().zip(columns.iter()) {
                let value: f64 =
                    field
                        .trim()
                        .parse()
                        .map_err(|_| SurveyError::BadNumber {
                            line: line_idx + 1,
                            column: column.clone(),
                            value: field.trim().to_string(),
                        })?;
                row.push(value);
            }
            table.push_row(&row)?;
        }

        debug!(
            rows = table.len(),
            columns = table.columns.len(),
            "parsed delimited survey table"
        );
        Ok(table)
    }
}

/// Split a delimited line respecting quoted fields.
/// Returns owned strings because quoted fields need unquoting.
fn split_delimited(line: &str, delimiter: char) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' => {
                if in_quotes {
                    // Check for escaped quote ("")
                    if chars.peek() == Some(&'"') {
                        current.push('"');
                        chars.next();
                    } else {
                        in_quotes = false;
                    }
                } else {
                    in_quotes = true;
                }
            }
            c if c == delimiter && !in_quotes => {
                fields.push(current.clone());
                current.clear();
            }
            _ => current.push(ch),
        }
    }
    fields.push(current);
    fields
}
