//! In-memory table model and source metadata.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Cell values that denote suppressed data. Excluded from numeric
/// comparisons and, once neutralized, from statistics.
const WITHHELD_SENTINELS: &[&str] = &["W", "Withheld"];

/// Metadata about the source data file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceMetadata {
    /// File name without path.
    pub file: String,
    /// Full path to the file.
    pub path: PathBuf,
    /// SHA-256 hash of the file contents.
    pub hash: String,
    /// File size in bytes.
    pub size_bytes: u64,
    /// Detected format (csv, tsv, etc.).
    pub format: String,
    /// Number of data rows (excluding header).
    pub row_count: usize,
    /// Number of columns.
    pub column_count: usize,
    /// When the file was read.
    pub analyzed_at: DateTime<Utc>,
}

impl SourceMetadata {
    pub fn new(
        path: PathBuf,
        hash: String,
        size_bytes: u64,
        format: String,
        row_count: usize,
        column_count: usize,
    ) -> Self {
        let file = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self {
            file,
            path,
            hash,
            size_bytes,
            format,
            row_count,
            column_count,
            analyzed_at: Utc::now(),
        }
    }
}

/// Parsed tabular data. Headers define column order; rows are rectangular
/// (padded or truncated to the header width) with empty cells normalized
/// to the empty string.
///
/// Checks never mutate a table in place; anything that "flags" or rewrites
/// cells produces a derived copy.
#[derive(Debug, Clone, PartialEq)]
pub struct DataTable {
    /// Column headers.
    pub headers: Vec<String>,
    /// Row data as strings (row-major order).
    pub rows: Vec<Vec<String>>,
    /// The delimiter used.
    pub delimiter: u8,
}

impl DataTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>, delimiter: u8) -> Self {
        Self {
            headers,
            rows,
            delimiter,
        }
    }

    /// Get the number of columns.
    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// Get the number of rows (excluding header).
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Position of a column by name, if present.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Get all values for a column by index.
    pub fn column_values(&self, index: usize) -> impl Iterator<Item = &str> {
        self.rows
            .iter()
            .map(move |row| row.get(index).map(|s| s.as_str()).unwrap_or(""))
    }

    /// Get a specific cell value.
    pub fn get(&self, row: usize, col: usize) -> Option<&str> {
        self.rows
            .get(row)
            .and_then(|r| r.get(col).map(|s| s.as_str()))
    }

    /// Check if a value is the withheld sentinel ("W"/"Withheld").
    pub fn is_withheld(value: &str) -> bool {
        WITHHELD_SENTINELS.contains(&value.trim())
    }

    /// Count withheld sentinels in a named column. Zero when the column
    /// is absent.
    pub fn withheld_count(&self, name: &str) -> usize {
        match self.column_index(name) {
            Some(idx) => self
                .column_values(idx)
                .filter(|v| Self::is_withheld(v))
                .count(),
            None => 0,
        }
    }

    /// Derived copy with every withheld sentinel replaced by "0", so the
    /// numeric column parses cleanly for grouped statistics. The source
    /// table is left untouched.
    pub fn neutralize_withheld(&self) -> DataTable {
        let rows = self
            .rows
            .iter()
            .map(|row| {
                row.iter()
                    .map(|cell| {
                        if Self::is_withheld(cell) {
                            "0".to_string()
                        } else {
                            cell.clone()
                        }
                    })
                    .collect()
            })
            .collect();
        DataTable::new(self.headers.clone(), rows, self.delimiter)
    }
}
