//! Per-group numeric bounds derived from a reference table.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{AssayError, Result};
use crate::input::DataTable;

/// Separator between grouping-field values in a serialized group key.
const KEY_SEPARATOR: &str = " | ";

/// Values of the grouping fields for one row, in grouping-field order.
/// Identifies a statistical cohort.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GroupKey(Vec<String>);

impl GroupKey {
    pub fn new(parts: Vec<String>) -> Self {
        Self(parts)
    }

    /// Key for a row, given the resolved grouping-column positions.
    pub fn from_row(table: &DataTable, row: usize, columns: &[usize]) -> Self {
        Self(
            columns
                .iter()
                .map(|&col| table.get(row, col).unwrap_or("").to_string())
                .collect(),
        )
    }

    /// The all-empty sentinel key, excluded from grouping.
    pub fn is_empty_sentinel(&self) -> bool {
        self.0.iter().all(|part| part.is_empty())
    }

    /// Stable string form used as the persisted map key.
    pub fn serialize(&self) -> String {
        self.0.join(KEY_SEPARATOR)
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.serialize())
    }
}

/// Inclusive numeric bounds for one group.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub lower: f64,
    pub upper: f64,
}

/// Per-group bounds plus the grouping fields that produced them.
/// Rebuilt wholesale, never patched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdDescriptor {
    /// Ordered grouping fields.
    pub grouping_fields: Vec<String>,
    /// Serialized group key -> bounds, in first-seen order.
    pub bounds: IndexMap<String, Bounds>,
}

impl ThresholdDescriptor {
    /// Bounds for a group, if the cohort is covered.
    pub fn bounds_for(&self, key: &GroupKey) -> Option<Bounds> {
        self.bounds.get(&key.serialize()).copied()
    }
}

/// Position of the numeric column: a field literally named "Revenues"
/// wins; otherwise the last header field.
pub fn resolve_numeric_column(table: &DataTable) -> Result<usize> {
    if let Some(col) = table.column_index("Revenues") {
        return Ok(col);
    }
    if table.headers.is_empty() {
        return Err(AssayError::EmptyData("table has no columns".to_string()));
    }
    Ok(table.headers.len() - 1)
}

/// Resolve grouping-field names to column positions.
pub(crate) fn resolve_grouping_columns(
    table: &DataTable,
    grouping_fields: &[String],
) -> Result<Vec<usize>> {
    grouping_fields
        .iter()
        .map(|field| {
            table
                .column_index(field)
                .ok_or_else(|| AssayError::Config(format!("grouping field '{field}' not in table")))
        })
        .collect()
}

/// Derives a [`ThresholdDescriptor`] from a reference table.
///
/// The table must already have withheld sentinels neutralized to 0 by
/// the caller, so the numeric column parses cleanly.
#[derive(Debug, Clone)]
pub struct GroupStats {
    multiplier: f64,
}

impl GroupStats {
    /// Default multiplier of 3 standard deviations.
    pub fn new() -> Self {
        Self { multiplier: 3.0 }
    }

    /// Custom multiplier for the mean +/- k*std band.
    pub fn with_multiplier(multiplier: f64) -> Self {
        Self { multiplier }
    }

    /// Partition rows by group key and compute per-group bounds.
    pub fn derive(
        &self,
        table: &DataTable,
        grouping_fields: &[String],
    ) -> Result<ThresholdDescriptor> {
        if grouping_fields.is_empty() {
            return Err(AssayError::Config(
                "at least one grouping field is required".to_string(),
            ));
        }
        let group_columns = resolve_grouping_columns(table, grouping_fields)?;
        let numeric_column = resolve_numeric_column(table)?;

        let mut groups: IndexMap<GroupKey, Vec<f64>> = IndexMap::new();
        for row in 0..table.row_count() {
            let key = GroupKey::from_row(table, row, &group_columns);
            if key.is_empty_sentinel() {
                continue;
            }
            let cell = table.get(row, numeric_column).unwrap_or("");
            if let Ok(value) = cell.trim().parse::<f64>() {
                groups.entry(key).or_default().push(value);
            }
        }

        let mut bounds = IndexMap::new();
        for (key, values) in &groups {
            if values.is_empty() {
                continue;
            }
            bounds.insert(key.serialize(), group_bounds(values, self.multiplier));
        }

        Ok(ThresholdDescriptor {
            grouping_fields: grouping_fields.to_vec(),
            bounds,
        })
    }
}

impl Default for GroupStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Bounds for one group's values. Groups too small for a sample standard
/// deviation, or with degenerate (zero) deviation, fall back to the
/// observed [min, max].
fn group_bounds(values: &[f64], multiplier: f64) -> Bounds {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    let n = values.len();
    if n < 2 {
        return Bounds {
            lower: min,
            upper: max,
        };
    }

    let mean = values.iter().sum::<f64>() / n as f64;
    let variance = values
        .iter()
        .map(|v| (v - mean).powi(2))
        .sum::<f64>()
        / (n - 1) as f64;
    let std = variance.sqrt();

    if std == 0.0 || !std.is_finite() {
        return Bounds {
            lower: min,
            upper: max,
        };
    }

    Bounds {
        lower: mean - multiplier * std,
        upper: mean + multiplier * std,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(headers: &[&str], rows: &[&[&str]]) -> DataTable {
        DataTable::new(
            headers.iter().map(|s| s.to_string()).collect(),
            rows.iter()
                .map(|r| r.iter().map(|s| s.to_string()).collect())
                .collect(),
            b',',
        )
    }

    fn fields(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_revenues_wins_over_last_column() {
        let t = table(&["Commodity", "Revenues", "Notes"], &[]);
        assert_eq!(resolve_numeric_column(&t).unwrap(), 1);

        let t = table(&["Commodity", "Volume"], &[]);
        assert_eq!(resolve_numeric_column(&t).unwrap(), 1);
    }

    #[test]
    fn test_zero_variance_falls_back_to_min_max() {
        let t = table(
            &["Commodity", "Revenues"],
            &[&["Coal", "10"], &["Coal", "10"], &["Coal", "10"]],
        );
        let descriptor = GroupStats::new()
            .derive(&t, &fields(&["Commodity"]))
            .unwrap();

        let bounds = descriptor.bounds.get("Coal").unwrap();
        assert_eq!(bounds.lower, 10.0);
        assert_eq!(bounds.upper, 10.0);
    }

    #[test]
    fn test_single_value_falls_back_to_min_max() {
        let t = table(&["Commodity", "Revenues"], &[&["Gold", "250"]]);
        let descriptor = GroupStats::new()
            .derive(&t, &fields(&["Commodity"]))
            .unwrap();

        let bounds = descriptor.bounds.get("Gold").unwrap();
        assert_eq!(bounds.lower, 250.0);
        assert_eq!(bounds.upper, 250.0);
    }

    #[test]
    fn test_mean_and_sample_std_band() {
        let t = table(
            &["Commodity", "Revenues"],
            &[&["Coal", "10"], &["Coal", "20"], &["Coal", "30"]],
        );
        let descriptor = GroupStats::new()
            .derive(&t, &fields(&["Commodity"]))
            .unwrap();

        // mean 20, sample std 10, k = 3
        let bounds = descriptor.bounds.get("Coal").unwrap();
        assert!((bounds.lower - -10.0).abs() < 1e-9);
        assert!((bounds.upper - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_sentinel_group_skipped() {
        let t = table(
            &["Commodity", "Revenues"],
            &[&["", "10"], &["Coal", "20"]],
        );
        let descriptor = GroupStats::new()
            .derive(&t, &fields(&["Commodity"]))
            .unwrap();

        assert!(!descriptor.bounds.contains_key(""));
        assert!(descriptor.bounds.contains_key("Coal"));
    }

    #[test]
    fn test_composite_key_serialization() {
        let t = table(
            &["Commodity", "State", "Revenues"],
            &[&["Coal", "TX", "10"], &["Coal", "TX", "20"]],
        );
        let descriptor = GroupStats::new()
            .derive(&t, &fields(&["Commodity", "State"]))
            .unwrap();

        assert!(descriptor.bounds.contains_key("Coal | TX"));
    }

    #[test]
    fn test_unknown_grouping_field_is_config_error() {
        let t = table(&["Commodity", "Revenues"], &[]);
        let err = GroupStats::new()
            .derive(&t, &fields(&["Nope"]))
            .unwrap_err();
        assert!(matches!(err, AssayError::Config(_)));
    }
}
