//! Flags rows outside their group's numeric bounds.

use indexmap::IndexMap;

use super::thresholds::{
    GroupKey, ThresholdDescriptor, resolve_grouping_columns, resolve_numeric_column,
};
use crate::error::{AssayError, Result};
use crate::input::DataTable;
use crate::validation::{Finding, FindingKind};

/// Applies a [`ThresholdDescriptor`] to a table.
///
/// Pure and stateless. Findings preserve row order; use
/// [`group_findings`] to regroup them by cohort for display.
#[derive(Debug, Clone, Default)]
pub struct OutlierDetector;

impl OutlierDetector {
    pub fn new() -> Self {
        Self
    }

    /// Compare each row's numeric value against its group's bounds.
    ///
    /// Rows with the all-empty sentinel key are skipped. Withheld cells
    /// are skipped by policy (suppressed data is not anomalous). A cohort
    /// absent from the descriptor fails with
    /// [`AssayError::GroupKeyNotFound`], signalling a threshold rebuild;
    /// unparseable numeric cells become per-row findings instead.
    pub fn detect(
        &self,
        table: &DataTable,
        descriptor: &ThresholdDescriptor,
    ) -> Result<Vec<Finding>> {
        let group_columns = resolve_grouping_columns(table, &descriptor.grouping_fields)?;
        let numeric_column = resolve_numeric_column(table)?;
        let field = table.headers[numeric_column].clone();

        let mut findings = Vec::new();
        for row in 0..table.row_count() {
            let key = GroupKey::from_row(table, row, &group_columns);
            if key.is_empty_sentinel() {
                continue;
            }
            let bounds = descriptor
                .bounds_for(&key)
                .ok_or_else(|| AssayError::GroupKeyNotFound {
                    key: key.to_string(),
                })?;

            let cell = table.get(row, numeric_column).unwrap_or("");
            if cell.is_empty() || DataTable::is_withheld(cell) {
                continue;
            }
            let Ok(value) = cell.trim().parse::<f64>() else {
                findings.push(Finding::cell(
                    row,
                    &field,
                    FindingKind::MalformedCell,
                    format!("'{cell}' is not numeric"),
                ));
                continue;
            };

            if value < bounds.lower {
                findings.push(Finding::cell(
                    row,
                    &field,
                    FindingKind::LowOutlier,
                    format!("{value} below lower bound {} for group '{key}'", bounds.lower),
                ));
            } else if value > bounds.upper {
                findings.push(Finding::cell(
                    row,
                    &field,
                    FindingKind::HighOutlier,
                    format!("{value} above upper bound {} for group '{key}'", bounds.upper),
                ));
            }
        }

        Ok(findings)
    }
}

/// Regroup row-ordered findings by serialized group key, in first-seen
/// order. Intended for display; detection output itself stays row-ordered.
pub fn group_findings<'a>(
    findings: &'a [Finding],
    table: &DataTable,
    grouping_fields: &[String],
) -> Result<IndexMap<String, Vec<&'a Finding>>> {
    let group_columns = resolve_grouping_columns(table, grouping_fields)?;

    let mut grouped: IndexMap<String, Vec<&Finding>> = IndexMap::new();
    for finding in findings {
        let Some(row) = finding.row else {
            continue;
        };
        let key = GroupKey::from_row(table, row, &group_columns);
        grouped.entry(key.serialize()).or_default().push(finding);
    }
    Ok(grouped)
}

#[cfg(test)]
mod tests {
    use indexmap::IndexMap;

    use super::*;
    use crate::stats::Bounds;

    fn table(headers: &[&str], rows: &[&[&str]]) -> DataTable {
        DataTable::new(
            headers.iter().map(|s| s.to_string()).collect(),
            rows.iter()
                .map(|r| r.iter().map(|s| s.to_string()).collect())
                .collect(),
            b',',
        )
    }

    fn descriptor(grouping: &[&str], bounds: &[(&str, f64, f64)]) -> ThresholdDescriptor {
        let mut map = IndexMap::new();
        for (key, lower, upper) in bounds {
            map.insert(
                key.to_string(),
                Bounds {
                    lower: *lower,
                    upper: *upper,
                },
            );
        }
        ThresholdDescriptor {
            grouping_fields: grouping.iter().map(|s| s.to_string()).collect(),
            bounds: map,
        }
    }

    #[test]
    fn test_high_low_and_withheld() {
        let t = table(
            &["Commodity", "Revenues"],
            &[
                &["Coal", "1000"],
                &["Coal", "250"],
                &["Coal", "-5"],
                &["Coal", "Withheld"],
                &["Coal", "W"],
            ],
        );
        let d = descriptor(&["Commodity"], &[("Coal", 0.0, 500.0)]);

        let findings = OutlierDetector::new().detect(&t, &d).unwrap();
        let kinds: Vec<(Option<usize>, FindingKind)> =
            findings.iter().map(|f| (f.row, f.kind)).collect();
        assert_eq!(
            kinds,
            vec![
                (Some(0), FindingKind::HighOutlier),
                (Some(2), FindingKind::LowOutlier),
            ]
        );
    }

    #[test]
    fn test_unknown_group_fails_with_group_key_not_found() {
        let t = table(&["Commodity", "Revenues"], &[&["Gold", "10"]]);
        let d = descriptor(&["Commodity"], &[("Coal", 0.0, 500.0)]);

        let err = OutlierDetector::new().detect(&t, &d).unwrap_err();
        assert!(matches!(err, AssayError::GroupKeyNotFound { key } if key == "Gold"));
    }

    #[test]
    fn test_empty_sentinel_rows_skipped() {
        let t = table(&["Commodity", "Revenues"], &[&["", "999999"]]);
        let d = descriptor(&["Commodity"], &[("Coal", 0.0, 500.0)]);

        let findings = OutlierDetector::new().detect(&t, &d).unwrap();
        assert!(findings.is_empty());
    }

    #[test]
    fn test_malformed_numeric_cell_is_a_finding() {
        let t = table(&["Commodity", "Revenues"], &[&["Coal", "ten"]]);
        let d = descriptor(&["Commodity"], &[("Coal", 0.0, 500.0)]);

        let findings = OutlierDetector::new().detect(&t, &d).unwrap();
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].kind, FindingKind::MalformedCell);
    }

    #[test]
    fn test_group_findings_first_seen_order() {
        let t = table(
            &["Commodity", "Revenues"],
            &[&["Coal", "1000"], &["Gold", "900"], &["Coal", "800"]],
        );
        let d = descriptor(
            &["Commodity"],
            &[("Coal", 0.0, 500.0), ("Gold", 0.0, 500.0)],
        );

        let findings = OutlierDetector::new().detect(&t, &d).unwrap();
        let grouped =
            group_findings(&findings, &t, &d.grouping_fields).unwrap();
        let keys: Vec<&String> = grouped.keys().collect();
        assert_eq!(keys, vec!["Coal", "Gold"]);
        assert_eq!(grouped["Coal"].len(), 2);
    }
}
