//! Annotated-table derivation for export sinks.

use super::finding::Finding;
use crate::input::DataTable;

/// Marker prepended to flagged cells in an annotated copy. Downstream
/// sinks key their highlighting off this prefix.
pub const FLAG_MARKER: &str = "[!]";

/// (row, column) coordinates of every cell-level finding whose kind
/// flags its cell. Findings on fields absent from the table are skipped.
pub fn flagged_cells(findings: &[Finding], table: &DataTable) -> Vec<(usize, usize)> {
    findings
        .iter()
        .filter(|f| f.kind.flags_cell())
        .filter_map(|f| Some((f.row?, table.column_index(&f.field)?)))
        .collect()
}

/// Derived copy of the table with flagged cells prefixed by [`FLAG_MARKER`].
/// The source table is never modified.
pub fn annotate(table: &DataTable, findings: &[Finding]) -> DataTable {
    let mut annotated = table.clone();
    for (row, col) in flagged_cells(findings, table) {
        if let Some(cell) = annotated.rows.get_mut(row).and_then(|r| r.get_mut(col)) {
            if !cell.starts_with(FLAG_MARKER) {
                *cell = format!("{FLAG_MARKER}{cell}");
            }
        }
    }
    annotated
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::FindingKind;

    fn table(headers: &[&str], rows: &[&[&str]]) -> DataTable {
        DataTable::new(
            headers.iter().map(|s| s.to_string()).collect(),
            rows.iter()
                .map(|r| r.iter().map(|s| s.to_string()).collect())
                .collect(),
            b',',
        )
    }

    #[test]
    fn test_annotate_marks_flagged_cells_only() {
        let t = table(&["Commodity", "State"], &[&["Coal (Tons)", "ZZ"]]);
        let findings = vec![
            Finding::cell(0, "State", FindingKind::UnexpectedValue, "unexpected"),
            Finding::cell(0, "Commodity", FindingKind::Substituted, "rename"),
            Finding::header("State", FindingKind::Ok, "present"),
        ];

        let annotated = annotate(&t, &findings);
        assert_eq!(annotated.get(0, 1), Some("[!]ZZ"));
        assert_eq!(annotated.get(0, 0), Some("Coal (Tons)"));
        // source untouched
        assert_eq!(t.get(0, 1), Some("ZZ"));
    }

    #[test]
    fn test_annotate_does_not_double_mark() {
        let t = table(&["Volume"], &[&[""]]);
        let findings = vec![
            Finding::cell(0, "Volume", FindingKind::MissingValue, "missing"),
            Finding::cell(0, "Volume", FindingKind::MissingValue, "missing"),
        ];
        let annotated = annotate(&t, &findings);
        assert_eq!(annotated.get(0, 0), Some("[!]"));
    }
}
