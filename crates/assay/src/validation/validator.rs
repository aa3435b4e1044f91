//! Schema checks over a parsed table.

use chrono::{Datelike, Utc};

use super::finding::{Finding, FindingKind};
use crate::input::DataTable;
use crate::schema::{SchemaDescriptor, resolve_item_column, split_unit};

/// Oldest year accepted by the year check.
const MIN_YEAR: i64 = 1970;

/// Applies a [`SchemaDescriptor`] to a table.
///
/// Pure and side-effect free: the table is never modified and repeated
/// runs over the same inputs return identical finding sequences. Every
/// check runs unconditionally; per-row problems become findings, never
/// errors, so validation always completes.
#[derive(Debug, Clone)]
pub struct Validator {
    current_year: i64,
}

impl Validator {
    /// Validator bounded by the current calendar year.
    pub fn new() -> Self {
        Self {
            current_year: i64::from(Utc::now().year()),
        }
    }

    /// Validator with a fixed upper year bound.
    pub fn with_current_year(current_year: i64) -> Self {
        Self { current_year }
    }

    /// Run all checks and collect findings.
    pub fn validate(&self, table: &DataTable, descriptor: &SchemaDescriptor) -> Vec<Finding> {
        let mut findings = Vec::new();
        self.check_header(table, descriptor, &mut findings);
        self.check_units(table, descriptor, &mut findings);
        self.check_categoricals(table, descriptor, &mut findings);
        self.check_year(table, &mut findings);
        self.check_missing(table, descriptor, &mut findings);
        findings
    }

    /// Expected fields in order, then table fields outside the expected
    /// header. Emits exactly one positional finding per field in the
    /// union of both header sets.
    fn check_header(
        &self,
        table: &DataTable,
        descriptor: &SchemaDescriptor,
        findings: &mut Vec<Finding>,
    ) {
        for (expected_pos, field) in descriptor.header.iter().enumerate() {
            let finding = match table.column_index(field) {
                Some(pos) if pos == expected_pos => {
                    Finding::header(field, FindingKind::Ok, "present at expected position")
                }
                Some(pos) => Finding::header(
                    field,
                    FindingKind::ReorderedField,
                    format!("expected at column {expected_pos}, found at column {pos}"),
                ),
                None => Finding::header(
                    field,
                    FindingKind::MissingField,
                    "not present in the table",
                ),
            };
            findings.push(finding);
        }

        for name in &table.headers {
            if descriptor.header.iter().any(|h| h == name) {
                continue;
            }
            findings.push(Finding::header(
                name,
                FindingKind::UnknownField,
                "not in the expected header",
            ));
            if name.trim() != name {
                findings.push(Finding::header(
                    name,
                    FindingKind::WhitespaceInFieldName,
                    "field name has leading or trailing whitespace",
                ));
            }
        }
    }

    /// Item/unit check over the resolved item column.
    fn check_units(
        &self,
        table: &DataTable,
        descriptor: &SchemaDescriptor,
        findings: &mut Vec<Finding>,
    ) {
        let Some(col) = resolve_item_column(table) else {
            findings.push(Finding::header(
                "",
                FindingKind::NoUnitColumn,
                "no units available",
            ));
            return;
        };
        let field = table.headers[col].clone();

        for (row, cell) in table.column_values(col).enumerate() {
            if cell.is_empty() {
                continue;
            }
            if let Some(canonical) = descriptor.substitution_rules.get(cell) {
                findings.push(Finding::cell(
                    row,
                    &field,
                    FindingKind::Substituted,
                    format!("'{cell}' should be recorded as '{canonical}'"),
                ));
                continue;
            }
            let Some((item, unit)) = split_unit(cell) else {
                findings.push(Finding::cell(
                    row,
                    &field,
                    FindingKind::MalformedCell,
                    format!("cannot split '{cell}' into item and unit"),
                ));
                continue;
            };
            if descriptor.is_known_item(&item) {
                if !descriptor.allows_unit(&item, &unit) {
                    findings.push(Finding::cell(
                        row,
                        &field,
                        FindingKind::UnexpectedUnit,
                        format!("unexpected unit '{unit}' for item '{item}'"),
                    ));
                }
            } else if !item.is_empty() {
                findings.push(Finding::cell(
                    row,
                    &field,
                    FindingKind::UnknownItem,
                    format!("unknown item '{item}'"),
                ));
            }
        }
    }

    /// Non-empty categorical values must be in the recorded set.
    fn check_categoricals(
        &self,
        table: &DataTable,
        descriptor: &SchemaDescriptor,
        findings: &mut Vec<Finding>,
    ) {
        for (field, values) in &descriptor.categorical_vocabulary {
            let Some(col) = table.column_index(field) else {
                continue;
            };
            for (row, cell) in table.column_values(col).enumerate() {
                if !cell.is_empty() && !values.iter().any(|v| v == cell) {
                    findings.push(Finding::cell(
                        row,
                        field,
                        FindingKind::UnexpectedValue,
                        format!("unexpected entry '{cell}'"),
                    ));
                }
            }
        }
    }

    /// Year values must be integers in [1970, current year].
    fn check_year(&self, table: &DataTable, findings: &mut Vec<Finding>) {
        let field = if table.column_index("Calendar Year").is_some() {
            "Calendar Year"
        } else if table.column_index("Fiscal Year").is_some() {
            "Fiscal Year"
        } else {
            return;
        };
        let col = table.column_index(field).unwrap_or_default();

        for (row, cell) in table.column_values(col).enumerate() {
            let valid = cell
                .trim()
                .parse::<i64>()
                .is_ok_and(|year| (MIN_YEAR..=self.current_year).contains(&year));
            if !valid {
                findings.push(Finding::cell(
                    row,
                    field,
                    FindingKind::InvalidYear,
                    format!("invalid year '{cell}'"),
                ));
            }
        }
    }

    /// Required fields must not contain empty cells.
    fn check_missing(
        &self,
        table: &DataTable,
        descriptor: &SchemaDescriptor,
        findings: &mut Vec<Finding>,
    ) {
        for field in &descriptor.required_fields {
            let Some(col) = table.column_index(field) else {
                continue;
            };
            for (row, cell) in table.column_values(col).enumerate() {
                if cell.is_empty() {
                    findings.push(Finding::cell(
                        row,
                        field,
                        FindingKind::MissingValue,
                        format!("missing {field}"),
                    ));
                }
            }
        }
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}
