//! Structured validation findings.

use serde::{Deserialize, Serialize};

/// What a finding reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingKind {
    /// Field present at the expected position.
    Ok,
    /// Field present but at a different position.
    ReorderedField,
    /// Expected field absent from the table.
    MissingField,
    /// Table field not in the expected header.
    UnknownField,
    /// Field name has leading or trailing whitespace.
    WhitespaceInFieldName,
    /// No item column, so unit checking was skipped.
    NoUnitColumn,
    /// Item matched a substitution rule and should be renamed.
    Substituted,
    /// Unit not recorded for a known item.
    UnexpectedUnit,
    /// Item absent from the unit vocabulary.
    UnknownItem,
    /// Categorical value outside the recorded set.
    UnexpectedValue,
    /// Year outside [1970, current year] or not an integer.
    InvalidYear,
    /// Required field with an empty cell.
    MissingValue,
    /// Cell that cannot be split or parsed.
    MalformedCell,
    /// Value below the group's lower bound.
    LowOutlier,
    /// Value above the group's upper bound.
    HighOutlier,
}

impl FindingKind {
    /// Get a human-readable label for the finding kind.
    pub fn label(&self) -> &'static str {
        match self {
            FindingKind::Ok => "OK",
            FindingKind::ReorderedField => "Reordered Field",
            FindingKind::MissingField => "Missing Field",
            FindingKind::UnknownField => "Unknown Field",
            FindingKind::WhitespaceInFieldName => "Whitespace In Field Name",
            FindingKind::NoUnitColumn => "No Unit Column",
            FindingKind::Substituted => "Substituted",
            FindingKind::UnexpectedUnit => "Unexpected Unit",
            FindingKind::UnknownItem => "Unknown Item",
            FindingKind::UnexpectedValue => "Unexpected Value",
            FindingKind::InvalidYear => "Invalid Year",
            FindingKind::MissingValue => "Missing Value",
            FindingKind::MalformedCell => "Malformed Cell",
            FindingKind::LowOutlier => "Low Outlier",
            FindingKind::HighOutlier => "High Outlier",
        }
    }

    /// Severity of findings of this kind.
    pub fn severity(&self) -> Severity {
        match self {
            FindingKind::Ok | FindingKind::NoUnitColumn | FindingKind::Substituted => {
                Severity::Info
            }
            FindingKind::ReorderedField
            | FindingKind::UnknownField
            | FindingKind::WhitespaceInFieldName
            | FindingKind::UnknownItem
            | FindingKind::LowOutlier
            | FindingKind::HighOutlier => Severity::Warning,
            FindingKind::MissingField
            | FindingKind::UnexpectedUnit
            | FindingKind::UnexpectedValue
            | FindingKind::InvalidYear
            | FindingKind::MissingValue
            | FindingKind::MalformedCell => Severity::Error,
        }
    }

    /// Whether findings of this kind mark their cell in an annotated copy.
    pub fn flags_cell(&self) -> bool {
        matches!(
            self,
            FindingKind::UnexpectedUnit
                | FindingKind::UnknownItem
                | FindingKind::UnexpectedValue
                | FindingKind::InvalidYear
                | FindingKind::MissingValue
                | FindingKind::MalformedCell
                | FindingKind::LowOutlier
                | FindingKind::HighOutlier
        )
    }
}

/// Severity level of a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational only, may not require action.
    Info,
    /// Potential issue that should be reviewed.
    Warning,
    /// Definite issue that should be addressed.
    Error,
}

impl Severity {
    /// Get a human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Info => "Info",
            Severity::Warning => "Warning",
            Severity::Error => "Error",
        }
    }
}

/// One validation or anomaly result. Immutable once created; a run's
/// findings are consumed (reported or exported) and discarded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    /// Zero-based data-row index; `None` for header-level findings.
    pub row: Option<usize>,
    /// Affected field name.
    pub field: String,
    /// Kind of issue.
    pub kind: FindingKind,
    /// Human-readable description.
    pub message: String,
}

impl Finding {
    /// A header-level finding with no row.
    pub fn header(field: impl Into<String>, kind: FindingKind, message: impl Into<String>) -> Self {
        Self {
            row: None,
            field: field.into(),
            kind,
            message: message.into(),
        }
    }

    /// A cell-level finding.
    pub fn cell(
        row: usize,
        field: impl Into<String>,
        kind: FindingKind,
        message: impl Into<String>,
    ) -> Self {
        Self {
            row: Some(row),
            field: field.into(),
            kind,
            message: message.into(),
        }
    }

    /// Severity of this finding.
    pub fn severity(&self) -> Severity {
        self.kind.severity()
    }
}
