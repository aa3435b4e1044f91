//! Assay: format checking and numeric outlier detection for tabular datasets.
//!
//! Assay derives descriptors from a reference dataset — expected header
//! order and vocabularies for units and categorical fields, plus
//! per-group numeric bounds — persists them, and validates later
//! datasets against them, reporting structured row-level findings.
//!
//! # Core Principles
//!
//! - **Build once, check repeatedly**: descriptors are derived from a
//!   reference table, persisted, and loaded unchanged for every run
//! - **Non-destructive**: the source table is never modified; flagged
//!   output is a derived copy
//! - **Findings, not failures**: per-row problems are collected as
//!   findings so a run always completes; only store/IO errors are fatal
//!
//! # Example
//!
//! ```no_run
//! use assay::Assay;
//!
//! let assay = Assay::new();
//! let key = assay.build_schema("cy-revenue.csv", None).unwrap();
//! let report = assay.validate("cy-revenue.csv", Some(&key)).unwrap();
//!
//! println!("Findings: {}", report.findings.len());
//! ```

pub mod error;
pub mod input;
pub mod schema;
pub mod stats;
pub mod store;
pub mod validation;

mod assay;

pub use crate::assay::{Assay, AssayConfig, ValidationReport, ValidationSummary};
pub use error::{AssayError, Result};
pub use input::{DataTable, Parser, ParserConfig, SourceMetadata};
pub use schema::{SchemaBuilder, SchemaDescriptor, resolve_item_column, split_unit};
pub use stats::{
    Bounds, GroupKey, GroupStats, OutlierDetector, ThresholdDescriptor, group_findings,
    resolve_numeric_column,
};
pub use store::{SchemaStore, ThresholdStore, descriptor_key};
pub use validation::{Finding, FindingKind, Severity, Validator, annotate, flagged_cells};
