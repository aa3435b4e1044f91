//! Validation: the findings model and the schema checks.

mod annotate;
mod finding;
mod validator;

pub use annotate::{annotate, flagged_cells};
pub use finding::{Finding, FindingKind, Severity};
pub use validator::Validator;
