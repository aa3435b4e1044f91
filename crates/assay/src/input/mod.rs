//! Table loading: CSV/TSV parsing and the in-memory table model.

mod parser;
mod source;

pub use parser::{Parser, ParserConfig};
pub use source::{DataTable, SourceMetadata};
