//! Command implementations.

pub mod build_schema;
pub mod build_thresholds;
pub mod check;
pub mod check_numbers;

use std::path::{Path, PathBuf};

use assay::DataTable;

/// Write a table as CSV using its own delimiter.
pub fn write_table(table: &DataTable, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(table.delimiter)
        .from_path(path)?;
    writer.write_record(&table.headers)?;
    for row in &table.rows {
        writer.write_record(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Engine rooted at the given config directory.
pub fn engine(config_dir: &Path) -> assay::Assay {
    assay::Assay::with_config(assay::AssayConfig {
        config_dir: PathBuf::from(config_dir),
        ..assay::AssayConfig::default()
    })
}
