//! Build-schema command - derive and persist a schema descriptor.

use std::path::{Path, PathBuf};

use colored::Colorize;

pub fn run(
    file: PathBuf,
    key: Option<String>,
    config_dir: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    if !file.exists() {
        return Err(format!("File not found: {}", file.display()).into());
    }

    println!(
        "{} {}",
        "Building schema from".cyan().bold(),
        file.display().to_string().white()
    );

    let assay = super::engine(config_dir);
    let key = assay.build_schema(&file, key.as_deref())?;

    println!(
        "{} descriptor saved under key '{}' in {}",
        "Done:".green().bold(),
        key.white().bold(),
        config_dir.display()
    );
    Ok(())
}
