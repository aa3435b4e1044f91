//! Build-thresholds command - derive and persist per-group bounds.

use std::path::{Path, PathBuf};

use colored::Colorize;

pub fn run(
    file: PathBuf,
    group_by: Vec<String>,
    key: Option<String>,
    config_dir: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    if !file.exists() {
        return Err(format!("File not found: {}", file.display()).into());
    }

    println!(
        "{} {} grouped by [{}]",
        "Building thresholds from".cyan().bold(),
        file.display().to_string().white(),
        group_by.join(", ")
    );

    let assay = super::engine(config_dir);
    let key = assay.build_thresholds(&file, &group_by, key.as_deref())?;

    println!(
        "{} descriptor saved under key '{}' in {}",
        "Done:".green().bold(),
        key.white().bold(),
        config_dir.display()
    );
    Ok(())
}
