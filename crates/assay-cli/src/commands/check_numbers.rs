//! Check-numbers command - flag rows outside their group's bounds.

use std::path::{Path, PathBuf};

use assay::{ThresholdStore, annotate, descriptor_key, group_findings};
use colored::Colorize;

pub fn run(
    file: PathBuf,
    key: Option<String>,
    export: Option<PathBuf>,
    config_dir: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    if !file.exists() {
        return Err(format!("File not found: {}", file.display()).into());
    }

    println!(
        "{} {}",
        "Checking numbers in".cyan().bold(),
        file.display().to_string().white()
    );

    let assay = super::engine(config_dir);
    let key = key.unwrap_or_else(|| {
        let name = file
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        descriptor_key(&name)
    });
    let findings = assay.check_thresholds(&file, Some(&key))?;

    let (table, _) = assay.load_table(&file)?;
    let descriptor = ThresholdStore::new(config_dir).load(&key)?;
    let grouped = group_findings(&findings, &table, &descriptor.grouping_fields)?;

    for (group, deviations) in &grouped {
        println!("\n{}", group.white().bold());
        for finding in deviations {
            println!(
                "  {:12} row {:>4}  {}",
                finding.kind.label().yellow(),
                finding.row.map(|r| r + 2).unwrap_or_default(),
                finding.message
            );
        }
    }

    println!(
        "\nFound {} deviations across {} groups",
        findings.len().to_string().white().bold(),
        grouped.len().to_string().white().bold()
    );

    if let Some(export_path) = export {
        let annotated = annotate(&table, &findings);
        super::write_table(&annotated, &export_path)?;
        println!(
            "{} annotated copy written to {}",
            "Exported:".green().bold(),
            export_path.display()
        );
    }

    Ok(())
}
