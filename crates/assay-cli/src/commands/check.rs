//! Check command - validate a dataset against its schema descriptor.

use std::path::{Path, PathBuf};

use assay::{FindingKind, Severity, annotate};
use colored::Colorize;

pub fn run(
    file: PathBuf,
    key: Option<String>,
    export: Option<PathBuf>,
    json: bool,
    config_dir: &Path,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if !file.exists() {
        return Err(format!("File not found: {}", file.display()).into());
    }

    let assay = super::engine(config_dir);
    let report = assay.validate(&file, key.as_deref())?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!(
        "{} {}",
        "Checking".cyan().bold(),
        file.display().to_string().white()
    );

    for finding in &report.findings {
        if finding.kind == FindingKind::Ok && !verbose {
            continue;
        }
        let label = match finding.severity() {
            Severity::Error => finding.kind.label().red().bold(),
            Severity::Warning => finding.kind.label().yellow(),
            Severity::Info => finding.kind.label().blue(),
        };
        match finding.row {
            // data rows are 1-based in the report, plus the header line
            Some(row) => println!("  {:28} row {:>4}  {}", label, row + 2, finding.message),
            None => println!("  {:28} {}: {}", label, finding.field, finding.message),
        }
    }

    println!(
        "\nFound {} findings ({} errors, {} warnings, {} info)",
        report.summary.total_findings.to_string().white().bold(),
        report.summary.errors.to_string().red(),
        report.summary.warnings.to_string().yellow(),
        report.summary.infos.to_string().blue()
    );
    for (column, count) in &report.summary.withheld_counts {
        println!("({}) Ws found: {}", column, count.to_string().white().bold());
    }

    if let Some(export_path) = export {
        let (table, _) = assay.load_table(&file)?;
        let annotated = annotate(&table, &report.findings);
        super::write_table(&annotated, &export_path)?;
        println!(
            "{} annotated copy written to {}",
            "Exported:".green().bold(),
            export_path.display()
        );
    }

    Ok(())
}
