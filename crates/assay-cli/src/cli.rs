//! CLI argument definitions using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Assay: dataset format checking and numeric outlier detection
#[derive(Parser)]
#[command(name = "assay")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Directory holding persisted descriptors
    #[arg(long, global = true, default_value = "config")]
    pub config_dir: PathBuf,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Derive a schema descriptor from a reference dataset
    BuildSchema {
        /// Path to the reference data file (CSV/TSV)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Descriptor key (default: derived from the file name)
        #[arg(short, long)]
        key: Option<String>,
    },

    /// Validate a dataset against its schema descriptor
    Check {
        /// Path to the data file (CSV/TSV)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Descriptor key (default: derived from the file name)
        #[arg(short, long)]
        key: Option<String>,

        /// Write an annotated copy with flagged cells to this path
        #[arg(short, long)]
        export: Option<PathBuf>,

        /// Output the full report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Derive per-group numeric thresholds from a reference dataset
    BuildThresholds {
        /// Path to the reference data file (CSV/TSV)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Comma-separated fields to group by, e.g. "Commodity,Revenue Type"
        #[arg(short, long, value_delimiter = ',', required = true)]
        group_by: Vec<String>,

        /// Descriptor key (default: derived from the file name)
        #[arg(short, long)]
        key: Option<String>,
    },

    /// Flag rows outside their group's numeric bounds
    CheckNumbers {
        /// Path to the data file (CSV/TSV)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Descriptor key (default: derived from the file name)
        #[arg(short, long)]
        key: Option<String>,

        /// Write an annotated copy with flagged cells to this path
        #[arg(short, long)]
        export: Option<PathBuf>,
    },
}
