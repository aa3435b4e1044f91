//! Assay CLI - dataset format checking and numeric outlier detection.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::BuildSchema { file, key } => {
            commands::build_schema::run(file, key, &cli.config_dir)
        }

        Commands::Check {
            file,
            key,
            export,
            json,
        } => commands::check::run(file, key, export, json, &cli.config_dir, cli.verbose),

        Commands::BuildThresholds {
            file,
            group_by,
            key,
        } => commands::build_thresholds::run(file, group_by, key, &cli.config_dir),

        Commands::CheckNumbers { file, key, export } => {
            commands::check_numbers::run(file, key, export, &cli.config_dir)
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
