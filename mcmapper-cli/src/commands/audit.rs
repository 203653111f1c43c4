//! Audit command - check a tile set directory.

use std::path::PathBuf;

use clap::Args;
use mcmapper::audit::{audit_tile_set, AuditReport};
use mcmapper::config::ConfigFile;

use crate::error::CliError;

/// Arguments for `mcmapper audit`.
#[derive(Debug, Args)]
pub struct AuditArgs {
    /// Tile set directory (default: tiles.base_dir)
    pub root: Option<PathBuf>,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

/// Run the audit command.
///
/// Fails when the tile set has findings so scripts can rely on the exit code.
pub fn run(args: AuditArgs, config: &ConfigFile) -> Result<(), CliError> {
    let layer = config.tile_layer()?;
    let root = args
        .root
        .unwrap_or_else(|| PathBuf::from(&config.tiles.base_dir));

    let report = audit_tile_set(&root, &layer)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    if report.is_clean() {
        Ok(())
    } else {
        Err(CliError::InvalidInput(format!(
            "{} problem(s) found in {}",
            report.findings.len(),
            root.display()
        )))
    }
}

fn print_report(report: &AuditReport) {
    println!("Tile set: {}", report.root.display());
    println!();

    if report.zoom_levels.is_empty() {
        println!("  No zoom directories found");
    }
    for zoom in &report.zoom_levels {
        let complete = zoom.regions.iter().filter(|r| r.complete).count();
        println!(
            "  Zoom {}: {} tiles in {} regions ({} complete)",
            zoom.zoom,
            zoom.tiles,
            zoom.regions.len(),
            complete
        );
    }
    println!();
    println!("Total tiles: {}", report.total_tiles());

    if !report.findings.is_empty() {
        println!();
        println!("Problems:");
        for finding in &report.findings {
            println!("  {}: {}", finding.path().display(), finding.describe());
        }
    }
}
