//! MCMapper CLI - Command-line interface
//!
//! Resolves tile paths, decodes tile filenames and audits rendered tile sets
//! using the MCMapper library.

mod commands;
mod error;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use mcmapper::config::{config_file_path, ConfigFile};
use tracing::debug;

use commands::{AuditArgs, ConfigCommands, ParseArgs, RegionArgs, ResolveArgs};
use error::CliError;

#[derive(Debug, Parser)]
#[command(name = "mcmapper")]
#[command(version = mcmapper::VERSION)]
#[command(about = "Tile addressing for pre-rendered Minecraft maps", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file (default: ~/.mcmapper/config.ini)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Resolve a tile coordinate to its image path
    Resolve(ResolveArgs),

    /// List every tile path of a region at one zoom level
    Region(RegionArgs),

    /// Decode a tile filename
    Parse(ParseArgs),

    /// Check a tile set directory against the naming scheme
    Audit(AuditArgs),

    /// Print the configured tile layer as JSON
    Layer,

    /// View and modify configuration
    #[command(subcommand)]
    Config(ConfigCommands),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let config_path = cli.config.unwrap_or_else(config_file_path);
    let config = ConfigFile::load_from(&config_path)?;

    // Held until exit so buffered log lines reach the file
    let _log_guard = mcmapper::logging::init(&config.logging, cli.verbose)?;
    debug!(config = %config_path.display(), "Configuration loaded");

    match cli.command {
        Commands::Resolve(args) => commands::resolve::run(args, &config),
        Commands::Region(args) => commands::region::run(args, &config),
        Commands::Parse(args) => commands::parse::run(args, &config),
        Commands::Audit(args) => commands::audit::run(args, &config),
        Commands::Layer => commands::layer::run(&config),
        Commands::Config(command) => commands::config::run(command, config, &config_path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_negative_coordinates_parse_as_values() {
        let cli = Cli::try_parse_from(["mcmapper", "resolve", "-1", "-2", "1"]).unwrap();
        match cli.command {
            Commands::Resolve(args) => assert_eq!((args.x, args.y, args.zoom), (-1, -2, 1)),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli =
            Cli::try_parse_from(["mcmapper", "layer", "-v", "--config", "alt.ini"]).unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.config, Some(PathBuf::from("alt.ini")));
    }
}
