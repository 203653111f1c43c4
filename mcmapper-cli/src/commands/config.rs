//! Configuration management CLI commands.
//!
//! Provides `config get`, `config set`, `config list`, and `config path`
//! for viewing and modifying settings from the command line.

use std::path::Path;

use clap::Subcommand;
use mcmapper::config::{ConfigFile, ConfigKey};

use crate::error::CliError;

/// Config subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Get a configuration value
    Get {
        /// Configuration key in format section.key (e.g., tiles.base_dir)
        key: String,
    },

    /// Set a configuration value
    Set {
        /// Configuration key in format section.key (e.g., tiles.base_dir)
        key: String,

        /// Value to set
        value: String,
    },

    /// List all configuration settings
    List,

    /// Show the configuration file path
    Path,
}

/// Run a config subcommand against the file at `path`.
pub fn run(command: ConfigCommands, config: ConfigFile, path: &Path) -> Result<(), CliError> {
    match command {
        ConfigCommands::Get { key } => {
            println!("{}", display_value(&get_value(&config, &key)?));
            Ok(())
        }
        ConfigCommands::Set { key, value } => {
            let mut config = config;
            let name = set_value(&mut config, &key, &value)?;
            config.save_to(path)?;
            println!("Set {} = {}", name, display_value(&get_value(&config, &name)?));
            Ok(())
        }
        ConfigCommands::List => {
            print_list(&config);
            Ok(())
        }
        ConfigCommands::Path => {
            println!("{}", path.display());
            Ok(())
        }
    }
}

fn parse_key(key: &str) -> Result<ConfigKey, CliError> {
    key.parse().map_err(|_| {
        CliError::Config(format!(
            "Unknown configuration key '{}'. Use 'mcmapper config list' to see available keys.",
            key
        ))
    })
}

fn get_value(config: &ConfigFile, key: &str) -> Result<String, CliError> {
    Ok(parse_key(key)?.get(config))
}

/// Apply a setting, returning the canonical key name.
fn set_value(config: &mut ConfigFile, key: &str, value: &str) -> Result<String, CliError> {
    let config_key = parse_key(key)?;
    config_key.set(config, value)?;
    Ok(config_key.name())
}

fn display_value(value: &str) -> &str {
    if value.is_empty() {
        "(not set)"
    } else {
        value
    }
}

fn print_list(config: &ConfigFile) {
    println!("Configuration Settings");
    println!("======================");
    println!();

    let mut current_section = "";

    for key in ConfigKey::all() {
        let section = key.section();

        if section != current_section {
            if !current_section.is_empty() {
                println!();
            }
            println!("[{}]", section);
            current_section = section;
        }

        println!("  {} = {}", key.key_name(), display_value(&key.get(config)));
    }
}
