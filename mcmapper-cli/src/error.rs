//! CLI error type.

use std::fmt;

use mcmapper::audit::AuditError;
use mcmapper::config::ConfigError;
use mcmapper::coord::CoordError;
use mcmapper::filename::ParseError;
use mcmapper::layer::LayerError;
use mcmapper::logging::LoggingError;
use mcmapper::map::MapError;

/// Errors reported by CLI commands.
#[derive(Debug)]
pub enum CliError {
    /// Configuration could not be loaded, saved or applied
    Config(String),
    /// Command arguments do not describe a tile, region or layer
    InvalidInput(String),
    /// Tile set audit failed to run
    Audit(AuditError),
    /// Logging could not be set up
    Logging(LoggingError),
    /// Output could not be rendered
    Output(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::InvalidInput(msg) => write!(f, "{}", msg),
            CliError::Audit(e) => write!(f, "Audit failed: {}", e),
            CliError::Logging(e) => write!(f, "{}", e),
            CliError::Output(msg) => write!(f, "Failed to write output: {}", msg),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Audit(e) => Some(e),
            CliError::Logging(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        CliError::Config(e.to_string())
    }
}

impl From<LayerError> for CliError {
    fn from(e: LayerError) -> Self {
        CliError::Config(e.to_string())
    }
}

impl From<CoordError> for CliError {
    fn from(e: CoordError) -> Self {
        CliError::InvalidInput(e.to_string())
    }
}

impl From<ParseError> for CliError {
    fn from(e: ParseError) -> Self {
        CliError::InvalidInput(e.to_string())
    }
}

impl From<MapError> for CliError {
    fn from(e: MapError) -> Self {
        match e {
            MapError::Layer(e) => e.into(),
            other => CliError::InvalidInput(other.to_string()),
        }
    }
}

impl From<AuditError> for CliError {
    fn from(e: AuditError) -> Self {
        CliError::Audit(e)
    }
}

impl From<LoggingError> for CliError {
    fn from(e: LoggingError) -> Self {
        CliError::Logging(e)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Output(e.to_string())
    }
}
