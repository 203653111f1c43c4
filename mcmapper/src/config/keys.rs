//! Typed access to individual configuration settings.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use tracing_subscriber::EnvFilter;

use super::{ConfigError, ConfigFile};
use crate::coord::{OffsetConvention, MAX_SUPPORTED_ZOOM};

/// Log levels accepted for `logging.level`.
const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error", "off"];

/// A `section.key` setting of the configuration file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigKey {
    TilesBaseDir,
    TilesExtension,
    TilesOffsetConvention,
    LayerId,
    LayerName,
    LayerTileSize,
    LayerMinZoom,
    LayerMaxZoom,
    LayerRadius,
    LoggingLevel,
    LoggingFile,
}

impl ConfigKey {
    /// All keys, in file order.
    pub fn all() -> &'static [ConfigKey] {
        &[
            ConfigKey::TilesBaseDir,
            ConfigKey::TilesExtension,
            ConfigKey::TilesOffsetConvention,
            ConfigKey::LayerId,
            ConfigKey::LayerName,
            ConfigKey::LayerTileSize,
            ConfigKey::LayerMinZoom,
            ConfigKey::LayerMaxZoom,
            ConfigKey::LayerRadius,
            ConfigKey::LoggingLevel,
            ConfigKey::LoggingFile,
        ]
    }

    /// INI section holding the key.
    pub fn section(&self) -> &'static str {
        match self {
            ConfigKey::TilesBaseDir
            | ConfigKey::TilesExtension
            | ConfigKey::TilesOffsetConvention => "tiles",
            ConfigKey::LayerId
            | ConfigKey::LayerName
            | ConfigKey::LayerTileSize
            | ConfigKey::LayerMinZoom
            | ConfigKey::LayerMaxZoom
            | ConfigKey::LayerRadius => "layer",
            ConfigKey::LoggingLevel | ConfigKey::LoggingFile => "logging",
        }
    }

    /// Key name within its section.
    pub fn key_name(&self) -> &'static str {
        match self {
            ConfigKey::TilesBaseDir => "base_dir",
            ConfigKey::TilesExtension => "extension",
            ConfigKey::TilesOffsetConvention => "offset_convention",
            ConfigKey::LayerId => "id",
            ConfigKey::LayerName => "name",
            ConfigKey::LayerTileSize => "tile_size",
            ConfigKey::LayerMinZoom => "min_zoom",
            ConfigKey::LayerMaxZoom => "max_zoom",
            ConfigKey::LayerRadius => "radius",
            ConfigKey::LoggingLevel => "level",
            ConfigKey::LoggingFile => "file",
        }
    }

    /// Full `section.key` name.
    pub fn name(&self) -> String {
        format!("{}.{}", self.section(), self.key_name())
    }

    /// Current value as written in the file. Unset optional values are empty.
    pub fn get(&self, config: &ConfigFile) -> String {
        match self {
            ConfigKey::TilesBaseDir => config.tiles.base_dir.clone(),
            ConfigKey::TilesExtension => config.tiles.extension.clone(),
            ConfigKey::TilesOffsetConvention => config.tiles.offset_convention.name().to_string(),
            ConfigKey::LayerId => config.layer.id.clone(),
            ConfigKey::LayerName => config.layer.name.clone(),
            ConfigKey::LayerTileSize => config.layer.tile_size.to_string(),
            ConfigKey::LayerMinZoom => config.layer.min_zoom.to_string(),
            ConfigKey::LayerMaxZoom => config.layer.max_zoom.to_string(),
            ConfigKey::LayerRadius => config.layer.radius.to_string(),
            ConfigKey::LoggingLevel => config.logging.level.clone(),
            ConfigKey::LoggingFile => config
                .logging
                .file
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default(),
        }
    }

    /// Validate `value` and store it in `config`.
    pub fn set(&self, config: &mut ConfigFile, value: &str) -> Result<(), ConfigError> {
        let value = value.trim();
        match self {
            ConfigKey::TilesBaseDir => config.tiles.base_dir = value.to_string(),
            ConfigKey::TilesExtension => {
                let extension = value.trim_start_matches('.');
                if extension.is_empty() || !extension.chars().all(|c| c.is_ascii_alphabetic()) {
                    return Err(self.invalid(value, "expected letters only, e.g. jpeg"));
                }
                config.tiles.extension = extension.to_lowercase();
            }
            ConfigKey::TilesOffsetConvention => {
                config.tiles.offset_convention = OffsetConvention::from_config_str(value)
                    .ok_or_else(|| self.invalid(value, "expected 'euclidean' or 'legacy'"))?;
            }
            ConfigKey::LayerId => {
                if value.is_empty() {
                    return Err(self.invalid(value, "must not be empty"));
                }
                config.layer.id = value.to_string();
            }
            ConfigKey::LayerName => config.layer.name = value.to_string(),
            ConfigKey::LayerTileSize => {
                config.layer.tile_size = match value.parse::<u32>() {
                    Ok(size) if size > 0 => size,
                    _ => return Err(self.invalid(value, "expected a positive pixel count")),
                };
            }
            ConfigKey::LayerMinZoom => config.layer.min_zoom = self.parse_zoom(value)?,
            ConfigKey::LayerMaxZoom => config.layer.max_zoom = self.parse_zoom(value)?,
            ConfigKey::LayerRadius => {
                config.layer.radius = match value.parse::<f64>() {
                    Ok(radius) if radius.is_finite() && radius > 0.0 => radius,
                    _ => return Err(self.invalid(value, "expected a positive number of meters")),
                };
            }
            ConfigKey::LoggingLevel => {
                let level = value.to_lowercase();
                config.logging.level = if LOG_LEVELS.contains(&level.as_str()) {
                    level
                } else if is_filter_directive(value) {
                    value.to_string()
                } else {
                    return Err(self.invalid(
                        value,
                        "expected trace, debug, info, warn, error, off or target=level directives",
                    ));
                };
            }
            ConfigKey::LoggingFile => {
                config.logging.file = if value.is_empty() {
                    None
                } else {
                    Some(PathBuf::from(value))
                };
            }
        }
        Ok(())
    }

    fn parse_zoom(&self, value: &str) -> Result<u8, ConfigError> {
        match value.parse::<u8>() {
            Ok(zoom) if zoom <= MAX_SUPPORTED_ZOOM => Ok(zoom),
            _ => Err(self.invalid(
                value,
                &format!("expected a zoom level between 0 and {}", MAX_SUPPORTED_ZOOM),
            )),
        }
    }

    fn invalid(&self, value: &str, reason: &str) -> ConfigError {
        ConfigError::InvalidValue {
            key: self.name(),
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Whether `value` is a `tracing` filter with at least one `target=level`
/// directive. Bare words are rejected: they would silently select a target.
fn is_filter_directive(value: &str) -> bool {
    value.contains('=') && EnvFilter::try_new(value).is_ok()
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.section(), self.key_name())
    }
}

impl FromStr for ConfigKey {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        ConfigKey::all()
            .iter()
            .copied()
            .find(|key| key.name() == wanted)
            .ok_or_else(|| ConfigError::UnknownKey(s.to_string()))
    }
}
