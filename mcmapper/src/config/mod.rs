//! Configuration file handling.
//!
//! Settings live in an INI file, by default `~/.mcmapper/config.ini`:
//!
//! ```ini
//! [tiles]
//! base_dir = ../maps/MCMapper Test
//! extension = jpeg
//! offset_convention = euclidean
//!
//! [layer]
//! id = minecraft
//! name = Minecraft
//! tile_size = 512
//! min_zoom = 0
//! max_zoom = 3
//! radius = 1738000
//!
//! [logging]
//! level = info
//! file =
//! ```
//!
//! Missing files and missing keys fall back to defaults. Individual settings
//! are addressed as `section.key` through [`ConfigKey`].

mod keys;

pub use keys::ConfigKey;

use std::io;
use std::path::{Path, PathBuf};

use ini::Ini;
use thiserror::Error;
use tracing::debug;

use crate::coord::OffsetConvention;
use crate::layer::{
    LayerError, TileLayer, DEFAULT_LAYER_ID, DEFAULT_LAYER_NAME, DEFAULT_MAX_ZOOM,
    DEFAULT_MIN_ZOOM, DEFAULT_RADIUS_METERS, DEFAULT_TILE_SIZE,
};
use crate::resolver::{TilePathResolver, DEFAULT_BASE_DIR, DEFAULT_EXTENSION};

/// Directory name under the home directory holding MCMapper state.
pub const CONFIG_DIR_NAME: &str = ".mcmapper";

/// Configuration file name.
pub const CONFIG_FILE_NAME: &str = "config.ini";

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Errors loading, saving or editing configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file exists but could not be read or parsed.
    #[error("Failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: ini::Error,
    },

    /// The file could not be written.
    #[error("Failed to write config file {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A setting has a value of the wrong shape.
    #[error("Invalid value '{value}' for {key}: {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },

    /// No such `section.key`.
    #[error("Unknown configuration key '{0}'")]
    UnknownKey(String),
}

/// Location of the tile set and how tile paths are built.
#[derive(Debug, Clone, PartialEq)]
pub struct TilesSettings {
    pub base_dir: String,
    pub extension: String,
    pub offset_convention: OffsetConvention,
}

impl Default for TilesSettings {
    fn default() -> Self {
        Self {
            base_dir: DEFAULT_BASE_DIR.to_string(),
            extension: DEFAULT_EXTENSION.to_string(),
            offset_convention: OffsetConvention::default(),
        }
    }
}

/// Tile layer presentation.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerSettings {
    pub id: String,
    pub name: String,
    pub tile_size: u32,
    pub min_zoom: u8,
    pub max_zoom: u8,
    pub radius: f64,
}

impl Default for LayerSettings {
    fn default() -> Self {
        Self {
            id: DEFAULT_LAYER_ID.to_string(),
            name: DEFAULT_LAYER_NAME.to_string(),
            tile_size: DEFAULT_TILE_SIZE,
            min_zoom: DEFAULT_MIN_ZOOM,
            max_zoom: DEFAULT_MAX_ZOOM,
            radius: DEFAULT_RADIUS_METERS,
        }
    }
}

/// Logging output.
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingSettings {
    /// Level name, or `tracing` filter directives such as
    /// `warn,mcmapper=debug`
    pub level: String,
    /// Optional log file, in addition to stderr
    pub file: Option<PathBuf>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
            file: None,
        }
    }
}

/// The complete configuration file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigFile {
    pub tiles: TilesSettings,
    pub layer: LayerSettings,
    pub logging: LoggingSettings,
}

/// Default configuration file path.
///
/// Falls back to the current directory when no home directory is known.
pub fn config_file_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_DIR_NAME)
        .join(CONFIG_FILE_NAME)
}

impl ConfigFile {
    /// Load the configuration from the default path.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&config_file_path())
    }

    /// Load the configuration from `path`, using defaults if it doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }

        let ini = Ini::load_from_file(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_ini(&ini)?;
        debug!(path = %path.display(), "Loaded config file");
        Ok(config)
    }

    /// Parse configuration from INI text.
    pub fn from_ini_str(content: &str) -> Result<Self, ConfigError> {
        let ini = Ini::load_from_str(content).map_err(|e| ConfigError::Read {
            path: PathBuf::from("<string>"),
            source: ini::Error::Parse(e),
        })?;
        Self::from_ini(&ini)
    }

    /// Build the configuration from a parsed INI document.
    ///
    /// Every known key present in the document is applied on top of the
    /// defaults; unknown keys are ignored.
    pub fn from_ini(ini: &Ini) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        for key in ConfigKey::all() {
            if let Some(value) = ini.get_from(Some(key.section()), key.key_name()) {
                key.set(&mut config, value)?;
            }
        }
        Ok(config)
    }

    /// Render the configuration as an INI document.
    pub fn to_ini(&self) -> Ini {
        let mut ini = Ini::new();
        for key in ConfigKey::all() {
            ini.with_section(Some(key.section()))
                .set(key.key_name(), key.get(self));
        }
        ini
    }

    /// Save the configuration to the default path.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&config_file_path())
    }

    /// Save the configuration to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let write_err = |source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(write_err)?;
            }
        }
        self.to_ini().write_to_file(path).map_err(write_err)?;

        debug!(path = %path.display(), "Saved config file");
        Ok(())
    }

    /// Tile path resolver described by the `[tiles]` section.
    pub fn resolver(&self) -> TilePathResolver {
        TilePathResolver::new(self.tiles.base_dir.clone())
            .with_extension(self.tiles.extension.clone())
            .with_offset_convention(self.tiles.offset_convention)
    }

    /// Tile layer described by the `[tiles]` and `[layer]` sections.
    pub fn tile_layer(&self) -> Result<TileLayer, LayerError> {
        TileLayer::builder(self.resolver())
            .id(self.layer.id.clone())
            .name(self.layer.name.clone())
            .tile_size(self.layer.tile_size)
            .zoom_range(self.layer.min_zoom, self.layer.max_zoom)
            .radius(self.layer.radius)
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_match_web_viewer() {
        let config = ConfigFile::default();
        let layer = config.tile_layer().unwrap();
        assert_eq!(layer.id(), "minecraft");
        assert_eq!(layer.zoom_range(), 0..=3);
        assert_eq!(layer.resolver().base_dir(), "../maps/MCMapper Test");
        assert_eq!(layer.resolver().extension(), "jpeg");
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let temp = TempDir::new().unwrap();
        let config = ConfigFile::load_from(&temp.path().join("absent.ini")).unwrap();
        assert_eq!(config, ConfigFile::default());
    }

    #[test]
    fn test_partial_file_overrides_defaults() {
        let config = ConfigFile::from_ini_str(concat!(
            "[tiles]\nbase_dir = /srv/tiles/world\noffset_convention = legacy\n\n",
            "[layer]\nmax_zoom = 5\n",
        ))
        .unwrap();

        assert_eq!(config.tiles.base_dir, "/srv/tiles/world");
        assert_eq!(config.tiles.extension, "jpeg");
        assert_eq!(config.tiles.offset_convention, OffsetConvention::Legacy);
        assert_eq!(config.layer.max_zoom, 5);
        assert_eq!(config.layer.min_zoom, 0);
    }

    #[test]
    fn test_invalid_value_reports_key() {
        let err = ConfigFile::from_ini_str("[layer]\ntile_size = large\n").unwrap_err();
        match err {
            ConfigError::InvalidValue { key, value, .. } => {
                assert_eq!(key, "layer.tile_size");
                assert_eq!(value, "large");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_save_and_load() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("config.ini");

        let mut config = ConfigFile::default();
        config.tiles.base_dir = "maps/Survival World".to_string();
        config.layer.name = "Survival".to_string();
        config.logging.file = Some(PathBuf::from("/tmp/mcmapper.log"));
        config.save_to(&path).unwrap();

        let loaded = ConfigFile::load_from(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_resolver_from_settings() {
        let mut config = ConfigFile::default();
        config.tiles.base_dir = "tiles/".to_string();
        config.tiles.extension = "png".to_string();

        let resolver = config.resolver();
        let coord = crate::coord::TileCoord::new(3, 5, 1).unwrap();
        assert_eq!(resolver.resolve(coord).as_str(), "tiles/1/r.1.2-3.png");
    }

    #[test]
    fn test_invalid_layer_settings() {
        let mut config = ConfigFile::default();
        config.layer.min_zoom = 4;
        assert!(matches!(
            config.tile_layer(),
            Err(LayerError::InvalidZoomRange { min: 4, max: 3 })
        ));
    }
}
