//! Tile path resolution.
//!
//! Maps tile coordinates requested by the map widget to the relative path of
//! the pre-rendered tile image:
//!
//! ```text
//! <base-dir>/<zoom>/r.<regionX>.<regionY>-<index>.jpeg
//! ```
//!
//! Resolution is a pure function of the coordinate and the resolver settings.
//! Fetching the image is left to the widget.
//!
//! # Example
//!
//! ```
//! use mcmapper::coord::TileCoord;
//! use mcmapper::resolver::TilePathResolver;
//!
//! let resolver = TilePathResolver::new("../maps/World");
//! let coord = TileCoord::new(3, 5, 1).unwrap();
//! assert_eq!(resolver.resolve(coord).as_str(), "../maps/World/1/r.1.2-3.jpeg");
//! ```

mod path;

pub use crate::coord::OffsetConvention;
pub use path::TilePath;

use tracing::debug;

use crate::coord::{offset_of, region_of, TileCoord};
use crate::filename::TileFilename;

/// Tile set directory used by the MCMapper web viewer.
pub const DEFAULT_BASE_DIR: &str = "../maps/MCMapper Test";

/// Image extension of rendered tiles.
pub const DEFAULT_EXTENSION: &str = "jpeg";

/// Source of tile image locations, invoked once per tile the widget draws.
///
/// Implementations must be pure: the same coordinate always yields the same
/// answer. `None` means the source has no tile for the coordinate.
pub trait TileUrlSource: Send + Sync {
    /// Location of the tile image for `coord`.
    fn tile_url(&self, coord: TileCoord) -> Option<TilePath>;
}

/// Resolves tile coordinates to tile image paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TilePathResolver {
    base_dir: String,
    extension: String,
    convention: OffsetConvention,
}

impl TilePathResolver {
    /// Create a resolver rooted at `base_dir`.
    ///
    /// Trailing separators are dropped so that `maps/` and `maps` resolve
    /// identically. An empty base directory yields paths starting at the
    /// zoom component.
    pub fn new(base_dir: impl Into<String>) -> Self {
        let base_dir = base_dir.into();
        let trimmed = base_dir.trim_end_matches('/');
        // keep a bare "/" meaningful
        let base_dir = if trimmed.is_empty() && base_dir.starts_with('/') {
            "/".to_string()
        } else {
            trimmed.to_string()
        };

        Self {
            base_dir,
            extension: DEFAULT_EXTENSION.to_string(),
            convention: OffsetConvention::default(),
        }
    }

    /// Set the image extension (without the leading dot).
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        let extension = extension.into();
        self.extension = extension.trim_start_matches('.').to_string();
        self
    }

    /// Set how negative coordinates are folded into their region.
    pub fn with_offset_convention(mut self, convention: OffsetConvention) -> Self {
        self.convention = convention;
        self
    }

    pub fn base_dir(&self) -> &str {
        &self.base_dir
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn offset_convention(&self) -> OffsetConvention {
        self.convention
    }

    /// Filename of the tile image, without the directory components.
    pub fn tile_name(&self, coord: TileCoord) -> TileFilename {
        TileFilename {
            region: region_of(&coord),
            index: offset_of(&coord, self.convention).index(),
            extension: self.extension.clone(),
        }
    }

    /// Resolve the relative path of the tile image for `coord`.
    pub fn resolve(&self, coord: TileCoord) -> TilePath {
        let name = self.tile_name(coord);
        let path = match self.base_dir.as_str() {
            "" => format!("{}/{}", coord.zoom(), name),
            "/" => format!("/{}/{}", coord.zoom(), name),
            base => format!("{}/{}/{}", base, coord.zoom(), name),
        };

        debug!(tile = %coord, path = %path, "Resolved tile path");
        TilePath::new(path)
    }
}

impl Default for TilePathResolver {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_DIR)
    }
}

impl TileUrlSource for TilePathResolver {
    fn tile_url(&self, coord: TileCoord) -> Option<TilePath> {
        Some(self.resolve(coord))
    }
}
