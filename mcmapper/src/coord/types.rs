//! Coordinate types for the region tile grid.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Lowest zoom level; one tile per region.
pub const MIN_ZOOM: u8 = 0;

/// Highest zoom level the coordinate space can address.
///
/// `2^zoom` tiles per region axis must fit in an `i32` tile coordinate.
pub const MAX_SUPPORTED_ZOOM: u8 = 30;

/// Errors produced when building or converting coordinates.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoordError {
    /// Zoom level cannot be represented in the tile grid.
    #[error("Invalid zoom level: {zoom} (max: {max})")]
    InvalidZoom { zoom: u8, max: u8 },

    /// Tile index is not one the region's tiles are named with at this zoom.
    #[error("Tile index {index} outside {start}..{end} at zoom {zoom}")]
    IndexOutOfRange {
        index: u64,
        zoom: u8,
        start: u64,
        end: u64,
    },

    /// Region lies outside the addressable tile coordinate space.
    #[error("Region ({x}, {y}) is outside the tile coordinate space at zoom {zoom}")]
    RegionOutOfBounds { x: i32, y: i32, zoom: u8 },
}

/// How negative tile coordinates are mapped to an offset within their region.
///
/// Both conventions agree everywhere except on negative coordinates that are
/// exact multiples of the zoom division, where `Legacy` yields an offset equal
/// to the division (one past the last column/row of the region).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OffsetConvention {
    /// Offsets always lie in `[0, division)`.
    #[default]
    Euclidean,
    /// Offset correction applied unconditionally for negative coordinates,
    /// matching the historical web viewer bit for bit.
    Legacy,
}

impl OffsetConvention {
    /// Name used in configuration files.
    pub fn name(&self) -> &'static str {
        match self {
            OffsetConvention::Euclidean => "euclidean",
            OffsetConvention::Legacy => "legacy",
        }
    }

    /// Parse from a configuration string.
    pub fn from_config_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "euclidean" => Some(OffsetConvention::Euclidean),
            "legacy" => Some(OffsetConvention::Legacy),
            _ => None,
        }
    }
}

/// A tile position as requested by the map widget.
///
/// `x` and `y` index tiles at the given zoom level and may be negative; the
/// map is unbounded in every direction. Zoom 0 tiles coincide with regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct TileCoord {
    x: i32,
    y: i32,
    zoom: u8,
}

impl TileCoord {
    /// Create a new tile coordinate.
    ///
    /// # Errors
    ///
    /// Returns [`CoordError::InvalidZoom`] if `zoom` exceeds
    /// [`MAX_SUPPORTED_ZOOM`].
    pub fn new(x: i32, y: i32, zoom: u8) -> Result<Self, CoordError> {
        if zoom > MAX_SUPPORTED_ZOOM {
            return Err(CoordError::InvalidZoom {
                zoom,
                max: MAX_SUPPORTED_ZOOM,
            });
        }
        Ok(Self { x, y, zoom })
    }

    /// Horizontal tile index.
    pub fn x(&self) -> i32 {
        self.x
    }

    /// Vertical tile index.
    pub fn y(&self) -> i32 {
        self.y
    }

    /// Zoom level.
    pub fn zoom(&self) -> u8 {
        self.zoom
    }

    /// Number of tiles along one region axis at this zoom (`2^zoom`).
    #[inline]
    pub fn division(&self) -> i32 {
        1 << self.zoom
    }
}

impl fmt::Display for TileCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.zoom, self.x, self.y)
    }
}

/// A cell of the region grid. The grid is the same at every zoom level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct RegionCoord {
    pub x: i32,
    pub y: i32,
}

impl RegionCoord {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for RegionCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "r.{}.{}", self.x, self.y)
    }
}

/// Position of a tile inside its region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct TileOffset {
    /// Column within the region
    pub x: u32,
    /// Row within the region
    pub y: u32,
    /// Tiles per region axis at the offset's zoom level
    pub division: u32,
}

impl TileOffset {
    /// Row-major index of the offset, as written in tile filenames.
    #[inline]
    pub fn index(&self) -> u64 {
        self.x as u64 + self.y as u64 * self.division as u64
    }
}
