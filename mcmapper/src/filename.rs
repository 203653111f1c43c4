//! Tile image filename parsing.
//!
//! Rendered tiles are named after the region they belong to and their index
//! inside it:
//!
//! `r.{regionX}.{regionY}-{index}.{ext}`
//!
//! Examples:
//! - `r.0.0-0.jpeg` (zoom 0: the whole region)
//! - `r.-1.2-13.jpeg` (region -1, 2; column 1, row 3 at zoom 2)
//!
//! Region coordinates are signed; the index is the row-major position of the
//! tile inside the region at the zoom level of the directory holding it. The
//! zoom level itself is not part of the filename.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;
use thiserror::Error;

use crate::coord::{tile_from_region_with, CoordError, OffsetConvention, RegionCoord, TileCoord};

/// Parsed tile filename.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct TileFilename {
    /// Region the tile belongs to
    pub region: RegionCoord,
    /// Row-major index of the tile inside the region
    pub index: u64,
    /// Image extension, lowercase, without the dot
    pub extension: String,
}

/// Error parsing a tile filename.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Filename doesn't match the tile naming pattern
    #[error("Filename doesn't match tile pattern r.<x>.<y>-<index>.<ext>: {0}")]
    InvalidPattern(String),

    /// Region coordinate is not a valid 32-bit integer
    #[error("Invalid region coordinate: {0}")]
    InvalidRegion(String),

    /// Index is not a valid unsigned integer
    #[error("Invalid tile index: {0}")]
    InvalidIndex(String),

    /// Parsed values do not describe a tile at the requested zoom
    #[error(transparent)]
    Coord(#[from] CoordError),
}

impl TileFilename {
    /// Create a filename for a region and index.
    pub fn new(region: RegionCoord, index: u64, extension: impl Into<String>) -> Self {
        Self {
            region,
            index,
            extension: extension.into(),
        }
    }

    /// Tile coordinate this filename stands for at the given zoom level.
    ///
    /// # Errors
    ///
    /// Fails if the index does not fit in a region at `zoom`, e.g. index 4
    /// at zoom 1 where regions hold 4 tiles (indices 0-3).
    pub fn tile_coord(&self, zoom: u8) -> Result<TileCoord, ParseError> {
        self.tile_coord_with(zoom, OffsetConvention::Euclidean)
    }

    /// Tile coordinate this filename stands for in a tile set written with
    /// `convention`.
    pub fn tile_coord_with(
        &self,
        zoom: u8,
        convention: OffsetConvention,
    ) -> Result<TileCoord, ParseError> {
        Ok(tile_from_region_with(self.region, self.index, zoom, convention)?)
    }
}

impl fmt::Display for TileFilename {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "r.{}.{}-{}.{}",
            self.region.x, self.region.y, self.index, self.extension
        )
    }
}

/// Tile filename regex.
///
/// We capture:
/// - Group 1: region x (signed integer)
/// - Group 2: region y (signed integer)
/// - Group 3: index (unsigned integer)
/// - Group 4: extension (letters only)
fn tile_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        // Must start the filename component so "xr.0.0-0.jpeg" is rejected
        Regex::new(r"(?:^|[/\\])r\.(-?\d+)\.(-?\d+)-(\d+)\.([A-Za-z]+)$")
            .expect("tile filename pattern is valid")
    })
}

/// Parse a tile filename.
///
/// Accepts a bare filename or any path ending in one.
///
/// # Examples
///
/// ```
/// use mcmapper::filename::parse_tile_filename;
///
/// let name = parse_tile_filename("maps/World/1/r.-1.0-1.jpeg").unwrap();
/// assert_eq!((name.region.x, name.region.y), (-1, 0));
/// assert_eq!(name.index, 1);
/// assert_eq!(name.tile_coord(1).unwrap().x(), -1);
/// ```
pub fn parse_tile_filename(filename: &str) -> Result<TileFilename, ParseError> {
    let captures = tile_pattern()
        .captures(filename)
        .ok_or_else(|| ParseError::InvalidPattern(filename.to_string()))?;

    let field = |i: usize| captures.get(i).map(|m| m.as_str()).unwrap_or_default();

    let x_str = field(1);
    let x = x_str
        .parse::<i32>()
        .map_err(|_| ParseError::InvalidRegion(x_str.to_string()))?;

    let y_str = field(2);
    let y = y_str
        .parse::<i32>()
        .map_err(|_| ParseError::InvalidRegion(y_str.to_string()))?;

    let index_str = field(3);
    let index = index_str
        .parse::<u64>()
        .map_err(|_| ParseError::InvalidIndex(index_str.to_string()))?;

    Ok(TileFilename {
        region: RegionCoord::new(x, y),
        index,
        extension: field(4).to_lowercase(),
    })
}
