//! Coordinate conversion module
//!
//! Provides conversions between map tile coordinates and the region grid used
//! to name pre-rendered tile images. Every region is split into
//! `2^zoom × 2^zoom` tiles at a given zoom level; the region grid itself does
//! not change with zoom.

mod types;

use std::ops::Range;

pub use types::{
    CoordError, OffsetConvention, RegionCoord, TileCoord, TileOffset, MAX_SUPPORTED_ZOOM,
    MIN_ZOOM,
};

/// Returns the region containing a tile.
///
/// Uses floor division, so negative tiles round toward negative infinity:
/// at zoom 1, tile x = -1 lies in region -1, not region 0.
#[inline]
pub fn region_of(coord: &TileCoord) -> RegionCoord {
    let division = coord.division();
    RegionCoord {
        x: coord.x().div_euclid(division),
        y: coord.y().div_euclid(division),
    }
}

/// Returns the position of a tile inside its region.
///
/// # Arguments
///
/// * `coord` - Tile coordinate
/// * `convention` - How negative coordinates are folded into the region
#[inline]
pub fn offset_of(coord: &TileCoord, convention: OffsetConvention) -> TileOffset {
    TileOffset {
        x: axis_offset(coord.x(), coord.zoom(), convention),
        y: axis_offset(coord.y(), coord.zoom(), convention),
        division: coord.division() as u32,
    }
}

/// Number of tiles in one region at the given zoom level.
pub fn tiles_per_region(zoom: u8) -> Result<u64, CoordError> {
    if zoom > MAX_SUPPORTED_ZOOM {
        return Err(CoordError::InvalidZoom {
            zoom,
            max: MAX_SUPPORTED_ZOOM,
        });
    }
    let division = 1u64 << zoom;
    Ok(division * division)
}

/// Filename indices of a region's tiles at `zoom` under `convention`.
///
/// Always `4^zoom` consecutive values. Under [`OffsetConvention::Legacy`]
/// the first column of a region with negative x is numbered `division`
/// instead of 0, which shifts the range by one; a negative y shifts it by
/// one row.
///
/// # Example
///
/// ```
/// use mcmapper::coord::{region_indices, OffsetConvention, RegionCoord};
///
/// let region = RegionCoord::new(-1, 0);
/// assert_eq!(region_indices(region, 1, OffsetConvention::Euclidean).unwrap(), 0..4);
/// assert_eq!(region_indices(region, 1, OffsetConvention::Legacy).unwrap(), 1..5);
/// ```
pub fn region_indices(
    region: RegionCoord,
    zoom: u8,
    convention: OffsetConvention,
) -> Result<Range<u64>, CoordError> {
    let tiles = tiles_per_region(zoom)?;
    let (shift_x, shift_y) = legacy_shift(region, zoom, convention);
    let start = shift_x + (shift_y << zoom);
    Ok(start..start + tiles)
}

/// Converts a region and a tile index back into a tile coordinate.
///
/// This is the inverse of [`region_of`] and [`offset_of`] under
/// [`OffsetConvention::Euclidean`]; see [`tile_from_region_with`].
///
/// # Errors
///
/// * [`CoordError::InvalidZoom`] if `zoom` is not addressable
/// * [`CoordError::IndexOutOfRange`] if `index >= 4^zoom`
/// * [`CoordError::RegionOutOfBounds`] if the tile does not fit in `i32`
pub fn tile_from_region(
    region: RegionCoord,
    index: u64,
    zoom: u8,
) -> Result<TileCoord, CoordError> {
    tile_from_region_with(region, index, zoom, OffsetConvention::Euclidean)
}

/// Converts a region and a tile index back into a tile coordinate, reading
/// the index the way `convention` writes it.
///
/// # Errors
///
/// As [`tile_from_region`], with the index checked against
/// [`region_indices`] for `convention`.
pub fn tile_from_region_with(
    region: RegionCoord,
    index: u64,
    zoom: u8,
    convention: OffsetConvention,
) -> Result<TileCoord, CoordError> {
    let indices = region_indices(region, zoom, convention)?;
    if !indices.contains(&index) {
        return Err(CoordError::IndexOutOfRange {
            index,
            zoom,
            start: indices.start,
            end: indices.end,
        });
    }

    let (shift_x, shift_y) = legacy_shift(region, zoom, convention);
    let division = 1u64 << zoom;
    let relative = index - indices.start;
    // Legacy numbers the first column/row `division`, i.e. last after shifting
    let col = ((relative % division + shift_x) % division) as i64;
    let row = ((relative / division + shift_y) % division) as i64;

    let out_of_bounds = || CoordError::RegionOutOfBounds {
        x: region.x,
        y: region.y,
        zoom,
    };
    let division = division as i64;
    let x = i32::try_from(region.x as i64 * division + col).map_err(|_| out_of_bounds())?;
    let y = i32::try_from(region.y as i64 * division + row).map_err(|_| out_of_bounds())?;

    TileCoord::new(x, y, zoom)
}

/// Per-axis index shift of a region under `convention`.
fn legacy_shift(region: RegionCoord, zoom: u8, convention: OffsetConvention) -> (u64, u64) {
    match convention {
        OffsetConvention::Legacy if zoom != 0 => (u64::from(region.x < 0), u64::from(region.y < 0)),
        _ => (0, 0),
    }
}

/// Offset of a single axis value inside its region.
///
/// The raw offset is the magnitude of the truncating remainder. For negative
/// values above zoom 0 it counts from the opposite edge of the region.
#[inline]
fn axis_offset(value: i32, zoom: u8, convention: OffsetConvention) -> u32 {
    let division = 1i32 << zoom;
    let offset = (value % division).unsigned_abs();

    if zoom != 0 && value < 0 {
        match convention {
            OffsetConvention::Legacy => division as u32 - offset,
            OffsetConvention::Euclidean if offset != 0 => division as u32 - offset,
            OffsetConvention::Euclidean => offset,
        }
    } else {
        offset
    }
}
