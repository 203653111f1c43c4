//! Enumeration of the tiles making up a region.
//!
//! At zoom `z` a region is drawn as `2^z × 2^z` tiles. [`RegionTiles`] yields
//! them in filename index order, which is also the order a tile set directory
//! lists them when sorted by index. Under [`OffsetConvention::Euclidean`] that
//! is row-major from the region origin; under [`OffsetConvention::Legacy`] the
//! first column (row) of a region with negative x (y) comes last.

use std::ops::Range;

use crate::coord::{
    region_indices, tile_from_region, tile_from_region_with, CoordError, OffsetConvention,
    RegionCoord, TileCoord,
};

/// Iterator over all tiles of a region at one zoom level.
///
/// # Example
///
/// ```
/// use mcmapper::coord::RegionCoord;
/// use mcmapper::region::RegionTiles;
///
/// let tiles: Vec<_> = RegionTiles::new(RegionCoord::new(-1, 0), 1).unwrap().collect();
/// assert_eq!(tiles.len(), 4);
/// assert_eq!((tiles[1].x(), tiles[1].y()), (-1, 0));
/// ```
#[derive(Debug, Clone)]
pub struct RegionTiles {
    region: RegionCoord,
    zoom: u8,
    convention: OffsetConvention,
    indices: Range<u64>,
}

impl RegionTiles {
    /// Create an iterator over the tiles of `region` at `zoom`, in
    /// [`OffsetConvention::Euclidean`] index order.
    ///
    /// # Errors
    ///
    /// * [`CoordError::InvalidZoom`] if the zoom is not addressable
    /// * [`CoordError::RegionOutOfBounds`] if the region's tiles do not fit
    ///   the tile coordinate space at this zoom
    pub fn new(region: RegionCoord, zoom: u8) -> Result<Self, CoordError> {
        let indices = region_indices(region, zoom, OffsetConvention::Euclidean)?;
        // The last tile has the largest coordinates; the first the smallest.
        tile_from_region(region, indices.start, zoom)?;
        tile_from_region(region, indices.end - 1, zoom)?;

        Ok(Self {
            region,
            zoom,
            convention: OffsetConvention::Euclidean,
            indices,
        })
    }

    /// Enumerate in the index order of `convention` instead.
    ///
    /// Restarts the enumeration.
    pub fn with_offset_convention(mut self, convention: OffsetConvention) -> Self {
        // Same tiles, renumbered; bounds checked in `new` still hold
        if let Ok(indices) = region_indices(self.region, self.zoom, convention) {
            self.indices = indices;
            self.convention = convention;
        }
        self
    }

    pub fn region(&self) -> RegionCoord {
        self.region
    }

    pub fn zoom(&self) -> u8 {
        self.zoom
    }

    pub fn offset_convention(&self) -> OffsetConvention {
        self.convention
    }
}

impl Iterator for RegionTiles {
    type Item = TileCoord;

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.indices.next()?;
        // Bounds were validated on construction
        tile_from_region_with(self.region, index, self.zoom, self.convention).ok()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = usize::try_from(self.indices.end - self.indices.start)
            .unwrap_or(usize::MAX);
        (remaining, Some(remaining))
    }
}
