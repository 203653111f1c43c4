//! Image tile layer served from a pre-rendered tile set.
//!
//! A [`TileLayer`] is what the map widget is configured with: a display name,
//! the tile pixel size, the zoom range tiles exist for and the tile path
//! callback. Outside its zoom range the layer has no tiles.

use std::ops::RangeInclusive;

use serde::Serialize;
use thiserror::Error;

use crate::coord::{OffsetConvention, TileCoord, MAX_SUPPORTED_ZOOM};
use crate::resolver::{TilePath, TilePathResolver, TileUrlSource};

/// Map type identifier of the Minecraft layer.
pub const DEFAULT_LAYER_ID: &str = "minecraft";

/// Display name of the Minecraft layer.
pub const DEFAULT_LAYER_NAME: &str = "Minecraft";

/// Pixel size of a rendered tile (one region at zoom 0).
pub const DEFAULT_TILE_SIZE: u32 = 512;

/// Lowest zoom level rendered.
pub const DEFAULT_MIN_ZOOM: u8 = 0;

/// Highest zoom level rendered.
pub const DEFAULT_MAX_ZOOM: u8 = 3;

/// Planet radius reported to the widget, in meters.
pub const DEFAULT_RADIUS_METERS: f64 = 1_738_000.0;

/// Errors building a tile layer.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum LayerError {
    /// Layer identifier is empty.
    #[error("Layer id must not be empty")]
    EmptyId,

    /// Minimum zoom is above maximum zoom.
    #[error("Invalid zoom range: min {min} > max {max}")]
    InvalidZoomRange { min: u8, max: u8 },

    /// Maximum zoom cannot be addressed by tile coordinates.
    #[error("Max zoom {zoom} exceeds supported maximum {max}")]
    ZoomNotSupported { zoom: u8, max: u8 },

    /// Tile size must be a positive pixel count.
    #[error("Invalid tile size: {0}")]
    InvalidTileSize(u32),

    /// Radius must be a positive, finite length.
    #[error("Invalid radius: {0}")]
    InvalidRadius(f64),
}

/// A tile layer backed by a [`TilePathResolver`].
#[derive(Debug, Clone, PartialEq)]
pub struct TileLayer {
    id: String,
    name: String,
    tile_size: u32,
    min_zoom: u8,
    max_zoom: u8,
    radius: f64,
    resolver: TilePathResolver,
}

impl TileLayer {
    /// The Minecraft layer with its default settings.
    pub fn minecraft(resolver: TilePathResolver) -> Self {
        Self {
            id: DEFAULT_LAYER_ID.to_string(),
            name: DEFAULT_LAYER_NAME.to_string(),
            tile_size: DEFAULT_TILE_SIZE,
            min_zoom: DEFAULT_MIN_ZOOM,
            max_zoom: DEFAULT_MAX_ZOOM,
            radius: DEFAULT_RADIUS_METERS,
            resolver,
        }
    }

    /// Create a builder starting from the Minecraft defaults.
    pub fn builder(resolver: TilePathResolver) -> TileLayerBuilder {
        TileLayerBuilder {
            layer: Self::minecraft(resolver),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tile_size(&self) -> u32 {
        self.tile_size
    }

    pub fn min_zoom(&self) -> u8 {
        self.min_zoom
    }

    pub fn max_zoom(&self) -> u8 {
        self.max_zoom
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn resolver(&self) -> &TilePathResolver {
        &self.resolver
    }

    /// Zoom levels the layer has tiles for.
    pub fn zoom_range(&self) -> RangeInclusive<u8> {
        self.min_zoom..=self.max_zoom
    }

    /// Whether tiles exist at `zoom`.
    pub fn contains_zoom(&self, zoom: u8) -> bool {
        self.zoom_range().contains(&zoom)
    }

    /// Clamp a zoom level into the layer's range.
    pub fn clamp_zoom(&self, zoom: u8) -> u8 {
        zoom.clamp(self.min_zoom, self.max_zoom)
    }

    /// Serializable summary of the layer settings.
    pub fn describe(&self) -> LayerDescription {
        LayerDescription {
            id: self.id.clone(),
            name: self.name.clone(),
            tile_size: self.tile_size,
            min_zoom: self.min_zoom,
            max_zoom: self.max_zoom,
            radius: self.radius,
            base_dir: self.resolver.base_dir().to_string(),
            extension: self.resolver.extension().to_string(),
            offset_convention: self.resolver.offset_convention(),
        }
    }
}

impl TileUrlSource for TileLayer {
    fn tile_url(&self, coord: TileCoord) -> Option<TilePath> {
        if !self.contains_zoom(coord.zoom()) {
            return None;
        }
        self.resolver.tile_url(coord)
    }
}

/// Builder for [`TileLayer`] with validation on [`build`](Self::build).
#[derive(Debug, Clone)]
pub struct TileLayerBuilder {
    layer: TileLayer,
}

impl TileLayerBuilder {
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.layer.id = id.into();
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.layer.name = name.into();
        self
    }

    pub fn tile_size(mut self, tile_size: u32) -> Self {
        self.layer.tile_size = tile_size;
        self
    }

    pub fn zoom_range(mut self, min_zoom: u8, max_zoom: u8) -> Self {
        self.layer.min_zoom = min_zoom;
        self.layer.max_zoom = max_zoom;
        self
    }

    pub fn radius(mut self, radius: f64) -> Self {
        self.layer.radius = radius;
        self
    }

    /// Validate and build the layer.
    pub fn build(self) -> Result<TileLayer, LayerError> {
        let layer = self.layer;

        if layer.id.trim().is_empty() {
            return Err(LayerError::EmptyId);
        }
        if layer.min_zoom > layer.max_zoom {
            return Err(LayerError::InvalidZoomRange {
                min: layer.min_zoom,
                max: layer.max_zoom,
            });
        }
        if layer.max_zoom > MAX_SUPPORTED_ZOOM {
            return Err(LayerError::ZoomNotSupported {
                zoom: layer.max_zoom,
                max: MAX_SUPPORTED_ZOOM,
            });
        }
        if layer.tile_size == 0 {
            return Err(LayerError::InvalidTileSize(layer.tile_size));
        }
        if !layer.radius.is_finite() || layer.radius <= 0.0 {
            return Err(LayerError::InvalidRadius(layer.radius));
        }

        Ok(layer)
    }
}

/// Layer settings as reported by `mcmapper layer`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayerDescription {
    pub id: String,
    pub name: String,
    pub tile_size: u32,
    pub min_zoom: u8,
    pub max_zoom: u8,
    pub radius: f64,
    pub base_dir: String,
    pub extension: String,
    pub offset_convention: OffsetConvention,
}
