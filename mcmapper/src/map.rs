//! Map view bootstrap.
//!
//! [`MapView`] is the composition root the viewer builds once at startup: it
//! holds the initial map options, a registry of map types keyed by id and the
//! currently displayed type. Tile requests go through the active layer at the
//! current zoom level. [`MapView::minecraft`] performs the whole bootstrap
//! from the configuration file.
//!
//! # Example
//!
//! ```
//! use mcmapper::layer::TileLayer;
//! use mcmapper::map::{MapOptions, MapView};
//! use mcmapper::resolver::TilePathResolver;
//!
//! let layer = TileLayer::minecraft(TilePathResolver::new("maps"));
//! let mut map = MapView::with_layer(MapOptions::default(), layer).unwrap();
//!
//! map.set_zoom(1);
//! let url = map.tile_url(3, 5).unwrap().unwrap();
//! assert_eq!(url.as_str(), "maps/1/r.1.2-3.jpeg");
//! ```

use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::config::ConfigFile;
use crate::coord::{CoordError, TileCoord};
use crate::layer::{LayerError, TileLayer, DEFAULT_LAYER_ID};
use crate::resolver::{TilePath, TileUrlSource};

/// Errors from map type management.
#[derive(Debug, Error)]
pub enum MapError {
    /// No map type registered under this id.
    #[error("Unknown map type: {0}")]
    UnknownMapType(String),

    /// A tile was requested before any map type was selected.
    #[error("No map type selected")]
    NoActiveMapType,

    /// The configured layer is invalid.
    #[error("Invalid tile layer: {0}")]
    Layer(#[from] LayerError),

    #[error(transparent)]
    Coord(#[from] CoordError),
}

/// Geographic position of the initial view center.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Initial options of the map view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapOptions {
    /// Initial center
    pub center: LatLng,
    /// Initial zoom level
    pub zoom: u8,
    /// Whether the street view control is shown
    pub street_view_control: bool,
    /// Map types offered in the map type control
    pub map_type_ids: Vec<String>,
}

impl Default for MapOptions {
    fn default() -> Self {
        Self {
            center: LatLng::default(),
            zoom: 0,
            street_view_control: false,
            map_type_ids: vec![DEFAULT_LAYER_ID.to_string()],
        }
    }
}

/// A map view with registered tile layers.
#[derive(Debug)]
pub struct MapView {
    options: MapOptions,
    map_types: BTreeMap<String, TileLayer>,
    active: Option<String>,
    zoom: u8,
}

impl MapView {
    /// Create a view with no map types registered.
    pub fn new(options: MapOptions) -> Self {
        let zoom = options.zoom;
        Self {
            options,
            map_types: BTreeMap::new(),
            active: None,
            zoom,
        }
    }

    /// Bootstrap the Minecraft map from configuration.
    ///
    /// Builds the tile layer from the `[tiles]` and `[layer]` sections, offers
    /// it as the only map type, registers it and displays it at zoom 0
    /// centered on the origin.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::Layer`] if the configured layer is invalid.
    pub fn minecraft(config: &ConfigFile) -> Result<Self, MapError> {
        let layer = config.tile_layer()?;
        let options = MapOptions {
            map_type_ids: vec![layer.id().to_string()],
            ..MapOptions::default()
        };
        Self::with_layer(options, layer)
    }

    /// Create a view, register `layer` and display it.
    pub fn with_layer(options: MapOptions, layer: TileLayer) -> Result<Self, MapError> {
        let id = layer.id().to_string();
        let mut map = Self::new(options);
        map.register(layer);
        map.set_map_type_id(&id)?;

        info!(
            map_type = %id,
            zoom = map.zoom,
            base_dir = map.active_layer().map(|l| l.resolver().base_dir()).unwrap_or_default(),
            "Map view ready"
        );
        Ok(map)
    }

    /// Register a map type, replacing any previous one with the same id.
    ///
    /// Returns the replaced layer.
    pub fn register(&mut self, layer: TileLayer) -> Option<TileLayer> {
        let id = layer.id().to_string();
        debug!(map_type = %id, "Registering map type");
        let previous = self.map_types.insert(id.clone(), layer);

        // Keep the current zoom valid for a replaced active layer
        if self.active.as_deref() == Some(id.as_str()) {
            self.clamp_to_active();
        }
        previous
    }

    /// Display the map type registered under `id`.
    ///
    /// The current zoom is clamped into the layer's range.
    pub fn set_map_type_id(&mut self, id: &str) -> Result<(), MapError> {
        if !self.map_types.contains_key(id) {
            return Err(MapError::UnknownMapType(id.to_string()));
        }
        self.active = Some(id.to_string());
        self.clamp_to_active();
        Ok(())
    }

    /// Id of the displayed map type.
    pub fn map_type_id(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// The displayed layer.
    pub fn active_layer(&self) -> Option<&TileLayer> {
        self.active.as_ref().and_then(|id| self.map_types.get(id))
    }

    /// Look up a registered layer.
    pub fn map_type(&self, id: &str) -> Option<&TileLayer> {
        self.map_types.get(id)
    }

    /// Registered layers offered in the map type control, in control order.
    pub fn selectable_map_types(&self) -> Vec<&TileLayer> {
        self.options
            .map_type_ids
            .iter()
            .filter_map(|id| self.map_types.get(id))
            .collect()
    }

    pub fn options(&self) -> &MapOptions {
        &self.options
    }

    pub fn zoom(&self) -> u8 {
        self.zoom
    }

    /// Change the zoom level, clamped to the displayed layer's range.
    ///
    /// Returns the zoom level in effect.
    pub fn set_zoom(&mut self, zoom: u8) -> u8 {
        self.zoom = zoom;
        self.clamp_to_active();
        self.zoom
    }

    /// Tile image location for tile `(x, y)` at the current zoom.
    ///
    /// `Ok(None)` if the displayed layer has no tile there.
    pub fn tile_url(&self, x: i32, y: i32) -> Result<Option<TilePath>, MapError> {
        let layer = self.active_layer().ok_or(MapError::NoActiveMapType)?;
        let coord = TileCoord::new(x, y, self.zoom)?;
        Ok(layer.tile_url(coord))
    }

    fn clamp_to_active(&mut self) {
        if let Some(layer) = self.active_layer() {
            self.zoom = layer.clamp_zoom(self.zoom);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::TilePathResolver;

    fn minecraft(base: &str) -> TileLayer {
        TileLayer::minecraft(TilePathResolver::new(base))
    }

    #[test]
    fn test_default_options() {
        let options = MapOptions::default();
        assert_eq!(options.center, LatLng::new(0.0, 0.0));
        assert_eq!(options.zoom, 0);
        assert!(!options.street_view_control);
        assert_eq!(options.map_type_ids, vec!["minecraft".to_string()]);
    }

    #[test]
    fn test_with_layer_activates_it() {
        let map = MapView::with_layer(MapOptions::default(), minecraft("maps")).unwrap();
        assert_eq!(map.map_type_id(), Some("minecraft"));
        assert_eq!(map.zoom(), 0);
        assert_eq!(
            map.tile_url(-1, 2).unwrap().unwrap().as_str(),
            "maps/0/r.-1.2-0.jpeg"
        );
    }

    #[test]
    fn test_tile_url_without_active_type() {
        let map = MapView::new(MapOptions::default());
        assert!(matches!(map.tile_url(0, 0), Err(MapError::NoActiveMapType)));
    }

    #[test]
    fn test_unknown_map_type() {
        let mut map = MapView::new(MapOptions::default());
        let result = map.set_map_type_id("satellite");
        assert!(matches!(result, Err(MapError::UnknownMapType(id)) if id == "satellite"));
        assert_eq!(map.map_type_id(), None);
    }

    #[test]
    fn test_zoom_clamped_to_layer() {
        let mut map = MapView::with_layer(MapOptions::default(), minecraft("maps")).unwrap();
        assert_eq!(map.set_zoom(7), 3);
        assert_eq!(
            map.tile_url(-1, 0).unwrap().unwrap().as_str(),
            "maps/3/r.-1.0-7.jpeg"
        );
    }

    #[test]
    fn test_initial_zoom_clamped_on_activation() {
        let options = MapOptions {
            zoom: 9,
            ..MapOptions::default()
        };
        let map = MapView::with_layer(options, minecraft("maps")).unwrap();
        assert_eq!(map.zoom(), 3);
    }

    #[test]
    fn test_register_replaces_and_reclamps() {
        let mut map = MapView::with_layer(MapOptions::default(), minecraft("maps")).unwrap();
        map.set_zoom(3);

        let shallow = TileLayer::builder(TilePathResolver::new("other"))
            .zoom_range(0, 1)
            .build()
            .unwrap();
        let previous = map.register(shallow);

        assert_eq!(previous.unwrap().resolver().base_dir(), "maps");
        assert_eq!(map.zoom(), 1);
        assert_eq!(
            map.tile_url(0, 0).unwrap().unwrap().as_str(),
            "other/1/r.0.0-0.jpeg"
        );
    }

    #[test]
    fn test_selectable_map_types_follow_control_list() {
        let mut map = MapView::new(MapOptions::default());
        map.register(minecraft("maps"));
        map.register(
            TileLayer::builder(TilePathResolver::new("nether"))
                .id("nether")
                .build()
                .unwrap(),
        );

        let ids: Vec<_> = map.selectable_map_types().iter().map(|l| l.id()).collect();
        assert_eq!(ids, vec!["minecraft"]);
        assert!(map.map_type("nether").is_some());
    }

    #[test]
    fn test_minecraft_bootstrap_from_defaults() {
        let map = MapView::minecraft(&ConfigFile::default()).unwrap();
        assert_eq!(map.options(), &MapOptions::default());
        assert_eq!(map.map_type_id(), Some("minecraft"));
        assert_eq!(map.zoom(), 0);

        let layer = map.active_layer().unwrap();
        assert_eq!(layer.name(), "Minecraft");
        assert_eq!(layer.tile_size(), 512);
        assert_eq!(layer.zoom_range(), 0..=3);
        assert_eq!(
            map.tile_url(-1, 0).unwrap().unwrap().as_str(),
            "../maps/MCMapper Test/0/r.-1.0-0.jpeg"
        );
    }

    #[test]
    fn test_minecraft_bootstrap_uses_configured_layer() {
        let mut config = ConfigFile::default();
        config.tiles.base_dir = "tiles".to_string();
        config.layer.id = "overworld".to_string();
        config.layer.max_zoom = 5;

        let mut map = MapView::minecraft(&config).unwrap();
        assert_eq!(map.map_type_id(), Some("overworld"));
        assert_eq!(map.options().map_type_ids, vec!["overworld".to_string()]);
        assert_eq!(map.selectable_map_types().len(), 1);
        assert_eq!(map.set_zoom(9), 5);
        assert_eq!(
            map.tile_url(0, 0).unwrap().unwrap().as_str(),
            "tiles/5/r.0.0-0.jpeg"
        );
    }

    #[test]
    fn test_minecraft_bootstrap_rejects_invalid_layer() {
        let mut config = ConfigFile::default();
        config.layer.min_zoom = 4;

        let result = MapView::minecraft(&config);
        assert!(matches!(
            result,
            Err(MapError::Layer(LayerError::InvalidZoomRange { min: 4, max: 3 }))
        ));
    }
}
