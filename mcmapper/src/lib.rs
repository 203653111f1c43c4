//! MCMapper - Tile addressing for pre-rendered Minecraft maps
//!
//! Maps pan/zoom tile coordinates from a slippy map viewer onto the image
//! files MCMapper renders, laid out as
//! `<base-dir>/<zoom>/r.<regionX>.<regionY>-<index>.<ext>`.
//!
//! # Example
//!
//! ```
//! use mcmapper::coord::TileCoord;
//! use mcmapper::resolver::TilePathResolver;
//!
//! let resolver = TilePathResolver::default();
//! let path = resolver.resolve(TileCoord::new(-1, 0, 1).unwrap());
//! assert_eq!(path.as_str(), "../maps/MCMapper Test/1/r.-1.0-1.jpeg");
//! ```

pub mod audit;
pub mod config;
pub mod coord;
pub mod filename;
pub mod layer;
pub mod logging;
pub mod map;
pub mod region;
pub mod resolver;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
