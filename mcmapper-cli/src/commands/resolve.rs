//! Resolve command - print the image path of a tile.

use clap::Args;
use mcmapper::config::ConfigFile;
use mcmapper::coord::{offset_of, region_of, TileCoord};
use tracing::debug;

use super::common::TileSetArgs;
use crate::error::CliError;

/// Arguments for `mcmapper resolve`.
#[derive(Debug, Args)]
pub struct ResolveArgs {
    /// Tile column
    #[arg(allow_negative_numbers = true)]
    pub x: i32,

    /// Tile row
    #[arg(allow_negative_numbers = true)]
    pub y: i32,

    /// Zoom level
    pub zoom: u8,

    #[command(flatten)]
    pub tiles: TileSetArgs,
}

/// Run the resolve command.
pub fn run(args: ResolveArgs, config: &ConfigFile) -> Result<(), CliError> {
    let coord = TileCoord::new(args.x, args.y, args.zoom)?;
    let resolver = args.tiles.resolver(config);

    let region = region_of(&coord);
    let offset = offset_of(&coord, resolver.offset_convention());
    debug!(
        tile = %coord,
        region = %region,
        offset_x = offset.x,
        offset_y = offset.y,
        index = offset.index(),
        "Resolved tile"
    );

    println!("{}", resolver.resolve(coord));
    Ok(())
}
