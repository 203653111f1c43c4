//! Region command - list the tile paths of a region.

use clap::Args;
use mcmapper::config::ConfigFile;
use mcmapper::coord::RegionCoord;
use mcmapper::region::RegionTiles;
use mcmapper::resolver::TilePath;

use super::common::TileSetArgs;
use crate::error::CliError;

/// Arguments for `mcmapper region`.
#[derive(Debug, Args)]
pub struct RegionArgs {
    /// Region column
    #[arg(allow_negative_numbers = true)]
    pub rx: i32,

    /// Region row
    #[arg(allow_negative_numbers = true)]
    pub ry: i32,

    /// Zoom level
    #[arg(short, long)]
    pub zoom: u8,

    #[command(flatten)]
    pub tiles: TileSetArgs,
}

/// Run the region command.
pub fn run(args: RegionArgs, config: &ConfigFile) -> Result<(), CliError> {
    for path in region_paths(&args, config)? {
        println!("{}", path);
    }
    Ok(())
}

/// Paths of every tile of the region, in filename index order.
fn region_paths(args: &RegionArgs, config: &ConfigFile) -> Result<Vec<TilePath>, CliError> {
    let resolver = args.tiles.resolver(config);
    let tiles = RegionTiles::new(RegionCoord::new(args.rx, args.ry), args.zoom)?
        .with_offset_convention(resolver.offset_convention());

    Ok(tiles.map(|tile| resolver.resolve(tile)).collect())
}
