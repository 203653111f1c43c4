//! Parse command - decode a tile filename.

use clap::Args;
use mcmapper::config::ConfigFile;
use mcmapper::coord::OffsetConvention;
use mcmapper::filename::parse_tile_filename;

use crate::error::CliError;

/// Arguments for `mcmapper parse`.
#[derive(Debug, Args)]
pub struct ParseArgs {
    /// Tile filename or path, e.g. r.-1.0-1.jpeg
    pub filename: String,

    /// Zoom level of the directory holding the tile
    #[arg(short, long)]
    pub zoom: u8,

    /// Decode names written with the legacy offset convention
    /// (overrides tiles.offset_convention)
    #[arg(long)]
    pub legacy_offsets: bool,
}

impl ParseArgs {
    /// Offset convention the name was written with.
    fn offset_convention(&self, config: &ConfigFile) -> OffsetConvention {
        if self.legacy_offsets {
            OffsetConvention::Legacy
        } else {
            config.tiles.offset_convention
        }
    }
}

/// Run the parse command.
pub fn run(args: ParseArgs, config: &ConfigFile) -> Result<(), CliError> {
    let convention = args.offset_convention(config);
    let name = parse_tile_filename(&args.filename)?;
    let coord = name.tile_coord_with(args.zoom, convention)?;

    println!("Region:    {}", name.region);
    println!("Index:     {}", name.index);
    println!("Tile:      x={} y={} zoom={}", coord.x(), coord.y(), coord.zoom());

    if name.extension != config.tiles.extension {
        println!(
            "Note: extension '{}' differs from configured '{}'",
            name.extension, config.tiles.extension
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(filename: &str, zoom: u8, legacy_offsets: bool) -> ParseArgs {
        ParseArgs {
            filename: filename.to_string(),
            zoom,
            legacy_offsets,
        }
    }

    #[test]
    fn test_convention_from_flag_or_config() {
        let mut config = ConfigFile::default();
        assert_eq!(
            args("r.0.0-0.jpeg", 1, false).offset_convention(&config),
            OffsetConvention::Euclidean
        );
        assert_eq!(
            args("r.0.0-0.jpeg", 1, true).offset_convention(&config),
            OffsetConvention::Legacy
        );

        config.tiles.offset_convention = OffsetConvention::Legacy;
        assert_eq!(
            args("r.0.0-0.jpeg", 1, false).offset_convention(&config),
            OffsetConvention::Legacy
        );
    }

    #[test]
    fn test_legacy_only_index_needs_legacy_offsets() {
        // Index 4 of region (-1, 0) is written only by the legacy convention
        let config = ConfigFile::default();
        assert!(run(args("r.-1.0-4.jpeg", 1, true), &config).is_ok());
        assert!(matches!(
            run(args("r.-1.0-4.jpeg", 1, false), &config),
            Err(CliError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_legacy_never_writes_index_zero_of_negative_region() {
        let result = run(args("r.-1.0-0.jpeg", 1, true), &ConfigFile::default());
        assert!(matches!(result, Err(CliError::InvalidInput(_))));
    }
}
