//! Common types and utilities shared across CLI commands.

use clap::Args;
use mcmapper::config::ConfigFile;
use mcmapper::coord::OffsetConvention;
use mcmapper::resolver::TilePathResolver;

/// Tile set location overrides.
#[derive(Debug, Clone, Default, Args)]
pub struct TileSetArgs {
    /// Tile set base directory (overrides tiles.base_dir)
    #[arg(long, value_name = "DIR")]
    pub base_dir: Option<String>,

    /// Image extension (overrides tiles.extension)
    #[arg(long, value_name = "EXT")]
    pub extension: Option<String>,

    /// Use the legacy offset convention for negative multiples of the
    /// region size (overrides tiles.offset_convention)
    #[arg(long)]
    pub legacy_offsets: bool,
}

impl TileSetArgs {
    /// Resolver from config with CLI overrides applied.
    pub fn resolver(&self, config: &ConfigFile) -> TilePathResolver {
        // CLI takes precedence, then config
        let mut resolver = config.resolver();
        if let Some(base_dir) = &self.base_dir {
            resolver = TilePathResolver::new(base_dir.clone())
                .with_extension(resolver.extension().to_string())
                .with_offset_convention(resolver.offset_convention());
        }
        if let Some(extension) = &self.extension {
            resolver = resolver.with_extension(extension.clone());
        }
        if self.legacy_offsets {
            resolver = resolver.with_offset_convention(OffsetConvention::Legacy);
        }
        resolver
    }
}
