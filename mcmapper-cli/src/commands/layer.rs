//! Layer command - print the configured tile layer.

use mcmapper::config::ConfigFile;
use mcmapper::map::{MapError, MapView};

use crate::error::CliError;

/// Run the layer command.
///
/// Bootstraps the map the way the viewer does and prints the layer it
/// displays.
pub fn run(config: &ConfigFile) -> Result<(), CliError> {
    let map = MapView::minecraft(config)?;
    let layer = map.active_layer().ok_or(MapError::NoActiveMapType)?;
    println!("{}", serde_json::to_string_pretty(&layer.describe())?);
    Ok(())
}
