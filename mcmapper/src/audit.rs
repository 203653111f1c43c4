//! Offline tile set audit.
//!
//! Checks a tile set directory against the naming scheme the resolver
//! produces:
//!
//! ```text
//! <root>/
//! ├── 0/
//! │   ├── r.0.0-0.jpeg
//! │   └── r.-1.0-0.jpeg
//! └── 1/
//!     ├── r.0.0-0.jpeg
//!     ├── r.0.0-1.jpeg
//!     └── ...
//! ```
//!
//! Only names are inspected; image contents are never read. Anything the
//! layer's resolver could never request is reported as a finding, including
//! aliases such as `01/` or `r.-0.0-1.jpeg` that parse to a real tile but are
//! not the name the resolver writes.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::coord::{region_indices, tiles_per_region, RegionCoord};
use crate::filename::{parse_tile_filename, TileFilename};
use crate::layer::TileLayer;
use crate::resolver::TilePathResolver;

/// Errors that stop an audit.
#[derive(Debug, Error)]
pub enum AuditError {
    /// The tile set root does not exist or is not a directory.
    #[error("Tile set root not found: {}", .0.display())]
    RootNotFound(PathBuf),

    /// A directory could not be listed.
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Something in the tile set the resolver would never request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AuditFinding {
    /// A file in the root, or a directory inside a zoom directory.
    UnexpectedEntry { path: PathBuf },
    /// A root directory whose name is not a zoom level.
    InvalidZoomDirectory { path: PathBuf },
    /// A zoom directory outside the layer's zoom range.
    ZoomOutOfRange { path: PathBuf, zoom: u8 },
    /// A file not named like a tile.
    UnparseableName { path: PathBuf },
    /// A tile with an extension other than the configured one.
    WrongExtension { path: PathBuf, extension: String },
    /// A tile name spelled differently from the one the resolver writes.
    NonCanonicalName { path: PathBuf, canonical: String },
    /// A tile index the resolver never writes for its region at this zoom.
    IndexOutOfRange { path: PathBuf, index: u64, zoom: u8 },
}

impl AuditFinding {
    /// The offending path.
    pub fn path(&self) -> &Path {
        match self {
            AuditFinding::UnexpectedEntry { path }
            | AuditFinding::InvalidZoomDirectory { path }
            | AuditFinding::ZoomOutOfRange { path, .. }
            | AuditFinding::UnparseableName { path }
            | AuditFinding::WrongExtension { path, .. }
            | AuditFinding::NonCanonicalName { path, .. }
            | AuditFinding::IndexOutOfRange { path, .. } => path,
        }
    }

    /// Short description for terminal output.
    pub fn describe(&self) -> String {
        match self {
            AuditFinding::UnexpectedEntry { .. } => "unexpected entry".to_string(),
            AuditFinding::InvalidZoomDirectory { .. } => "not a zoom directory".to_string(),
            AuditFinding::ZoomOutOfRange { zoom, .. } => {
                format!("zoom {} outside layer range", zoom)
            }
            AuditFinding::UnparseableName { .. } => "not a tile filename".to_string(),
            AuditFinding::WrongExtension { extension, .. } => {
                format!("unexpected extension '{}'", extension)
            }
            AuditFinding::NonCanonicalName { canonical, .. } => {
                format!("should be named '{}'", canonical)
            }
            AuditFinding::IndexOutOfRange { index, zoom, .. } => {
                format!("index {} out of range at zoom {}", index, zoom)
            }
        }
    }
}

/// Tile coverage of one region at one zoom level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegionCoverage {
    pub region: RegionCoord,
    /// Valid tiles found
    pub tiles: u64,
    /// Whether every tile of the region is present
    pub complete: bool,
}

/// Tiles found at one zoom level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ZoomSummary {
    pub zoom: u8,
    /// Valid tiles found
    pub tiles: u64,
    /// Per-region coverage, ordered by region
    pub regions: Vec<RegionCoverage>,
}

/// Result of auditing a tile set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuditReport {
    pub root: PathBuf,
    /// Zoom levels with at least one directory, ascending
    pub zoom_levels: Vec<ZoomSummary>,
    pub findings: Vec<AuditFinding>,
}

impl AuditReport {
    /// Valid tiles across all zoom levels.
    pub fn total_tiles(&self) -> u64 {
        self.zoom_levels.iter().map(|z| z.tiles).sum()
    }

    /// Whether the audit found nothing to report.
    pub fn is_clean(&self) -> bool {
        self.findings.is_empty()
    }
}

/// Audit the tile set rooted at `root` against `layer`.
///
/// Names are checked against what the layer's resolver writes, so the
/// resolver's extension and offset convention both apply.
///
/// # Errors
///
/// Fails only if `root` is missing or a directory cannot be listed;
/// naming problems are collected as findings.
pub fn audit_tile_set(root: &Path, layer: &TileLayer) -> Result<AuditReport, AuditError> {
    if !root.is_dir() {
        return Err(AuditError::RootNotFound(root.to_path_buf()));
    }

    let mut findings = Vec::new();
    let mut zoom_levels = Vec::new();

    for entry in sorted_entries(root)? {
        if !entry.is_dir() {
            findings.push(AuditFinding::UnexpectedEntry { path: entry });
            continue;
        }

        let zoom = match entry
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(zoom_dir_level)
        {
            Some(zoom) => zoom,
            None => {
                findings.push(AuditFinding::InvalidZoomDirectory { path: entry });
                continue;
            }
        };

        if !layer.contains_zoom(zoom) {
            findings.push(AuditFinding::ZoomOutOfRange { path: entry, zoom });
            continue;
        }

        debug!(zoom, path = %entry.display(), "Auditing zoom directory");
        zoom_levels.push(audit_zoom_directory(
            &entry,
            zoom,
            layer.resolver(),
            &mut findings,
        )?);
    }

    zoom_levels.sort_by_key(|z| z.zoom);

    for finding in &findings {
        warn!(path = %finding.path().display(), "Tile set: {}", finding.describe());
    }

    let report = AuditReport {
        root: root.to_path_buf(),
        zoom_levels,
        findings,
    };

    info!(
        root = %root.display(),
        tiles = report.total_tiles(),
        findings = report.findings.len(),
        "Tile set audit complete"
    );
    Ok(report)
}

/// Zoom level of a directory named exactly as the resolver names it.
fn zoom_dir_level(name: &str) -> Option<u8> {
    name.parse::<u8>()
        .ok()
        .filter(|zoom| zoom.to_string() == name)
}

fn audit_zoom_directory(
    dir: &Path,
    zoom: u8,
    resolver: &TilePathResolver,
    findings: &mut Vec<AuditFinding>,
) -> Result<ZoomSummary, AuditError> {
    let extension = resolver.extension();
    let convention = resolver.offset_convention();
    // Zoom was checked against the layer, which never exceeds the supported maximum
    let capacity = tiles_per_region(zoom).unwrap_or(u64::MAX);
    let mut regions: BTreeMap<RegionCoord, u64> = BTreeMap::new();

    for path in sorted_entries(dir)? {
        if path.is_dir() {
            findings.push(AuditFinding::UnexpectedEntry { path });
            continue;
        }

        let name = match path.file_name().and_then(|n| n.to_str()) {
            Some(name) => name,
            None => {
                findings.push(AuditFinding::UnparseableName { path });
                continue;
            }
        };

        let tile = match parse_tile_filename(name) {
            Ok(tile) => tile,
            Err(_) => {
                findings.push(AuditFinding::UnparseableName { path });
                continue;
            }
        };

        let raw_extension = name.rsplit('.').next().unwrap_or_default();
        if raw_extension != extension {
            findings.push(AuditFinding::WrongExtension {
                extension: raw_extension.to_string(),
                path,
            });
            continue;
        }

        let canonical = TileFilename::new(tile.region, tile.index, extension).to_string();
        if canonical != name {
            findings.push(AuditFinding::NonCanonicalName { canonical, path });
            continue;
        }

        let written = region_indices(tile.region, zoom, convention)
            .map(|indices| indices.contains(&tile.index))
            .unwrap_or(false);
        if !written {
            findings.push(AuditFinding::IndexOutOfRange {
                index: tile.index,
                zoom,
                path,
            });
            continue;
        }

        *regions.entry(tile.region).or_default() += 1;
    }

    let regions: Vec<RegionCoverage> = regions
        .into_iter()
        .map(|(region, tiles)| RegionCoverage {
            region,
            tiles,
            complete: tiles == capacity,
        })
        .collect();

    Ok(ZoomSummary {
        zoom,
        tiles: regions.iter().map(|r| r.tiles).sum(),
        regions,
    })
}

fn sorted_entries(dir: &Path) -> Result<Vec<PathBuf>, AuditError> {
    let io_err = |source| AuditError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut entries = fs::read_dir(dir)
        .map_err(io_err)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<Result<Vec<_>, _>>()
        .map_err(io_err)?;
    entries.sort();
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coord::OffsetConvention;
    use tempfile::TempDir;

    fn touch(root: &Path, relative: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"").unwrap();
    }

    fn layer() -> TileLayer {
        TileLayer::minecraft(TilePathResolver::new("maps"))
    }

    #[test]
    fn test_missing_root() {
        let temp = TempDir::new().unwrap();
        let result = audit_tile_set(&temp.path().join("nope"), &layer());
        assert!(matches!(result, Err(AuditError::RootNotFound(_))));
    }

    #[test]
    fn test_empty_tile_set_is_clean() {
        let temp = TempDir::new().unwrap();
        let report = audit_tile_set(temp.path(), &layer()).unwrap();
        assert!(report.is_clean());
        assert_eq!(report.total_tiles(), 0);
        assert!(report.zoom_levels.is_empty());
    }

    #[test]
    fn test_counts_tiles_and_complete_regions() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "0/r.0.0-0.jpeg");
        touch(temp.path(), "0/r.-1.0-0.jpeg");
        for index in 0..4 {
            touch(temp.path(), &format!("1/r.0.0-{}.jpeg", index));
        }
        touch(temp.path(), "1/r.-1.0-1.jpeg");

        let report = audit_tile_set(temp.path(), &layer()).unwrap();
        assert!(report.is_clean(), "{:?}", report.findings);
        assert_eq!(report.total_tiles(), 7);

        let zoom0 = &report.zoom_levels[0];
        assert_eq!(zoom0.zoom, 0);
        assert_eq!(zoom0.tiles, 2);
        assert!(zoom0.regions.iter().all(|r| r.complete));

        let zoom1 = &report.zoom_levels[1];
        assert_eq!(zoom1.tiles, 5);
        assert_eq!(
            zoom1.regions,
            vec![
                RegionCoverage {
                    region: RegionCoord::new(-1, 0),
                    tiles: 1,
                    complete: false,
                },
                RegionCoverage {
                    region: RegionCoord::new(0, 0),
                    tiles: 4,
                    complete: true,
                },
            ]
        );
    }

    #[test]
    fn test_reports_findings() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "readme.txt");
        touch(temp.path(), "tiles/r.0.0-0.jpeg");
        touch(temp.path(), "7/r.0.0-0.jpeg");
        touch(temp.path(), "1/notes.txt");
        touch(temp.path(), "1/r.0.0-0.png");
        touch(temp.path(), "1/r.0.0-4.jpeg");
        touch(temp.path(), "1/nested/r.0.0-0.jpeg");
        touch(temp.path(), "1/r.0.0-3.jpeg");

        let report = audit_tile_set(temp.path(), &layer()).unwrap();
        assert_eq!(report.total_tiles(), 1);

        let kinds: Vec<&str> = report
            .findings
            .iter()
            .map(|f| match f {
                AuditFinding::UnexpectedEntry { .. } => "unexpected",
                AuditFinding::InvalidZoomDirectory { .. } => "zoom-dir",
                AuditFinding::ZoomOutOfRange { .. } => "zoom-range",
                AuditFinding::UnparseableName { .. } => "name",
                AuditFinding::WrongExtension { .. } => "extension",
                AuditFinding::NonCanonicalName { .. } => "canonical",
                AuditFinding::IndexOutOfRange { .. } => "index",
            })
            .collect();

        // Sorted traversal: "1", "7", "readme.txt", "tiles"
        assert_eq!(
            kinds,
            vec![
                "unexpected", // 1/nested
                "name",       // 1/notes.txt
                "extension",  // 1/r.0.0-0.png
                "index",      // 1/r.0.0-4.jpeg
                "zoom-range", // 7
                "unexpected", // readme.txt
                "zoom-dir",   // tiles
            ]
        );
    }

    #[test]
    fn test_report_serializes_with_kind_tags() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "0/bad.jpeg");

        let report = audit_tile_set(temp.path(), &layer()).unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["findings"][0]["kind"], "unparseable_name");
        assert_eq!(json["zoom_levels"][0]["zoom"], 0);
    }

    #[test]
    fn test_aliases_are_not_tiles() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "01/r.0.0-0.jpeg");
        touch(temp.path(), "1/r.-0.0-1.jpeg");
        touch(temp.path(), "1/r.00.0-02.jpeg");
        touch(temp.path(), "1/r.0.0-3.JPEG");

        let report = audit_tile_set(temp.path(), &layer()).unwrap();
        assert_eq!(report.total_tiles(), 0);
        assert!(report.zoom_levels.iter().all(|z| z.regions.is_empty()));
        assert_eq!(
            report.findings,
            vec![
                AuditFinding::InvalidZoomDirectory {
                    path: temp.path().join("01"),
                },
                AuditFinding::NonCanonicalName {
                    path: temp.path().join("1").join("r.-0.0-1.jpeg"),
                    canonical: "r.0.0-1.jpeg".to_string(),
                },
                AuditFinding::WrongExtension {
                    path: temp.path().join("1").join("r.0.0-3.JPEG"),
                    extension: "JPEG".to_string(),
                },
                AuditFinding::NonCanonicalName {
                    path: temp.path().join("1").join("r.00.0-02.jpeg"),
                    canonical: "r.0.0-2.jpeg".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_alias_does_not_complete_region() {
        let temp = TempDir::new().unwrap();
        for name in ["r.0.0-0.jpeg", "r.0.0-1.jpeg", "r.0.0-2.jpeg", "r.0.0-02.jpeg"] {
            touch(temp.path(), &format!("1/{}", name));
        }

        let report = audit_tile_set(temp.path(), &layer()).unwrap();
        let region = &report.zoom_levels[0].regions[0];
        assert_eq!(region.tiles, 3);
        assert!(!region.complete);
    }

    fn write_tiles(root: &Path, resolver: &TilePathResolver, zoom: u8) {
        let division = 1i32 << zoom;
        for x in -division..division {
            for y in -division..division {
                let coord = crate::coord::TileCoord::new(x, y, zoom).unwrap();
                let path = resolver.resolve(coord).to_path_under(root);
                fs::create_dir_all(path.parent().unwrap()).unwrap();
                fs::write(path, b"").unwrap();
            }
        }
    }

    #[test]
    fn test_legacy_tile_set_is_clean_under_legacy_layer() {
        let temp = TempDir::new().unwrap();
        let resolver =
            TilePathResolver::new("").with_offset_convention(OffsetConvention::Legacy);
        write_tiles(temp.path(), &resolver, 1);

        let report = audit_tile_set(temp.path(), &TileLayer::minecraft(resolver)).unwrap();
        assert!(report.is_clean(), "{:?}", report.findings);
        assert_eq!(report.total_tiles(), 16);
        assert_eq!(report.zoom_levels[0].regions.len(), 4);
        assert!(report.zoom_levels[0].regions.iter().all(|r| r.complete));
    }

    #[test]
    fn test_legacy_tile_set_under_euclidean_layer() {
        let temp = TempDir::new().unwrap();
        let legacy =
            TilePathResolver::new("").with_offset_convention(OffsetConvention::Legacy);
        write_tiles(temp.path(), &legacy, 1);

        // Legacy names past the last Euclidean index: region (-1, 0) index 4,
        // region (0, -1) indices 4 and 5, region (-1, -1) indices 4, 5 and 6
        let report = audit_tile_set(temp.path(), &layer()).unwrap();
        let out_of_range = report
            .findings
            .iter()
            .filter(|f| matches!(f, AuditFinding::IndexOutOfRange { .. }))
            .count();
        assert_eq!(out_of_range, 6);
        assert_eq!(report.findings.len(), 6);
    }
}
