//! Relative tile image paths.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

/// Relative location of a tile image inside a tile set.
///
/// Always uses `/` as separator, since the path is consumed as a URL by the
/// map widget. Use [`TilePath::to_path_under`] to locate the image on disk.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct TilePath(String);

impl TilePath {
    pub(crate) fn new(path: String) -> Self {
        Self(path)
    }

    /// The path as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the path, returning the underlying string.
    pub fn into_string(self) -> String {
        self.0
    }

    /// Build a filesystem path by appending each component to `root`.
    ///
    /// Empty and `.` components are skipped; `..` is kept as-is.
    pub fn to_path_under(&self, root: &Path) -> PathBuf {
        self.0
            .split('/')
            .filter(|part| !part.is_empty() && *part != ".")
            .fold(root.to_path_buf(), |mut path, part| {
                path.push(part);
                path
            })
    }
}

impl fmt::Display for TilePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for TilePath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<TilePath> for String {
    fn from(path: TilePath) -> Self {
        path.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_path_under_root() {
        let path = TilePath::new("tiles/2/r.0.-1-5.jpeg".to_string());
        let full = path.to_path_under(Path::new("/srv/maps"));
        assert_eq!(
            full,
            Path::new("/srv/maps")
                .join("tiles")
                .join("2")
                .join("r.0.-1-5.jpeg")
        );
    }

    #[test]
    fn test_to_path_under_skips_empty_components() {
        let path = TilePath::new("./tiles//0/r.0.0-0.jpeg".to_string());
        let full = path.to_path_under(Path::new("root"));
        assert_eq!(full, Path::new("root/tiles/0/r.0.0-0.jpeg"));
    }

    #[test]
    fn test_serializes_as_plain_string() {
        let path = TilePath::new("a/0/r.1.2-0.jpeg".to_string());
        assert_eq!(
            serde_json::to_string(&path).unwrap(),
            "\"a/0/r.1.2-0.jpeg\""
        );
    }
}
