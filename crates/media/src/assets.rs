//! Read access to overlay assets.
//!
//! The compositor and the validator only see assets through [`AssetReader`],
//! so tests can serve fixed byte buffers instead of touching the filesystem.

use std::{
    collections::HashMap,
    fs::File,
    io,
    path::{Path, PathBuf},
};

/// Capability to check and load overlay assets by location.
pub trait AssetReader: Send + Sync {
    /// Whether the asset at `location` can currently be opened for reading.
    fn is_readable(&self, location: &Path) -> bool;

    /// Load the raw bytes of the asset at `location`.
    fn read(&self, location: &Path) -> io::Result<Vec<u8>>;
}

/// Reads assets from the local filesystem, opening the file fresh on every call.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsAssetReader;

impl AssetReader for FsAssetReader {
    fn is_readable(&self, location: &Path) -> bool {
        File::open(location)
            .and_then(|file| file.metadata())
            .is_ok_and(|meta| meta.is_file())
    }

    fn read(&self, location: &Path) -> io::Result<Vec<u8>> {
        std::fs::read(location)
    }
}

/// In-memory asset table.
#[derive(Debug, Clone, Default)]
pub struct StaticAssetReader {
    assets: HashMap<PathBuf, Vec<u8>>,
}

impl StaticAssetReader {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_asset(mut self, location: impl Into<PathBuf>, data: Vec<u8>) -> Self {
        self.insert(location, data);
        self
    }

    pub fn insert(&mut self, location: impl Into<PathBuf>, data: Vec<u8>) {
        self.assets.insert(location.into(), data);
    }
}

impl AssetReader for StaticAssetReader {
    fn is_readable(&self, location: &Path) -> bool {
        self.assets.contains_key(location)
    }

    fn read(&self, location: &Path) -> io::Result<Vec<u8>> {
        self.assets.get(location).cloned().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("no asset registered at {}", location.display()),
            )
        })
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fs_reader_reports_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("epic_overlay.png");
        std::fs::write(&path, b"bytes").unwrap();

        let reader = FsAssetReader;
        assert!(reader.is_readable(&path));
        assert_eq!(reader.read(&path).unwrap(), b"bytes");
    }

    #[test]
    fn fs_reader_rejects_missing_file_and_directories() {
        let dir = tempfile::tempdir().unwrap();
        let reader = FsAssetReader;

        assert!(!reader.is_readable(&dir.path().join("missing.png")));
        assert!(!reader.is_readable(dir.path()));
        let err = reader.read(&dir.path().join("missing.png")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn static_reader_serves_registered_buffers() {
        let reader = StaticAssetReader::new().with_asset("rare.png", vec![1, 2, 3]);

        assert!(reader.is_readable(Path::new("rare.png")));
        assert!(!reader.is_readable(Path::new("common.png")));
        assert_eq!(reader.read(Path::new("rare.png")).unwrap(), vec![1, 2, 3]);
        assert_eq!(
            reader.read(Path::new("common.png")).unwrap_err().kind(),
            io::ErrorKind::NotFound
        );
    }
}
