use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use {dashmap::DashMap, image::RgbaImage};

/// Decoded, already-resized overlays keyed by asset location.
#[derive(Debug, Default)]
pub struct OverlayCache {
    entries: DashMap<PathBuf, Arc<RgbaImage>>,
}

impl OverlayCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, location: &Path) -> Option<Arc<RgbaImage>> {
        self.entries
            .get(location)
            .map(|entry| Arc::clone(entry.value()))
    }

    /// Store `image` unless another request got there first; returns the
    /// entry that ends up cached.
    pub fn insert(&self, location: &Path, image: RgbaImage) -> Arc<RgbaImage> {
        let entry = self
            .entries
            .entry(location.to_path_buf())
            .or_insert_with(|| Arc::new(image));
        Arc::clone(entry.value())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&self) {
        self.entries.clear();
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {super::*, image::Rgba};

    #[test]
    fn first_insert_wins() {
        let cache = OverlayCache::new();
        let path = Path::new("epic_overlay.png");

        let first = cache.insert(path, RgbaImage::from_pixel(1, 1, Rgba([1, 1, 1, 1])));
        let second = cache.insert(path, RgbaImage::from_pixel(1, 1, Rgba([2, 2, 2, 2])));

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.get(path).unwrap().get_pixel(0, 0)[0], 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn clear_drops_entries() {
        let cache = OverlayCache::new();
        cache.insert(Path::new("a.png"), RgbaImage::new(1, 1));
        cache.clear();
        assert!(cache.is_empty());
        assert!(cache.get(Path::new("a.png")).is_none());
    }
}
