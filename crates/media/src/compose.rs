//! Overlay compositing for a single request.
//!
//! 1. decode the user's image and normalize it to RGBA
//! 2. load the overlay asset, decode it, normalize it to RGBA
//! 3. resize the overlay to exactly [`OVERLAY_WIDTH`] x [`OVERLAY_HEIGHT`]
//! 4. center it on the source (offsets clamp at zero)
//! 5. blend it in with its own alpha as the mask
//! 6. encode the result as PNG

use std::{path::Path, sync::Arc, time::Instant};

use {image::RgbaImage, tracing::debug};

use crate::{
    Error, Result,
    assets::AssetReader,
    cache::OverlayCache,
    image_ops::{
        OVERLAY_HEIGHT, OVERLAY_WIDTH, centered_offset, decode_rgba, encode_png, paste_over,
        resize_exact,
    },
};

/// Encoded output of one compositing run.
#[derive(Debug, Clone)]
pub struct CompositeResult {
    /// PNG bytes.
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
    /// Where the overlay's top-left corner was placed on the source.
    pub offset: (u32, u32),
}

impl CompositeResult {
    pub const MEDIA_TYPE: &'static str = "image/png";
}

/// Composites overlay assets onto user images.
pub struct Compositor {
    assets: Arc<dyn AssetReader>,
    cache: Option<OverlayCache>,
    overlay_size: (u32, u32),
}

impl Compositor {
    pub fn new(assets: Arc<dyn AssetReader>) -> Self {
        Self {
            assets,
            cache: None,
            overlay_size: (OVERLAY_WIDTH, OVERLAY_HEIGHT),
        }
    }

    /// Keep decoded, resized overlays in memory across requests.
    #[must_use]
    pub fn with_overlay_cache(mut self) -> Self {
        self.cache = Some(OverlayCache::new());
        self
    }

    #[cfg(test)]
    fn with_overlay_size(mut self, width: u32, height: u32) -> Self {
        self.overlay_size = (width, height);
        self
    }

    pub fn assets(&self) -> &Arc<dyn AssetReader> {
        &self.assets
    }

    pub fn cache(&self) -> Option<&OverlayCache> {
        self.cache.as_ref()
    }

    /// Blend the overlay stored at `overlay_location` onto the image encoded
    /// in `source`.
    ///
    /// The output always has the source's dimensions. The on-disk asset is
    /// only ever read.
    pub fn composite(&self, source: &[u8], overlay_location: &Path) -> Result<CompositeResult> {
        let started = Instant::now();

        let mut base = decode_rgba(source).map_err(Error::source_decode)?;
        let overlay = self.load_overlay(overlay_location)?;

        let offset = centered_offset(base.dimensions(), overlay.dimensions());
        paste_over(&mut base, &overlay, offset.0, offset.1);

        let data = encode_png(&base).map_err(Error::encode)?;
        let (width, height) = base.dimensions();

        debug!(
            overlay = %overlay_location.display(),
            width,
            height,
            x = offset.0,
            y = offset.1,
            bytes = data.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "composited overlay"
        );

        Ok(CompositeResult {
            data,
            width,
            height,
            offset,
        })
    }

    fn load_overlay(&self, location: &Path) -> Result<Arc<RgbaImage>> {
        if let Some(hit) = self.cache.as_ref().and_then(|cache| cache.get(location)) {
            return Ok(hit);
        }

        let raw = self
            .assets
            .read(location)
            .map_err(|source| Error::AssetUnreadable {
                location: location.to_path_buf(),
                source,
            })?;
        let decoded =
            decode_rgba(&raw).map_err(|source| Error::overlay_decode(location, source))?;
        let (width, height) = self.overlay_size;
        let resized = resize_exact(&decoded, width, height);

        Ok(match &self.cache {
            Some(cache) => cache.insert(location, resized),
            None => Arc::new(resized),
        })
    }
}
