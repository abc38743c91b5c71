//! Pixel-level building blocks for overlay compositing.
//!
//! Everything here is deterministic: the same inputs always produce the same
//! pixels and the same encoded bytes.

use std::io::Cursor;

use image::{
    ImageFormat, ImageReader, ImageResult, Rgba, Rgba32FImage, RgbaImage,
    imageops::{self, FilterType},
};

/// Width every overlay is resized to before compositing.
pub const OVERLAY_WIDTH: u32 = 828;

/// Height every overlay is resized to before compositing.
pub const OVERLAY_HEIGHT: u32 = 1312;

/// Decode any supported format (sniffed from content, not from a file name)
/// and normalize it to 8-bit RGBA.
pub fn decode_rgba(data: &[u8]) -> ImageResult<RgbaImage> {
    let image = ImageReader::new(Cursor::new(data))
        .with_guessed_format()?
        .decode()?;
    Ok(image.into_rgba8())
}

/// Resize to exactly `width` x `height` with a Lanczos3 filter, ignoring the
/// original aspect ratio.
///
/// Filtering runs on premultiplied `f32` channels, so the color hidden under
/// fully transparent pixels never bleeds into visible edge pixels.
pub fn resize_exact(image: &RgbaImage, width: u32, height: u32) -> RgbaImage {
    if image.dimensions() == (width, height) {
        return image.clone();
    }

    let premultiplied = Rgba32FImage::from_fn(image.width(), image.height(), |x, y| {
        premultiply(*image.get_pixel(x, y))
    });
    let resized = imageops::resize(&premultiplied, width, height, FilterType::Lanczos3);
    RgbaImage::from_fn(width, height, |x, y| unpremultiply(*resized.get_pixel(x, y)))
}

fn premultiply(pixel: Rgba<u8>) -> Rgba<f32> {
    let [r, g, b, a] = pixel.0.map(|c| f32::from(c) / 255.0);
    Rgba([r * a, g * a, b * a, a])
}

fn unpremultiply(pixel: Rgba<f32>) -> Rgba<u8> {
    let alpha = pixel[3].clamp(0.0, 1.0);
    let alpha_u8 = (alpha * 255.0).round() as u8;
    if alpha_u8 == 0 {
        return Rgba([0, 0, 0, 0]);
    }
    // Lanczos ringing can push a color past its alpha.
    let channel = |c: f32| (c.clamp(0.0, alpha) / alpha * 255.0).round() as u8;
    Rgba([
        channel(pixel[0]),
        channel(pixel[1]),
        channel(pixel[2]),
        alpha_u8,
    ])
}

/// Top-left offset that centers `overlay` on `base`.
///
/// Each axis is `(base - overlay) / 2` rounded down, clamped at zero when the
/// overlay is larger than the base on that axis.
pub fn centered_offset(base: (u32, u32), overlay: (u32, u32)) -> (u32, u32) {
    (
        base.0.saturating_sub(overlay.0) / 2,
        base.1.saturating_sub(overlay.1) / 2,
    )
}

/// Porter-Duff "over" of `src` onto `dst` on straight (non-premultiplied)
/// 8-bit channels, rounded to nearest.
pub fn blend_over(dst: Rgba<u8>, src: Rgba<u8>) -> Rgba<u8> {
    let src_a = u32::from(src[3]);
    match src_a {
        0 => return dst,
        255 => return src,
        _ => {},
    }

    let dst_a = u32::from(dst[3]);
    let dst_weight = dst_a * (255 - src_a);
    // Output alpha, scaled by 255.
    let out_a = src_a * 255 + dst_weight;

    let mut out = [0u8; 4];
    for (channel, slot) in out.iter_mut().take(3).enumerate() {
        let numerator =
            u32::from(src[channel]) * src_a * 255 + u32::from(dst[channel]) * dst_weight;
        *slot = ((numerator + out_a / 2) / out_a) as u8;
    }
    out[3] = ((out_a + 127) / 255) as u8;
    Rgba(out)
}

/// Blend `overlay` onto `base` with its top-left corner at `(x, y)`, using
/// the overlay's own alpha as the mask.
///
/// Overlay pixels that fall outside `base` are clipped; base pixels outside
/// the overlay footprint are left untouched.
pub fn paste_over(base: &mut RgbaImage, overlay: &RgbaImage, x: u32, y: u32) {
    let (base_w, base_h) = base.dimensions();
    if x >= base_w || y >= base_h {
        return;
    }
    let visible_w = overlay.width().min(base_w - x);
    let visible_h = overlay.height().min(base_h - y);

    for oy in 0..visible_h {
        for ox in 0..visible_w {
            let src = *overlay.get_pixel(ox, oy);
            let dst = base.get_pixel_mut(x + ox, y + oy);
            *dst = blend_over(*dst, src);
        }
    }
}

/// Encode as PNG, which keeps the alpha channel and is lossless.
pub fn encode_png(image: &RgbaImage) -> ImageResult<Vec<u8>> {
    let mut output = Cursor::new(Vec::new());
    image.write_to(&mut output, ImageFormat::Png)?;
    Ok(output.into_inner())
}
