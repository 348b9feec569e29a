//! Compositing effects applied to a placed foreground.

use image::RgbaImage;
use rand::Rng;

use crate::augment::photometric::gaussian_blur;
use crate::config::ShadowConfig;

/// A drop shadow and where to draw it relative to its foreground.
#[derive(Clone, Debug)]
pub struct Shadow {
    pub image: RgbaImage,
    pub dx: i64,
    pub dy: i64,
}

/// Build a blurred, darkened silhouette of `foreground`.
///
/// The silhouette keeps the foreground's alpha scaled by a sampled darkness;
/// color is black. Blur spreads past the original edges, so the shadow is
/// padded by the blur extent and its offset corrected accordingly.
pub fn drop_shadow<R: Rng + ?Sized>(
    foreground: &RgbaImage,
    config: &ShadowConfig,
    rng: &mut R,
) -> Shadow {
    let darkness = config.darkness.sample(rng);
    let dx = config.offset.sample(rng).round() as i64;
    let dy = config.offset.sample(rng).round() as i64;
    let radius = config.blur_radius.sample(rng);
    let pad = (radius * 3.0).ceil().max(0.0) as u32;

    let (w, h) = foreground.dimensions();
    let mut silhouette = RgbaImage::new(w + 2 * pad, h + 2 * pad);
    for (x, y, pixel) in foreground.enumerate_pixels() {
        let alpha = (pixel[3] as f64 * darkness).round().clamp(0.0, 255.0) as u8;
        silhouette.put_pixel(x + pad, y + pad, image::Rgba([0, 0, 0, alpha]));
    }

    Shadow {
        image: gaussian_blur(&silhouette, radius),
        dx: dx - pad as i64,
        dy: dy - pad as i64,
    }
}

/// Multiply the alpha channel by `opacity`.
pub fn apply_opacity(image: &mut RgbaImage, opacity: f64) {
    for pixel in image.pixels_mut() {
        pixel[3] = (pixel[3] as f64 * opacity).round().clamp(0.0, 255.0) as u8;
    }
}
