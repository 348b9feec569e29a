//! Color and appearance transforms. Alpha is never modified.

use image::imageops;
use image::RgbaImage;
use rand::Rng;

/// ITU-R 601-2 luma, the weights used for grayscale conversion.
#[inline]
fn luma(r: f32, g: f32, b: f32) -> f32 {
    (r * 299.0 + g * 587.0 + b * 114.0) / 1000.0
}

#[inline]
fn clamp_channel(v: f32) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

/// Scale every color channel toward black by `factor`.
pub fn adjust_brightness(image: &mut RgbaImage, factor: f64) {
    let factor = factor as f32;
    for pixel in image.pixels_mut() {
        for c in 0..3 {
            pixel[c] = clamp_channel(pixel[c] as f32 * factor);
        }
    }
}

/// Scale color channels around the mean luminance of the whole image.
pub fn adjust_contrast(image: &mut RgbaImage, factor: f64) {
    let count = image.width() as f64 * image.height() as f64;
    if count == 0.0 {
        return;
    }
    let total: f64 = image
        .pixels()
        .map(|p| luma(p[0] as f32, p[1] as f32, p[2] as f32) as f64)
        .sum();
    let mean = (total / count).round() as f32;
    let factor = factor as f32;

    for pixel in image.pixels_mut() {
        for c in 0..3 {
            pixel[c] = clamp_channel(mean + (pixel[c] as f32 - mean) * factor);
        }
    }
}

/// Scale color channels around each pixel's own luminance.
pub fn adjust_saturation(image: &mut RgbaImage, factor: f64) {
    let factor = factor as f32;
    for pixel in image.pixels_mut() {
        let gray = luma(pixel[0] as f32, pixel[1] as f32, pixel[2] as f32);
        for c in 0..3 {
            pixel[c] = clamp_channel(gray + (pixel[c] as f32 - gray) * factor);
        }
    }
}

/// Gaussian blur with the given sigma. Non-positive radii are a no-op.
pub fn gaussian_blur(image: &RgbaImage, radius: f64) -> RgbaImage {
    if radius <= 0.0 {
        return image.clone();
    }
    imageops::blur(image, radius as f32)
}

/// Add independent uniform noise in `[-intensity, intensity]` to each color
/// channel of each pixel.
pub fn add_noise<R: Rng + ?Sized>(image: &mut RgbaImage, intensity: f64, rng: &mut R) {
    let amplitude = intensity as f32;
    if !amplitude.is_finite() || amplitude <= 0.0 {
        return;
    }
    for pixel in image.pixels_mut() {
        for c in 0..3 {
            pixel[c] = clamp_channel(pixel[c] as f32 + rng.random_range(-amplitude..=amplitude));
        }
    }
}
