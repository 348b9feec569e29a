//! Spatial transforms: expanding rotation, perspective keystone, resize.

use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use imageproc::geometric_transformations::{rotate_about_center, warp, Interpolation, Projection};
use rand::Rng;

use crate::error::SynthError;

const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// Rotate by `degrees` about the center, growing the canvas so no content is
/// clipped. Uncovered pixels are fully transparent.
pub fn rotate_expand(image: &RgbaImage, degrees: f64) -> Result<RgbaImage, SynthError> {
    let (w, h) = image.dimensions();
    if w == 0 || h == 0 {
        return Err(SynthError::DegenerateImage {
            stage: "rotation",
            message: format!("input is {w}x{h}"),
        });
    }

    let theta = degrees.to_radians();
    let (sin, cos) = (theta.sin().abs(), theta.cos().abs());
    let rotated_w = (w as f64 * cos + h as f64 * sin).ceil() as u32;
    let rotated_h = (w as f64 * sin + h as f64 * cos).ceil() as u32;

    // The canvas must hold both the original and the rotated extents.
    let canvas_w = rotated_w.max(w);
    let canvas_h = rotated_h.max(h);
    let mut canvas = RgbaImage::from_pixel(canvas_w, canvas_h, TRANSPARENT);
    imageops::overlay(
        &mut canvas,
        image,
        ((canvas_w - w) / 2) as i64,
        ((canvas_h - h) / 2) as i64,
    );

    let rotated = rotate_about_center(
        &canvas,
        theta as f32,
        Interpolation::Bilinear,
        TRANSPARENT,
    );

    // Trim the slack left when one side of the original exceeded the rotated extent.
    let x = (canvas_w - rotated_w) / 2;
    let y = (canvas_h - rotated_h) / 2;
    Ok(imageops::crop_imm(&rotated, x, y, rotated_w.max(1), rotated_h.max(1)).to_image())
}

/// Pull each corner inward by a random fraction (up to `intensity`) of the
/// image size and warp the content onto the resulting quadrilateral.
pub fn perspective<R: Rng + ?Sized>(
    image: &RgbaImage,
    intensity: f64,
    rng: &mut R,
) -> Result<RgbaImage, SynthError> {
    let (w, h) = image.dimensions();
    if w < 2 || h < 2 {
        return Err(SynthError::DegenerateImage {
            stage: "perspective",
            message: format!("input is {w}x{h}"),
        });
    }

    let (wf, hf) = (w as f32, h as f32);
    let max_dx = (wf * intensity as f32).max(0.0);
    let max_dy = (hf * intensity as f32).max(0.0);
    let mut jitter = |limit: f32| {
        if limit > 0.0 {
            rng.random_range(0.0..=limit)
        } else {
            0.0
        }
    };

    let from = [(0.0, 0.0), (wf, 0.0), (wf, hf), (0.0, hf)];
    let to = [
        (jitter(max_dx), jitter(max_dy)),
        (wf - jitter(max_dx), jitter(max_dy)),
        (wf - jitter(max_dx), hf - jitter(max_dy)),
        (jitter(max_dx), hf - jitter(max_dy)),
    ];

    let projection =
        Projection::from_control_points(from, to).ok_or_else(|| SynthError::DegenerateImage {
            stage: "perspective",
            message: format!("no projection maps {from:?} onto {to:?}"),
        })?;

    Ok(warp(image, &projection, Interpolation::Bilinear, TRANSPARENT))
}

/// Resize proportionally so the longer side equals `target_long_side`.
///
/// Each side is clamped to at least one pixel.
pub fn scale_to_long_side(
    image: &RgbaImage,
    target_long_side: f64,
) -> Result<RgbaImage, SynthError> {
    let (w, h) = image.dimensions();
    let long_side = w.max(h);
    if long_side == 0 || !target_long_side.is_finite() {
        return Err(SynthError::DegenerateImage {
            stage: "scale",
            message: format!("cannot scale {w}x{h} to {target_long_side}"),
        });
    }

    let scale = target_long_side / long_side as f64;
    let new_w = ((w as f64 * scale).round() as u32).max(1);
    let new_h = ((h as f64 * scale).round() as u32).max(1);
    if (new_w, new_h) == (w, h) {
        return Ok(image.clone());
    }
    Ok(imageops::resize(image, new_w, new_h, FilterType::Lanczos3))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn opaque(w: u32, h: u32) -> RgbaImage {
        RgbaImage::from_pixel(w, h, Rgba([200, 50, 50, 255]))
    }

    #[test]
    fn zero_rotation_keeps_size() {
        let out = rotate_expand(&opaque(40, 20), 0.0).expect("rotate");
        assert_eq!(out.dimensions(), (40, 20));
    }

    #[test]
    fn rotation_expands_canvas_with_transparent_corners() {
        let out = rotate_expand(&opaque(100, 100), 15.0).expect("rotate");
        let (w, h) = out.dimensions();
        assert!(w > 100 && h > 100);
        assert_eq!(out.get_pixel(0, 0)[3], 0);
        assert_eq!(out.get_pixel(w / 2, h / 2)[3], 255);
    }

    #[test]
    fn quarter_turn_swaps_extents() {
        let out = rotate_expand(&opaque(60, 20), 90.0).expect("rotate");
        let (w, h) = out.dimensions();
        assert!((20..=21).contains(&w), "width {w}");
        assert!((60..=61).contains(&h), "height {h}");
    }

    #[test]
    fn perspective_keeps_canvas_size() {
        let mut rng = StdRng::seed_from_u64(11);
        let out = perspective(&opaque(50, 40), 0.1, &mut rng).expect("warp");
        assert_eq!(out.dimensions(), (50, 40));
        assert_eq!(out.get_pixel(25, 20)[3], 255);
    }

    #[test]
    fn perspective_rejects_tiny_images() {
        let mut rng = StdRng::seed_from_u64(11);
        let err = perspective(&opaque(1, 5), 0.1, &mut rng).unwrap_err();
        assert!(matches!(err, SynthError::DegenerateImage { .. }));
    }

    #[test]
    fn scale_matches_long_side() {
        let out = scale_to_long_side(&opaque(200, 100), 50.0).expect("scale");
        assert_eq!(out.dimensions(), (50, 25));
    }

    #[test]
    fn scale_clamps_to_one_pixel() {
        let out = scale_to_long_side(&opaque(100, 2), 10.0).expect("scale");
        assert_eq!(out.dimensions(), (10, 1));
    }
}
