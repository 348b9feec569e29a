//! Randomized augmentation chains.
//!
//! Foregrounds go through the full chain, in this fixed order:
//!
//! ```text
//! rotation → perspective → brightness → contrast → saturation → blur → noise
//! ```
//!
//! Each stage is gated by an independent Bernoulli draw from its configured
//! probability and consumes the previous stage's output. Backgrounds only get
//! the photometric half so their dimensions never change.
//!
//! A geometric stage that would produce an unusable image returns
//! [`SynthError::DegenerateImage`]; callers decide whether to skip or abort.

pub mod geometric;
pub mod photometric;

use image::RgbaImage;
use log::trace;
use rand::Rng;

use crate::config::{AugmentConfig, GeometricConfig, PhotometricConfig};
use crate::error::SynthError;

pub use geometric::{perspective, rotate_expand, scale_to_long_side};

/// Run the full foreground chain.
pub fn augment_foreground<R: Rng + ?Sized>(
    image: RgbaImage,
    config: &AugmentConfig,
    rng: &mut R,
) -> Result<RgbaImage, SynthError> {
    let image = apply_geometric(image, &config.geometric, rng)?;
    Ok(apply_photometric(image, &config.photometric, rng))
}

/// Run the photometric-only pass used for backgrounds.
pub fn augment_background<R: Rng + ?Sized>(
    image: RgbaImage,
    config: &PhotometricConfig,
    rng: &mut R,
) -> RgbaImage {
    apply_photometric(image, config, rng)
}

fn apply_geometric<R: Rng + ?Sized>(
    mut image: RgbaImage,
    config: &GeometricConfig,
    rng: &mut R,
) -> Result<RgbaImage, SynthError> {
    if rng.random_bool(config.rotation_probability) {
        let degrees = config.rotation_degrees.sample(rng);
        trace!("rotate {degrees:.2}°");
        image = rotate_expand(&image, degrees)?;
    }

    if rng.random_bool(config.perspective_probability) {
        trace!("perspective {:.3}", config.perspective_intensity);
        image = perspective(&image, config.perspective_intensity, rng)?;
    }

    let (w, h) = image.dimensions();
    if w == 0 || h == 0 {
        return Err(SynthError::DegenerateImage {
            stage: "geometric",
            message: format!("result is {w}x{h}"),
        });
    }
    Ok(image)
}

fn apply_photometric<R: Rng + ?Sized>(
    mut image: RgbaImage,
    config: &PhotometricConfig,
    rng: &mut R,
) -> RgbaImage {
    if rng.random_bool(config.brightness_probability) {
        photometric::adjust_brightness(&mut image, config.brightness.sample(rng));
    }
    if rng.random_bool(config.contrast_probability) {
        photometric::adjust_contrast(&mut image, config.contrast.sample(rng));
    }
    if rng.random_bool(config.saturation_probability) {
        photometric::adjust_saturation(&mut image, config.saturation.sample(rng));
    }
    if rng.random_bool(config.blur_probability) {
        image = photometric::gaussian_blur(&image, config.blur_radius.sample(rng));
    }
    if rng.random_bool(config.noise_probability) {
        let intensity = config.noise_intensity.sample(rng);
        photometric::add_noise(&mut image, intensity, rng);
    }
    image
}
