//! Scene assembly: one background, several augmented covers, one label set.

pub mod effects;

use image::imageops;
use image::{DynamicImage, RgbImage, RgbaImage};
use log::{debug, warn};
use rand::Rng;

use crate::augment::{augment_background, augment_foreground, scale_to_long_side};
use crate::config::SynthConfig;
use crate::error::SynthError;
use crate::geom::{Pixel, Rect};
use crate::label::LabelRow;
use crate::placement::find_placement;
use crate::source::{load_rgba, ImagePool, SourceSet};

/// Whether a scene's covers come from the target class.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Polarity {
    Positive,
    Negative,
}

impl Polarity {
    pub fn is_positive(&self) -> bool {
        matches!(self, Polarity::Positive)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Polarity::Positive => "positive",
            Polarity::Negative => "negative",
        }
    }
}

/// A finished scene.
#[derive(Clone, Debug)]
pub struct Scene {
    /// Opaque composite at background resolution.
    pub image: RgbImage,
    /// One row per placed cover for positive scenes; empty for negatives.
    pub labels: Vec<LabelRow>,
    /// Placement rectangles of every cover drawn, in drawing order.
    pub placements: Vec<Rect<Pixel>>,
    /// Cover attempts spent, including skipped ones.
    pub attempts: usize,
}

/// Builds scenes from a background pool and a cover source set.
pub struct SceneComposer<'a> {
    config: &'a SynthConfig,
    backgrounds: &'a ImagePool,
    covers: &'a SourceSet,
    polarity: Polarity,
}

impl<'a> SceneComposer<'a> {
    /// Fails with [`SynthError::InvalidConfig`] if `config` does not validate.
    pub fn new(
        config: &'a SynthConfig,
        backgrounds: &'a ImagePool,
        covers: &'a SourceSet,
        polarity: Polarity,
    ) -> Result<Self, SynthError> {
        config.validate()?;
        Ok(Self {
            config,
            backgrounds,
            covers,
            polarity,
        })
    }

    /// Compose one scene.
    ///
    /// Fails only when the background cannot be produced; every cover-level
    /// problem (empty pool, unreadable file, degenerate augmentation, no room)
    /// just spends an attempt.
    pub fn compose<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Scene, SynthError> {
        let bg_path = self
            .backgrounds
            .pick(rng)
            .ok_or_else(|| SynthError::EmptySource {
                role: "background",
                path: self.backgrounds.dir().to_path_buf(),
            })?;
        let background = load_rgba(bg_path)?;
        let mut canvas = augment_background(background, &self.config.background, rng);
        let (bg_w, bg_h) = canvas.dimensions();

        let base_size = bg_w.min(bg_h) as f64 / self.config.division_size as f64;
        let budget = self.config.num_covers * self.config.attempt_factor;
        let mut placements: Vec<Rect<Pixel>> = Vec::with_capacity(self.config.num_covers);
        let mut attempts = 0;

        while placements.len() < self.config.num_covers && attempts < budget {
            attempts += 1;
            match self.place_one(&mut canvas, base_size, &placements, rng) {
                Ok(Some(rect)) => placements.push(rect),
                Ok(None) => {}
                Err(err @ SynthError::ImageDecode { .. }) => {
                    warn!("skipping cover: {err}");
                }
                Err(err @ SynthError::DegenerateImage { .. }) => {
                    debug!("skipping cover: {err}");
                }
                Err(err) => return Err(err),
            }
        }

        if placements.len() < self.config.num_covers {
            debug!(
                "placed {}/{} cover(s) within {} attempt(s)",
                placements.len(),
                self.config.num_covers,
                budget
            );
        }

        let labels = if self.polarity.is_positive() {
            placements
                .iter()
                .map(|rect| LabelRow::from_placement(rect, bg_w, bg_h))
                .collect()
        } else {
            Vec::new()
        };

        Ok(Scene {
            image: DynamicImage::ImageRgba8(canvas).to_rgb8(),
            labels,
            placements,
            attempts,
        })
    }

    /// Draw, augment, scale, place and composite a single cover.
    fn place_one<R: Rng + ?Sized>(
        &self,
        canvas: &mut RgbaImage,
        base_size: f64,
        placed: &[Rect<Pixel>],
        rng: &mut R,
    ) -> Result<Option<Rect<Pixel>>, SynthError> {
        let Some(path) = self.covers.pick(rng) else {
            debug!("picked an empty {} source", self.polarity.as_str());
            return Ok(None);
        };

        let cover = load_rgba(path)?;
        let cover = augment_foreground(cover, &self.config.foreground, rng)?;
        let target = base_size * self.config.scale_range.sample(rng);
        let mut cover = scale_to_long_side(&cover, target)?;

        let Some(rect) = find_placement(
            canvas.dimensions(),
            cover.dimensions(),
            placed,
            self.config.placement_candidates,
            rng,
        ) else {
            debug!(
                "no room for {}x{} cover from {}",
                cover.width(),
                cover.height(),
                path.display()
            );
            return Ok(None);
        };

        let mut shadow = if rng.random_bool(self.config.shadow.probability) {
            Some(effects::drop_shadow(&cover, &self.config.shadow, rng))
        } else {
            None
        };

        if rng.random_bool(self.config.opacity.probability) {
            let opacity = self.config.opacity.range.sample(rng);
            effects::apply_opacity(&mut cover, opacity);
            if let Some(shadow) = shadow.as_mut() {
                effects::apply_opacity(&mut shadow.image, opacity);
            }
        }

        let (x, y) = (rect.x1 as i64, rect.y1 as i64);
        if let Some(shadow) = &shadow {
            imageops::overlay(canvas, &shadow.image, x + shadow.dx, y + shadow.dy);
        }
        imageops::overlay(canvas, &cover, x, y);

        Ok(Some(rect))
    }
}
