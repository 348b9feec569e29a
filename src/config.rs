//! Generation configuration.
//!
//! Every tunable of the compositor lives here. A [`SynthConfig`] can be built
//! from defaults, loaded from a YAML file, and then overridden from the CLI.
//! [`SynthConfig::validate`] must pass before a generator is created.

use std::fs;
use std::path::{Path, PathBuf};

use rand::Rng;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::SynthError;

/// Inclusive `[min, max]` range sampled uniformly.
///
/// Serialized as a two-element sequence, e.g. `[-15.0, 15.0]`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Span(pub f64, pub f64);

impl Span {
    #[inline]
    pub fn min(&self) -> f64 {
        self.0
    }

    #[inline]
    pub fn max(&self) -> f64 {
        self.1
    }

    /// Draw a value uniformly from the range. A collapsed range returns `min`.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        if self.0 >= self.1 {
            self.0
        } else {
            rng.random_range(self.0..=self.1)
        }
    }

    fn check(&self, name: &str) -> Result<(), SynthError> {
        if !self.0.is_finite() || !self.1.is_finite() {
            return Err(invalid(format!("{name} must be finite, got {:?}", self)));
        }
        if self.0 > self.1 {
            return Err(invalid(format!(
                "{name} range is reversed: [{}, {}]",
                self.0, self.1
            )));
        }
        Ok(())
    }
}

/// Output image encoding.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Jpeg,
    Png,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "jpg",
            OutputFormat::Png => "png",
        }
    }
}

/// Geometric foreground transforms.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeometricConfig {
    pub rotation_probability: f64,
    /// Rotation angle in degrees.
    pub rotation_degrees: Span,
    pub perspective_probability: f64,
    /// Maximum inward corner displacement as a fraction of the side length.
    pub perspective_intensity: f64,
}

impl Default for GeometricConfig {
    fn default() -> Self {
        Self {
            rotation_probability: 0.7,
            rotation_degrees: Span(-15.0, 15.0),
            perspective_probability: 0.5,
            perspective_intensity: 0.08,
        }
    }
}

/// Photometric transforms, shared by foregrounds and backgrounds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhotometricConfig {
    pub brightness_probability: f64,
    pub brightness: Span,
    pub contrast_probability: f64,
    pub contrast: Span,
    pub saturation_probability: f64,
    pub saturation: Span,
    pub blur_probability: f64,
    /// Gaussian sigma in pixels.
    pub blur_radius: Span,
    pub noise_probability: f64,
    /// Per-channel noise amplitude, in 8-bit channel units.
    pub noise_intensity: Span,
}

impl Default for PhotometricConfig {
    fn default() -> Self {
        Self {
            brightness_probability: 0.8,
            brightness: Span(0.7, 1.3),
            contrast_probability: 0.8,
            contrast: Span(0.7, 1.3),
            saturation_probability: 0.6,
            saturation: Span(0.6, 1.4),
            blur_probability: 0.3,
            blur_radius: Span(0.5, 1.5),
            noise_probability: 0.3,
            noise_intensity: Span(5.0, 20.0),
        }
    }
}

impl PhotometricConfig {
    /// The lighter preset applied to backgrounds.
    pub fn background() -> Self {
        Self {
            brightness_probability: 0.5,
            brightness: Span(0.85, 1.15),
            contrast_probability: 0.5,
            contrast: Span(0.85, 1.15),
            saturation_probability: 0.0,
            saturation: Span(1.0, 1.0),
            blur_probability: 0.2,
            blur_radius: Span(0.3, 0.8),
            noise_probability: 0.0,
            noise_intensity: Span(0.0, 0.0),
        }
    }

    /// A pass that never changes the image.
    pub fn disabled() -> Self {
        Self {
            brightness_probability: 0.0,
            contrast_probability: 0.0,
            saturation_probability: 0.0,
            blur_probability: 0.0,
            noise_probability: 0.0,
            ..Self::default()
        }
    }
}

/// Foreground augmentation chain.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AugmentConfig {
    pub geometric: GeometricConfig,
    pub photometric: PhotometricConfig,
}

impl AugmentConfig {
    pub fn disabled() -> Self {
        Self {
            geometric: GeometricConfig {
                rotation_probability: 0.0,
                perspective_probability: 0.0,
                ..GeometricConfig::default()
            },
            photometric: PhotometricConfig::disabled(),
        }
    }
}

/// Drop shadow drawn beneath a foreground.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShadowConfig {
    pub probability: f64,
    /// Shadow offset in pixels, sampled independently for x and y.
    pub offset: Span,
    pub blur_radius: Span,
    /// Shadow alpha as a fraction of the foreground alpha.
    pub darkness: Span,
}

impl Default for ShadowConfig {
    fn default() -> Self {
        Self {
            probability: 0.4,
            offset: Span(3.0, 10.0),
            blur_radius: Span(2.0, 5.0),
            darkness: Span(0.3, 0.6),
        }
    }
}

/// Global opacity applied to a foreground and its shadow.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OpacityConfig {
    pub probability: f64,
    pub range: Span,
}

impl Default for OpacityConfig {
    fn default() -> Self {
        Self {
            probability: 0.2,
            range: Span(0.85, 1.0),
        }
    }
}

/// Complete generation configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthConfig {
    pub background_dir: PathBuf,
    /// Directories of target-class covers. One is picked at random per cover.
    pub positive_dirs: Vec<PathBuf>,
    /// Directories of look-alike covers used for negative scenes.
    pub negative_dirs: Vec<PathBuf>,
    pub output_dir: PathBuf,
    /// Class name written to `data.yaml`; the class id is always 0.
    pub class_name: String,
    pub positive_count: usize,
    pub negative_count: usize,
    /// Covers requested per scene.
    pub num_covers: usize,
    /// Base cover size is the background's shorter side divided by this.
    pub division_size: u32,
    /// Multiplier applied to the base cover size.
    pub scale_range: Span,
    /// Attempt budget per scene is `num_covers * attempt_factor`.
    pub attempt_factor: usize,
    /// Candidate positions sampled per placement.
    pub placement_candidates: usize,
    pub foreground: AugmentConfig,
    /// Keys left out fall back to [`PhotometricConfig::background`].
    #[serde(
        default = "PhotometricConfig::background",
        deserialize_with = "deserialize_background"
    )]
    pub background: PhotometricConfig,
    pub shadow: ShadowConfig,
    pub opacity: OpacityConfig,
    pub output_format: OutputFormat,
    pub jpeg_quality: u8,
    pub seed: Option<u64>,
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            background_dir: PathBuf::from("backgrounds"),
            positive_dirs: vec![PathBuf::from("covers")],
            negative_dirs: Vec::new(),
            output_dir: PathBuf::from("output"),
            class_name: "cover".to_string(),
            positive_count: 50,
            negative_count: 0,
            num_covers: 4,
            division_size: 5,
            scale_range: Span(0.8, 1.2),
            attempt_factor: 3,
            placement_candidates: 50,
            foreground: AugmentConfig::default(),
            background: PhotometricConfig::background(),
            shadow: ShadowConfig::default(),
            opacity: OpacityConfig::default(),
            output_format: OutputFormat::Jpeg,
            jpeg_quality: 95,
            seed: None,
        }
    }
}

impl SynthConfig {
    /// Load a configuration from a YAML file. Missing keys take defaults.
    pub fn from_yaml_file(path: &Path) -> Result<Self, SynthError> {
        let data = fs::read_to_string(path)?;
        serde_yaml::from_str(&data).map_err(|source| SynthError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn to_yaml_string(&self) -> Result<String, SynthError> {
        serde_yaml::to_string(self).map_err(SynthError::ConfigSerialize)
    }

    /// Check every probability, range and count.
    pub fn validate(&self) -> Result<(), SynthError> {
        if self.num_covers == 0 {
            return Err(invalid("num_covers must be greater than 0"));
        }
        if self.division_size == 0 {
            return Err(invalid("division_size must be greater than 0"));
        }
        if self.attempt_factor == 0 {
            return Err(invalid("attempt_factor must be greater than 0"));
        }
        if self.placement_candidates == 0 {
            return Err(invalid("placement_candidates must be greater than 0"));
        }
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(invalid(format!(
                "jpeg_quality must be in 1..=100, got {}",
                self.jpeg_quality
            )));
        }

        self.scale_range.check("scale_range")?;
        if self.scale_range.min() <= 0.0 {
            return Err(invalid("scale_range must be positive"));
        }

        let geo = &self.foreground.geometric;
        check_probability("foreground.geometric.rotation_probability", geo.rotation_probability)?;
        geo.rotation_degrees.check("foreground.geometric.rotation_degrees")?;
        check_probability(
            "foreground.geometric.perspective_probability",
            geo.perspective_probability,
        )?;
        if !(0.0..0.5).contains(&geo.perspective_intensity) {
            return Err(invalid(format!(
                "foreground.geometric.perspective_intensity must be in [0, 0.5), got {}",
                geo.perspective_intensity
            )));
        }

        check_photometric("foreground.photometric", &self.foreground.photometric)?;
        check_photometric("background", &self.background)?;

        check_probability("shadow.probability", self.shadow.probability)?;
        self.shadow.offset.check("shadow.offset")?;
        self.shadow.blur_radius.check("shadow.blur_radius")?;
        self.shadow.darkness.check("shadow.darkness")?;
        check_unit_span("shadow.darkness", &self.shadow.darkness)?;

        check_probability("opacity.probability", self.opacity.probability)?;
        self.opacity.range.check("opacity.range")?;
        check_unit_span("opacity.range", &self.opacity.range)?;

        Ok(())
    }
}

/// Overlay the given keys on the background preset rather than on the
/// foreground defaults that `PhotometricConfig`'s own `Default` supplies.
fn deserialize_background<'de, D>(deserializer: D) -> Result<PhotometricConfig, D::Error>
where
    D: Deserializer<'de>,
{
    let overrides = serde_yaml::Mapping::deserialize(deserializer)?;
    let mut merged =
        serde_yaml::to_value(PhotometricConfig::background()).map_err(D::Error::custom)?;
    if let serde_yaml::Value::Mapping(base) = &mut merged {
        for (key, value) in overrides {
            base.insert(key, value);
        }
    }
    serde_yaml::from_value(merged).map_err(D::Error::custom)
}

fn check_photometric(prefix: &str, cfg: &PhotometricConfig) -> Result<(), SynthError> {
    let gated = [
        ("brightness", cfg.brightness_probability, cfg.brightness),
        ("contrast", cfg.contrast_probability, cfg.contrast),
        ("saturation", cfg.saturation_probability, cfg.saturation),
        ("blur_radius", cfg.blur_probability, cfg.blur_radius),
        ("noise_intensity", cfg.noise_probability, cfg.noise_intensity),
    ];

    for (name, probability, span) in gated {
        check_probability(&format!("{prefix}.{name} probability"), probability)?;
        span.check(&format!("{prefix}.{name}"))?;
        if span.min() < 0.0 {
            return Err(invalid(format!("{prefix}.{name} must not be negative")));
        }
    }
    Ok(())
}

fn check_probability(name: &str, p: f64) -> Result<(), SynthError> {
    if (0.0..=1.0).contains(&p) {
        Ok(())
    } else {
        Err(invalid(format!("{name} must be in [0, 1], got {p}")))
    }
}

fn check_unit_span(name: &str, span: &Span) -> Result<(), SynthError> {
    if span.min() < 0.0 || span.max() > 1.0 {
        return Err(invalid(format!("{name} must lie within [0, 1]")));
    }
    Ok(())
}

fn invalid(message: impl Into<String>) -> SynthError {
    SynthError::InvalidConfig {
        message: message.into(),
    }
}
