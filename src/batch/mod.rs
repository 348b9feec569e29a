//! Batch driver.
//!
//! [`Generator::new`] is the one place that touches the filesystem before
//! generation starts: it validates the configuration, creates the output
//! directory, writes `data.yaml` and scans every source directory, failing
//! early when a requested polarity has no covers. Each job
//! then writes `synthetic_NNNNN.<ext>` plus a sibling `.txt` per image.
//! A failing image is logged and skipped; it never leaves files behind.

pub mod report;

use std::fs;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use image::codecs::jpeg::JpegEncoder;
use image::{ImageFormat, RgbImage};
use log::{error, info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::{OutputFormat, SynthConfig};
use crate::error::SynthError;
use crate::label::{write_data_yaml, write_label_file, LabelRow, LABEL_EXTENSION};
use crate::scene::{Polarity, SceneComposer};
use crate::source::{ImagePool, SourceSet};

pub use report::{BatchReport, FailedImage, JobReport};

/// Parameters of one generation job.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GenerationJob {
    pub count: usize,
    pub polarity: Polarity,
    /// Output indices start at `start_index + 1`.
    pub start_index: usize,
}

/// Owns the configuration, the scanned sources and the random source.
pub struct Generator<R = StdRng> {
    config: SynthConfig,
    backgrounds: ImagePool,
    positives: SourceSet,
    negatives: SourceSet,
    rng: R,
    seed: u64,
}

impl Generator<StdRng> {
    /// Initialize from `config`, seeding from `config.seed` or a fresh
    /// random seed that is reported back in [`BatchReport::seed`].
    pub fn new(config: SynthConfig) -> Result<Self, SynthError> {
        let seed = config.seed.unwrap_or_else(rand::random);
        Self::with_rng(config, StdRng::seed_from_u64(seed), seed)
    }
}

impl<R: Rng> Generator<R> {
    /// Initialize with an explicit random source. `seed` is only recorded.
    pub fn with_rng(config: SynthConfig, rng: R, seed: u64) -> Result<Self, SynthError> {
        config.validate()?;

        let backgrounds = ImagePool::scan(&config.background_dir).map_err(|_| {
            SynthError::EmptySource {
                role: "background",
                path: config.background_dir.clone(),
            }
        })?;
        if backgrounds.is_empty() {
            return Err(SynthError::EmptySource {
                role: "background",
                path: config.background_dir.clone(),
            });
        }

        let positives = SourceSet::scan(&config.positive_dirs);
        let negatives = SourceSet::scan(&config.negative_dirs);
        check_covers(&positives, config.positive_count, &config.positive_dirs, Polarity::Positive)?;
        check_covers(&negatives, config.negative_count, &config.negative_dirs, Polarity::Negative)?;

        fs::create_dir_all(&config.output_dir)?;
        write_data_yaml(&config.output_dir, &config.class_name)?;

        info!(
            "{} background(s), {} positive and {} negative cover(s); seed {}",
            backgrounds.len(),
            positives.image_count(),
            negatives.image_count(),
            seed
        );

        Ok(Self {
            config,
            backgrounds,
            positives,
            negatives,
            rng,
            seed,
        })
    }

    pub fn config(&self) -> &SynthConfig {
        &self.config
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Run the positive job and then the negative job from the configuration.
    pub fn run(&mut self) -> Result<BatchReport, SynthError> {
        let positive = GenerationJob {
            count: self.config.positive_count,
            polarity: Polarity::Positive,
            start_index: 0,
        };
        let negative = GenerationJob {
            count: self.config.negative_count,
            polarity: Polarity::Negative,
            start_index: self.config.positive_count,
        };

        let mut report = BatchReport {
            seed: self.seed,
            jobs: Vec::with_capacity(2),
        };
        for job in [positive, negative] {
            if job.count > 0 {
                report.jobs.push(self.run_job(job)?);
            }
        }
        Ok(report)
    }

    /// Generate `job.count` images of one polarity.
    ///
    /// Fails before writing anything if the polarity has no cover images.
    pub fn run_job(&mut self, job: GenerationJob) -> Result<JobReport, SynthError> {
        let mut report = JobReport::new(job.polarity, job.count);
        if job.count == 0 {
            return Ok(report);
        }

        let (covers, dirs) = match job.polarity {
            Polarity::Positive => (&self.positives, &self.config.positive_dirs),
            Polarity::Negative => (&self.negatives, &self.config.negative_dirs),
        };
        check_covers(covers, job.count, dirs, job.polarity)?;

        let composer = SceneComposer::new(&self.config, &self.backgrounds, covers, job.polarity)?;
        info!("generating {} {} image(s)", job.count, job.polarity.as_str());

        for i in 0..job.count {
            let index = job.start_index + i + 1;
            let result = composer.compose(&mut self.rng).and_then(|scene| {
                write_output(&self.config, index, &scene.image, &scene.labels)
                    .map(|path| (path, scene.labels.len()))
            });

            match result {
                Ok((path, boxes)) => {
                    info!("saved {} ({} box(es))", path.display(), boxes);
                    report.succeeded += 1;
                    report.boxes += boxes;
                }
                Err(err) => {
                    error!("image {index} failed: {err}");
                    report.failures.push(FailedImage {
                        index,
                        message: err.to_string(),
                    });
                }
            }
        }

        info!(
            "{}: {}/{} image(s) generated",
            job.polarity.as_str(),
            report.succeeded,
            report.requested
        );
        Ok(report)
    }
}

/// A job that asks for images needs at least one cover of its polarity.
fn check_covers(
    covers: &SourceSet,
    count: usize,
    dirs: &[PathBuf],
    polarity: Polarity,
) -> Result<(), SynthError> {
    if count > 0 && covers.is_exhausted() {
        return Err(SynthError::EmptySource {
            role: polarity.as_str(),
            path: dirs.first().cloned().unwrap_or_default(),
        });
    }
    Ok(())
}

/// File stem of the `index`-th output image.
pub fn output_stem(index: usize) -> String {
    format!("synthetic_{index:05}")
}

/// Write the image and its label file. On label failure the image is removed.
fn write_output(
    config: &SynthConfig,
    index: usize,
    image: &RgbImage,
    labels: &[LabelRow],
) -> Result<PathBuf, SynthError> {
    let stem = output_stem(index);
    let image_path = config
        .output_dir
        .join(&stem)
        .with_extension(config.output_format.extension());
    let label_path = config.output_dir.join(&stem).with_extension(LABEL_EXTENSION);

    save_image(image, &image_path, config.output_format, config.jpeg_quality)?;
    if let Err(err) = write_label_file(&label_path, labels) {
        if let Err(cleanup) = fs::remove_file(&image_path) {
            warn!("could not remove {}: {cleanup}", image_path.display());
        }
        let _ = fs::remove_file(&label_path);
        return Err(err);
    }
    Ok(image_path)
}

fn save_image(
    image: &RgbImage,
    path: &Path,
    format: OutputFormat,
    quality: u8,
) -> Result<(), SynthError> {
    let encode_err = |source: image::ImageError| SynthError::ImageEncode {
        path: path.to_path_buf(),
        source,
    };

    match format {
        OutputFormat::Jpeg => {
            let file = fs::File::create(path)?;
            let encoder = JpegEncoder::new_with_quality(BufWriter::new(file), quality);
            image.write_with_encoder(encoder).map_err(encode_err)
        }
        OutputFormat::Png => image
            .save_with_format(path, ImageFormat::Png)
            .map_err(encode_err),
    }
}
