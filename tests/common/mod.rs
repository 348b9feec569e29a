#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use image::{Rgba, RgbaImage};
use synthcover::config::{AugmentConfig, OutputFormat, PhotometricConfig, SynthConfig};

pub fn write_png(path: &Path, width: u32, height: u32, rgba: [u8; 4]) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dir");
    }
    RgbaImage::from_pixel(width, height, Rgba(rgba))
        .save(path)
        .expect("write png file");
}

pub fn write_garbage(path: &Path) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dir");
    }
    fs::write(path, b"this is not an image").expect("write garbage file");
}

/// Directory layout used by the end-to-end tests.
pub struct Workspace {
    pub root: PathBuf,
    pub backgrounds: PathBuf,
    pub positives: PathBuf,
    pub negatives: PathBuf,
    pub output: PathBuf,
}

impl Workspace {
    pub fn new(root: &Path) -> Self {
        let ws = Self {
            root: root.to_path_buf(),
            backgrounds: root.join("backgrounds"),
            positives: root.join("covers_pos"),
            negatives: root.join("covers_neg"),
            output: root.join("output"),
        };
        for dir in [&ws.backgrounds, &ws.positives, &ws.negatives] {
            fs::create_dir_all(dir).expect("create source dir");
        }
        ws
    }

    /// A config pointing at this workspace with every random effect off.
    pub fn plain_config(&self) -> SynthConfig {
        let mut config = SynthConfig {
            background_dir: self.backgrounds.clone(),
            positive_dirs: vec![self.positives.clone()],
            negative_dirs: vec![self.negatives.clone()],
            output_dir: self.output.clone(),
            positive_count: 0,
            negative_count: 0,
            foreground: AugmentConfig::disabled(),
            background: PhotometricConfig::disabled(),
            output_format: OutputFormat::Png,
            seed: Some(1234),
            ..Default::default()
        };
        config.shadow.probability = 0.0;
        config.opacity.probability = 0.0;
        config
    }

    pub fn output_files(&self) -> Vec<String> {
        let mut names: Vec<String> = match fs::read_dir(&self.output) {
            Ok(entries) => entries
                .map(|e| e.expect("dir entry").file_name().to_string_lossy().into_owned())
                .collect(),
            Err(_) => Vec::new(),
        };
        names.sort();
        names
    }
}
