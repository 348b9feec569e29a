//! Image source directories.
//!
//! A [`ImagePool`] is the list of image files found directly inside one
//! directory. A [`SourceSet`] groups the pools of one polarity; when a cover
//! is needed a pool is chosen at random first, then a file inside it, so an
//! empty pool costs one attempt instead of aborting the scene.

use std::path::{Path, PathBuf};

use image::RgbaImage;
use log::{debug, warn};
use rand::Rng;
use walkdir::WalkDir;

use crate::error::SynthError;

const IMAGE_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "bmp", "webp"];

/// Image files found in a single directory.
#[derive(Clone, Debug)]
pub struct ImagePool {
    dir: PathBuf,
    files: Vec<PathBuf>,
}

impl ImagePool {
    /// List image files at the top level of `dir`, sorted by path.
    ///
    /// A missing directory is an error; an empty one is not.
    pub fn scan(dir: &Path) -> Result<Self, SynthError> {
        if !dir.is_dir() {
            return Err(SynthError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("source directory not found: {}", dir.display()),
            )));
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(dir).min_depth(1).max_depth(1).follow_links(true) {
            let entry = entry.map_err(|source| {
                SynthError::Io(std::io::Error::other(format!(
                    "failed while listing {}: {source}",
                    dir.display()
                )))
            })?;

            if entry.file_type().is_file() && has_image_extension(entry.path()) {
                files.push(entry.path().to_path_buf());
            }
        }
        files.sort();

        debug!("found {} image(s) in {}", files.len(), dir.display());
        Ok(Self {
            dir: dir.to_path_buf(),
            files,
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Pick a file uniformly at random, or `None` for an empty pool.
    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&Path> {
        if self.files.is_empty() {
            return None;
        }
        let index = rng.random_range(0..self.files.len());
        Some(&self.files[index])
    }
}

/// The cover directories of one polarity.
#[derive(Clone, Debug, Default)]
pub struct SourceSet {
    pools: Vec<ImagePool>,
}

impl SourceSet {
    /// Scan every directory. Missing directories are logged and kept as
    /// empty pools so that picking them wastes an attempt like the other
    /// unusable-source cases.
    pub fn scan(dirs: &[PathBuf]) -> Self {
        let pools = dirs
            .iter()
            .map(|dir| match ImagePool::scan(dir) {
                Ok(pool) => pool,
                Err(err) => {
                    warn!("ignoring cover source {}: {err}", dir.display());
                    ImagePool {
                        dir: dir.clone(),
                        files: Vec::new(),
                    }
                }
            })
            .collect();
        Self { pools }
    }

    pub fn pools(&self) -> &[ImagePool] {
        &self.pools
    }

    /// Total image files across all pools.
    pub fn image_count(&self) -> usize {
        self.pools.iter().map(ImagePool::len).sum()
    }

    /// True when no pool holds any image.
    pub fn is_exhausted(&self) -> bool {
        self.image_count() == 0
    }

    /// Pick a pool uniformly, then a file inside it.
    ///
    /// Returns `None` when the chosen pool is empty.
    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&Path> {
        if self.pools.is_empty() {
            return None;
        }
        let pool = &self.pools[rng.random_range(0..self.pools.len())];
        pool.pick(rng)
    }
}

/// Decode an image file into 8-bit RGBA.
pub fn load_rgba(path: &Path) -> Result<RgbaImage, SynthError> {
    let image = image::open(path).map_err(|source| SynthError::ImageDecode {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(image.to_rgba8())
}

fn has_image_extension(path: &Path) -> bool {
    let Some(ext) = path.extension().and_then(|ext| ext.to_str()) else {
        return false;
    };

    IMAGE_EXTENSIONS
        .iter()
        .any(|allowed| ext.eq_ignore_ascii_case(allowed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};
    use std::fs;

    #[test]
    fn scan_keeps_only_top_level_images() {
        let temp = tempfile::tempdir().expect("create temp dir");
        fs::write(temp.path().join("a.JPG"), b"x").expect("write");
        fs::write(temp.path().join("b.png"), b"x").expect("write");
        fs::write(temp.path().join("notes.txt"), b"x").expect("write");
        fs::create_dir_all(temp.path().join("nested")).expect("mkdir");
        fs::write(temp.path().join("nested/c.png"), b"x").expect("write");

        let pool = ImagePool::scan(temp.path()).expect("scan");
        let names: Vec<_> = pool
            .files()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.JPG", "b.png"]);
    }

    #[test]
    fn scan_missing_dir_fails() {
        let temp = tempfile::tempdir().expect("create temp dir");
        assert!(ImagePool::scan(&temp.path().join("missing")).is_err());
    }

    #[test]
    fn source_set_tolerates_missing_and_empty_dirs() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let full = temp.path().join("full");
        let empty = temp.path().join("empty");
        fs::create_dir_all(&full).expect("mkdir");
        fs::create_dir_all(&empty).expect("mkdir");
        fs::write(full.join("one.png"), b"x").expect("write");

        let set = SourceSet::scan(&[full, empty, temp.path().join("missing")]);
        assert_eq!(set.pools().len(), 3);
        assert_eq!(set.image_count(), 1);
        assert!(!set.is_exhausted());

        let mut rng = StdRng::seed_from_u64(3);
        let picks: Vec<_> = (0..60).map(|_| set.pick(&mut rng).is_some()).collect();
        assert!(picks.iter().any(|hit| *hit));
        assert!(picks.iter().any(|hit| !*hit));
    }

    #[test]
    fn empty_source_set_is_exhausted() {
        let set = SourceSet::scan(&[]);
        assert!(set.is_exhausted());
        let mut rng = StdRng::seed_from_u64(3);
        assert!(set.pick(&mut rng).is_none());
    }

    #[test]
    fn load_rgba_reports_undecodable_file() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let path = temp.path().join("broken.png");
        fs::write(&path, b"definitely not a png").expect("write");
        let err = load_rgba(&path).unwrap_err();
        assert!(matches!(err, SynthError::ImageDecode { .. }));
    }
}
