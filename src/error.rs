use std::path::PathBuf;
use thiserror::Error;

/// The main error type for synthcover operations.
#[derive(Debug, Error)]
pub enum SynthError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to decode image {path}: {source}")]
    ImageDecode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Failed to encode image {path}: {source}")]
    ImageEncode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("No usable {role} images in {path}")]
    EmptySource { role: &'static str, path: PathBuf },

    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    #[error("Failed to parse config {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Failed to serialize config: {0}")]
    ConfigSerialize(#[source] serde_yaml::Error),

    #[error("Degenerate image after {stage}: {message}")]
    DegenerateImage { stage: &'static str, message: String },

    #[error("Failed to parse label file {path} at line {line}: {message}")]
    LabelParse {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("Failed to serialize report: {0}")]
    ReportJson(#[source] serde_json::Error),

    #[error("Generation failed: none of the {requested} requested image(s) were produced")]
    GenerationFailed { requested: usize },
}
