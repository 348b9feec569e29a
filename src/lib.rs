//! Synthcover: synthetic training scenes for single-class YOLO detectors.
//!
//! Synthcover composites cover images (box art, product shots, ...) onto
//! background photos with randomized augmentation and writes a YOLO label
//! file for every generated image. Scenes built from the target-class source
//! set are labelled; scenes built from look-alike sets are written with empty
//! label files and serve as negatives.
//!
//! # Modules
//!
//! - [`config`]: generation parameters, YAML loading and validation
//! - [`augment`]: foreground and background augmentation chains
//! - [`placement`]: overlap-minimizing placement search
//! - [`scene`]: assembly of a single scene
//! - [`batch`]: the batch driver and its report
//! - [`label`]: YOLO label rows and `data.yaml`
//! - [`preview`]: drawing label boxes for visual inspection
//! - [`error`]: error types

pub mod augment;
pub mod batch;
pub mod config;
pub mod error;
pub mod geom;
pub mod label;
pub mod placement;
pub mod preview;
pub mod scene;
pub mod source;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

pub use batch::{BatchReport, GenerationJob, Generator};
pub use config::SynthConfig;
pub use error::SynthError;

/// The synthcover CLI application.
#[derive(Parser)]
#[command(name = "synthcover")]
#[command(version, about)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Generate synthetic images and YOLO labels.
    Generate(GenerateArgs),
    /// Draw the boxes of a label file onto its image.
    Preview(PreviewArgs),
    /// Print the default configuration as YAML.
    Config,
}

/// Arguments for the generate subcommand.
///
/// Flags override values from `--config`, which override built-in defaults.
#[derive(clap::Args)]
struct GenerateArgs {
    /// YAML configuration file.
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Directory of background images.
    #[arg(long)]
    backgrounds: Option<PathBuf>,

    /// Directory of target-class covers (repeatable).
    #[arg(long = "positive")]
    positive_dirs: Vec<PathBuf>,

    /// Directory of look-alike covers for negatives (repeatable).
    #[arg(long = "negative")]
    negative_dirs: Vec<PathBuf>,

    /// Output directory for images, labels and data.yaml.
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,

    /// Number of positive images to generate.
    #[arg(long)]
    positive_count: Option<usize>,

    /// Number of negative images to generate.
    #[arg(long)]
    negative_count: Option<usize>,

    /// Covers placed per image.
    #[arg(long)]
    covers: Option<usize>,

    /// Random seed for reproducible output.
    #[arg(long, env = "SYNTHCOVER_SEED")]
    seed: Option<u64>,

    /// Output image format.
    #[arg(long, value_enum)]
    format: Option<config::OutputFormat>,

    /// Report format.
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    report: ReportFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ReportFormat {
    Text,
    Json,
}

/// Arguments for the preview subcommand.
#[derive(clap::Args)]
struct PreviewArgs {
    /// Generated image to annotate.
    image: PathBuf,

    /// Label file (defaults to the image path with a .txt extension).
    #[arg(long)]
    labels: Option<PathBuf>,

    /// Output file (defaults to <stem>_boxed.png next to the image).
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,
}

/// Run the synthcover CLI.
///
/// This is the main entry point for the CLI, called from `main.rs`.
pub fn run() -> Result<(), SynthError> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Generate(args) => run_generate(args),
        Commands::Preview(args) => run_preview(args),
        Commands::Config => {
            print!("{}", SynthConfig::default().to_yaml_string()?);
            Ok(())
        }
    }
}

fn run_generate(args: GenerateArgs) -> Result<(), SynthError> {
    let mut config = match &args.config {
        Some(path) => SynthConfig::from_yaml_file(path)?,
        None => SynthConfig::default(),
    };

    if let Some(dir) = args.backgrounds {
        config.background_dir = dir;
    }
    if !args.positive_dirs.is_empty() {
        config.positive_dirs = args.positive_dirs;
    }
    if !args.negative_dirs.is_empty() {
        config.negative_dirs = args.negative_dirs;
    }
    if let Some(dir) = args.output {
        config.output_dir = dir;
    }
    if let Some(n) = args.positive_count {
        config.positive_count = n;
    }
    if let Some(n) = args.negative_count {
        config.negative_count = n;
    }
    if let Some(n) = args.covers {
        config.num_covers = n;
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    if let Some(format) = args.format {
        config.output_format = format;
    }

    let mut generator = Generator::new(config)?;
    let report = generator.run()?;

    match args.report {
        ReportFormat::Json => println!("{}", report.to_json().map_err(SynthError::ReportJson)?),
        ReportFormat::Text => print!("{report}"),
    }

    let requested = report.requested();
    if requested > 0 && report.succeeded() == 0 {
        return Err(SynthError::GenerationFailed { requested });
    }
    Ok(())
}

fn run_preview(args: PreviewArgs) -> Result<(), SynthError> {
    let (path, boxes) =
        preview::render_preview(&args.image, args.labels.as_deref(), args.output.as_deref())?;
    println!("Saved {} ({} box(es))", path.display(), boxes);
    Ok(())
}
