//! YOLO label files and the `data.yaml` dataset descriptor.
//!
//! Each generated image gets a sibling `.txt` file with one
//! `class_id cx cy w h` row per positive placement, all four geometric
//! fields normalized to the background size and written with six decimals.

use std::fmt;
use std::fs;
use std::io::Write;
use std::path::Path;

use crate::error::SynthError;
use crate::geom::{Normalized, Pixel, Rect};

/// Class id of every emitted row; the detector is single-class.
pub const CLASS_ID: usize = 0;

pub const LABEL_EXTENSION: &str = "txt";

/// One normalized bounding box row.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LabelRow {
    pub class_id: usize,
    pub cx: f64,
    pub cy: f64,
    pub w: f64,
    pub h: f64,
}

impl LabelRow {
    /// Label a placement rectangle on a `width` x `height` background.
    pub fn from_placement(rect: &Rect<Pixel>, width: u32, height: u32) -> Self {
        let (cx, cy, w, h) = rect.to_normalized(width, height).to_cxcywh();
        Self {
            class_id: CLASS_ID,
            cx,
            cy,
            w,
            h,
        }
    }

    pub fn to_rect(&self) -> Rect<Normalized> {
        Rect::from_cxcywh(self.cx, self.cy, self.w, self.h)
    }
}

impl fmt::Display for LabelRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {:.6} {:.6} {:.6} {:.6}",
            self.class_id, self.cx, self.cy, self.w, self.h
        )
    }
}

/// Write `rows` to `path`, one per line. An empty slice yields an empty file.
pub fn write_label_file(path: &Path, rows: &[LabelRow]) -> Result<(), SynthError> {
    let mut file = fs::File::create(path)?;
    for row in rows {
        writeln!(file, "{row}")?;
    }
    Ok(())
}

/// Read every non-blank row of a label file.
pub fn read_label_file(path: &Path) -> Result<Vec<LabelRow>, SynthError> {
    let content = fs::read_to_string(path)?;
    let mut rows = Vec::new();
    for (line_idx, line) in content.lines().enumerate() {
        if let Some(row) = parse_label_line(line, path, line_idx + 1)? {
            rows.push(row);
        }
    }
    Ok(rows)
}

/// Parse one label line. Blank lines yield `Ok(None)`.
pub fn parse_label_line(
    line: &str,
    file_path: &Path,
    line_num: usize,
) -> Result<Option<LabelRow>, SynthError> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    // Take at most 6 tokens so pathological inputs do not allocate unbounded memory.
    let tokens: Vec<&str> = trimmed.split_whitespace().take(6).collect();
    if tokens.len() != 5 {
        return Err(SynthError::LabelParse {
            path: file_path.to_path_buf(),
            line: line_num,
            message: if tokens.len() < 5 {
                format!("expected 5 tokens, found {}", tokens.len())
            } else {
                "expected 5 tokens, found more".to_string()
            },
        });
    }

    let class_id = tokens[0]
        .parse::<usize>()
        .map_err(|_| SynthError::LabelParse {
            path: file_path.to_path_buf(),
            line: line_num,
            message: format!(
                "invalid class_id '{}'; expected non-negative integer",
                tokens[0]
            ),
        })?;

    let parse = |raw: &str, field: &str| {
        raw.parse::<f64>().map_err(|_| SynthError::LabelParse {
            path: file_path.to_path_buf(),
            line: line_num,
            message: format!("invalid {field} '{raw}'; expected floating-point number"),
        })
    };

    Ok(Some(LabelRow {
        class_id,
        cx: parse(tokens[1], "x_center")?,
        cy: parse(tokens[2], "y_center")?,
        w: parse(tokens[3], "width")?,
        h: parse(tokens[4], "height")?,
    }))
}

/// Fuzz-only entrypoint for single-line parsing.
#[cfg(feature = "fuzzing")]
pub fn fuzz_parse_label_line(input: &str) -> Result<(), SynthError> {
    let _ = parse_label_line(input, Path::new("<fuzz>"), 1)?;
    Ok(())
}

/// Write `data.yaml` describing the generated dataset for a YOLO trainer.
///
/// Images and labels share one directory, so both splits point at it.
pub fn write_data_yaml(output_root: &Path, class_name: &str) -> Result<(), SynthError> {
    let root = output_root
        .canonicalize()
        .unwrap_or_else(|_| output_root.to_path_buf());
    let yaml = format!(
        "path: {}\ntrain: .\nval: .\nnames:\n  {}: {}\n",
        yaml_single_quoted(&root.to_string_lossy()),
        CLASS_ID,
        yaml_single_quoted(class_name)
    );
    fs::write(output_root.join("data.yaml"), yaml)?;
    Ok(())
}

fn yaml_single_quoted(raw: &str) -> String {
    format!("'{}'", raw.replace('\'', "''"))
}
