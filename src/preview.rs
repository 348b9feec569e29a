//! Visual check of generated labels.
//!
//! Draws every row of a YOLO label file as a green outline on its image and
//! saves the result as PNG, by default next to the input as
//! `<stem>_boxed.png`.

use std::path::{Path, PathBuf};

use image::{ImageFormat, Rgb, RgbImage};
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect as DrawRect;
use log::info;

use crate::error::SynthError;
use crate::label::{read_label_file, LabelRow, LABEL_EXTENSION};

const BOX_COLOR: Rgb<u8> = Rgb([0, 255, 0]);
const BOX_THICKNESS: i32 = 2;

/// Default label path for an image: same stem, `.txt` extension.
pub fn sibling_label_path(image_path: &Path) -> PathBuf {
    image_path.with_extension(LABEL_EXTENSION)
}

/// Default preview path for an image: `<stem>_boxed.png` in the same directory.
pub fn boxed_output_path(image_path: &Path) -> PathBuf {
    let stem = image_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());
    image_path.with_file_name(format!("{stem}_boxed.png"))
}

/// Draw `rows` onto `image` in place.
pub fn draw_labels(image: &mut RgbImage, rows: &[LabelRow]) {
    let (width, height) = image.dimensions();
    for row in rows {
        let rect = row.to_rect().to_pixel(width, height);
        let x1 = rect.x1.round().clamp(0.0, width as f64) as i32;
        let y1 = rect.y1.round().clamp(0.0, height as f64) as i32;
        let x2 = rect.x2.round().clamp(0.0, width as f64) as i32;
        let y2 = rect.y2.round().clamp(0.0, height as f64) as i32;

        for inset in 0..BOX_THICKNESS {
            let w = x2 - x1 - 2 * inset;
            let h = y2 - y1 - 2 * inset;
            if w <= 0 || h <= 0 {
                break;
            }
            let outline = DrawRect::at(x1 + inset, y1 + inset).of_size(w as u32, h as u32);
            draw_hollow_rect_mut(image, outline, BOX_COLOR);
        }
    }
}

/// Render the labels of `image_path` and write the preview.
///
/// Returns the path written and the number of boxes drawn.
pub fn render_preview(
    image_path: &Path,
    label_path: Option<&Path>,
    output_path: Option<&Path>,
) -> Result<(PathBuf, usize), SynthError> {
    let label_path = label_path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| sibling_label_path(image_path));
    let output_path = output_path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| boxed_output_path(image_path));

    let mut image = image::open(image_path)
        .map_err(|source| SynthError::ImageDecode {
            path: image_path.to_path_buf(),
            source,
        })?
        .to_rgb8();
    let rows = read_label_file(&label_path)?;
    draw_labels(&mut image, &rows);

    image
        .save_with_format(&output_path, ImageFormat::Png)
        .map_err(|source| SynthError::ImageEncode {
            path: output_path.clone(),
            source,
        })?;
    info!("saved {} ({} box(es))", output_path.display(), rows.len());
    Ok((output_path, rows.len()))
}
