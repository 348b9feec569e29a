//! Geometry shared by placement and labelling.
//!
//! Rectangles carry a type-level marker for their coordinate space so that
//! placement (pixels on the background) and annotation output (fractions of
//! the background) cannot be accidentally mixed.

mod rect;
mod space;

pub use rect::{total_overlap, Rect};
pub use space::{Normalized, Pixel};
