//! Axis-aligned rectangles in XYXY form.

use std::marker::PhantomData;

use super::{Normalized, Pixel};

/// An axis-aligned rectangle `(x1, y1, x2, y2)`.
///
/// `TSpace` is either [`Pixel`] or [`Normalized`]. Construction does not
/// enforce `x1 < x2`; use [`Rect::is_ordered`] where that matters.
#[derive(Clone, Copy, PartialEq)]
pub struct Rect<TSpace> {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    _space: PhantomData<TSpace>,
}

impl<TSpace> Rect<TSpace> {
    #[inline]
    pub fn from_xyxy(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self {
            x1,
            y1,
            x2,
            y2,
            _space: PhantomData,
        }
    }

    /// Rectangle with top-left corner `(x, y)` and the given size.
    #[inline]
    pub fn from_xywh(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::from_xyxy(x, y, x + width, y + height)
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.x2 - self.x1
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.y2 - self.y1
    }

    #[inline]
    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    /// Returns true if `x1 < x2` and `y1 < y2`.
    #[inline]
    pub fn is_ordered(&self) -> bool {
        self.x1 < self.x2 && self.y1 < self.y2
    }

    /// Area of the intersection with `other`; zero when they do not touch.
    pub fn overlap_area(&self, other: &Self) -> f64 {
        let w = self.x2.min(other.x2) - self.x1.max(other.x1);
        let h = self.y2.min(other.y2) - self.y1.max(other.y1);
        if w <= 0.0 || h <= 0.0 {
            0.0
        } else {
            w * h
        }
    }

    /// Center point and size: `(cx, cy, w, h)`.
    #[inline]
    pub fn to_cxcywh(&self) -> (f64, f64, f64, f64) {
        (
            (self.x1 + self.x2) / 2.0,
            (self.y1 + self.y2) / 2.0,
            self.width(),
            self.height(),
        )
    }

    #[inline]
    pub fn from_cxcywh(cx: f64, cy: f64, w: f64, h: f64) -> Self {
        Self::from_xyxy(cx - w / 2.0, cy - h / 2.0, cx + w / 2.0, cy + h / 2.0)
    }
}

impl<TSpace> std::fmt::Debug for Rect<TSpace> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rect")
            .field("x1", &self.x1)
            .field("y1", &self.y1)
            .field("x2", &self.x2)
            .field("y2", &self.y2)
            .finish()
    }
}

impl Rect<Pixel> {
    /// Returns true if the rectangle is ordered and lies inside a
    /// `width` x `height` canvas.
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        self.is_ordered()
            && self.x1 >= 0.0
            && self.y1 >= 0.0
            && self.x2 <= width as f64
            && self.y2 <= height as f64
    }

    pub fn to_normalized(&self, width: u32, height: u32) -> Rect<Normalized> {
        let (w, h) = (width as f64, height as f64);
        Rect::from_xyxy(self.x1 / w, self.y1 / h, self.x2 / w, self.y2 / h)
    }
}

impl Rect<Normalized> {
    pub fn to_pixel(&self, width: u32, height: u32) -> Rect<Pixel> {
        let (w, h) = (width as f64, height as f64);
        Rect::from_xyxy(self.x1 * w, self.y1 * h, self.x2 * w, self.y2 * h)
    }
}

/// Sum of overlap areas between `rect` and every rectangle in `others`.
pub fn total_overlap(rect: &Rect<Pixel>, others: &[Rect<Pixel>]) -> f64 {
    others.iter().map(|other| rect.overlap_area(other)).sum()
}
