//! Overlap-minimizing placement search.
//!
//! This is a bounded random search, not a packing algorithm: the returned
//! position is the best of a fixed number of uniformly sampled candidates
//! and may still overlap earlier placements.

use log::trace;
use rand::Rng;

use crate::geom::{total_overlap, Pixel, Rect};

/// Choose a top-left position for a `fg_w` x `fg_h` foreground on a
/// `bg_w` x `bg_h` background.
///
/// Samples up to `candidates` positions, keeps the one with the smallest
/// total overlap against `placed` and stops early on a zero-overlap hit.
/// Returns `None` when the foreground is empty or larger than the background.
pub fn find_placement<R: Rng + ?Sized>(
    background: (u32, u32),
    foreground: (u32, u32),
    placed: &[Rect<Pixel>],
    candidates: usize,
    rng: &mut R,
) -> Option<Rect<Pixel>> {
    let (bg_w, bg_h) = background;
    let (fg_w, fg_h) = foreground;
    if fg_w == 0 || fg_h == 0 || fg_w > bg_w || fg_h > bg_h {
        return None;
    }

    let max_x = bg_w - fg_w;
    let max_y = bg_h - fg_h;
    let mut best: Option<(Rect<Pixel>, f64)> = None;

    for attempt in 0..candidates.max(1) {
        let x = rng.random_range(0..=max_x);
        let y = rng.random_range(0..=max_y);
        let rect = Rect::from_xywh(x as f64, y as f64, fg_w as f64, fg_h as f64);

        let score = total_overlap(&rect, placed);
        if score == 0.0 {
            trace!("clear placement at ({x}, {y}) after {} candidate(s)", attempt + 1);
            return Some(rect);
        }
        if best.is_none_or(|(_, best_score)| score < best_score) {
            best = Some((rect, score));
        }
    }

    if let Some((rect, score)) = &best {
        trace!("best placement {rect:?} still overlaps by {score}");
    }
    best.map(|(rect, _)| rect)
}
