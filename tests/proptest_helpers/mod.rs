#![allow(dead_code)]

use proptest::prelude::*;
use proptest::test_runner::{Config as ProptestConfig, FileFailurePersistence};
use synthcover::geom::{Pixel, Rect};

pub fn proptest_config() -> ProptestConfig {
    let cases = std::env::var("PROPTEST_CASES")
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(64);

    let mut config = ProptestConfig::with_failure_persistence(FileFailurePersistence::WithSource(
        "proptest-regressions",
    ));
    config.cases = cases;
    config.max_shrink_iters = 1024;
    config
}

/// Background dimensions in the range real photos fall into.
pub fn arb_background() -> impl Strategy<Value = (u32, u32)> {
    (1u32..=2000, 1u32..=2000)
}

/// Foreground dimensions, occasionally larger than the background.
pub fn arb_foreground() -> impl Strategy<Value = (u32, u32)> {
    (0u32..=600, 0u32..=600)
}

/// Rectangles already placed on a canvas of at most 2000x2000.
pub fn arb_placed(max_len: usize) -> impl Strategy<Value = Vec<Rect<Pixel>>> {
    prop::collection::vec(
        (0u32..1900, 0u32..1900, 1u32..=100, 1u32..=100).prop_map(|(x, y, w, h)| {
            Rect::from_xywh(x as f64, y as f64, w as f64, h as f64)
        }),
        0..=max_len,
    )
}
