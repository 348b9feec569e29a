use std::fs;

use synthcover::batch::{GenerationJob, Generator};
use synthcover::config::{AugmentConfig, Span};
use synthcover::label::read_label_file;
use synthcover::scene::Polarity;

mod common;

const EPS: f64 = 1e-6;

#[test]
fn single_positive_cover_on_800x600() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let ws = common::Workspace::new(temp.path());
    common::write_png(&ws.backgrounds.join("bg.png"), 800, 600, [20, 20, 20, 255]);
    common::write_png(&ws.positives.join("cover.png"), 100, 100, [250, 200, 0, 255]);

    let mut config = ws.plain_config();
    config.num_covers = 1;
    config.positive_count = 1;

    let report = Generator::new(config).expect("init").run().expect("run");
    assert_eq!(report.succeeded(), 1);

    let image = image::open(ws.output.join("synthetic_00001.png")).expect("open output");
    assert_eq!((image.width(), image.height()), (800, 600));

    let rows = read_label_file(&ws.output.join("synthetic_00001.txt")).expect("read labels");
    assert_eq!(rows.len(), 1);
    let row = rows[0];
    assert_eq!(row.class_id, 0);

    // Square cover: the same pixel side length divided by each background side.
    let side_px = row.w * 800.0;
    assert!((side_px - row.h * 600.0).abs() < 1e-3, "{row:?}");
    // 600 / 5 = 120 px base size, scaled by [0.8, 1.2].
    assert!((96.0 - 1.0..=144.0 + 1.0).contains(&side_px), "{side_px}");
    assert!((0.0..=1.0).contains(&row.cx));
    assert!((0.0..=1.0).contains(&row.cy));
}

#[test]
fn positive_line_count_matches_covers_placed() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let ws = common::Workspace::new(temp.path());
    common::write_png(&ws.backgrounds.join("bg.png"), 640, 480, [0, 80, 0, 255]);
    common::write_png(&ws.positives.join("a.png"), 80, 120, [200, 0, 0, 255]);
    common::write_png(&ws.positives.join("b.png"), 120, 60, [0, 0, 200, 255]);

    let mut config = ws.plain_config();
    config.num_covers = 4;
    config.foreground = AugmentConfig::default();
    config.seed = Some(99);

    let mut generator = Generator::new(config).expect("init");
    let report = generator
        .run_job(GenerationJob {
            count: 5,
            polarity: Polarity::Positive,
            start_index: 0,
        })
        .expect("run job");
    assert_eq!(report.succeeded, 5);

    let mut total = 0;
    for index in 1..=5 {
        let rows = read_label_file(&ws.output.join(format!("synthetic_{index:05}.txt")))
            .expect("read labels");
        assert!(!rows.is_empty() && rows.len() <= 4);
        for row in &rows {
            assert!(row.cx - row.w / 2.0 >= -EPS && row.cx + row.w / 2.0 <= 1.0 + EPS);
            assert!(row.cy - row.h / 2.0 >= -EPS && row.cy + row.h / 2.0 <= 1.0 + EPS);
            assert!(row.w > 0.0 && row.w <= 1.0 && row.h > 0.0 && row.h <= 1.0);
        }
        total += rows.len();
    }
    assert_eq!(total, report.boxes);
}

#[test]
fn negative_job_writes_empty_label_files() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let ws = common::Workspace::new(temp.path());
    common::write_png(&ws.backgrounds.join("bg.png"), 300, 200, [0, 0, 0, 255]);
    common::write_png(&ws.negatives.join("decoy.png"), 40, 40, [255, 255, 255, 255]);

    let mut config = ws.plain_config();
    config.negative_count = 3;
    config.positive_dirs = Vec::new();

    let report = Generator::new(config).expect("init").run().expect("run");
    assert_eq!(report.succeeded(), 3);
    assert_eq!(report.jobs[0].boxes, 0);

    for index in 1..=3 {
        let labels = fs::read_to_string(ws.output.join(format!("synthetic_{index:05}.txt")))
            .expect("read labels");
        assert!(labels.is_empty());
    }
}

#[test]
fn unreadable_backgrounds_produce_nothing() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let ws = common::Workspace::new(temp.path());
    common::write_garbage(&ws.backgrounds.join("a.jpg"));
    common::write_garbage(&ws.backgrounds.join("b.png"));
    common::write_png(&ws.positives.join("cover.png"), 50, 50, [9, 9, 9, 255]);

    let mut config = ws.plain_config();
    config.positive_count = 4;

    let report = Generator::new(config).expect("init").run().expect("run");
    assert_eq!(report.succeeded(), 0);
    assert_eq!(report.requested(), 4);
    assert_eq!(report.jobs[0].failed(), 4);
    assert_eq!(ws.output_files(), vec!["data.yaml".to_string()]);
}

#[test]
fn degenerate_covers_are_skipped_not_fatal() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let ws = common::Workspace::new(temp.path());
    common::write_png(&ws.backgrounds.join("bg.png"), 200, 200, [0, 0, 0, 255]);
    common::write_png(&ws.positives.join("line.png"), 60, 1, [255, 0, 0, 255]);

    let mut config = ws.plain_config();
    config.positive_count = 1;
    config.foreground.geometric.perspective_probability = 1.0;
    config.foreground.geometric.perspective_intensity = 0.2;
    config.scale_range = Span(1.0, 1.0);

    let report = Generator::new(config).expect("init").run().expect("run");
    assert_eq!(report.succeeded(), 1);
    let labels = fs::read_to_string(ws.output.join("synthetic_00001.txt")).expect("labels");
    assert!(labels.is_empty());
}
