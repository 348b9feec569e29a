use std::path::Path;

use proptest::prelude::*;
use synthcover::label::{parse_label_line, LabelRow, CLASS_ID};

mod proptest_helpers;

proptest! {
    #![proptest_config(proptest_helpers::proptest_config())]

    #[test]
    fn formatted_line_reparses_to_the_same_text(
        cx in 0.0f64..=1.0,
        cy in 0.0f64..=1.0,
        w in 0.0f64..=1.0,
        h in 0.0f64..=1.0,
    ) {
        let row = LabelRow { class_id: CLASS_ID, cx, cy, w, h };
        let line = row.to_string();

        let parsed = parse_label_line(&line, Path::new("prop.txt"), 1)
            .expect("parse")
            .expect("row");
        prop_assert_eq!(parsed.to_string(), line);
        prop_assert_eq!(parsed.class_id, CLASS_ID);
        prop_assert!((parsed.cx - cx).abs() <= 5e-7);
        prop_assert!((parsed.h - h).abs() <= 5e-7);
    }

    #[test]
    fn parser_never_panics(line in ".{0,80}") {
        let _ = parse_label_line(&line, Path::new("prop.txt"), 1);
    }
}
