use proptest::prelude::*;
use rand::{rngs::StdRng, SeedableRng};
use synthcover::geom::total_overlap;
use synthcover::label::LabelRow;
use synthcover::placement::find_placement;

mod proptest_helpers;

const EPS: f64 = 1e-9;

proptest! {
    #![proptest_config(proptest_helpers::proptest_config())]

    #[test]
    fn placement_stays_inside_background(
        background in proptest_helpers::arb_background(),
        foreground in proptest_helpers::arb_foreground(),
        placed in proptest_helpers::arb_placed(6),
        candidates in 1usize..40,
        seed in any::<u64>(),
    ) {
        let mut rng = StdRng::seed_from_u64(seed);
        let result = find_placement(background, foreground, &placed, candidates, &mut rng);

        let fits = foreground.0 > 0
            && foreground.1 > 0
            && foreground.0 <= background.0
            && foreground.1 <= background.1;
        prop_assert_eq!(result.is_some(), fits);

        if let Some(rect) = result {
            prop_assert!(rect.fits_within(background.0, background.1), "{:?}", rect);
            prop_assert_eq!(rect.width(), foreground.0 as f64);
            prop_assert_eq!(rect.height(), foreground.1 as f64);
        }
    }

    #[test]
    fn placement_labels_are_normalized(
        background in proptest_helpers::arb_background(),
        foreground in proptest_helpers::arb_foreground(),
        seed in any::<u64>(),
    ) {
        let mut rng = StdRng::seed_from_u64(seed);
        if let Some(rect) = find_placement(background, foreground, &[], 10, &mut rng) {
            let row = LabelRow::from_placement(&rect, background.0, background.1);
            for v in [row.cx, row.cy, row.w, row.h] {
                prop_assert!((0.0..=1.0).contains(&v), "{:?}", row);
            }
            prop_assert!(row.cx - row.w / 2.0 >= -EPS);
            prop_assert!(row.cx + row.w / 2.0 <= 1.0 + EPS);
            prop_assert!(row.cy - row.h / 2.0 >= -EPS);
            prop_assert!(row.cy + row.h / 2.0 <= 1.0 + EPS);
        }
    }

    #[test]
    fn more_candidates_never_score_worse_on_same_stream(
        placed in proptest_helpers::arb_placed(8),
        seed in any::<u64>(),
    ) {
        // The first `few` candidates drawn are a prefix of the `many` stream.
        let few = find_placement((2000, 2000), (150, 150), &placed, 3, &mut StdRng::seed_from_u64(seed))
            .expect("fits");
        let many = find_placement((2000, 2000), (150, 150), &placed, 30, &mut StdRng::seed_from_u64(seed))
            .expect("fits");
        prop_assert!(total_overlap(&many, &placed) <= total_overlap(&few, &placed));
    }
}
