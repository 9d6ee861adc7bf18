use emolens_core::{summarize, BoundingBox, Category, Detection, Scores, CATEGORY_COUNT};
use proptest::prelude::*;

fn arb_detection() -> impl Strategy<Value = Detection> {
    (
        prop::collection::vec(prop::num::f64::ANY, CATEGORY_COUNT),
        0.0f32..1000.0,
        0.0f32..1000.0,
    )
        .prop_map(|(raw, x, y)| {
            let scores: Scores = Category::ALL.into_iter().zip(raw).collect();
            Detection::new(BoundingBox::new(x, y, 50.0, 50.0), scores)
        })
}

proptest! {
    #[test]
    fn test_distribution_values_in_range(detections in prop::collection::vec(arb_detection(), 0..20)) {
        let summary = summarize(detections);
        for (_, value) in summary.distribution.iter() {
            prop_assert!(value <= 100);
        }
        prop_assert!(summary.distribution.total() <= 100 * CATEGORY_COUNT as u32);
    }

    #[test]
    fn test_one_entity_per_detection(detections in prop::collection::vec(arb_detection(), 0..20)) {
        let expected = detections.len();
        let summary = summarize(detections);
        prop_assert_eq!(summary.entity_count(), expected);
    }

    #[test]
    fn test_dominant_is_maximal(detection in arb_detection()) {
        let (dominant, confidence) = detection.scores.dominant();
        for (category, score) in detection.scores.iter() {
            prop_assert!(score <= confidence);
            if score == confidence {
                // ties go to the earliest declared category
                prop_assert!(dominant <= category);
            }
        }
    }

    #[test]
    fn test_summarize_is_deterministic(detections in prop::collection::vec(arb_detection(), 0..10)) {
        let first = summarize(detections.clone());
        let second = summarize(detections);
        prop_assert_eq!(first, second);
    }
}

#[test]
fn test_empty_frame_never_nan() {
    let summary = summarize(Vec::new());
    assert!(summary.distribution.is_zero());
    assert_eq!(summary.distribution.as_slice(), &[0u8; CATEGORY_COUNT]);
}

#[test]
fn test_zero_frame_after_busy_frame() {
    let busy = summarize(vec![Detection::new(
        BoundingBox::new(1.0, 2.0, 3.0, 4.0),
        Scores::new().with(Category::Angry, 0.75),
    )]);
    assert_eq!(busy.distribution.get(Category::Angry), 75);

    let empty = summarize(Vec::new());
    assert!(empty.distribution.is_zero());
}
