//! Per-frame reduction of detections into dominant labels and an averaged distribution

use crate::detection::Detection;
use crate::palette::{Category, CATEGORY_COUNT};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::trace;

/// Whole-number percentage (0..=100) per category, in declaration order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Distribution {
    values: [u8; CATEGORY_COUNT],
}

impl Distribution {
    pub fn zero() -> Self {
        Self::default()
    }

    /// Build from raw percentages; values above 100 are capped
    pub fn from_percentages(values: [u8; CATEGORY_COUNT]) -> Self {
        Self {
            values: values.map(|v| v.min(100)),
        }
    }

    pub fn get(&self, category: Category) -> u8 {
        self.values[category.index()]
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.values
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, u8)> + '_ {
        Category::ALL.into_iter().zip(self.values.iter().copied())
    }

    pub fn is_zero(&self) -> bool {
        self.values.iter().all(|v| *v == 0)
    }

    pub fn total(&self) -> u32 {
        self.values.iter().map(|v| u32::from(*v)).sum()
    }
}

impl fmt::Display for Distribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (category, value) in self.iter() {
            if !first {
                f.write_str(", ")?;
            }
            write!(f, "{category} {value}%")?;
            first = false;
        }
        Ok(())
    }
}

/// One detection together with its dominant category
#[derive(Debug, Clone, PartialEq)]
pub struct EntitySummary {
    pub detection: Detection,
    pub dominant: Category,
    /// Score of the dominant category
    pub confidence: f64,
}

impl EntitySummary {
    pub fn percent(&self) -> u8 {
        to_percent(self.confidence)
    }

    /// Caption text, e.g. `happy (90%)`
    pub fn label(&self) -> String {
        format!("{} ({}%)", self.dominant, self.percent())
    }
}

/// Everything derived from one tick's detections
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FrameSummary {
    pub entities: Vec<EntitySummary>,
    pub distribution: Distribution,
}

impl FrameSummary {
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

/// Reduce a frame's detections.
///
/// Each entity gets its argmax category. The distribution averages every
/// category's score over all entities (not only dominant ones), divides by
/// `max(1, n)` so an empty frame gives the zero vector, and rounds to whole
/// percent.
pub fn summarize(detections: Vec<Detection>) -> FrameSummary {
    let mut sums = [0.0f64; CATEGORY_COUNT];
    let mut entities = Vec::with_capacity(detections.len());

    for detection in detections {
        for (category, score) in detection.scores.iter() {
            sums[category.index()] += score;
        }
        let (dominant, confidence) = detection.scores.dominant();
        entities.push(EntitySummary {
            detection,
            dominant,
            confidence,
        });
    }

    let divisor = entities.len().max(1) as f64;
    let distribution = Distribution {
        values: sums.map(|sum| to_percent(sum / divisor)),
    };
    trace!("Summarized {} entities: {}", entities.len(), distribution);

    FrameSummary {
        entities,
        distribution,
    }
}

fn to_percent(fraction: f64) -> u8 {
    (fraction * 100.0).round().clamp(0.0, 100.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::{BoundingBox, Scores};

    fn detection(scores: &[(Category, f64)]) -> Detection {
        Detection::new(
            BoundingBox::new(0.0, 0.0, 10.0, 10.0),
            scores.iter().copied().collect(),
        )
    }

    #[test]
    fn test_empty_frame_is_zero() {
        let summary = summarize(Vec::new());
        assert!(summary.is_empty());
        assert!(summary.distribution.is_zero());
        assert_eq!(summary.distribution.as_slice().len(), CATEGORY_COUNT);
    }

    #[test]
    fn test_single_detection() {
        let summary = summarize(vec![detection(&[
            (Category::Happy, 0.9),
            (Category::Sad, 0.1),
        ])]);

        assert_eq!(summary.entity_count(), 1);
        assert_eq!(summary.entities[0].dominant, Category::Happy);
        assert_eq!(summary.entities[0].label(), "happy (90%)");

        let d = summary.distribution;
        assert_eq!(d.get(Category::Happy), 90);
        assert_eq!(d.get(Category::Sad), 10);
        for category in [
            Category::Angry,
            Category::Surprised,
            Category::Fearful,
            Category::Disgusted,
            Category::Neutral,
        ] {
            assert_eq!(d.get(category), 0);
        }
    }

    #[test]
    fn test_two_detections_average_full_vectors() {
        let summary = summarize(vec![
            detection(&[(Category::Happy, 0.9), (Category::Sad, 0.1)]),
            detection(&[(Category::Sad, 0.8), (Category::Happy, 0.2)]),
        ]);

        assert_eq!(summary.entities[0].dominant, Category::Happy);
        assert_eq!(summary.entities[1].dominant, Category::Sad);
        assert_eq!(summary.entities[1].label(), "sad (80%)");
        assert_eq!(summary.distribution.get(Category::Happy), 55);
        assert_eq!(summary.distribution.get(Category::Sad), 45);
        assert_eq!(summary.distribution.total(), 100);
    }

    #[test]
    fn test_tie_resolves_to_happy() {
        let summary = summarize(vec![detection(&[
            (Category::Sad, 0.5),
            (Category::Happy, 0.5),
        ])]);
        assert_eq!(summary.entities[0].dominant, Category::Happy);
        assert_eq!(summary.distribution.get(Category::Happy), 50);
        assert_eq!(summary.distribution.get(Category::Sad), 50);
    }

    #[test]
    fn test_rounding_to_nearest() {
        let summary = summarize(vec![detection(&[
            (Category::Angry, 0.334),
            (Category::Neutral, 0.666),
        ])]);
        assert_eq!(summary.distribution.get(Category::Angry), 33);
        assert_eq!(summary.distribution.get(Category::Neutral), 67);
    }

    #[test]
    fn test_half_percent_rounds_up() {
        let summary = summarize(vec![detection(&[
            (Category::Happy, 0.445),
            (Category::Sad, 0.555),
        ])]);
        assert_eq!(summary.distribution.get(Category::Happy), 45);
        assert_eq!(summary.distribution.get(Category::Sad), 56);
        assert_eq!(summary.entities[0].label(), "sad (56%)");
    }

    #[test]
    fn test_distribution_display() {
        let d = Distribution::from_percentages([90, 10, 0, 0, 0, 0, 0]);
        assert_eq!(
            d.to_string(),
            "happy 90%, sad 10%, angry 0%, surprised 0%, fearful 0%, disgusted 0%, neutral 0%"
        );
    }

    #[test]
    fn test_from_percentages_caps_values() {
        let d = Distribution::from_percentages([200, 0, 0, 0, 0, 0, 100]);
        assert_eq!(d.get(Category::Happy), 100);
        assert_eq!(d.get(Category::Neutral), 100);
    }

    #[test]
    fn test_fully_certain_detection() {
        let scores = Scores::new().with(Category::Fearful, 1.0);
        let summary = summarize(vec![Detection::new(BoundingBox::default(), scores)]);
        assert_eq!(summary.distribution.get(Category::Fearful), 100);
        assert_eq!(summary.entities[0].label(), "fearful (100%)");
    }
}
