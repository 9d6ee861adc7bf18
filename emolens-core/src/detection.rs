//! Detection data model

use crate::palette::{Category, CATEGORY_COUNT};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Axis-aligned bounding region in frame pixels
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl BoundingBox {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Point just above the top-left corner where a caption is drawn
    pub fn label_anchor(&self, offset: f32) -> (f32, f32) {
        (self.x, self.y - offset)
    }
}

/// Per-category confidence scores for one detected entity.
///
/// Every category has a slot; categories the engine did not report read as
/// zero. Scores are independent classifier outputs and need not sum to one.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "BTreeMap<Category, f64>", into = "BTreeMap<Category, f64>")]
pub struct Scores {
    values: [f64; CATEGORY_COUNT],
}

impl Scores {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`Scores::set`]
    pub fn with(mut self, category: Category, score: f64) -> Self {
        self.set(category, score);
        self
    }

    /// Store a score. Non-finite input becomes 0; finite input is clamped to [0, 1].
    pub fn set(&mut self, category: Category, score: f64) {
        self.values[category.index()] = sanitize(score);
    }

    pub fn get(&self, category: Category) -> f64 {
        self.values[category.index()]
    }

    /// `(category, score)` pairs in category declaration order
    pub fn iter(&self) -> impl Iterator<Item = (Category, f64)> + '_ {
        Category::ALL.into_iter().zip(self.values.iter().copied())
    }

    /// Highest-scoring category and its score.
    ///
    /// Ties go to the category declared first, so `{happy: 0.5, sad: 0.5}`
    /// is always `happy`.
    pub fn dominant(&self) -> (Category, f64) {
        let mut best = (Category::ALL[0], self.values[0]);
        for (category, score) in self.iter().skip(1) {
            if score > best.1 {
                best = (category, score);
            }
        }
        best
    }
}

fn sanitize(score: f64) -> f64 {
    if score.is_finite() {
        score.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

impl FromIterator<(Category, f64)> for Scores {
    fn from_iter<I: IntoIterator<Item = (Category, f64)>>(iter: I) -> Self {
        let mut scores = Scores::new();
        for (category, score) in iter {
            scores.set(category, score);
        }
        scores
    }
}

impl From<BTreeMap<Category, f64>> for Scores {
    fn from(map: BTreeMap<Category, f64>) -> Self {
        map.into_iter().collect()
    }
}

impl From<Scores> for BTreeMap<Category, f64> {
    fn from(scores: Scores) -> Self {
        scores.iter().collect()
    }
}

/// One entity observed in a frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    #[serde(rename = "box")]
    pub bbox: BoundingBox,
    #[serde(rename = "expressions")]
    pub scores: Scores,
}

impl Detection {
    pub fn new(bbox: BoundingBox, scores: Scores) -> Self {
        Self { bbox, scores }
    }
}
