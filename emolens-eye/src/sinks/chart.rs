//! Persistent distribution (pie) chart

use emolens_core::{Category, Color, Distribution, Palette};
use std::fmt;

/// Dataset label shown on the chart
pub const DATASET_LABEL: &str = "Emotion Distribution (%)";

/// Receives each frame's averaged distribution, in category declaration order.
///
/// Unlike the overlay, the chart keeps showing the last distribution until
/// the next one arrives.
pub trait ChartSink: Send {
    /// Slice colors; set once by the sampler so they match the overlay boxes
    fn set_palette(&mut self, _palette: &Palette) {}

    fn set_distribution(&mut self, distribution: &Distribution);
}

/// Chart data: one slice per category, colored from the palette
#[derive(Debug, Clone, PartialEq)]
pub struct ChartState {
    palette: Palette,
    values: Distribution,
    updates: u64,
}

impl Default for ChartState {
    fn default() -> Self {
        Self::new(Palette::default())
    }
}

impl ChartState {
    /// All slices start at zero
    pub fn new(palette: Palette) -> Self {
        Self {
            palette,
            values: Distribution::zero(),
            updates: 0,
        }
    }

    pub fn values(&self) -> &Distribution {
        &self.values
    }

    pub fn value(&self, category: Category) -> u8 {
        self.values.get(category)
    }

    /// Number of distributions received
    pub fn updates(&self) -> u64 {
        self.updates
    }

    /// Legend entries in slice order
    pub fn legend(&self) -> Vec<(Category, Color)> {
        self.palette.entries().collect()
    }

    /// Hover text for one slice, e.g. `happy: 90%`
    pub fn tooltip(&self, category: Category) -> String {
        format!("{}: {}%", category, self.value(category))
    }
}

impl ChartSink for ChartState {
    fn set_palette(&mut self, palette: &Palette) {
        self.palette = palette.clone();
    }

    fn set_distribution(&mut self, distribution: &Distribution) {
        self.values = *distribution;
        self.updates += 1;
    }
}

impl fmt::Display for ChartState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", DATASET_LABEL)?;
        for (category, color) in self.palette.entries() {
            writeln!(
                f,
                "  {:<10} {:>3}%  {}",
                category.name(),
                self.value(category),
                color
            )?;
        }
        Ok(())
    }
}
