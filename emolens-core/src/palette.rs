//! Expression categories and their display colors

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Number of expression categories
pub const CATEGORY_COUNT: usize = 7;

/// Expression category.
///
/// Declaration order is significant: it is the order of chart slices and
/// the tie-break order when two scores are equal (earlier wins).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Happy,
    Sad,
    Angry,
    Surprised,
    Fearful,
    Disgusted,
    Neutral,
}

impl Category {
    /// All categories in declaration order
    pub const ALL: [Category; CATEGORY_COUNT] = [
        Category::Happy,
        Category::Sad,
        Category::Angry,
        Category::Surprised,
        Category::Fearful,
        Category::Disgusted,
        Category::Neutral,
    ];

    /// Position of this category in [`Category::ALL`]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Category::Happy => "happy",
            Category::Sad => "sad",
            Category::Angry => "angry",
            Category::Surprised => "surprised",
            Category::Fearful => "fearful",
            Category::Disgusted => "disgusted",
            Category::Neutral => "neutral",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        Category::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| Error::UnknownCategory(s.to_string()))
    }
}

/// 24-bit RGB display color, written as `#rrggbb`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb` (the leading `#` is optional)
    pub fn from_hex(hex: &str) -> Result<Self> {
        let digits = hex.trim().trim_start_matches('#');
        if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(Error::InvalidColor(hex.to_string()));
        }

        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16).map_err(|_| Error::InvalidColor(hex.to_string()))
        };

        Ok(Self::rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for Color {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Color::from_hex(s)
    }
}

impl TryFrom<String> for Color {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Color::from_hex(&value)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

const DEFAULT_COLORS: [Color; CATEGORY_COUNT] = [
    Color::rgb(0x28, 0xa7, 0x45), // happy: green
    Color::rgb(0x00, 0x7b, 0xff), // sad: blue
    Color::rgb(0xdc, 0x35, 0x45), // angry: red
    Color::rgb(0xff, 0xc1, 0x07), // surprised: yellow
    Color::rgb(0x6f, 0x42, 0xc1), // fearful: purple
    Color::rgb(0xfd, 0x7e, 0x14), // disgusted: orange
    Color::rgb(0x6c, 0x75, 0x7d), // neutral: gray
];

/// Category to color mapping.
///
/// Always total (one color per category) and injective (no two categories
/// share a color), so every color maps back to exactly one category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    colors: [Color; CATEGORY_COUNT],
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            colors: DEFAULT_COLORS,
        }
    }
}

impl Palette {
    /// Create a palette from colors listed in category declaration order
    pub fn new(colors: [Color; CATEGORY_COUNT]) -> Result<Self> {
        for (i, a) in colors.iter().enumerate() {
            if let Some(j) = colors[i + 1..].iter().position(|b| a == b) {
                return Err(Error::Palette(format!(
                    "{} and {} share color {}",
                    Category::ALL[i],
                    Category::ALL[i + 1 + j],
                    a
                )));
            }
        }
        Ok(Self { colors })
    }

    /// Start from the default palette and replace the given entries
    pub fn with_overrides(overrides: &BTreeMap<Category, Color>) -> Result<Self> {
        let mut colors = DEFAULT_COLORS;
        for (category, color) in overrides {
            colors[category.index()] = *color;
        }
        Self::new(colors)
    }

    pub fn color(&self, category: Category) -> Color {
        self.colors[category.index()]
    }

    /// Inverse lookup
    pub fn category_of(&self, color: Color) -> Option<Category> {
        self.colors
            .iter()
            .position(|c| *c == color)
            .map(|i| Category::ALL[i])
    }

    /// `(category, color)` pairs in declaration order
    pub fn entries(&self) -> impl Iterator<Item = (Category, Color)> + '_ {
        Category::ALL.into_iter().zip(self.colors.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_order_matches_index() {
        for (i, category) in Category::ALL.iter().enumerate() {
            assert_eq!(category.index(), i);
        }
        assert!(Category::Happy < Category::Neutral);
    }

    #[test]
    fn test_category_parse() {
        assert_eq!("happy".parse::<Category>().unwrap(), Category::Happy);
        assert_eq!(" Disgusted ".parse::<Category>().unwrap(), Category::Disgusted);
        assert!(matches!(
            "bored".parse::<Category>(),
            Err(Error::UnknownCategory(_))
        ));
    }

    #[test]
    fn test_color_hex_roundtrip() {
        let color = Color::from_hex("#28a745").unwrap();
        assert_eq!(color, Color::rgb(0x28, 0xa7, 0x45));
        assert_eq!(color.to_string(), "#28a745");
        assert_eq!(Color::from_hex("FFC107").unwrap(), Color::rgb(0xff, 0xc1, 0x07));
    }

    #[test]
    fn test_color_rejects_garbage() {
        assert!(Color::from_hex("#12345").is_err());
        assert!(Color::from_hex("#12345g").is_err());
        assert!(Color::from_hex("").is_err());
    }

    #[test]
    fn test_default_palette_is_bijection() {
        let palette = Palette::default();
        assert!(Palette::new(DEFAULT_COLORS).is_ok());
        for (category, color) in palette.entries() {
            assert_eq!(palette.category_of(color), Some(category));
        }
        assert_eq!(palette.color(Category::Sad).to_string(), "#007bff");
        assert_eq!(palette.color(Category::Neutral).to_string(), "#6c757d");
    }

    #[test]
    fn test_palette_rejects_shared_color() {
        let mut overrides = BTreeMap::new();
        overrides.insert(Category::Sad, Color::from_hex("#28a745").unwrap());
        let err = Palette::with_overrides(&overrides).unwrap_err();
        assert!(err.to_string().contains("happy and sad"));
    }

    #[test]
    fn test_palette_override() {
        let mut overrides = BTreeMap::new();
        overrides.insert(Category::Angry, Color::rgb(0xff, 0, 0));
        let palette = Palette::with_overrides(&overrides).unwrap();
        assert_eq!(palette.color(Category::Angry), Color::rgb(0xff, 0, 0));
        assert_eq!(palette.color(Category::Happy), DEFAULT_COLORS[0]);
    }
}
