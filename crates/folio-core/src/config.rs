use serde::{Deserialize, Serialize};

use crate::animation::DEFAULT_SETTLE_DURATION;
use crate::book::{Book, LeafSize};

pub const CONFIG_VERSION: u32 = 1;

// ============================================================
// Serializable config types
// ============================================================

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BookConfig {
    pub version: u32,
    pub page_count: u32,
    pub leaf: LeafConfig,
    #[serde(default = "default_settle_duration")]
    pub settle_duration: f32,
    #[serde(default)]
    pub style: StyleConfig,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct LeafConfig {
    pub width: f32,
    pub height: f32,
}

/// Colors and shading used by the demo renderer. The core geometry
/// never reads these.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct StyleConfig {
    pub paper_color: [f32; 3],
    pub cover_color: [f32; 3],
    pub ink_color: [f32; 3],
    pub shadow_strength: f32,
}

fn default_settle_duration() -> f32 {
    DEFAULT_SETTLE_DURATION
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            paper_color: [0.93, 0.90, 0.83],
            cover_color: [0.24, 0.12, 0.08],
            ink_color: [0.18, 0.16, 0.14],
            shadow_strength: 0.35,
        }
    }
}

impl Default for BookConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            page_count: 8,
            leaf: LeafConfig {
                width: 300.0,
                height: 400.0,
            },
            settle_duration: DEFAULT_SETTLE_DURATION,
            style: StyleConfig::default(),
        }
    }
}

impl BookConfig {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

// ============================================================
// Conversions: config types -> runtime types
// ============================================================

impl From<&LeafConfig> for LeafSize {
    fn from(c: &LeafConfig) -> Self {
        Self {
            width: c.width,
            height: c.height,
        }
    }
}

impl From<&BookConfig> for Book {
    fn from(c: &BookConfig) -> Self {
        let mut book = Book::new(c.page_count, LeafSize::from(&c.leaf));
        book.set_settle_duration(c.settle_duration);
        book
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_round_trip_preserves_fields() {
        let config = BookConfig {
            page_count: 12,
            leaf: LeafConfig {
                width: 210.0,
                height: 297.0,
            },
            settle_duration: 0.3,
            ..BookConfig::default()
        };
        let json = config.to_json_pretty().unwrap();
        let back = BookConfig::from_json(&json).unwrap();
        assert_eq!(back.page_count, 12);
        assert_eq!(back.leaf.width, 210.0);
        assert_eq!(back.settle_duration, 0.3);
    }

    #[test]
    fn missing_optional_fields_fall_back_to_defaults() {
        let json = r#"{
            "version": 1,
            "page_count": 6,
            "leaf": { "width": 100.0, "height": 150.0 }
        }"#;
        let config = BookConfig::from_json(json).unwrap();
        assert_eq!(config.settle_duration, DEFAULT_SETTLE_DURATION);
        assert_eq!(config.style.shadow_strength, StyleConfig::default().shadow_strength);
    }

    #[test]
    fn book_builds_from_config() {
        let book = Book::from(&BookConfig::default());
        assert_eq!(book.page_count(), 8);
        assert!((book.model().page_width - 300.0).abs() < 1e-6);
        assert_eq!(book.settle_duration(), DEFAULT_SETTLE_DURATION);
    }
}
