//! Parsing configuration for HTML extraction
//!
//! Centralized configuration for CSS selectors and page validation.
//! Ozon class names carry generated suffixes, so containers are matched by
//! class substring (`[class*=...]`) rather than exact class.

use serde::{Deserialize, Serialize};

use crate::domain::constants::{blocking, images};

/// Main parsing configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParsingConfig {
    /// Literal phrases identifying an anti-bot / access restriction page
    pub blocking_markers: Vec<String>,

    /// Regex matching the thumbnail size segment of image URLs
    pub image_size_pattern: String,

    /// Replacement for `image_size_pattern`
    pub image_size_replacement: String,

    /// Product detail selectors
    pub product_detail_selectors: ProductDetailSelectors,
}

impl Default for ParsingConfig {
    fn default() -> Self {
        Self {
            blocking_markers: blocking::DEFAULT_MARKERS
                .iter()
                .map(ToString::to_string)
                .collect(),
            image_size_pattern: images::THUMBNAIL_SEGMENT_PATTERN.to_string(),
            image_size_replacement: images::HIGH_RES_SEGMENT.to_string(),
            product_detail_selectors: ProductDetailSelectors::default(),
        }
    }
}

/// CSS selectors for product detail pages
///
/// List fields are fallbacks tried in order; the first selector that yields
/// a value wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductDetailSelectors {
    pub title: Vec<String>,

    /// Breadcrumb label elements
    pub category: Vec<String>,

    /// Gallery `img` elements
    pub images: Vec<String>,

    pub description: Vec<String>,

    /// One element per characteristic entry
    pub characteristics: Vec<String>,

    /// Name element inside a characteristic entry
    pub characteristic_term: String,

    /// Value element inside a characteristic entry
    pub characteristic_definition: String,
}

impl Default for ProductDetailSelectors {
    fn default() -> Self {
        Self {
            title: vec![
                r#"h1[data-widget="webProductTitle"]"#.to_string(),
                "h1".to_string(),
            ],
            category: vec![r#"ol[class*="tsBodyControl400Small"] a > span"#.to_string()],
            images: vec![
                r#"div[class*="pdp_r1a"] img, div[class*="pdp_r4a"] img"#.to_string(),
            ],
            description: vec!["div#section-description".to_string()],
            characteristics: vec!["div#section-characteristics dl".to_string()],
            characteristic_term: "dt".to_string(),
            characteristic_definition: "dd".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_markers_are_the_ozon_phrases() {
        let config = ParsingConfig::default();
        assert_eq!(
            config.blocking_markers,
            vec!["Доступ ограничен".to_string(), "Проверка безопасности".to_string()]
        );
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let config: ParsingConfig =
            serde_json::from_str(r#"{"blocking_markers": ["captcha"]}"#).unwrap();
        assert_eq!(config.blocking_markers, vec!["captcha".to_string()]);
        assert_eq!(config.product_detail_selectors, ProductDetailSelectors::default());
        assert_eq!(config.image_size_replacement, "/wc1000/");
    }
}
