//! Product detail parser for Ozon product pages
//!
//! Runs five independent field queries (title, breadcrumb, gallery images,
//! description, characteristics) over a parsed page. Every query tolerates
//! its target being absent; only configuration errors fail.

#![allow(clippy::uninlined_format_args)]

use super::config::{ParsingConfig, ProductDetailSelectors};
use super::context::DetailParseContext;
use super::{ContextualParser, ParsingError, ParsingResult};
use crate::domain::product::{Characteristics, ProductRecord};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};

/// Parser for extracting a [`ProductRecord`] from a product detail page
pub struct ProductDetailParser {
    title_selectors: Vec<Selector>,
    category_selectors: Vec<Selector>,
    image_selectors: Vec<Selector>,
    description_selectors: Vec<Selector>,
    characteristics_selectors: Vec<Selector>,
    term_selector: Selector,
    definition_selector: Selector,

    /// Thumbnail size segment of gallery image URLs
    image_size_regex: Regex,
    image_size_replacement: String,
}

impl ProductDetailParser {
    /// Create a new product detail parser with default configuration
    pub fn new() -> ParsingResult<Self> {
        Self::with_config(&ParsingConfig::default())
    }

    /// Create parser with custom configuration
    pub fn with_config(config: &ParsingConfig) -> ParsingResult<Self> {
        let selectors: &ProductDetailSelectors = &config.product_detail_selectors;

        let image_size_regex =
            Regex::new(&config.image_size_pattern).map_err(|e| ParsingError::InvalidPattern {
                pattern: config.image_size_pattern.clone(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            title_selectors: Self::compile_selectors(&selectors.title)?,
            category_selectors: Self::compile_selectors(&selectors.category)?,
            image_selectors: Self::compile_selectors(&selectors.images)?,
            description_selectors: Self::compile_selectors(&selectors.description)?,
            characteristics_selectors: Self::compile_selectors(&selectors.characteristics)?,
            term_selector: Self::compile_selector(&selectors.characteristic_term)?,
            definition_selector: Self::compile_selector(&selectors.characteristic_definition)?,
            image_size_regex,
            image_size_replacement: config.image_size_replacement.clone(),
        })
    }

    fn compile_selector(selector_str: &str) -> ParsingResult<Selector> {
        Selector::parse(selector_str)
            .map_err(|e| ParsingError::invalid_selector(selector_str, format!("{:?}", e)))
    }

    /// Compile selector strings into Selector objects
    fn compile_selectors(selector_strings: &[String]) -> ParsingResult<Vec<Selector>> {
        let mut selectors = Vec::new();
        let mut last_error = None;

        for selector_str in selector_strings {
            match Self::compile_selector(selector_str) {
                Ok(selector) => selectors.push(selector),
                Err(e) => {
                    warn!("Failed to compile selector '{}': {}", selector_str, e);
                    last_error = Some(e);
                }
            }
        }

        match last_error {
            Some(e) if selectors.is_empty() => Err(e),
            _ => Ok(selectors),
        }
    }

    /// Replace the thumbnail size segment with the high resolution one.
    ///
    /// Idempotent: an already rewritten URL is returned unchanged.
    pub fn rewrite_image_url(&self, src: &str) -> String {
        self.image_size_regex
            .replace_all(src, self.image_size_replacement.as_str())
            .into_owned()
    }
}

impl ContextualParser for ProductDetailParser {
    type Output = ProductRecord;
    type Context = DetailParseContext;

    fn parse_with_context(&self, html: &Html, context: &Self::Context) -> ParsingResult<Self::Output> {
        debug!("Parsing product detail from: {}", context.url);

        let characteristics = self.extract_characteristics(html);
        let record = ProductRecord::new(
            self.extract_title(html),
            self.extract_category(html),
            self.extract_images(html),
            self.extract_description(html),
            characteristics,
        );

        if record.populated_fields() == 0 {
            warn!("No product fields found on {}", context.url);
        } else {
            debug!(
                "Extracted {} fields ({} images, {} characteristics) from {}",
                record.populated_fields(),
                record.images.len(),
                record.characteristics.len(),
                context.url
            );
        }
        Ok(record)
    }
}

impl ProductDetailParser {
    pub fn extract_title(&self, html: &Html) -> Option<String> {
        self.extract_basic_info(html, "title", &self.title_selectors)
    }

    /// Breadcrumb labels joined with `/`
    pub fn extract_category(&self, html: &Html) -> Option<String> {
        let segments: Vec<String> = self
            .select_from_multiple(&self.category_selectors, html)
            .into_iter()
            .map(|element| element_text(&element))
            .filter(|segment| !segment.is_empty())
            .collect();

        if segments.is_empty() {
            None
        } else {
            Some(segments.join("/"))
        }
    }

    /// Gallery image URLs, rewritten to high resolution, unique, in page order
    pub fn extract_images(&self, html: &Html) -> Vec<String> {
        let mut images: Vec<String> = Vec::new();

        for img in self.select_from_multiple(&self.image_selectors, html) {
            let Some(src) = img.value().attr("src").filter(|src| !src.is_empty()) else {
                continue;
            };
            let high_res = self.rewrite_image_url(src);
            if !images.contains(&high_res) {
                images.push(high_res);
            }
        }

        images
    }

    pub fn extract_description(&self, html: &Html) -> Option<String> {
        self.description_selectors
            .iter()
            .find_map(|selector| html.select(selector).next())
            .map(|element| element_text(&element))
            .filter(|text| !text.is_empty())
    }

    /// Characteristic table: first name and first value of every entry block
    pub fn extract_characteristics(&self, html: &Html) -> Characteristics {
        let mut characteristics = Characteristics::new();

        for block in self.select_from_multiple(&self.characteristics_selectors, html) {
            let term = block.select(&self.term_selector).next();
            let definition = block.select(&self.definition_selector).next();

            if let (Some(term), Some(definition)) = (term, definition) {
                characteristics.insert(&element_text(&term), &element_text(&definition));
            }
        }

        characteristics
    }

    /// Extract basic product information with fallback selectors
    fn extract_basic_info(&self, html: &Html, field_name: &str, selectors: &[Selector]) -> Option<String> {
        for (i, selector) in selectors.iter().enumerate() {
            let found = html
                .select(selector)
                .map(|element| element_text(&element))
                .find(|text| !text.is_empty());
            if let Some(text) = found {
                debug!("Extracted {} using selector {}: {}", field_name, i, text);
                return Some(text);
            }
        }

        debug!("Failed to extract {} using {} selectors", field_name, selectors.len());
        None
    }

    /// Select elements using multiple selectors, returning the first that matches
    fn select_from_multiple<'a>(&self, selectors: &[Selector], html: &'a Html) -> Vec<ElementRef<'a>> {
        for selector in selectors {
            let elements: Vec<_> = html.select(selector).collect();
            if !elements.is_empty() {
                return elements;
            }
        }
        Vec::new()
    }
}

/// Trimmed text content of an element and its descendants
fn element_text(element: &ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}
