//! HTML parsing infrastructure for Ozon product pages
//!
//! Trait-based parsing: a [`Validator`] guards the raw body, then a
//! [`ContextualParser`] runs field queries over a best-effort document tree.

pub mod config;
pub mod context;
pub mod error;
pub mod page_validator;
pub mod product_detail_parser;

pub use config::{ParsingConfig, ProductDetailSelectors};
pub use context::DetailParseContext;
pub use error::{ParsingError, ParsingResult};
pub use page_validator::{BlockingPageValidator, RawPage};
pub use product_detail_parser::ProductDetailParser;

use scraper::Html;
use tracing::debug;

/// Enhanced parser trait with context support
pub trait ContextualParser {
    type Output;
    type Context;

    /// Parse HTML with contextual information
    fn parse_with_context(&self, html: &Html, context: &Self::Context) -> ParsingResult<Self::Output>;
}

/// Validation trait for raw or parsed data
pub trait Validator<T: ?Sized> {
    fn validate(&self, data: &T) -> ParsingResult<()>;
}

/// Build a document tree in best-effort mode.
///
/// html5ever never rejects input: structural errors are collected on the tree
/// and dropped here, so malformed markup only degrades individual fields.
/// The input is already UTF-8, so charset declarations inside the markup are
/// not consulted.
pub fn parse_document(html: &str) -> Html {
    let mut document = Html::parse_document(html);
    if !document.errors.is_empty() {
        debug!(
            "Discarding {} markup errors from tolerant parse",
            document.errors.len()
        );
        document.errors.clear();
    }
    document
}
