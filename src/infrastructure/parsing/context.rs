//! Parsing context for product detail extraction

/// Detail parsing context for product detail pages
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailParseContext {
    /// Product URL being parsed
    pub url: String,
}

impl DetailParseContext {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}
