//! Blocking page detection
//!
//! Ozon answers automated clients with a normal-looking 200 page that only
//! differs by its copy, so detection is a literal phrase search over the raw
//! body rather than a status code check.

use super::context::DetailParseContext;
use super::{ParsingError, ParsingResult, Validator};
use tracing::warn;

/// Rejects bodies containing any configured blocking marker
#[derive(Debug, Clone)]
pub struct BlockingPageValidator {
    markers: Vec<String>,
}

impl BlockingPageValidator {
    /// Create a validator from a marker list. Empty markers are ignored.
    pub fn new(markers: &[String]) -> Self {
        Self {
            markers: markers
                .iter()
                .filter(|marker| !marker.is_empty())
                .cloned()
                .collect(),
        }
    }

    /// First marker found in `body`, in configuration order
    pub fn find_marker(&self, body: &str) -> Option<&str> {
        self.markers
            .iter()
            .find(|marker| body.contains(marker.as_str()))
            .map(String::as_str)
    }

    pub fn markers(&self) -> &[String] {
        &self.markers
    }
}

/// A raw page body together with the URL it was fetched from
pub struct RawPage<'a> {
    pub body: &'a str,
    pub context: &'a DetailParseContext,
}

impl Validator<RawPage<'_>> for BlockingPageValidator {
    fn validate(&self, page: &RawPage<'_>) -> ParsingResult<()> {
        match self.find_marker(page.body) {
            Some(marker) => {
                warn!(
                    "🛑 Blocking page detected for {} (marker: '{}')",
                    page.context.url, marker
                );
                Err(ParsingError::page_blocked(&page.context.url, marker))
            }
            None => Ok(()),
        }
    }
}
