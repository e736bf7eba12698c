//! Parsing error types for the product page pipeline
//!
//! Only `FetchFailed` and `PageBlocked` can happen at runtime; the remaining
//! variants are raised while building a parser from configuration.
//! Missing page fields are not errors.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParsingError {
    #[error("Failed to load page: {url}. The request was probably blocked by Ozon")]
    FetchFailed { url: String },

    #[error("Ozon blocking page detected at {url} (marker: '{marker}'). A captcha or a different IP may be required")]
    PageBlocked { url: String, marker: String },

    #[error("Invalid CSS selector: {selector} - {reason}")]
    InvalidSelector { selector: String, reason: String },

    #[error("Invalid pattern: {pattern} - {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("Configuration error: {message}")]
    ConfigurationError { message: String, field: String },
}

impl ParsingError {
    pub fn fetch_failed(url: &str) -> Self {
        Self::FetchFailed {
            url: url.to_string(),
        }
    }

    pub fn page_blocked(url: &str, marker: &str) -> Self {
        Self::PageBlocked {
            url: url.to_string(),
            marker: marker.to_string(),
        }
    }

    pub fn invalid_selector(selector: &str, reason: impl ToString) -> Self {
        Self::InvalidSelector {
            selector: selector.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn configuration(field: &str, message: impl ToString) -> Self {
        Self::ConfigurationError {
            message: message.to_string(),
            field: field.to_string(),
        }
    }

    /// URL the failure is about, for runtime errors
    pub fn url(&self) -> Option<&str> {
        match self {
            Self::FetchFailed { url } | Self::PageBlocked { url, .. } => Some(url),
            _ => None,
        }
    }

    /// Check if trying again later could succeed
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::FetchFailed { .. } | Self::PageBlocked { .. } => true,
            Self::InvalidSelector { .. }
            | Self::InvalidPattern { .. }
            | Self::ConfigurationError { .. } => false,
        }
    }

    /// Advice shown to the caller; the pipeline never retries on its own
    pub fn retry_hint(&self) -> Option<&'static str> {
        match self {
            Self::FetchFailed { .. } => Some("check connectivity and try again"),
            Self::PageBlocked { .. } => Some("retry later or change network identity (IP)"),
            _ => None,
        }
    }
}

pub type ParsingResult<T> = Result<T, ParsingError>;
