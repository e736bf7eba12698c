use serde::{Deserialize, Serialize};
use std::fmt;

use super::constants::site;

/// Product identifier (Ozon SKU)
///
/// Opaque token: it is only ever substituted into the product URL template.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Sku(String);

impl Sku {
    /// Create a SKU, trimming surrounding whitespace. Returns `None` for an empty token.
    pub fn new(value: impl AsRef<str>) -> Option<Self> {
        let trimmed = value.as_ref().trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Build the product page URL from a template containing `{sku}`.
    ///
    /// The first placeholder is replaced verbatim; the SKU is not re-encoded.
    pub fn product_url(&self, template: &str) -> String {
        template.replacen(site::SKU_PLACEHOLDER, &self.0, 1)
    }

    /// Product page URL on the default Ozon template
    pub fn default_product_url(&self) -> String {
        self.product_url(site::PRODUCT_URL_TEMPLATE)
    }
}

impl AsRef<str> for Sku {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Sku {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
