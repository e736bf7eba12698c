//! Parsing service: the fetch → validate → parse pipeline
//!
//! High-level service turning a product identifier or URL into a
//! [`ProductRecord`]. Fetching and blocking-page detection fail fast;
//! field extraction degrades field by field.

use crate::domain::product::ProductRecord;
use crate::domain::product_url::Sku;
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::http_client::{HttpClient, PageFetcher};
use crate::infrastructure::parsing::{
    BlockingPageValidator, ContextualParser, DetailParseContext, ParsingError, ParsingResult,
    ProductDetailParser, RawPage, Validator, parse_document,
};
use crate::domain::constants::site;
use anyhow::Context;
use tracing::{debug, info, warn};

/// High-level parsing service that coordinates fetching and parsing
pub struct ParsingService<F: PageFetcher> {
    fetcher: F,
    detail_parser: ProductDetailParser,
    validator: BlockingPageValidator,
    product_url_template: String,
}

impl ParsingService<HttpClient> {
    /// Service fetching pages over HTTP
    pub fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        let fetcher =
            HttpClient::new(config.http.clone()).context("Failed to create HTTP client")?;
        Self::with_fetcher(fetcher, config).context("Failed to create parsing service")
    }
}

impl<F: PageFetcher> ParsingService<F> {
    /// Create a service over any page source
    pub fn with_fetcher(fetcher: F, config: &AppConfig) -> ParsingResult<Self> {
        let template = &config.site.product_url_template;
        if !template.contains(site::SKU_PLACEHOLDER) {
            return Err(ParsingError::configuration(
                "site.product_url_template",
                format!("template must contain {}: {}", site::SKU_PLACEHOLDER, template),
            ));
        }

        Ok(Self {
            fetcher,
            detail_parser: ProductDetailParser::with_config(&config.parsing)?,
            validator: BlockingPageValidator::new(&config.parsing.blocking_markers),
            product_url_template: template.clone(),
        })
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Product page URL for an identifier
    pub fn product_url(&self, sku: &Sku) -> String {
        sku.product_url(&self.product_url_template)
    }

    /// Fetch and parse the product page of `sku`
    pub async fn parse_by_sku(&self, sku: &str) -> ParsingResult<ProductRecord> {
        let sku = Sku::new(sku)
            .ok_or_else(|| ParsingError::configuration("sku", "product identifier is empty"))?;
        let url = self.product_url(&sku);
        debug!("SKU {} -> {}", sku, url);
        self.parse_product_page(&url).await
    }

    /// Fetch and parse a product page by full URL
    pub async fn parse_product_page(&self, url: &str) -> ParsingResult<ProductRecord> {
        info!("Parsing product page: {}", url);

        let Some(html) = self.fetcher.fetch_page(url).await.filter(|body| !body.is_empty()) else {
            warn!("No page content received from {}", url);
            return Err(ParsingError::fetch_failed(url));
        };

        self.parse_html(&html, url)
    }

    /// Parse an already fetched page body; `url` is used for context only
    pub fn parse_html(&self, html: &str, url: &str) -> ParsingResult<ProductRecord> {
        let context = DetailParseContext::new(url);
        self.validator.validate(&RawPage {
            body: html,
            context: &context,
        })?;

        let document = parse_document(html);
        let record = self.detail_parser.parse_with_context(&document, &context)?;

        info!(
            "Successfully parsed product: {}",
            record.name.as_deref().unwrap_or("Unknown")
        );
        Ok(record)
    }
}
