//! Ozon product parser
//!
//! Fetches a single Ozon product page by SKU (or full URL) and extracts the
//! title, category breadcrumb, gallery images, description and the
//! characteristics table into a [`ProductRecord`].
//!
//! ```no_run
//! # async fn demo() -> anyhow::Result<()> {
//! use ozon_product_parser::{AppConfig, ParsingService};
//!
//! let service = ParsingService::from_config(&AppConfig::default())?;
//! let record = service.parse_by_sku("2102536131").await?;
//! println!("{}", serde_json::to_string_pretty(&record)?);
//! # Ok(()) }
//! ```

// Module declarations
pub mod application;
pub mod domain;
pub mod infrastructure;

// Re-export the public surface
pub use application::ParsingService;
pub use domain::{Characteristics, ProductRecord, Sku};
pub use infrastructure::{
    AppConfig, ConfigManager, HttpClient, HttpClientConfig, PageFetcher, ParsingConfig,
    ParsingError, ParsingResult,
};
