//! Infrastructure layer for fetching, parsing, configuration and logging
//!
//! Everything that touches the network, the filesystem or raw markup lives
//! here; the application layer only composes these pieces.

pub mod config; // Configuration and config file manager
pub mod cookie_jar; // Per-fetch temporary cookie store
pub mod http_client; // Page fetcher
pub mod logging; // Logging infrastructure
pub mod parsing; // Product page parsing
pub mod parsing_error; // Error types

// Re-export commonly used items
pub use config::{AppConfig, ConfigManager, ConfigSource, LoggingConfig, SiteConfig};
pub use cookie_jar::TempCookieJar;
pub use http_client::{HttpClient, HttpClientConfig, PageFetcher};
pub use logging::{get_log_directory, init_logging, init_logging_with_config};
pub use parsing::{ParsingConfig, ParsingError, ParsingResult, ProductDetailParser};
