//! HTTP page fetcher for product pages
//!
//! One GET per call with browser-like headers, redirects, transparent
//! decompression and a fresh on-disk cookie jar. Transport failures are
//! logged and reported as an absent body; HTTP status codes are not
//! interpreted here.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, CACHE_CONTROL, HeaderMap, HeaderValue, REFERER, UPGRADE_INSECURE_REQUESTS};
use reqwest::{Client, ClientBuilder};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

use crate::domain::constants::site;
use crate::infrastructure::config::defaults;
use crate::infrastructure::cookie_jar::TempCookieJar;

/// Source of raw product pages
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch `url` and return the response body, or `None` if no body could be obtained.
    async fn fetch_page(&self, url: &str) -> Option<String>;
}

/// Configuration for HTTP client behavior
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpClientConfig {
    /// Desktop browser user agent string
    pub user_agent: String,
    /// Request timeout in seconds, covering the whole redirect chain and body
    pub timeout_seconds: u64,
    /// Maximum number of redirects to follow
    pub max_redirects: usize,
    /// Skip TLS certificate verification.
    ///
    /// On by default. Disables authenticity checks; a warning is logged when
    /// the client is created.
    pub accept_invalid_certs: bool,
    pub referer: String,
    pub accept: String,
    pub accept_language: String,
    /// Directory for cookie jar files; the system temp directory when unset
    pub cookie_dir: Option<PathBuf>,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::USER_AGENT.to_string(),
            timeout_seconds: defaults::REQUEST_TIMEOUT_SECONDS,
            max_redirects: defaults::MAX_REDIRECTS,
            accept_invalid_certs: true,
            referer: site::BASE_URL.to_string(),
            accept: defaults::ACCEPT.to_string(),
            accept_language: defaults::ACCEPT_LANGUAGE.to_string(),
            cookie_dir: None,
        }
    }
}

/// Page fetcher building a fresh client and cookie jar per request
#[derive(Debug, Clone)]
pub struct HttpClient {
    config: HttpClientConfig,
    headers: HeaderMap,
}

impl HttpClient {
    /// Create a new HTTP client, validating the configured header values
    pub fn new(config: HttpClientConfig) -> Result<Self> {
        let headers = Self::build_headers(&config)?;
        if config.accept_invalid_certs {
            warn!("⚠️ TLS certificate verification is disabled for page fetches");
        }
        Ok(Self { config, headers })
    }

    pub fn config(&self) -> &HttpClientConfig {
        &self.config
    }

    /// Browser-like request headers sent with every fetch.
    ///
    /// `Accept-Encoding` is left to reqwest, which decompresses the bodies it
    /// advertised.
    fn build_headers(config: &HttpClientConfig) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_str(&config.accept).context("Invalid Accept header")?,
        );
        headers.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_str(&config.accept_language).context("Invalid Accept-Language header")?,
        );
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("max-age=0"));
        headers.insert(UPGRADE_INSECURE_REQUESTS, HeaderValue::from_static("1"));
        headers.insert(
            REFERER,
            HeaderValue::from_str(&config.referer).context("Invalid Referer header")?,
        );
        HeaderValue::from_str(&config.user_agent).context("Invalid user agent")?;
        Ok(headers)
    }

    fn build_client(&self, jar: Arc<TempCookieJar>) -> reqwest::Result<Client> {
        ClientBuilder::new()
            .timeout(Duration::from_secs(self.config.timeout_seconds))
            .user_agent(&self.config.user_agent)
            .default_headers(self.headers.clone())
            .cookie_provider(jar)
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .redirect(reqwest::redirect::Policy::limited(self.config.max_redirects))
            .danger_accept_invalid_certs(self.config.accept_invalid_certs)
            .build()
    }

    fn create_jar(&self) -> std::io::Result<TempCookieJar> {
        match &self.config.cookie_dir {
            Some(dir) => TempCookieJar::create_in(dir),
            None => TempCookieJar::create(),
        }
    }

    async fn fetch_with_jar(&self, url: &str, jar: Arc<TempCookieJar>) -> Option<String> {
        let client = match self.build_client(jar) {
            Ok(client) => client,
            Err(e) => {
                error!("Failed to create HTTP client: {}", e);
                return None;
            }
        };

        info!("Fetching URL: {}", url);

        let response = match client.get(url).send().await {
            Ok(response) => response,
            Err(e) => {
                error!("HTTP transport error ({}) for {}: {}", transport_error_kind(&e), url, e);
                return None;
            }
        };

        let status = response.status();
        let final_url = response.url().to_string();
        if !status.is_success() {
            warn!("HTTP status {} from {}, returning body anyway", status, final_url);
        }

        let bytes = match response.bytes().await {
            Ok(bytes) => bytes,
            Err(e) => {
                error!("Failed to read response body ({}) from {}: {}", transport_error_kind(&e), final_url, e);
                return None;
            }
        };

        // Always UTF-8, whatever charset the response declares
        let body = String::from_utf8_lossy(&bytes).into_owned();
        debug!("Fetched {} ({}, {} chars)", final_url, status, body.len());
        Some(body)
    }
}

#[async_trait]
impl PageFetcher for HttpClient {
    async fn fetch_page(&self, url: &str) -> Option<String> {
        let jar = match self.create_jar() {
            Ok(jar) => Arc::new(jar),
            Err(e) => {
                error!("Failed to create cookie jar for {}: {}", url, e);
                return None;
            }
        };

        let body = self.fetch_with_jar(url, Arc::clone(&jar)).await;
        debug!("Cookie jar recorded {} cookies", jar.stored_cookies());
        jar.release();
        body
    }
}

/// Short label for the transport failure class, used in diagnostics
fn transport_error_kind(error: &reqwest::Error) -> &'static str {
    if error.is_timeout() {
        "timeout"
    } else if error.is_connect() {
        "connect"
    } else if error.is_redirect() {
        "redirect"
    } else if error.is_decode() {
        "decode"
    } else if error.is_body() {
        "body"
    } else if error.is_builder() {
        "builder"
    } else if error.is_request() {
        "request"
    } else {
        "other"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_client_creation() {
        let client = HttpClient::new(HttpClientConfig::default());
        assert!(client.is_ok());
    }

    #[test]
    fn default_headers_mimic_a_browser() {
        let client = HttpClient::new(HttpClientConfig::default()).unwrap();
        assert_eq!(client.headers[REFERER], "https://www.ozon.ru/");
        assert_eq!(client.headers[UPGRADE_INSECURE_REQUESTS], "1");
        assert!(client.headers[ACCEPT_LANGUAGE].to_str().unwrap().starts_with("ru-RU"));
        assert_eq!(client.config().timeout_seconds, 30);
    }

    #[test]
    fn rejects_invalid_header_values() {
        let config = HttpClientConfig {
            user_agent: "bad\nagent".to_string(),
            ..HttpClientConfig::default()
        };
        assert!(HttpClient::new(config).is_err());
    }

    #[tokio::test]
    async fn unreachable_host_yields_no_body() {
        let dir = tempfile::tempdir().unwrap();
        let client = HttpClient::new(HttpClientConfig {
            timeout_seconds: 5,
            cookie_dir: Some(dir.path().to_path_buf()),
            ..HttpClientConfig::default()
        })
        .unwrap();

        assert_eq!(client.fetch_page("http://127.0.0.1:1/product/1/").await, None);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
