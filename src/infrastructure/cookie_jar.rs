//! Per-fetch cookie jar backed by a temporary file
//!
//! Ozon sets anti-bot cookies on the first hop of a redirect chain and
//! expects them back on the next hop. Each fetch gets its own jar: a uniquely
//! named `ozon_cookies_*.txt` file in the temp directory that records every
//! `Set-Cookie` it sees, plus an in-memory [`Jar`] that answers lookups.
//! The file is removed by [`TempCookieJar::release`] or on drop.

use reqwest::cookie::{CookieStore, Jar};
use reqwest::header::HeaderValue;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use tempfile::NamedTempFile;
use tracing::{debug, warn};
use url::Url;

const FILE_PREFIX: &str = "ozon_cookies_";
const FILE_SUFFIX: &str = ".txt";

pub struct TempCookieJar {
    jar: Jar,
    file: Mutex<Option<NamedTempFile>>,
    path: PathBuf,
    stored: AtomicUsize,
}

impl TempCookieJar {
    /// Create a jar file in the system temp directory
    pub fn create() -> std::io::Result<Self> {
        Self::create_in(std::env::temp_dir())
    }

    /// Create a jar file in `dir`
    pub fn create_in(dir: impl AsRef<Path>) -> std::io::Result<Self> {
        let file = tempfile::Builder::new()
            .prefix(FILE_PREFIX)
            .suffix(FILE_SUFFIX)
            .tempfile_in(dir)?;
        let path = file.path().to_path_buf();
        debug!("Created cookie jar: {}", path.display());

        Ok(Self {
            jar: Jar::default(),
            file: Mutex::new(Some(file)),
            path,
            stored: AtomicUsize::new(0),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of `Set-Cookie` headers recorded so far
    pub fn stored_cookies(&self) -> usize {
        self.stored.load(Ordering::Relaxed)
    }

    /// Delete the jar file. Later cookies are kept in memory only.
    pub fn release(&self) {
        let file = match self.file.lock() {
            Ok(mut guard) => guard.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };

        if let Some(file) = file {
            match file.close() {
                Ok(()) => debug!("Removed cookie jar: {}", self.path.display()),
                Err(e) => warn!("Failed to remove cookie jar {}: {}", self.path.display(), e),
            }
        }
    }

    fn record(&self, headers: &[&HeaderValue], url: &Url) {
        let Ok(mut guard) = self.file.lock() else {
            warn!("Cookie jar lock poisoned, not recording cookies for {}", url);
            return;
        };
        let Some(file) = guard.as_mut() else {
            return;
        };

        for header in headers {
            let line = String::from_utf8_lossy(header.as_bytes());
            if let Err(e) = writeln!(file, "{url}\t{line}") {
                warn!("Failed to write cookie jar {}: {}", self.path.display(), e);
                return;
            }
            self.stored.fetch_add(1, Ordering::Relaxed);
        }
        if let Err(e) = file.flush() {
            warn!("Failed to flush cookie jar {}: {}", self.path.display(), e);
        }
    }
}

impl CookieStore for TempCookieJar {
    fn set_cookies(&self, cookie_headers: &mut dyn Iterator<Item = &HeaderValue>, url: &Url) {
        let headers: Vec<&HeaderValue> = cookie_headers.collect();
        if headers.is_empty() {
            return;
        }
        self.record(&headers, url);

        let mut headers = headers.into_iter();
        self.jar.set_cookies(&mut headers, url);
    }

    fn cookies(&self, url: &Url) -> Option<HeaderValue> {
        self.jar.cookies(url)
    }
}

impl Drop for TempCookieJar {
    fn drop(&mut self) {
        self.release();
    }
}
