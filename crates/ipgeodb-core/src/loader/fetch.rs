// crates/ipgeodb-core/src/loader/fetch.rs
#![cfg(feature = "builder")]

use crate::error::{IpDbError, Result};
use reqwest::blocking::Client;
use reqwest::header::LOCATION;
use reqwest::redirect::Policy;
use reqwest::{StatusCode, Url};
use std::net::{IpAddr, Ipv4Addr};
use std::path::Path;
use std::time::{Duration, Instant};

/// Where the ingestion pipeline gets its delegated-stats text from.
///
/// The seam exists so builds can run against mirrors, local files or
/// in-memory fixtures without touching the network.
pub trait Fetch {
    fn fetch(&self, source: &str) -> Result<String>;
}

/// Retry, timeout and redirect policy of [`HttpFetcher`].
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Total attempts per source, including the first one.
    pub attempts: u32,
    /// Attempt `n` failing waits `retry_delay * n` before the next one.
    pub retry_delay: Duration,
    /// Per-attempt timeout. One deadline covers every redirect hop of the
    /// attempt, from the first connect to the end of the final body.
    pub timeout: Duration,
    /// 301/302 hops followed within a single attempt.
    pub max_redirects: usize,
    /// Only connect over IPv4.
    pub ipv4_only: bool,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            attempts: 3,
            retry_delay: Duration::from_millis(1000),
            timeout: Duration::from_secs(10),
            max_redirects: 5,
            ipv4_only: true,
        }
    }
}

/// Blocking HTTP(S) fetcher with retries and manual redirect handling.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    config: FetchConfig,
}

impl HttpFetcher {
    pub fn new(config: FetchConfig) -> Result<Self> {
        let mut builder = Client::builder()
            .timeout(config.timeout)
            // Redirects are followed by hand so the hop limit and the
            // Location resolution stay under our control.
            .redirect(Policy::none())
            .user_agent(concat!("ipgeodb/", env!("CARGO_PKG_VERSION")));
        if config.ipv4_only {
            builder = builder.local_address(IpAddr::V4(Ipv4Addr::UNSPECIFIED));
        }
        Ok(Self {
            client: builder.build()?,
            config,
        })
    }

    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    /// One attempt: request, follow up to `max_redirects` 301/302 hops, and
    /// read the body of the final 2xx response.
    fn attempt(&self, url: &str) -> Result<String> {
        let mut current =
            Url::parse(url).map_err(|e| IpDbError::Redirect(format!("invalid URL {url}: {e}")))?;
        let mut hops = 0usize;
        let deadline = Instant::now() + self.config.timeout;

        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Err(IpDbError::Timeout(format!(
                    "{url} not fetched within {:?}",
                    self.config.timeout
                )));
            }
            let response = self
                .client
                .get(current.clone())
                .timeout(remaining)
                .send()?;
            let status = response.status();

            if status == StatusCode::MOVED_PERMANENTLY || status == StatusCode::FOUND {
                let location = response
                    .headers()
                    .get(LOCATION)
                    .and_then(|v| v.to_str().ok())
                    .ok_or_else(|| {
                        IpDbError::Redirect(format!(
                            "Redirect ({}) without Location header",
                            status.as_u16()
                        ))
                    })?;
                if hops >= self.config.max_redirects {
                    return Err(IpDbError::Redirect(format!(
                        "Max redirects ({}) exceeded",
                        self.config.max_redirects
                    )));
                }
                let next = current.join(location).map_err(|e| {
                    IpDbError::Redirect(format!("bad Location \"{location}\": {e}"))
                })?;
                log::debug!("{current} redirected ({}) to {next}", status.as_u16());
                current = next;
                hops += 1;
                continue;
            }

            if !status.is_success() {
                return Err(IpDbError::HttpStatus(status.as_u16()));
            }
            return Ok(response.text()?);
        }
    }
}

impl Fetch for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<String> {
        let attempts = self.config.attempts.max(1);
        let mut attempt = 1;
        loop {
            match self.attempt(url) {
                Ok(body) => return Ok(body),
                Err(e) if attempt >= attempts => {
                    return Err(IpDbError::FetchFailed {
                        url: url.to_string(),
                        attempts,
                        source: Box::new(e),
                    });
                }
                Err(e) => {
                    let delay = self.config.retry_delay * attempt;
                    log::warn!(
                        "Fetching {url} failed (attempt {attempt}/{attempts}): {e}; retrying in {delay:?}"
                    );
                    std::thread::sleep(delay);
                    attempt += 1;
                }
            }
        }
    }
}

/// Fetches `http(s)://` sources over the network and reads anything else
/// (optionally `file://`-prefixed) from the local filesystem.
#[derive(Debug, Clone)]
pub struct DefaultFetcher {
    http: HttpFetcher,
}

impl DefaultFetcher {
    pub fn new(config: FetchConfig) -> Result<Self> {
        Ok(Self {
            http: HttpFetcher::new(config)?,
        })
    }
}

impl Fetch for DefaultFetcher {
    fn fetch(&self, source: &str) -> Result<String> {
        if source.starts_with("http://") || source.starts_with("https://") {
            return self.http.fetch(source);
        }
        let path = Path::new(source.strip_prefix("file://").unwrap_or(source));
        std::fs::read_to_string(path).map_err(|e| {
            IpDbError::NotFound(format!("Source not found at {}: {}", path.display(), e))
        })
    }
}
