use respcache::{CachedResponse, ResponseCache};
use tracing::{debug, warn};

use crate::error::FetchError;

pub(crate) fn http_client() -> anyhow::Result<reqwest::blocking::Client> {
    reqwest::blocking::Client::builder()
        .user_agent(format!("podscrape/{}", env!("CARGO_PKG_VERSION")))
        .timeout(std::time::Duration::from_secs(30))
        .build()
        .map_err(|e| anyhow::anyhow!("failed to build HTTP client: {}", e))
}

/// A fetched page, whatever its status.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub status: u16,
    pub reason: String,
    pub body: String,
}

impl Page {
    pub fn is_ok(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Status code and reason phrase, e.g. `503 Service Unavailable`.
    pub fn report(&self) -> String {
        if self.reason.is_empty() {
            self.status.to_string()
        } else {
            format!("{} {}", self.status, self.reason)
        }
    }
}

pub struct PageFetcher {
    client: reqwest::blocking::Client,
    cache: Option<ResponseCache>,
}

impl PageFetcher {
    pub fn new(client: reqwest::blocking::Client, cache: Option<ResponseCache>) -> Self {
        Self { client, cache }
    }

    fn cached(&self, url: &str) -> Option<Page> {
        let cache = self.cache.as_ref()?;
        match cache.get(url) {
            Ok(Some(entry)) => {
                debug!(url, fetched_at = %entry.fetched_at, "serving page from cache");
                Some(Page {
                    status: entry.status,
                    reason: entry.reason,
                    body: entry.body,
                })
            }
            Ok(None) => None,
            Err(e) => {
                warn!(dir = %cache.dir().display(), "cache lookup failed: {e:#}");
                None
            }
        }
    }

    fn store(&self, url: &str, page: &Page) {
        let Some(cache) = &self.cache else {
            return;
        };
        if !page.is_ok() {
            return;
        }
        if let Err(e) = cache.put(&CachedResponse::new(url, page.status, &page.reason, &page.body)) {
            warn!(dir = %cache.dir().display(), "cache store failed: {e:#}");
        }
    }

    /// One GET, served from the cache when possible. Any status is returned.
    pub fn fetch(&self, url: &str) -> Result<Page, FetchError> {
        if let Some(page) = self.cached(url) {
            return Ok(page);
        }

        let request_err = |source| FetchError::Request {
            url: url.to_string(),
            source,
        };
        let response = self.client.get(url).send().map_err(request_err)?;
        let status = response.status();
        let body = response.text().map_err(request_err)?;
        let page = Page {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or_default().to_string(),
            body,
        };
        debug!(url, status = page.status, bytes = page.body.len(), "fetched page");

        self.store(url, &page);
        Ok(page)
    }

    /// Like [`PageFetcher::fetch`], but a non-2xx status is an error.
    pub fn fetch_ok(&self, url: &str) -> Result<Page, FetchError> {
        let page = self.fetch(url)?;
        if !page.is_ok() {
            return Err(FetchError::Status {
                url: url.to_string(),
                report: page.report(),
            });
        }
        Ok(page)
    }
}
