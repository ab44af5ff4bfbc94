use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// A response as stored on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedResponse {
    pub url: String,
    pub status: u16,
    #[serde(default)]
    pub reason: String,
    pub body: String,
    pub fetched_at: DateTime<Utc>,
}

impl CachedResponse {
    pub fn new(url: &str, status: u16, reason: &str, body: &str) -> Self {
        Self {
            url: url.to_string(),
            status,
            reason: reason.to_string(),
            body: body.to_string(),
            fetched_at: Utc::now(),
        }
    }
}

pub fn cache_key(url: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(url.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// One JSON file per URL, named after the SHA-256 of the URL.
pub struct ResponseCache {
    dir: PathBuf,
    max_age: Option<Duration>,
}

impl ResponseCache {
    pub fn open(dir: &Path) -> anyhow::Result<Self> {
        fs::create_dir_all(dir)
            .map_err(|e| anyhow::anyhow!("failed to create cache directory {}: {}", dir.display(), e))?;
        Ok(Self {
            dir: dir.to_path_buf(),
            max_age: None,
        })
    }

    /// Entries older than `max_age` are treated as misses.
    pub fn with_max_age(mut self, max_age: Duration) -> Self {
        self.max_age = Some(max_age);
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn entry_path(&self, url: &str) -> PathBuf {
        self.dir.join(format!("{}.json", cache_key(url)))
    }

    /// Look up a stored response. Unparseable or stale entries count as misses.
    pub fn get(&self, url: &str) -> anyhow::Result<Option<CachedResponse>> {
        let path = self.entry_path(url);
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(anyhow::anyhow!("failed to read {}: {}", path.display(), e)),
        };
        let Ok(entry) = serde_json::from_str::<CachedResponse>(&raw) else {
            return Ok(None);
        };
        // Guard against hash collisions and hand-edited entries.
        if entry.url != url {
            return Ok(None);
        }
        if let Some(max_age) = self.max_age
            && Utc::now() - entry.fetched_at > max_age
        {
            return Ok(None);
        }
        Ok(Some(entry))
    }

    pub fn put(&self, response: &CachedResponse) -> anyhow::Result<()> {
        let path = self.entry_path(&response.url);
        let json = serde_json::to_string(response)?;
        fs::write(&path, json)
            .map_err(|e| anyhow::anyhow!("failed to write {}: {}", path.display(), e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use tempfile::TempDir;

    const URL: &str = "https://example.com/podcast/?limit=250&offset=0";

    #[test]
    fn test_get_missing_entry() {
        let dir = TempDir::new().unwrap();
        let cache = ResponseCache::open(dir.path()).unwrap();
        assert_eq!(cache.get(URL).unwrap(), None);
    }

    #[test]
    fn test_put_then_get() {
        let dir = TempDir::new().unwrap();
        let cache = ResponseCache::open(dir.path()).unwrap();
        let response = CachedResponse::new(URL, 200, "OK", "<html></html>");
        cache.put(&response).unwrap();

        assert_eq!(cache.get(URL).unwrap(), Some(response));
    }

    #[test]
    fn test_entries_are_keyed_by_url() {
        let dir = TempDir::new().unwrap();
        let cache = ResponseCache::open(dir.path()).unwrap();
        cache
            .put(&CachedResponse::new(URL, 200, "OK", "first"))
            .unwrap();

        assert_eq!(cache.get("https://example.com/other").unwrap(), None);
        assert!(dir.path().join(format!("{}.json", cache_key(URL))).exists());
    }

    #[test]
    fn test_open_creates_directory() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("a").join("b");
        let cache = ResponseCache::open(&nested).unwrap();
        assert!(nested.is_dir());
        assert_eq!(cache.dir(), nested.as_path());
    }

    #[test]
    fn test_corrupt_entry_is_a_miss() {
        let dir = TempDir::new().unwrap();
        let cache = ResponseCache::open(dir.path()).unwrap();
        fs::write(dir.path().join(format!("{}.json", cache_key(URL))), "{not json").unwrap();

        assert_eq!(cache.get(URL).unwrap(), None);
    }

    #[test]
    fn test_mismatched_url_is_a_miss() {
        let dir = TempDir::new().unwrap();
        let cache = ResponseCache::open(dir.path()).unwrap();
        let response = CachedResponse::new("https://example.com/elsewhere", 200, "OK", "body");
        let json = serde_json::to_string(&response).unwrap();
        fs::write(dir.path().join(format!("{}.json", cache_key(URL))), json).unwrap();

        assert_eq!(cache.get(URL).unwrap(), None);
    }

    #[rstest]
    #[case(Duration::hours(1), Duration::minutes(5), true)]
    #[case(Duration::hours(1), Duration::hours(2), false)]
    fn test_max_age(#[case] max_age: Duration, #[case] age: Duration, #[case] hit: bool) {
        let dir = TempDir::new().unwrap();
        let cache = ResponseCache::open(dir.path()).unwrap().with_max_age(max_age);
        let mut response = CachedResponse::new(URL, 200, "OK", "body");
        response.fetched_at = Utc::now() - age;
        cache.put(&response).unwrap();

        assert_eq!(cache.get(URL).unwrap().is_some(), hit);
    }

    #[test]
    fn test_cache_key_is_stable_hex() {
        let key = cache_key(URL);
        assert_eq!(key.len(), 64);
        assert!(key.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(key, cache_key(URL));
        assert_ne!(key, cache_key("https://example.com/"));
    }
}
