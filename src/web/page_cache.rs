//! Rendered page cache.
//!
//! Published pages are served from memory for a configurable TTL, then
//! re-rendered from the content repository on the next request. A zero TTL
//! disables caching. Preview sessions never read or write the cache.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};
use std::time::{Duration, Instant};

use tracing::debug;

#[derive(Debug, Clone)]
struct CachedPage {
    html: String,
    cached_at: Instant,
}

impl CachedPage {
    fn is_valid(&self, ttl: Duration) -> bool {
        self.cached_at.elapsed() < ttl
    }
}

/// Path-keyed HTML cache with TTL.
#[derive(Debug)]
pub struct PageCache {
    pages: RwLock<HashMap<String, CachedPage>>,
    ttl: Duration,
}

impl PageCache {
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            pages: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        !self.ttl.is_zero()
    }

    /// Cached HTML for `path`, if present and fresh.
    #[must_use]
    pub fn get(&self, path: &str) -> Option<String> {
        if !self.is_enabled() {
            return None;
        }
        let pages = self.pages.read().unwrap_or_else(PoisonError::into_inner);
        let page = pages.get(path).filter(|p| p.is_valid(self.ttl))?;
        debug!(path, "Serving cached page");
        Some(page.html.clone())
    }

    pub fn insert(&self, path: &str, html: String) {
        if !self.is_enabled() {
            return;
        }
        let mut pages = self.pages.write().unwrap_or_else(PoisonError::into_inner);
        pages.retain(|_, p| p.is_valid(self.ttl));
        pages.insert(
            path.to_string(),
            CachedPage {
                html,
                cached_at: Instant::now(),
            },
        );
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pages
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_validity() {
        let page = CachedPage {
            html: String::new(),
            cached_at: Instant::now(),
        };
        assert!(page.is_valid(Duration::from_secs(60)));

        let old_page = CachedPage {
            html: String::new(),
            cached_at: Instant::now() - Duration::from_secs(120),
        };
        assert!(!old_page.is_valid(Duration::from_secs(60)));
    }

    #[test]
    fn test_insert_and_get() {
        let cache = PageCache::new(Duration::from_secs(60));
        assert!(cache.get("/").is_none());

        cache.insert("/", "<html>home</html>".to_string());
        assert_eq!(cache.get("/").as_deref(), Some("<html>home</html>"));
        assert!(cache.get("/post/a").is_none());
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_disabled_cache_stores_nothing() {
        let cache = PageCache::new(Duration::ZERO);
        assert!(!cache.is_enabled());
        cache.insert("/", "<html></html>".to_string());
        assert!(cache.is_empty());
        assert!(cache.get("/").is_none());
    }

    #[test]
    fn test_expired_entries_are_not_served() {
        let cache = PageCache::new(Duration::from_secs(60));
        cache.pages.write().unwrap().insert(
            "/".to_string(),
            CachedPage {
                html: "stale".to_string(),
                cached_at: Instant::now() - Duration::from_secs(120),
            },
        );
        assert!(cache.get("/").is_none());

        // Expired entries are swept on the next insert.
        cache.insert("/post/a", "fresh".to_string());
        assert_eq!(cache.len(), 1);
    }
}
