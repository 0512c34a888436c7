//! Client for the Prismic content repository REST API.
//!
//! Documents are read through the search endpoint. Every query runs against
//! a content snapshot ("ref"): the master ref for published content, or a
//! preview token when a preview session is active.

mod query;
mod types;

use std::fmt;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::config::Config;

pub use query::{orderings_param, predicates_param, Direction, Ordering, Predicate, QueryOptions};
pub use types::{Document, SearchResponse};

use types::ApiRoot;

const USER_AGENT: &str = concat!("prismic-blog/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("content store request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("content store returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("failed to decode content store response: {0}")]
    Decode(#[source] serde_json::Error),
    #[error("invalid content store url: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("content store has no master ref")]
    NoMasterRef,
    #[error("cursor does not point at the content store: {0}")]
    ForeignCursor(String),
}

/// Read access to the content repository.
///
/// `query` and `fetch_page` are the primitives; single-document lookups are
/// expressed in terms of `query`.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Current ref of published content.
    async fn master_ref(&self) -> Result<String, StoreError>;

    /// The ref a request should read: the preview ref when one is active,
    /// otherwise the master ref. Resolving once and passing the result to
    /// every query keeps a page on a single snapshot.
    async fn content_ref(&self, preview: Option<&str>) -> Result<String, StoreError> {
        match preview {
            Some(reference) => Ok(reference.to_string()),
            None => self.master_ref().await,
        }
    }

    /// Run a predicate query.
    async fn query(
        &self,
        predicates: &[Predicate],
        options: &QueryOptions,
    ) -> Result<SearchResponse, StoreError>;

    /// Follow a `next_page` URL exactly as the store issued it.
    async fn fetch_page(&self, url: &str) -> Result<SearchResponse, StoreError>;

    /// Whether `url` addresses this store (same scheme, host and port).
    fn owns_url(&self, url: &str) -> bool;

    /// Fetch a single document of `doc_type` by its UID.
    async fn get_by_uid(
        &self,
        doc_type: &str,
        uid: &str,
        reference: Option<&str>,
    ) -> Result<Option<Document>, StoreError> {
        let options = QueryOptions::new().page_size(1).reference(reference);
        let response = self
            .query(
                &[Predicate::document_type(doc_type), Predicate::uid(doc_type, uid)],
                &options,
            )
            .await?;
        Ok(response.results.into_iter().next())
    }

    /// Fetch a single document by its store identifier.
    async fn get_by_id(
        &self,
        id: &str,
        reference: Option<&str>,
    ) -> Result<Option<Document>, StoreError> {
        let options = QueryOptions::new().page_size(1).reference(reference);
        let response = self.query(&[Predicate::document_id(id)], &options).await?;
        Ok(response.results.into_iter().next())
    }
}

/// HTTP client for a Prismic repository.
#[derive(Clone)]
pub struct PrismicClient {
    http: reqwest::Client,
    endpoint: Url,
    access_token: Option<String>,
}

impl fmt::Debug for PrismicClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrismicClient")
            .field("endpoint", &self.endpoint.as_str())
            .field("access_token", &self.access_token.as_ref().map(|_| "<redacted>"))
            .finish_non_exhaustive()
    }
}

impl PrismicClient {
    /// Create a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint is not a valid URL or the HTTP client
    /// cannot be built.
    pub fn new(config: &Config) -> Result<Self, StoreError> {
        let endpoint = Url::parse(config.api_endpoint.trim_end_matches('/'))?;
        let http = reqwest::Client::builder()
            .timeout(config.store_timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            http,
            endpoint,
            access_token: config.access_token.clone(),
        })
    }

    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn search_url(&self) -> Result<Url, StoreError> {
        let base = self.endpoint.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{base}/documents/search"))?)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, StoreError> {
        debug!(url = %redact_token(&url), "Requesting content store");

        let response = self.http.get(url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown".to_string());
            return Err(StoreError::Status { status, body });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(StoreError::Decode)
    }
}

#[async_trait]
impl ContentStore for PrismicClient {
    async fn master_ref(&self) -> Result<String, StoreError> {
        let mut url = self.endpoint.clone();
        if let Some(ref token) = self.access_token {
            url.query_pairs_mut().append_pair("access_token", token);
        }
        let root: ApiRoot = self.get_json(url).await?;
        root.master_ref()
            .map(String::from)
            .ok_or(StoreError::NoMasterRef)
    }

    async fn query(
        &self,
        predicates: &[Predicate],
        options: &QueryOptions,
    ) -> Result<SearchResponse, StoreError> {
        let reference = match options.reference {
            Some(ref r) => r.clone(),
            None => self.master_ref().await?,
        };

        let mut url = self.search_url()?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("ref", &reference);
            if !predicates.is_empty() {
                pairs.append_pair("q", &predicates_param(predicates));
            }
            for (key, value) in options.to_params() {
                pairs.append_pair(key, &value);
            }
            if let Some(ref token) = self.access_token {
                pairs.append_pair("access_token", token);
            }
        }

        let response: SearchResponse = self.get_json(url).await?;
        debug!(
            results = response.results.len(),
            total = response.total_results_size,
            has_next = response.next_page.is_some(),
            "Content store query complete"
        );
        Ok(response)
    }

    async fn fetch_page(&self, url: &str) -> Result<SearchResponse, StoreError> {
        if !self.owns_url(url) {
            return Err(StoreError::ForeignCursor(url.to_string()));
        }
        self.get_json(Url::parse(url)?).await
    }

    fn owns_url(&self, url: &str) -> bool {
        Url::parse(url).is_ok_and(|candidate| {
            candidate.scheme() == self.endpoint.scheme()
                && candidate.host_str() == self.endpoint.host_str()
                && candidate.port_or_known_default() == self.endpoint.port_or_known_default()
        })
    }
}

/// Strip the access token from a URL before it reaches the logs.
fn redact_token(url: &Url) -> Url {
    if !url.query_pairs().any(|(k, _)| k == "access_token") {
        return url.clone();
    }
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| {
            if k == "access_token" {
                (k.into_owned(), "<redacted>".to_string())
            } else {
                (k.into_owned(), v.into_owned())
            }
        })
        .collect();
    let mut redacted = url.clone();
    redacted.query_pairs_mut().clear().extend_pairs(pairs);
    redacted
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(endpoint: &str) -> PrismicClient {
        let config = Config {
            api_endpoint: endpoint.to_string(),
            ..Config::for_testing()
        };
        PrismicClient::new(&config).unwrap()
    }

    #[test]
    fn test_search_url() {
        let c = client("https://blog.cdn.prismic.io/api/v2/");
        assert_eq!(
            c.search_url().unwrap().as_str(),
            "https://blog.cdn.prismic.io/api/v2/documents/search"
        );
    }

    #[test]
    fn test_owns_url() {
        let c = client("https://blog.cdn.prismic.io/api/v2");
        assert!(c.owns_url("https://blog.cdn.prismic.io/api/v2/documents/search?page=2"));
        assert!(c.owns_url("https://blog.cdn.prismic.io:443/api/v2/documents/search"));
        assert!(!c.owns_url("http://blog.cdn.prismic.io/api/v2/documents/search"));
        assert!(!c.owns_url("https://evil.example.com/api/v2/documents/search"));
        assert!(!c.owns_url("not a url"));
    }

    #[test]
    fn test_redact_token() {
        let url = Url::parse("https://x.io/api/v2?ref=A&access_token=secret").unwrap();
        let redacted = redact_token(&url).to_string();
        assert!(!redacted.contains("secret"));
        assert!(redacted.contains("ref=A"));
    }

    #[test]
    fn test_debug_hides_token() {
        let config = Config {
            api_endpoint: "https://blog.cdn.prismic.io/api/v2".to_string(),
            access_token: Some("secret".to_string()),
            ..Config::for_testing()
        };
        let c = PrismicClient::new(&config).unwrap();
        assert!(!format!("{c:?}").contains("secret"));
    }

    #[tokio::test]
    async fn test_content_ref_prefers_preview() {
        use crate::posts::test_support::{FakeStore, MASTER_REF};

        let store = FakeStore::new(Vec::new());
        assert_eq!(store.content_ref(None).await.unwrap(), MASTER_REF);
        assert_eq!(store.content_ref(Some("draft")).await.unwrap(), "draft");
    }
}
