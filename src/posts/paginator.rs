//! Incrementally growing post listing.
//!
//! The first page comes from a predicate query; every further page is read
//! from the literal `next_page` URL the store returned with the previous one.

use std::collections::HashSet;

use tracing::{debug, info};

use super::{PostPagination, PostSummary, POST_TYPE, SUMMARY_FIELDS};
use crate::prismic::{ContentStore, Ordering, Predicate, QueryOptions, SearchResponse, StoreError};

/// Listing state for one page view: summaries loaded so far and the cursor
/// to the next page (`None` once exhausted).
///
/// `load_more` takes `&mut self`, so a listing can never have two loads in
/// flight at once.
pub struct ListingPaginator<'a, S: ContentStore + ?Sized> {
    store: &'a S,
    posts: Vec<PostSummary>,
    next_page: Option<String>,
    /// Uids already shown, including ones rendered by earlier requests.
    seen: HashSet<String>,
}

impl<'a, S: ContentStore + ?Sized> ListingPaginator<'a, S> {
    /// Load the first page of posts, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the store query fails.
    pub async fn first_page(
        store: &'a S,
        page_size: u32,
        reference: Option<&str>,
    ) -> Result<Self, StoreError> {
        let options = QueryOptions::new()
            .fetch(SUMMARY_FIELDS)
            .page_size(page_size)
            .order_by(Ordering::desc("document.first_publication_date"))
            .reference(reference);

        let response = store
            .query(&[Predicate::document_type(POST_TYPE)], &options)
            .await?;

        let mut paginator = Self {
            store,
            posts: Vec::new(),
            next_page: None,
            seen: HashSet::new(),
        };
        paginator.absorb(response);
        Ok(paginator)
    }

    /// Continue a listing from a cursor obtained earlier, with no posts
    /// loaded yet.
    #[must_use]
    pub fn resume(store: &'a S, next_page: String) -> Self {
        Self {
            store,
            posts: Vec::new(),
            next_page: Some(next_page),
            seen: HashSet::new(),
        }
    }

    /// Treat `uids` as already listed, so a resumed listing does not repeat
    /// posts the reader already has.
    #[must_use]
    pub fn skipping<I>(mut self, uids: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        self.seen.extend(uids);
        self
    }

    #[must_use]
    pub fn posts(&self) -> &[PostSummary] {
        &self.posts
    }

    #[must_use]
    pub fn next_page(&self) -> Option<&str> {
        self.next_page.as_deref()
    }

    #[must_use]
    pub fn has_more(&self) -> bool {
        self.next_page.is_some()
    }

    /// Fetch the page behind the cursor and append its posts.
    ///
    /// Returns the number of posts appended. An exhausted listing returns
    /// `Ok(0)` without contacting the store. On error the listing is left
    /// unchanged.
    ///
    /// # Errors
    ///
    /// Returns an error if the page cannot be fetched.
    pub async fn load_more(&mut self) -> Result<usize, StoreError> {
        let Some(ref url) = self.next_page else {
            debug!("Listing exhausted, nothing to load");
            return Ok(0);
        };

        let response = self.store.fetch_page(url).await?;
        let appended = self.absorb(response);

        info!(
            appended,
            total = self.posts.len(),
            has_more = self.has_more(),
            "Loaded more posts"
        );
        Ok(appended)
    }

    /// Append a page's summaries and take over its cursor.
    ///
    /// Posts already in the listing (same uid) are skipped; this happens when
    /// content is published between two loads and shifts page boundaries.
    fn absorb(&mut self, response: SearchResponse) -> usize {
        let before = self.posts.len();

        for doc in &response.results {
            let Some(summary) = PostSummary::from_document(doc) else {
                continue;
            };
            if !self.seen.insert(summary.uid.clone()) {
                debug!(uid = %summary.uid, "Skipping post already in listing");
                continue;
            }
            self.posts.push(summary);
        }

        self.next_page = response.next_page;
        self.posts.len() - before
    }

    #[must_use]
    pub fn into_pagination(self) -> PostPagination {
        PostPagination {
            next_page: self.next_page,
            results: self.posts,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::posts::test_support::{post_doc, FakeStore};

    fn five_posts() -> FakeStore {
        FakeStore::new(vec![
            post_doc("1", "post-1", "2021-01-01"),
            post_doc("2", "post-2", "2021-02-01"),
            post_doc("3", "post-3", "2021-03-01"),
            post_doc("4", "post-4", "2021-04-01"),
            post_doc("5", "post-5", "2021-05-01"),
        ])
    }

    #[tokio::test]
    async fn test_first_page_is_newest_first() {
        let store = five_posts();
        let paginator = ListingPaginator::first_page(&store, 2, None).await.unwrap();

        let uids: Vec<&str> = paginator.posts().iter().map(|p| p.uid.as_str()).collect();
        assert_eq!(uids, vec!["post-5", "post-4"]);
        assert!(paginator.has_more());
        assert_eq!(
            paginator.posts()[0].first_publication_date.as_deref(),
            Some("01 mai 2021")
        );
    }

    #[tokio::test]
    async fn test_load_more_until_exhausted() {
        let store = five_posts();
        let mut paginator = ListingPaginator::first_page(&store, 2, None).await.unwrap();
        assert_eq!(paginator.posts().len(), 2);

        let mut lengths = Vec::new();
        let mut cursors = Vec::new();
        for _ in 0..3 {
            paginator.load_more().await.unwrap();
            lengths.push(paginator.posts().len());
            cursors.push(paginator.has_more());
        }

        assert_eq!(lengths, vec![4, 5, 5]);
        assert_eq!(cursors, vec![true, false, false]);
        // The exhausted call never reached the store.
        assert_eq!(store.fetched_pages.lock().unwrap().len(), 2);

        let uids: Vec<String> = paginator.into_pagination().results.into_iter().map(|p| p.uid).collect();
        assert_eq!(uids, vec!["post-5", "post-4", "post-3", "post-2", "post-1"]);
    }

    #[tokio::test]
    async fn test_load_more_is_deterministic_per_cursor() {
        let store = five_posts();
        let first = ListingPaginator::first_page(&store, 2, None).await.unwrap();
        let cursor = first.next_page().unwrap().to_string();

        let mut a = ListingPaginator::resume(&store, cursor.clone());
        let mut b = ListingPaginator::resume(&store, cursor);
        assert_eq!(a.load_more().await.unwrap(), 2);
        assert_eq!(b.load_more().await.unwrap(), 2);
        assert_eq!(a.posts(), b.posts());
        assert_eq!(a.next_page(), b.next_page());
    }

    #[tokio::test]
    async fn test_reference_is_passed_to_first_query() {
        let store = five_posts();
        ListingPaginator::first_page(&store, 2, Some("preview-token"))
            .await
            .unwrap();
        assert_eq!(
            store.references.lock().unwrap().as_slice(),
            &[Some("preview-token".to_string())]
        );
    }

    #[tokio::test]
    async fn test_duplicates_are_skipped() {
        let store = five_posts();
        let mut paginator = ListingPaginator::first_page(&store, 2, None).await.unwrap();
        // A cursor overlapping what is already loaded.
        paginator.next_page = Some(
            "https://fake.cdn.prismic.io/api/v2/documents/search?page=1&pageSize=3".to_string(),
        );
        let appended = paginator.load_more().await.unwrap();
        assert_eq!(appended, 1);
        let uids: Vec<&str> = paginator.posts().iter().map(|p| p.uid.as_str()).collect();
        assert_eq!(uids, vec!["post-5", "post-4", "post-3"]);
    }

    #[tokio::test]
    async fn test_resumed_listing_skips_posts_already_shown() {
        let store = five_posts();
        // Page 2 at size 2 is post-3, post-2; the reader already has post-3.
        let cursor = "https://fake.cdn.prismic.io/api/v2/documents/search?page=2&pageSize=2";
        let mut paginator = ListingPaginator::resume(&store, cursor.to_string())
            .skipping(["post-4".to_string(), "post-3".to_string()]);

        assert_eq!(paginator.load_more().await.unwrap(), 1);
        let uids: Vec<&str> = paginator.posts().iter().map(|p| p.uid.as_str()).collect();
        assert_eq!(uids, vec!["post-2"]);
        assert!(paginator.has_more());
    }

    #[tokio::test]
    async fn test_failed_load_leaves_state_untouched() {
        let store = five_posts();
        let mut paginator = ListingPaginator::resume(&store, "not a url".to_string());
        assert!(paginator.load_more().await.is_err());
        assert!(paginator.posts().is_empty());
        assert_eq!(paginator.next_page(), Some("not a url"));
    }
}
