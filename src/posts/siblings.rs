//! Previous/next post lookup.
//!
//! The store's `after` cursor is relative to an ordering, so each neighbour
//! takes its own single-result query: descending order yields the next older
//! post, ascending order the next newer one.

use tracing::debug;

use super::{Post, SiblingLink, Siblings, POST_TYPE};
use crate::prismic::{ContentStore, Ordering, Predicate, QueryOptions, StoreError};

const ORDER_FIELD: &str = "document.first_publication_date";

/// Find the posts published immediately before and after `post`.
///
/// Both queries run concurrently and use the same content `reference` as
/// the focal post, so preview sessions see drafts on both sides.
///
/// # Errors
///
/// Returns an error if either store query fails.
pub async fn resolve_siblings<S: ContentStore + ?Sized>(
    store: &S,
    post: &Post,
    reference: Option<&str>,
) -> Result<Siblings, StoreError> {
    let (previous, next) = tokio::try_join!(
        adjacent(store, &post.id, Ordering::desc(ORDER_FIELD), reference),
        adjacent(store, &post.id, Ordering::asc(ORDER_FIELD), reference),
    )?;

    debug!(
        uid = %post.uid,
        published = ?post.first_publication_date,
        previous = ?previous.as_ref().map(|s| s.uid.as_str()),
        next = ?next.as_ref().map(|s| s.uid.as_str()),
        "Resolved sibling posts"
    );

    Ok(Siblings { previous, next })
}

async fn adjacent<S: ContentStore + ?Sized>(
    store: &S,
    id: &str,
    ordering: Ordering,
    reference: Option<&str>,
) -> Result<Option<SiblingLink>, StoreError> {
    let options = QueryOptions::new()
        .fetch(["posts.title"])
        .page_size(1)
        .after(id)
        .order_by(ordering)
        .reference(reference);

    let response = store
        .query(&[Predicate::document_type(POST_TYPE)], &options)
        .await?;

    Ok(response
        .results
        .iter()
        .filter(|doc| doc.id != id)
        .find_map(SiblingLink::from_document))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::posts::test_support::{post_doc, FakeStore};

    fn focal(store_doc: crate::prismic::Document) -> Post {
        Post::from_document(store_doc).unwrap()
    }

    #[tokio::test]
    async fn test_middle_post_has_both_siblings() {
        let store = FakeStore::new(vec![
            post_doc("a", "janeiro", "2021-01-01"),
            post_doc("c", "maio", "2021-05-01"),
            post_doc("b", "marco", "2021-03-10"),
        ]);
        let post = focal(post_doc("b", "marco", "2021-03-10"));

        let siblings = resolve_siblings(&store, &post, None).await.unwrap();

        let previous = siblings.previous.unwrap();
        let next = siblings.next.unwrap();
        assert_eq!(previous.uid, "janeiro");
        assert_eq!(next.uid, "maio");
        assert_eq!(previous.data.title, "Title of janeiro");
        assert_ne!(previous.uid, next.uid);
    }

    #[tokio::test]
    async fn test_oldest_post_has_no_previous() {
        let store = FakeStore::new(vec![
            post_doc("a", "janeiro", "2021-01-01"),
            post_doc("b", "marco", "2021-03-10"),
        ]);
        let post = focal(post_doc("a", "janeiro", "2021-01-01"));

        let siblings = resolve_siblings(&store, &post, None).await.unwrap();
        assert!(siblings.previous.is_none());
        assert_eq!(siblings.next.unwrap().uid, "marco");
    }

    #[tokio::test]
    async fn test_newest_post_has_no_next() {
        let store = FakeStore::new(vec![
            post_doc("a", "janeiro", "2021-01-01"),
            post_doc("b", "marco", "2021-03-10"),
        ]);
        let post = focal(post_doc("b", "marco", "2021-03-10"));

        let siblings = resolve_siblings(&store, &post, None).await.unwrap();
        assert_eq!(siblings.previous.unwrap().uid, "janeiro");
        assert!(siblings.next.is_none());
    }

    #[tokio::test]
    async fn test_only_post_has_no_siblings() {
        let store = FakeStore::new(vec![post_doc("a", "janeiro", "2021-01-01")]);
        let post = focal(post_doc("a", "janeiro", "2021-01-01"));

        let siblings = resolve_siblings(&store, &post, None).await.unwrap();
        assert_eq!(siblings, Siblings::default());
    }

    #[tokio::test]
    async fn test_preview_reference_reaches_both_queries() {
        let store = FakeStore::new(vec![post_doc("a", "janeiro", "2021-01-01")]);
        let post = focal(post_doc("a", "janeiro", "2021-01-01"));

        resolve_siblings(&store, &post, Some("preview-token"))
            .await
            .unwrap();

        let refs = store.references.lock().unwrap();
        assert_eq!(refs.len(), 2);
        assert!(refs.iter().all(|r| r.as_deref() == Some("preview-token")));
    }
}
