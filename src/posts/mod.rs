//! Blog posts: the shapes the pages render, projected from raw documents.

pub mod date;
pub mod paginator;
pub mod reading_time;
pub mod rich_text;
pub mod siblings;

#[cfg(test)]
pub(crate) mod test_support;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::prismic::{Document, StoreError};
use rich_text::{optional_text_field, text_field, RichTextBlock};

pub use paginator::ListingPaginator;
pub use siblings::resolve_siblings;

/// Document type holding blog posts.
pub const POST_TYPE: &str = "posts";

/// Fields requested for listing summaries.
pub const SUMMARY_FIELDS: [&str; 3] = ["posts.title", "posts.subtitle", "posts.author"];

#[derive(Debug, Error)]
pub enum PostError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("document {0} has no uid")]
    MissingUid(String),
    #[error("document {id} has malformed data: {source}")]
    MalformedData {
        id: String,
        #[source]
        source: serde_json::Error,
    },
}

/// A full post, as rendered on its own page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    /// Store-internal identifier, used for sibling lookups.
    pub id: String,
    pub uid: String,
    pub first_publication_date: Option<String>,
    pub last_publication_date: Option<String>,
    pub data: PostData,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostData {
    pub title: String,
    pub subtitle: Option<String>,
    pub author: String,
    pub banner: Option<Banner>,
    pub content: Vec<ContentSection>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Banner {
    pub url: String,
    pub alt: Option<String>,
}

/// A headed section of post content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentSection {
    #[serde(default, deserialize_with = "text_field")]
    pub heading: String,
    #[serde(default)]
    pub body: Vec<RichTextBlock>,
}

/// Post data as stored; an unset image field arrives as `{}`.
#[derive(Debug, Deserialize)]
struct RawPostData {
    #[serde(default, deserialize_with = "text_field")]
    title: String,
    #[serde(default, deserialize_with = "optional_text_field")]
    subtitle: Option<String>,
    #[serde(default, deserialize_with = "text_field")]
    author: String,
    #[serde(default)]
    banner: Option<RawImage>,
    #[serde(default)]
    content: Vec<ContentSection>,
}

#[derive(Debug, Deserialize)]
struct RawImage {
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    alt: Option<String>,
}

impl Post {
    /// Project a raw document into a post.
    ///
    /// # Errors
    ///
    /// Returns an error if the document has no uid or its data does not
    /// match the post shape.
    pub fn from_document(doc: Document) -> Result<Self, PostError> {
        let uid = doc.uid.ok_or_else(|| PostError::MissingUid(doc.id.clone()))?;
        let raw: RawPostData =
            serde_json::from_value(doc.data).map_err(|source| PostError::MalformedData {
                id: doc.id.clone(),
                source,
            })?;

        let banner = raw.banner.and_then(|image| {
            image.url.map(|url| Banner {
                url,
                alt: image.alt,
            })
        });

        Ok(Self {
            id: doc.id,
            uid,
            first_publication_date: doc.first_publication_date,
            last_publication_date: doc.last_publication_date,
            data: PostData {
                title: raw.title,
                subtitle: raw.subtitle,
                author: raw.author,
                banner,
                content: raw.content,
            },
        })
    }

    /// Whether the post was republished after its first publication.
    #[must_use]
    pub fn was_edited(&self) -> bool {
        match (&self.first_publication_date, &self.last_publication_date) {
            (Some(first), Some(last)) => first != last,
            _ => false,
        }
    }
}

/// Post shown in the listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostSummary {
    pub uid: String,
    /// Display-formatted (`dd MMM yyyy`).
    pub first_publication_date: Option<String>,
    pub data: SummaryData,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryData {
    #[serde(default, deserialize_with = "text_field")]
    pub title: String,
    #[serde(default, deserialize_with = "optional_text_field")]
    pub subtitle: Option<String>,
    #[serde(default, deserialize_with = "text_field")]
    pub author: String,
}

impl PostSummary {
    /// Project a listing result. Documents without a uid or with
    /// unreadable data cannot be linked to and are skipped.
    #[must_use]
    pub fn from_document(doc: &Document) -> Option<Self> {
        let Some(uid) = doc.uid.clone() else {
            warn!(id = %doc.id, "Skipping listing result without uid");
            return None;
        };
        let data: SummaryData = match serde_json::from_value(doc.data.clone()) {
            Ok(data) => data,
            Err(e) => {
                warn!(id = %doc.id, "Skipping listing result with malformed data: {e}");
                return None;
            }
        };
        Some(Self {
            uid,
            first_publication_date: doc.first_publication_date.as_deref().map(date::display_date),
            data,
        })
    }
}

/// One page of listing results plus the cursor to the next.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostPagination {
    pub next_page: Option<String>,
    pub results: Vec<PostSummary>,
}

/// Link to an adjacent post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiblingLink {
    pub uid: String,
    pub data: SiblingData,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiblingData {
    #[serde(default, deserialize_with = "text_field")]
    pub title: String,
}

impl SiblingLink {
    #[must_use]
    pub fn from_document(doc: &Document) -> Option<Self> {
        let uid = doc.uid.clone()?;
        let data = serde_json::from_value(doc.data.clone()).ok()?;
        Some(Self { uid, data })
    }
}

/// Chronological neighbours of a post.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Siblings {
    /// The next older post.
    pub previous: Option<SiblingLink>,
    /// The next newer post.
    pub next: Option<SiblingLink>,
}
