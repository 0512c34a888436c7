//! Preview mode.
//!
//! Editors open `/api/preview?token=..&documentId=..` from the repository's
//! writing room. The token is a content reference covering unpublished
//! drafts; it is kept in a cookie and threaded through every store query
//! until `/api/exit-preview` clears it.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use crate::posts::POST_TYPE;
use crate::prismic::Document;

/// Cookie holding the preview reference.
pub const PREVIEW_COOKIE: &str = "io.prismic.preview";

/// Active preview reference, if any. Extracted from the request cookies.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreviewRef(pub Option<String>);

impl PreviewRef {
    #[must_use]
    pub fn as_deref(&self) -> Option<&str> {
        self.0.as_deref()
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.0.is_some()
    }

    /// Read the preview reference from a `Cookie` header value.
    #[must_use]
    pub fn from_cookie_header(header: &str) -> Self {
        let token = header.split(';').find_map(|cookie| {
            let (name, value) = cookie.trim().split_once('=')?;
            if name != PREVIEW_COOKIE || value.is_empty() {
                return None;
            }
            urlencoding::decode(value).ok().map(|v| v.into_owned())
        });
        Self(token)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for PreviewRef
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .headers
            .get("cookie")
            .and_then(|h| h.to_str().ok())
            .map(Self::from_cookie_header)
            .unwrap_or_default())
    }
}

/// `Set-Cookie` value starting a preview session.
#[must_use]
pub fn preview_cookie(token: &str) -> String {
    format!(
        "{PREVIEW_COOKIE}={}; Path=/; HttpOnly; SameSite=Lax",
        urlencoding::encode(token)
    )
}

/// `Set-Cookie` value ending a preview session.
#[must_use]
pub fn clear_preview_cookie() -> String {
    format!("{PREVIEW_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}

/// Site path for a document.
#[must_use]
pub fn resolve_link(doc: &Document) -> String {
    match doc.uid.as_deref() {
        Some(uid) if doc.doc_type == POST_TYPE => format!("/post/{}", urlencoding::encode(uid)),
        _ => "/".to_string(),
    }
}
