use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::get;
use axum::Json;
use axum::Router;
use serde::Deserialize;
use tracing::{error, info, warn};

use super::pages::{
    render_home_page, render_more_posts_fragment, render_not_found_page, render_post_page,
    render_unavailable_page, HomePageParams, PostPageParams,
};
use super::AppState;
use crate::posts::reading_time::estimate;
use crate::posts::{
    resolve_siblings, ListingPaginator, Post, PostPagination, PostSummary, Siblings, POST_TYPE,
};
use crate::preview::{clear_preview_cookie, preview_cookie, resolve_link, PreviewRef};
use crate::prismic::StoreError;

/// Header set by the listing script when it wants a bare HTML fragment.
pub const FRAGMENT_HEADER: &str = "x-fragment";

/// Most uids a "load more" request carries forward.
const MAX_SEEN: usize = 100;

/// Create the router with all routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(home))
        .route("/post/:uid", get(post_detail))
        .route("/posts/more", get(more_posts))
        .route("/api/posts", get(api_posts))
        .route("/api/preview", get(preview_start))
        .route("/api/exit-preview", get(preview_exit))
        .route("/healthz", get(health))
        .fallback(not_found)
}

// ========== HTML Routes ==========

async fn home(State(state): State<AppState>, preview: PreviewRef) -> Response {
    if !preview.is_active() {
        if let Some(html) = state.pages.get("/") {
            return Html(html).into_response();
        }
    }

    let reference = match state.store.content_ref(preview.as_deref()).await {
        Ok(r) => r,
        Err(e) => return store_failure(&e, preview.is_active()),
    };

    let paginator =
        match ListingPaginator::first_page(&*state.store, state.config.page_size, Some(&reference))
            .await
        {
            Ok(p) => p,
            Err(e) => return store_failure(&e, preview.is_active()),
        };

    let seen = uids(paginator.posts());
    let html = render_home_page(&HomePageParams {
        posts: paginator.posts(),
        next_page: paginator.next_page(),
        seen: &seen,
        preview: preview.is_active(),
    })
    .into_string();

    if !preview.is_active() {
        state.pages.insert("/", html.clone());
    }
    Html(html).into_response()
}

async fn post_detail(
    State(state): State<AppState>,
    Path(uid): Path<String>,
    preview: PreviewRef,
) -> Response {
    let cache_key = format!("/post/{uid}");
    if !preview.is_active() {
        if let Some(html) = state.pages.get(&cache_key) {
            return Html(html).into_response();
        }
    }

    let reference = match state.store.content_ref(preview.as_deref()).await {
        Ok(r) => r,
        Err(e) => return store_failure(&e, preview.is_active()),
    };

    let doc = match state
        .store
        .get_by_uid(POST_TYPE, &uid, Some(&reference))
        .await
    {
        Ok(Some(doc)) => doc,
        Ok(None) => {
            info!(uid = %uid, "Post not found");
            return (
                StatusCode::NOT_FOUND,
                Html(render_not_found_page(preview.is_active()).into_string()),
            )
                .into_response();
        }
        Err(e) => return store_failure(&e, preview.is_active()),
    };

    let post = match Post::from_document(doc) {
        Ok(p) => p,
        Err(e) => {
            error!(uid = %uid, "Failed to read post: {e}");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html(render_unavailable_page(preview.is_active()).into_string()),
            )
                .into_response();
        }
    };

    let (siblings, complete) = match resolve_siblings(&*state.store, &post, Some(&reference)).await
    {
        Ok(s) => (s, true),
        Err(e) => {
            warn!(uid = %uid, "Failed to resolve sibling posts: {e}");
            (Siblings::default(), false)
        }
    };

    let html = render_post_page(&PostPageParams {
        post: &post,
        siblings: &siblings,
        reading_time: estimate(&post.data.content),
        comments: state.config.comments.as_ref(),
        preview: preview.is_active(),
    })
    .into_string();

    if !preview.is_active() && complete {
        state.pages.insert(&cache_key, html.clone());
    }
    Html(html).into_response()
}

#[derive(Debug, Deserialize)]
pub struct CursorParams {
    cursor: Option<String>,
    /// Comma-separated uids the reader already has.
    seen: Option<String>,
}

/// Next page of the listing. Returns a fragment for the listing script and a
/// full page otherwise.
async fn more_posts(
    State(state): State<AppState>,
    Query(params): Query<CursorParams>,
    preview: PreviewRef,
    headers: HeaderMap,
) -> Response {
    let seen = parse_seen(params.seen.as_deref());
    let pagination = match load_listing_page(&state, params.cursor, &seen, preview.as_deref()).await
    {
        Ok(p) => p,
        Err(ListingError::InvalidCursor) => {
            return (StatusCode::BAD_REQUEST, "Invalid cursor").into_response();
        }
        Err(ListingError::Store(e)) => return store_failure(&e, preview.is_active()),
    };

    let next_page = pagination.next_page.as_deref();
    let carried = carried_uids(&pagination.results, seen);
    let markup = if headers.contains_key(FRAGMENT_HEADER) {
        render_more_posts_fragment(&pagination.results, next_page, &carried)
    } else {
        render_home_page(&HomePageParams {
            posts: &pagination.results,
            next_page,
            seen: &carried,
            preview: preview.is_active(),
        })
    };
    Html(markup.into_string()).into_response()
}

// ========== API Routes ==========

async fn api_posts(
    State(state): State<AppState>,
    Query(params): Query<CursorParams>,
    preview: PreviewRef,
) -> Response {
    let seen = parse_seen(params.seen.as_deref());
    match load_listing_page(&state, params.cursor, &seen, preview.as_deref()).await {
        Ok(pagination) => Json(pagination).into_response(),
        Err(ListingError::InvalidCursor) => {
            (StatusCode::BAD_REQUEST, "Invalid cursor").into_response()
        }
        Err(ListingError::Store(e)) => {
            error!("Failed to load posts: {e}");
            (StatusCode::BAD_GATEWAY, "Content store error").into_response()
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct PreviewParams {
    token: Option<String>,
    #[serde(rename = "documentId")]
    document_id: Option<String>,
}

/// Start a preview session and redirect to the previewed document.
async fn preview_start(
    State(state): State<AppState>,
    Query(params): Query<PreviewParams>,
) -> Response {
    let Some(token) = params.token.filter(|t| !t.is_empty()) else {
        return (StatusCode::BAD_REQUEST, "Missing preview token").into_response();
    };

    let location = match params.document_id {
        Some(ref id) => match state.store.get_by_id(id, Some(&token)).await {
            Ok(Some(doc)) => resolve_link(&doc),
            Ok(None) => "/".to_string(),
            Err(e) => return store_failure(&e, true),
        },
        None => "/".to_string(),
    };

    info!(location = %location, "Starting preview session");
    (
        [(header::SET_COOKIE, preview_cookie(&token))],
        Redirect::temporary(&location),
    )
        .into_response()
}

async fn preview_exit() -> Response {
    info!("Ending preview session");
    (
        [(header::SET_COOKIE, clear_preview_cookie())],
        Redirect::temporary("/"),
    )
        .into_response()
}

async fn health() -> &'static str {
    "ok"
}

async fn not_found(preview: PreviewRef) -> Response {
    (
        StatusCode::NOT_FOUND,
        Html(render_not_found_page(preview.is_active()).into_string()),
    )
        .into_response()
}

// ========== Helpers ==========

enum ListingError {
    InvalidCursor,
    Store(StoreError),
}

/// First listing page when no cursor is given, otherwise the page behind it
/// without the posts in `seen`.
async fn load_listing_page(
    state: &AppState,
    cursor: Option<String>,
    seen: &[String],
    preview: Option<&str>,
) -> Result<PostPagination, ListingError> {
    let store = &*state.store;
    match cursor.filter(|c| !c.is_empty()) {
        None => {
            let reference = store.content_ref(preview).await.map_err(ListingError::Store)?;
            ListingPaginator::first_page(store, state.config.page_size, Some(&reference))
                .await
                .map(ListingPaginator::into_pagination)
                .map_err(ListingError::Store)
        }
        Some(cursor) => {
            if !store.owns_url(&cursor) {
                warn!(cursor = %cursor, "Rejecting cursor outside the content store");
                return Err(ListingError::InvalidCursor);
            }
            let mut paginator =
                ListingPaginator::resume(store, cursor).skipping(seen.iter().cloned());
            paginator.load_more().await.map_err(ListingError::Store)?;
            Ok(paginator.into_pagination())
        }
    }
}

fn uids(posts: &[PostSummary]) -> Vec<String> {
    posts.iter().map(|p| p.uid.clone()).collect()
}

fn parse_seen(raw: Option<&str>) -> Vec<String> {
    raw.map(|list| {
        list.split(',')
            .map(str::trim)
            .filter(|uid| !uid.is_empty())
            .take(MAX_SEEN)
            .map(String::from)
            .collect()
    })
    .unwrap_or_default()
}

/// Uids the next "load more" should skip: this page's posts, or the
/// incoming list when everything on this page was already shown.
fn carried_uids(results: &[PostSummary], incoming: Vec<String>) -> Vec<String> {
    if results.is_empty() {
        incoming
    } else {
        uids(results)
    }
}

fn store_failure(e: &StoreError, preview: bool) -> Response {
    error!("Content store request failed: {e}");
    (
        StatusCode::BAD_GATEWAY,
        Html(render_unavailable_page(preview).into_string()),
    )
        .into_response()
}
