//! Listing page templates.

use maud::{html, Markup};

use crate::components::{BaseLayout, EmptyState, LoadMoreButton, PostCards};
use crate::posts::PostSummary;

pub const LOAD_MORE_SCRIPT: &str = "/static/js/load-more.js";

/// Parameters for the listing page.
#[derive(Debug, Clone)]
pub struct HomePageParams<'a> {
    pub posts: &'a [PostSummary],
    pub next_page: Option<&'a str>,
    /// Uids the next page should leave out.
    pub seen: &'a [String],
    pub preview: bool,
}

/// Render the post listing with its "load more" control.
#[must_use]
pub fn render_home_page(params: &HomePageParams<'_>) -> Markup {
    let content = html! {
        section class="posts" id="posts" {
            @if params.posts.is_empty() {
                (EmptyState::no_posts())
            }
            (PostCards::new(params.posts))
        }
        (LoadMoreButton::new(params.next_page).with_seen(params.seen))
    };

    BaseLayout::new("Home")
        .with_preview(params.preview)
        .with_script(LOAD_MORE_SCRIPT)
        .render(content)
}

/// Cards plus the follow-up control, for appending to an open listing.
#[must_use]
pub fn render_more_posts_fragment(
    posts: &[PostSummary],
    next_page: Option<&str>,
    seen: &[String],
) -> Markup {
    html! {
        (PostCards::new(posts))
        (LoadMoreButton::new(next_page).with_seen(seen))
    }
}
