//! Card components for the post listing.

use maud::{html, Markup, Render};

use crate::posts::PostSummary;

/// A single post in the listing: title, subtitle, date and author.
#[derive(Debug, Clone)]
pub struct PostCard<'a> {
    pub post: &'a PostSummary,
}

impl<'a> PostCard<'a> {
    #[must_use]
    pub const fn new(post: &'a PostSummary) -> Self {
        Self { post }
    }
}

impl Render for PostCard<'_> {
    fn render(&self) -> Markup {
        let post = self.post;
        html! {
            article class="post-card" {
                a href=(format!("/post/{}", urlencoding::encode(&post.uid))) {
                    strong { (post.data.title) }
                    @if let Some(ref subtitle) = post.data.subtitle {
                        p { (subtitle) }
                    }
                    div class="info" {
                        @if let Some(ref date) = post.first_publication_date {
                            time { (date) }
                        }
                        span class="author" { (post.data.author) }
                    }
                }
            }
        }
    }
}

/// Cards for a run of posts, without a wrapping element so fragments can be
/// appended to an existing list.
#[derive(Debug, Clone)]
pub struct PostCards<'a> {
    pub posts: &'a [PostSummary],
}

impl<'a> PostCards<'a> {
    #[must_use]
    pub const fn new(posts: &'a [PostSummary]) -> Self {
        Self { posts }
    }
}

impl Render for PostCards<'_> {
    fn render(&self) -> Markup {
        html! {
            @for post in self.posts {
                (PostCard::new(post))
            }
        }
    }
}

/// "Load more" control pointing at the listing's next-page cursor.
///
/// Renders nothing once the listing is exhausted. Without JavaScript the
/// button is a plain link to the fragment endpoint. `seen` lists the uids
/// just rendered, so the next page can leave out posts that shifted across
/// the page boundary.
#[derive(Debug, Clone)]
pub struct LoadMoreButton<'a> {
    pub next_page: Option<&'a str>,
    pub seen: &'a [String],
}

impl<'a> LoadMoreButton<'a> {
    #[must_use]
    pub const fn new(next_page: Option<&'a str>) -> Self {
        Self {
            next_page,
            seen: &[],
        }
    }

    #[must_use]
    pub fn with_seen(mut self, seen: &'a [String]) -> Self {
        self.seen = seen;
        self
    }

    fn href(&self, cursor: &str) -> String {
        let mut href = format!("/posts/more?cursor={}", urlencoding::encode(cursor));
        if !self.seen.is_empty() {
            href.push_str("&seen=");
            href.push_str(&urlencoding::encode(&self.seen.join(",")));
        }
        href
    }
}

impl Render for LoadMoreButton<'_> {
    fn render(&self) -> Markup {
        match self.next_page {
            Some(cursor) => {
                let href = self.href(cursor);
                html! {
                    a class="load-more" href=(href) data-next-page=(href) {
                        "Carregar mais posts"
                    }
                }
            }
            None => html! {},
        }
    }
}

/// Message shown when there is nothing to list.
#[derive(Debug, Clone)]
pub struct EmptyState<'a> {
    pub message: &'a str,
}

impl EmptyState<'static> {
    #[must_use]
    pub const fn no_posts() -> Self {
        Self {
            message: "Nenhum post publicado ainda.",
        }
    }
}

impl Render for EmptyState<'_> {
    fn render(&self) -> Markup {
        html! {
            p class="empty-state" { (self.message) }
        }
    }
}
