//! Post page templates using maud.

use maud::{html, Markup};

use crate::components::{BaseLayout, SiblingNav, UtterancesComments};
use crate::config::CommentsConfig;
use crate::posts::date::{format_date, format_date_time, parse_timestamp};
use crate::posts::rich_text::as_html;
use crate::posts::{Post, Siblings};

/// Parameters for the post page.
#[derive(Debug, Clone)]
pub struct PostPageParams<'a> {
    pub post: &'a Post,
    pub siblings: &'a Siblings,
    pub reading_time: u32,
    pub comments: Option<&'a CommentsConfig>,
    pub preview: bool,
}

/// Render a full post with navigation and comments.
#[must_use]
pub fn render_post_page(params: &PostPageParams<'_>) -> Markup {
    let post = params.post;
    let published = post
        .first_publication_date
        .as_deref()
        .and_then(parse_timestamp);
    let edited = if post.was_edited() {
        post.last_publication_date.as_deref().and_then(parse_timestamp)
    } else {
        None
    };

    let content = html! {
        @if let Some(ref banner) = post.data.banner {
            img class="banner" src=(banner.url) alt=(banner.alt.as_deref().unwrap_or("banner"));
        }

        article class="post" {
            h1 { (post.data.title) }
            div class="info" {
                @if let Some(ref dt) = published {
                    time { (format_date(dt)) }
                }
                span class="author" { (post.data.author) }
                span class="reading-time" { (params.reading_time) " min" }
            }
            @if let Some(ref dt) = edited {
                p class="edited" { "* editado em " (format_date_time(dt)) }
            }

            @for section in &post.data.content {
                section class="post-section" {
                    h2 { (section.heading) }
                    div class="post-body" { (as_html(&section.body)) }
                }
            }
        }

        hr;
        (SiblingNav::new(params.siblings))

        @if let Some(comments) = params.comments {
            (UtterancesComments::new(comments))
        }
    };

    BaseLayout::new(&post.data.title)
        .with_preview(params.preview)
        .render(content)
}
