//! Base layout components for the web UI.
//!
//! This module provides the main page layout structure including
//! the HTML skeleton, header and preview banner.

use maud::{html, Markup, DOCTYPE};

const SITE_NAME: &str = "spacetraveling";

/// Base page layout builder.
///
/// # Example
///
/// ```ignore
/// use maud::html;
/// use crate::components::layout::BaseLayout;
///
/// let content = html! { h1 { "Hello World" } };
/// let page = BaseLayout::new("My Page").with_preview(true).render(content);
/// ```
#[derive(Debug, Clone)]
pub struct BaseLayout<'a> {
    title: &'a str,
    preview: bool,
    scripts: Vec<&'a str>,
}

impl<'a> BaseLayout<'a> {
    #[must_use]
    pub fn new(title: &'a str) -> Self {
        Self {
            title,
            preview: false,
            scripts: Vec::new(),
        }
    }

    /// Show the preview banner with a link out of preview mode.
    #[must_use]
    pub fn with_preview(mut self, preview: bool) -> Self {
        self.preview = preview;
        self
    }

    /// Load an extra script at the end of the body.
    #[must_use]
    pub fn with_script(mut self, src: &'a str) -> Self {
        self.scripts.push(src);
        self
    }

    /// Render the complete HTML page with the given content.
    ///
    /// The content will be placed inside the `<main class="container">` element.
    #[must_use]
    pub fn render(self, content: Markup) -> Markup {
        html! {
            (DOCTYPE)
            html lang="pt-BR" {
                head {
                    meta charset="UTF-8";
                    meta name="viewport" content="width=device-width, initial-scale=1.0";
                    title { (self.title) " | " (SITE_NAME) }
                    link rel="stylesheet" href="/static/css/style.css";
                }
                body {
                    (Self::render_header())
                    main class="container" {
                        (content)
                    }
                    @if self.preview {
                        (Self::render_preview_banner())
                    }
                    @for src in &self.scripts {
                        script src=(src) {}
                    }
                }
            }
        }
    }

    fn render_header() -> Markup {
        html! {
            header class="container" {
                a href="/" {
                    img src="/static/images/logo.svg" alt="logo";
                }
            }
        }
    }

    fn render_preview_banner() -> Markup {
        html! {
            aside class="preview-banner" {
                a href="/api/exit-preview" { "Sair do modo Preview" }
            }
        }
    }
}
