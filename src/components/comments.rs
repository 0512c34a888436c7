//! Utterances comment widget.
//!
//! Comments live as GitHub issues; the widget script mounts itself next to
//! its own `<script>` tag.

use maud::{html, Markup, Render};

use crate::config::CommentsConfig;

const UTTERANCES_CLIENT: &str = "https://utteranc.es/client.js";

#[derive(Debug, Clone)]
pub struct UtterancesComments<'a> {
    pub config: &'a CommentsConfig,
}

impl<'a> UtterancesComments<'a> {
    #[must_use]
    pub const fn new(config: &'a CommentsConfig) -> Self {
        Self { config }
    }
}

impl Render for UtterancesComments<'_> {
    fn render(&self) -> Markup {
        let c = self.config;
        html! {
            section class="comments" {
                script
                    src=(UTTERANCES_CLIENT)
                    repo=(c.repo)
                    issue-term=(c.issue_term)
                    label=(c.label)
                    theme=(c.theme)
                    crossorigin="anonymous"
                    async {}
            }
        }
    }
}
