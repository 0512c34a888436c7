//! Previous/next navigation between posts.

use maud::{html, Markup, Render};

use crate::posts::{SiblingLink, Siblings};

#[derive(Debug, Clone)]
pub struct SiblingNav<'a> {
    pub siblings: &'a Siblings,
}

impl<'a> SiblingNav<'a> {
    #[must_use]
    pub const fn new(siblings: &'a Siblings) -> Self {
        Self { siblings }
    }

    fn link(sibling: &SiblingLink, label: &str, class: &str) -> Markup {
        html! {
            a class=(class) href=(format!("/post/{}", urlencoding::encode(&sibling.uid))) {
                span class="sibling-title" { (sibling.data.title) }
                span class="sibling-label" { (label) }
            }
        }
    }
}

impl Render for SiblingNav<'_> {
    fn render(&self) -> Markup {
        let Siblings { previous, next } = self.siblings;
        if previous.is_none() && next.is_none() {
            return html! {};
        }

        html! {
            nav class="sibling-nav" {
                @if let Some(previous) = previous {
                    (Self::link(previous, "Post anterior", "previous"))
                } @else {
                    span {}
                }
                @if let Some(next) = next {
                    (Self::link(next, "Próximo post", "next"))
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::posts::SiblingData;

    fn link(uid: &str, title: &str) -> SiblingLink {
        SiblingLink {
            uid: uid.to_string(),
            data: SiblingData {
                title: title.to_string(),
            },
        }
    }

    #[test]
    fn test_no_siblings_renders_nothing() {
        let siblings = Siblings::default();
        assert!(SiblingNav::new(&siblings).render().into_string().is_empty());
    }

    #[test]
    fn test_both_siblings() {
        let siblings = Siblings {
            previous: Some(link("older", "Older post")),
            next: Some(link("newer", "Newer post")),
        };
        let html = SiblingNav::new(&siblings).render().into_string();
        assert!(html.contains(r#"href="/post/older""#));
        assert!(html.contains("Post anterior"));
        assert!(html.contains(r#"href="/post/newer""#));
        assert!(html.contains("Próximo post"));
        assert!(html.find("older").unwrap() < html.find("newer").unwrap());
    }

    #[test]
    fn test_only_next() {
        let siblings = Siblings {
            previous: None,
            next: Some(link("newer", "Newer post")),
        };
        let html = SiblingNav::new(&siblings).render().into_string();
        assert!(!html.contains("Post anterior"));
        assert!(html.contains("Próximo post"));
    }
}
