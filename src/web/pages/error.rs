//! Not-found and failure pages.

use maud::{html, Markup};

use crate::components::BaseLayout;

#[must_use]
pub fn render_not_found_page(preview: bool) -> Markup {
    let content = html! {
        section class="error-page" {
            h1 { "Post não encontrado" }
            p { a href="/" { "Voltar para a página inicial" } }
        }
    };
    BaseLayout::new("Não encontrado")
        .with_preview(preview)
        .render(content)
}

/// Page shown when the content repository could not be reached.
#[must_use]
pub fn render_unavailable_page(preview: bool) -> Markup {
    let content = html! {
        section class="error-page" {
            h1 { "Conteúdo indisponível" }
            p { "Não foi possível carregar o conteúdo agora. Tente novamente em instantes." }
        }
    };
    BaseLayout::new("Indisponível")
        .with_preview(preview)
        .render(content)
}
