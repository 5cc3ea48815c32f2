//! Not-found page.

use maud::{html, Markup};

use crate::components::BaseLayout;

/// Render the standard 404 page.
#[must_use]
pub fn render_not_found_page(site_name: &str) -> Markup {
    let content = html! {
        section class="not-found" {
            h1 { "Página não encontrada" }
            p { a href="/" { "Voltar para a página inicial" } }
        }
    };

    BaseLayout::new("Página não encontrada", site_name).render(content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_not_found() {
        let html = render_not_found_page("spacetraveling").into_string();
        assert!(html.contains("<h1>Página não encontrada</h1>"));
        assert!(html.contains(r#"<a href="/">"#));
    }
}
