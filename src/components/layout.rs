//! Base layout components for the web UI.
//!
//! This module provides the main page layout structure including
//! the HTML skeleton, header and footer.

use maud::{html, Markup, DOCTYPE};

use super::metadata::OpenGraphMetadata;

/// Base page layout builder.
///
/// # Example
///
/// ```ignore
/// use maud::html;
/// use crate::components::layout::BaseLayout;
///
/// let content = html! { h1 { "Hello World" } };
/// let page = BaseLayout::new("My Page", "spacetraveling").render(content);
/// ```
#[derive(Debug, Clone)]
pub struct BaseLayout<'a> {
    title: &'a str,
    site_name: &'a str,
    og_metadata: Option<OpenGraphMetadata>,
    refresh_secs: Option<u32>,
}

impl<'a> BaseLayout<'a> {
    /// Create a new base layout with the given page title and site name.
    #[must_use]
    pub fn new(title: &'a str, site_name: &'a str) -> Self {
        Self {
            title,
            site_name,
            og_metadata: None,
            refresh_secs: None,
        }
    }

    /// Set the Open Graph metadata for social media previews.
    #[must_use]
    pub fn with_og_metadata(mut self, metadata: OpenGraphMetadata) -> Self {
        self.og_metadata = Some(metadata);
        self
    }

    /// Ask the browser to reload the page after `secs` seconds.
    #[must_use]
    pub fn with_refresh(mut self, secs: u32) -> Self {
        self.refresh_secs = Some(secs);
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
                    @if let Some(secs) = self.refresh_secs {
                        meta http-equiv="refresh" content=(secs);
                    }
                    title { (self.title) " | " (self.site_name) }

                    @if let Some(ref og) = self.og_metadata {
                        (og.render())
                    }

                    link rel="stylesheet" href="/static/css/style.css";
                }
                body {
                    (self.render_header())
                    main class="container" {
                        (content)
                    }
                    (self.render_footer())
                }
            }
        }
    }

    fn render_header(&self) -> Markup {
        html! {
            header class="container header" {
                a href="/" class="site-logo" { (self.site_name) }
            }
        }
    }

    fn render_footer(&self) -> Markup {
        html! {
            footer class="container" {
                small { (self.site_name) }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_layout_basic_structure() {
        let content = html! { h1 { "Test Content" } };
        let page = BaseLayout::new("Test Page", "spacetraveling").render(content);
        let html = page.into_string();

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains(r#"<html lang="pt-BR">"#));
        assert!(html.contains(r#"<meta charset="UTF-8">"#));
        assert!(html.contains("<title>Test Page | spacetraveling</title>"));
        assert!(html.contains(r#"<link rel="stylesheet" href="/static/css/style.css">"#));
        assert!(html.contains(r#"<main class="container"><h1>Test Content</h1></main>"#));
        assert!(html.contains(r#"<a href="/" class="site-logo">spacetraveling</a>"#));
    }

    #[test]
    fn test_base_layout_no_refresh_by_default() {
        let html = BaseLayout::new("Page", "blog")
            .render(html! {})
            .into_string();
        assert!(!html.contains("http-equiv"));
    }

    #[test]
    fn test_base_layout_refresh() {
        let html = BaseLayout::new("Page", "blog")
            .with_refresh(2)
            .render(html! {})
            .into_string();
        assert!(html.contains(r#"<meta http-equiv="refresh" content="2">"#));
    }

    #[test]
    fn test_base_layout_escapes_title() {
        let html = BaseLayout::new("<b>Bold</b>", "blog")
            .render(html! {})
            .into_string();
        assert!(html.contains("<title>&lt;b&gt;Bold&lt;/b&gt; | blog</title>"));
    }

    #[test]
    fn test_base_layout_with_og_metadata() {
        let html = BaseLayout::new("Post", "blog")
            .with_og_metadata(OpenGraphMetadata::new("Post", "About it", "/post/a"))
            .render(html! {})
            .into_string();
        assert!(html.contains(r#"property="og:title" content="Post""#));
    }
}
