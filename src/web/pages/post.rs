//! Post page templates using maud.
//!
//! - Post detail page with banner, meta line and rich-text body
//! - Placeholder shown while a page is being generated

use maud::{html, Markup};

use crate::components::{truncate_text, BaseLayout, OpenGraphMetadata, PostMeta};
use crate::richtext;
use crate::view::ViewPostDetail;

/// Seconds before the placeholder page reloads itself.
const PLACEHOLDER_REFRESH_SECS: u32 = 1;

/// Parameters for the post detail page.
#[derive(Debug, Clone)]
pub struct PostPageParams<'a> {
    pub post: &'a ViewPostDetail,
    /// Path of the page, used for link previews.
    pub path: &'a str,
    pub site_name: &'a str,
}

/// Render a generated post page.
#[must_use]
pub fn render_post_page(params: &PostPageParams<'_>) -> Markup {
    let post = params.post;
    let title = post.title.as_deref().unwrap_or_default();
    let banner = post.banner_url.as_deref().and_then(richtext::safe_image_url);
    let display_date = post.display_date();

    let meta = PostMeta {
        raw_date: post.first_publication_date.as_deref(),
        display_date: display_date.as_deref(),
        author: post.author.as_deref(),
        reading_minutes: Some(post.reading_time_minutes()),
    };

    let content = html! {
        @if let Some(ref src) = banner {
            div class="banner" {
                img src=(src) alt=(title);
            }
        }
        article class="post" {
            h1 { (title) }
            (meta)
            div class="post-content" {
                @for block in &post.content {
                    div class="content-block" {
                        @if let Some(heading) = &block.heading {
                            h2 { (heading) }
                        }
                        section { (richtext::render(&block.body)) }
                    }
                }
            }
        }
    };

    let description = post
        .summary()
        .map(|s| truncate_text(&s, 200))
        .unwrap_or_default();
    let og = OpenGraphMetadata::new(title, description, params.path)
        .with_type("article")
        .with_site_name(params.site_name)
        .with_image(banner);

    BaseLayout::new(title, params.site_name)
        .with_og_metadata(og)
        .render(content)
}

/// Render the interim page shown while a post is being generated.
///
/// The page reloads itself until the generated post is available.
#[must_use]
pub fn render_post_placeholder(site_name: &str) -> Markup {
    let content = html! {
        div class="loading" { "Carregando..." }
    };

    BaseLayout::new("Carregando", site_name)
        .with_refresh(PLACEHOLDER_REFRESH_SECS)
        .render(content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cms::ContentBlock;
    use crate::richtext::{RichTextBlock, Span};

    fn sample_post() -> ViewPostDetail {
        ViewPostDetail {
            uid: Some("hello-world".to_string()),
            first_publication_date: Some("2023-03-15T00:00:00+0000".to_string()),
            title: Some("Hello World".to_string()),
            banner_url: Some("https://images.example.com/banner.png".to_string()),
            author: Some("Ana".to_string()),
            content: vec![
                ContentBlock {
                    heading: Some("First".to_string()),
                    body: vec![RichTextBlock::paragraph("Bold start").with_span(Span::strong(0, 4))],
                },
                ContentBlock {
                    heading: Some("Second".to_string()),
                    body: vec![RichTextBlock::paragraph("<script>x</script>")],
                },
            ],
        }
    }

    fn render(post: &ViewPostDetail) -> String {
        render_post_page(&PostPageParams {
            post,
            path: "/post/hello-world",
            site_name: "spacetraveling",
        })
        .into_string()
    }

    #[test]
    fn test_render_post_page() {
        let html = render(&sample_post());

        assert!(html.contains("<title>Hello World | spacetraveling</title>"));
        assert!(html.contains("<h1>Hello World</h1>"));
        assert!(html.contains(r#"<img src="https://images.example.com/banner.png" alt="Hello World">"#));
        assert!(html.contains(">15 mar 2023</time>"));
        assert!(html.contains(r#"<span class="author">Ana</span>"#));
        assert!(html.contains(r#"<span class="reading-time">1 min</span>"#));
        assert!(html.contains("<section><p><strong>Bold</strong> start</p></section>"));
        assert!(html.contains(r#"property="og:type" content="article""#));
        assert!(!html.contains("Carregando"));
    }

    #[test]
    fn test_render_keeps_block_order_and_escapes() {
        let html = render(&sample_post());

        let first = html.find("<h2>First</h2>").unwrap();
        let second = html.find("<h2>Second</h2>").unwrap();
        assert!(first < second);
        assert!(html.contains("&lt;script&gt;x&lt;/script&gt;"));
    }

    #[test]
    fn test_render_without_banner_or_date() {
        let mut post = sample_post();
        post.banner_url = Some("javascript:alert(1)".to_string());
        post.first_publication_date = None;
        let html = render(&post);

        assert!(!html.contains("class=\"banner\""));
        assert!(!html.contains("javascript:"));
        assert!(!html.contains("<time"));
    }

    #[test]
    fn test_render_placeholder() {
        let html = render_post_placeholder("spacetraveling").into_string();
        assert!(html.contains("Carregando..."));
        assert!(html.contains(r#"<meta http-equiv="refresh" content="1">"#));
    }
}
