//! Open Graph and Twitter Card metadata components.

use maud::{html, Markup};

/// Open Graph metadata for link previews.
///
/// Generates both Open Graph and Twitter Card meta tags.
#[derive(Debug, Clone)]
pub struct OpenGraphMetadata {
    /// Page title (og:title)
    pub title: String,
    /// Page description (og:description)
    pub description: String,
    /// Page URL (og:url)
    pub url: String,
    /// Open Graph type (og:type) - e.g., "website", "article"
    pub og_type: String,
    /// Image URL (og:image)
    pub image: Option<String>,
    /// Site name (og:site_name)
    pub site_name: Option<String>,
}

impl OpenGraphMetadata {
    /// Create a new metadata builder.
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            url: url.into(),
            og_type: "website".to_string(),
            image: None,
            site_name: None,
        }
    }

    /// Set the Open Graph type.
    #[must_use]
    pub fn with_type(mut self, og_type: impl Into<String>) -> Self {
        self.og_type = og_type.into();
        self
    }

    /// Set the image URL.
    #[must_use]
    pub fn with_image(mut self, image: Option<impl Into<String>>) -> Self {
        self.image = image.map(Into::into);
        self
    }

    /// Set the site name.
    #[must_use]
    pub fn with_site_name(mut self, site_name: impl Into<String>) -> Self {
        self.site_name = Some(site_name.into());
        self
    }

    /// Render the metadata tags.
    pub fn render(&self) -> Markup {
        let twitter_card = if self.image.is_some() {
            "summary_large_image"
        } else {
            "summary"
        };

        html! {
            meta property="og:title" content=(&self.title);
            meta property="og:description" content=(&self.description);
            meta property="og:url" content=(&self.url);
            meta property="og:type" content=(&self.og_type);
            @if let Some(ref site_name) = self.site_name {
                meta property="og:site_name" content=(site_name);
            }
            @if let Some(ref image_url) = self.image {
                meta property="og:image" content=(image_url);
            }

            meta name="twitter:card" content=(twitter_card);
            meta name="twitter:title" content=(&self.title);
            meta name="twitter:description" content=(&self.description);
            @if let Some(ref image_url) = self.image {
                meta name="twitter:image" content=(image_url);
            }

            meta name="description" content=(&self.description);
        }
    }
}

/// Truncate text to at most `max_len` characters, ending with an ellipsis.
#[must_use]
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() <= max_len {
        text.to_string()
    } else {
        let mut truncated = text
            .chars()
            .take(max_len.saturating_sub(3))
            .collect::<String>();
        truncated.push_str("...");
        truncated
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_basic() {
        let meta = OpenGraphMetadata::new("Test Page", "A test page description", "/test");
        let html = meta.render().into_string();

        assert!(html.contains(r#"property="og:title" content="Test Page""#));
        assert!(html.contains(r#"property="og:description" content="A test page description""#));
        assert!(html.contains(r#"property="og:url" content="/test""#));
        assert!(html.contains(r#"property="og:type" content="website""#));
        assert!(html.contains(r#"name="twitter:card" content="summary""#));
        assert!(!html.contains("og:site_name"));
    }

    #[test]
    fn test_render_article_with_image() {
        let meta = OpenGraphMetadata::new("Post", "Description", "/post/a")
            .with_type("article")
            .with_site_name("spacetraveling")
            .with_image(Some("https://example.com/banner.jpg"));
        let html = meta.render().into_string();

        assert!(html.contains(r#"property="og:type" content="article""#));
        assert!(html.contains(r#"property="og:site_name" content="spacetraveling""#));
        assert!(html.contains(r#"property="og:image" content="https://example.com/banner.jpg""#));
        assert!(html.contains(r#"name="twitter:card" content="summary_large_image""#));
    }

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("Hello", 10), "Hello");
        assert_eq!(truncate_text("Hello World", 8), "Hello...");
        assert_eq!(truncate_text("Test", 4), "Test");
        assert_eq!(truncate_text("Ação rápida", 7), "Ação...");
    }
}
