//! "Load more" control for the post listing.
//!
//! The control is a plain form so it works without JavaScript. Posting it
//! asks the server to append the next batch to the visitor's listing session.

use maud::{html, Markup, Render};

use crate::listing::SessionId;

/// Label shown on the trigger.
const LOAD_MORE_LABEL: &str = "Carregar mais posts";

/// Form button that requests the next batch of posts.
///
/// Renders nothing when there is no next page.
#[derive(Debug, Clone)]
pub struct LoadMore<'a> {
    /// Whether the listing has a next page.
    pub has_more: bool,
    /// Session to append to; `None` starts a new session.
    pub session: Option<&'a SessionId>,
}

impl<'a> LoadMore<'a> {
    #[must_use]
    pub const fn new(has_more: bool) -> Self {
        Self {
            has_more,
            session: None,
        }
    }

    #[must_use]
    pub const fn with_session(mut self, session: Option<&'a SessionId>) -> Self {
        self.session = session;
        self
    }

    /// Check if the control should be displayed.
    #[must_use]
    pub const fn should_display(&self) -> bool {
        self.has_more
    }
}

impl Render for LoadMore<'_> {
    fn render(&self) -> Markup {
        if !self.should_display() {
            return html! {};
        }

        html! {
            form class="load-more" method="post" action="/listing/more" {
                @if let Some(session) = self.session {
                    input type="hidden" name="session" value=(session.as_str());
                }
                button type="submit" class="load-more-button" { (LOAD_MORE_LABEL) }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_hidden_without_next_page() {
        let html = LoadMore::new(false).render().into_string();
        assert!(html.is_empty());
    }

    #[test]
    fn test_render_without_session() {
        let html = LoadMore::new(true).render().into_string();
        assert!(html.contains(r#"<form class="load-more" method="post" action="/listing/more">"#));
        assert!(html.contains("Carregar mais posts"));
        assert!(!html.contains(r#"name="session""#));
    }

    #[test]
    fn test_render_with_session() {
        let session = SessionId::parse("abcdefghijklmnopqrstuv").unwrap();
        let html = LoadMore::new(true)
            .with_session(Some(&session))
            .render()
            .into_string();
        assert!(html.contains(r#"<input type="hidden" name="session" value="abcdefghijklmnopqrstuv">"#));
    }
}
