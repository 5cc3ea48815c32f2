//! Card components for the post listing.

use maud::{html, Markup, Render};

use crate::view::ViewPost;

/// Publication date and author line shared by cards and the post header.
#[derive(Debug, Clone, Copy)]
pub struct PostMeta<'a> {
    pub raw_date: Option<&'a str>,
    pub display_date: Option<&'a str>,
    pub author: Option<&'a str>,
    pub reading_minutes: Option<usize>,
}

impl Render for PostMeta<'_> {
    fn render(&self) -> Markup {
        html! {
            div class="post-meta" {
                @if let Some(date) = self.display_date {
                    time datetime=[self.raw_date] { (date) }
                }
                @if let Some(author) = self.author {
                    span class="author" { (author) }
                }
                @if let Some(minutes) = self.reading_minutes {
                    span class="reading-time" { (minutes) " min" }
                }
            }
        }
    }
}

/// A post summary card in the listing.
///
/// `index` is the post's position in the listing and becomes the card's
/// anchor (`#post-{index}`), so a freshly loaded batch can be scrolled to.
#[derive(Debug, Clone)]
pub struct PostCard<'a> {
    pub post: &'a ViewPost,
    pub index: usize,
}

impl<'a> PostCard<'a> {
    #[must_use]
    pub const fn new(post: &'a ViewPost, index: usize) -> Self {
        Self { post, index }
    }
}

impl Render for PostCard<'_> {
    fn render(&self) -> Markup {
        let data = &self.post.data;
        let display_date = self.post.display_date();
        let meta = PostMeta {
            raw_date: self.post.first_publication_date.as_deref(),
            display_date: display_date.as_deref(),
            author: data.author.as_deref(),
            reading_minutes: None,
        };
        let body = html! {
            strong class="post-title" { (data.title.as_deref().unwrap_or_default()) }
            @if let Some(subtitle) = &data.subtitle {
                p class="post-subtitle" { (subtitle) }
            }
        };

        html! {
            article class="post-card" id=(format!("post-{}", self.index)) {
                @if let Some(href) = self.post.href() {
                    a href=(href) { (body) }
                } @else {
                    (body)
                }
                (meta)
            }
        }
    }
}

/// The list of post cards.
#[derive(Debug, Clone)]
pub struct PostList<'a> {
    pub posts: &'a [ViewPost],
}

impl<'a> PostList<'a> {
    #[must_use]
    pub const fn new(posts: &'a [ViewPost]) -> Self {
        Self { posts }
    }
}

impl Render for PostList<'_> {
    fn render(&self) -> Markup {
        html! {
            div class="post-list" {
                @for (index, post) in self.posts.iter().enumerate() {
                    (PostCard::new(post, index))
                }
            }
        }
    }
}

/// An empty state component for when there is nothing to show.
#[derive(Debug, Clone)]
pub struct EmptyState<'a> {
    pub message: &'a str,
}

impl<'a> EmptyState<'a> {
    #[must_use]
    pub const fn new(message: &'a str) -> Self {
        Self { message }
    }

    /// Default "no posts" empty state.
    #[must_use]
    pub const fn no_posts() -> Self {
        Self::new("Nenhum post publicado ainda.")
    }
}

impl Render for EmptyState<'_> {
    fn render(&self) -> Markup {
        html! {
            p class="empty-state" { (self.message) }
        }
    }
}
