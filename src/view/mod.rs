//! Display-ready projections of content documents.
//!
//! Projection is plain field selection: whatever the document carries is
//! copied verbatim, whatever it lacks stays `None`. Nothing here validates or
//! fails.

pub mod dates;

use serde::Serialize;

use crate::cms::{ContentBlock, RawDocument};
use crate::richtext;

pub use dates::{format_publication_date, parse_timestamp};

/// Average reading speed used for the reading-time estimate.
const WORDS_PER_MINUTE: usize = 200;

/// A post as shown in the listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewPost {
    pub uid: Option<String>,
    pub first_publication_date: Option<String>,
    pub data: ViewPostData,
}

/// The three listing fields of a post.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ViewPostData {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub author: Option<String>,
}

impl ViewPost {
    /// Project a document into its listing view.
    #[must_use]
    pub fn from_document(doc: &RawDocument) -> Self {
        Self {
            uid: doc.uid.clone(),
            first_publication_date: doc.first_publication_date.clone(),
            data: ViewPostData {
                title: doc.data.title.clone(),
                subtitle: doc.data.subtitle.clone(),
                author: doc.data.author.clone(),
            },
        }
    }

    /// Link to the post's detail page, if it has a uid.
    #[must_use]
    pub fn href(&self) -> Option<String> {
        self.uid
            .as_deref()
            .map(|uid| format!("/post/{}", urlencoding::encode(uid)))
    }

    /// Publication date formatted for display.
    #[must_use]
    pub fn display_date(&self) -> Option<String> {
        self.first_publication_date
            .as_deref()
            .and_then(format_publication_date)
    }
}

/// A post as shown on its own page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewPostDetail {
    pub uid: Option<String>,
    pub first_publication_date: Option<String>,
    pub title: Option<String>,
    pub banner_url: Option<String>,
    pub author: Option<String>,
    /// Body sections in source order.
    pub content: Vec<ContentBlock>,
}

impl ViewPostDetail {
    /// Project a document into its detail view.
    #[must_use]
    pub fn from_document(doc: &RawDocument) -> Self {
        Self {
            uid: doc.uid.clone(),
            first_publication_date: doc.first_publication_date.clone(),
            title: doc.data.title.clone(),
            banner_url: doc.data.banner.as_ref().and_then(|b| b.url.clone()),
            author: doc.data.author.clone(),
            content: doc.data.content.clone(),
        }
    }

    #[must_use]
    pub fn display_date(&self) -> Option<String> {
        self.first_publication_date
            .as_deref()
            .and_then(format_publication_date)
    }

    /// Estimated reading time in whole minutes, rounded up.
    ///
    /// Counts words in every heading and body. Zero only for an empty post.
    #[must_use]
    pub fn reading_time_minutes(&self) -> usize {
        let words: usize = self
            .content
            .iter()
            .map(|block| {
                let heading = block.heading.as_deref().map_or(0, count_words);
                heading + count_words(&richtext::as_text(&block.body))
            })
            .sum();
        words.div_ceil(WORDS_PER_MINUTE)
    }

    /// Plain-text summary for link previews: the first paragraph of the body.
    #[must_use]
    pub fn summary(&self) -> Option<String> {
        self.content
            .iter()
            .flat_map(|block| &block.body)
            .map(|b| b.text.trim())
            .find(|text| !text.is_empty())
            .map(String::from)
    }
}

fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cms::testing::post;
    use crate::cms::PostData;
    use crate::richtext::RichTextBlock;

    #[test]
    fn test_project_listing_fields_verbatim() {
        let doc = post("hello-world", "Hello");
        let view = ViewPost::from_document(&doc);

        assert_eq!(view.uid.as_deref(), Some("hello-world"));
        assert_eq!(
            view.first_publication_date.as_deref(),
            Some("2023-03-15T00:00:00+0000")
        );
        assert_eq!(view.data.title.as_deref(), Some("Hello"));
        assert_eq!(view.data.subtitle.as_deref(), Some("About Hello"));
        assert_eq!(view.data.author.as_deref(), Some("Ana"));
    }

    #[test]
    fn test_project_listing_drops_extra_fields() {
        let view = ViewPost::from_document(&post("hello-world", "Hello"));
        let json = serde_json::to_value(&view).unwrap();

        let mut top: Vec<&str> = json.as_object().unwrap().keys().map(String::as_str).collect();
        top.sort_unstable();
        assert_eq!(top, ["data", "first_publication_date", "uid"]);

        let mut data: Vec<&str> = json["data"]
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        data.sort_unstable();
        assert_eq!(data, ["author", "subtitle", "title"]);
    }

    #[test]
    fn test_project_is_idempotent() {
        let doc = post("a", "A");
        assert_eq!(ViewPost::from_document(&doc), ViewPost::from_document(&doc));
        assert_eq!(
            ViewPostDetail::from_document(&doc),
            ViewPostDetail::from_document(&doc)
        );
    }

    #[test]
    fn test_project_missing_fields_propagate() {
        let doc = RawDocument {
            id: "x".to_string(),
            uid: None,
            doc_type: "posts".to_string(),
            first_publication_date: None,
            last_publication_date: None,
            data: PostData::default(),
        };

        let view = ViewPost::from_document(&doc);
        assert_eq!(view.data, ViewPostData::default());
        assert_eq!(view.href(), None);
        assert_eq!(view.display_date(), None);

        let detail = ViewPostDetail::from_document(&doc);
        assert_eq!(detail.banner_url, None);
        assert!(detail.content.is_empty());
        assert_eq!(detail.reading_time_minutes(), 0);
    }

    #[test]
    fn test_detail_preserves_block_order() {
        let mut doc = post("a", "A");
        doc.data.content = ["Third", "First", "Third"]
            .into_iter()
            .map(|h| ContentBlock {
                heading: Some(h.to_string()),
                body: Vec::new(),
            })
            .collect();

        let detail = ViewPostDetail::from_document(&doc);
        let headings: Vec<_> = detail
            .content
            .iter()
            .map(|b| b.heading.as_deref().unwrap())
            .collect();
        assert_eq!(headings, ["Third", "First", "Third"]);
        assert_eq!(
            detail.banner_url.as_deref(),
            Some("https://images.example.com/a.png")
        );
    }

    #[test]
    fn test_reading_time() {
        let mut doc = post("a", "A");
        let body = vec!["word"; 399].join(" ");
        doc.data.content = vec![ContentBlock {
            heading: Some("Two words".to_string()),
            body: vec![RichTextBlock::paragraph(body)],
        }];
        // 401 words at 200 per minute
        assert_eq!(ViewPostDetail::from_document(&doc).reading_time_minutes(), 3);
    }

    #[test]
    fn test_href_is_encoded() {
        let view = ViewPost::from_document(&post("olá mundo", "Hi"));
        assert_eq!(view.href().as_deref(), Some("/post/ol%C3%A1%20mundo"));
    }

    #[test]
    fn test_summary() {
        let detail = ViewPostDetail::from_document(&post("a", "A"));
        assert_eq!(detail.summary().as_deref(), Some("Some words here"));
    }
}
