//! Wire types for documents returned by the content service.

use serde::{Deserialize, Serialize};

use crate::richtext::RichTextBlock;

/// A content document as returned by the content API.
///
/// Every `data` field is optional: the service omits fields that were never
/// filled in, and the projection into view models carries that absence
/// through instead of failing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawDocument {
    pub id: String,
    #[serde(default)]
    pub uid: Option<String>,
    #[serde(rename = "type", default)]
    pub doc_type: String,
    #[serde(default)]
    pub first_publication_date: Option<String>,
    #[serde(default)]
    pub last_publication_date: Option<String>,
    #[serde(default)]
    pub data: PostData,
}

/// Typed field bag of a post document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostData {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub banner: Option<ImageField>,
    #[serde(default)]
    pub content: Vec<ContentBlock>,
}

/// An image field. The service sends `{}` for an empty image.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageField {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub alt: Option<String>,
}

/// One section of a post body: a heading followed by rich text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentBlock {
    #[serde(default)]
    pub heading: Option<String>,
    #[serde(default)]
    pub body: Vec<RichTextBlock>,
}

/// A page of search results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryResponse {
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub results_per_page: u32,
    #[serde(default)]
    pub results_size: u32,
    #[serde(default)]
    pub total_results_size: u32,
    #[serde(default)]
    pub total_pages: u32,
    /// Fully-qualified URL of the following page, `None` on the last page.
    #[serde(default)]
    pub next_page: Option<String>,
    #[serde(default)]
    pub prev_page: Option<String>,
    #[serde(default)]
    pub results: Vec<RawDocument>,
}

impl QueryResponse {
    /// A single page holding `results` with no neighbours.
    #[must_use]
    pub fn single_page(results: Vec<RawDocument>) -> Self {
        let size = u32::try_from(results.len()).unwrap_or(u32::MAX);
        Self {
            page: 1,
            results_per_page: size,
            results_size: size,
            total_results_size: size,
            total_pages: 1,
            next_page: None,
            prev_page: None,
            results,
        }
    }
}

/// Options for a query by document type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryOptions {
    /// 1-based page number.
    pub page: u32,
    pub page_size: u32,
    /// Restrict returned fields, e.g. `posts.title`. Empty means all fields.
    pub fetch: Vec<String>,
}

impl QueryOptions {
    #[must_use]
    pub fn first_page(page_size: u32) -> Self {
        Self {
            page: 1,
            page_size,
            fetch: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_fetch<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fetch = fields.into_iter().map(Into::into).collect();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_search_response() {
        let json = r#"{
            "page": 1,
            "results_per_page": 2,
            "results_size": 2,
            "total_results_size": 5,
            "total_pages": 3,
            "next_page": "https://blog.cdn.prismic.io/api/v2/documents/search?page=2",
            "prev_page": null,
            "license": "All Rights Reserved",
            "results": [
                {
                    "id": "YA1",
                    "uid": "hello-world",
                    "type": "posts",
                    "href": "https://blog.cdn.prismic.io/api/v2/documents/search?ref=x",
                    "tags": [],
                    "first_publication_date": "2021-03-15T19:25:28+0000",
                    "last_publication_date": "2021-03-16T19:25:28+0000",
                    "lang": "pt-br",
                    "data": {
                        "title": "Hello",
                        "subtitle": "First post",
                        "author": "Ana",
                        "banner": {"url": "https://images.prismic.io/a.png", "dimensions": {"width": 1, "height": 1}},
                        "content": [
                            {"heading": "Intro", "body": [{"type": "paragraph", "text": "Hi", "spans": []}]}
                        ]
                    }
                },
                {"id": "YA2", "uid": null, "type": "posts", "first_publication_date": null, "data": {"banner": {}}}
            ]
        }"#;

        let response: QueryResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.total_pages, 3);
        assert!(response.next_page.is_some());
        assert_eq!(response.prev_page, None);

        let first = &response.results[0];
        assert_eq!(first.uid.as_deref(), Some("hello-world"));
        assert_eq!(first.data.title.as_deref(), Some("Hello"));
        assert_eq!(first.data.content.len(), 1);
        assert_eq!(first.data.content[0].heading.as_deref(), Some("Intro"));

        let second = &response.results[1];
        assert_eq!(second.uid, None);
        assert_eq!(second.data.title, None);
        assert_eq!(second.data.banner, Some(ImageField::default()));
        assert!(second.data.content.is_empty());
    }

    #[test]
    fn test_query_options_builder() {
        let options = QueryOptions::first_page(5).with_fetch(["posts.title", "posts.author"]);
        assert_eq!(options.page, 1);
        assert_eq!(options.page_size, 5);
        assert_eq!(options.fetch, vec!["posts.title", "posts.author"]);
    }
}
