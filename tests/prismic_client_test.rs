//! Integration tests for the Prismic content client.

use std::time::Duration;

use headless_blog::cms::{CmsError, ContentSource, PrismicClient, QueryOptions};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_api_root(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/v2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "refs": [
                { "id": "preview", "ref": "PREVIEW", "isMasterRef": false },
                { "id": "master", "ref": "MASTER", "isMasterRef": true }
            ]
        })))
        .mount(server)
        .await;
}

fn client(server: &MockServer) -> PrismicClient {
    PrismicClient::new(
        &format!("{}/api/v2", server.uri()),
        None,
        Duration::from_secs(5),
    )
    .expect("Failed to create client")
}

#[tokio::test]
async fn test_query_by_type_uses_master_ref() {
    let server = MockServer::start().await;
    mount_api_root(&server).await;

    Mock::given(method("GET"))
        .and(path("/api/v2/documents/search"))
        .and(query_param("ref", "MASTER"))
        .and(query_param("q", r#"[[at(document.type,"posts")]]"#))
        .and(query_param("pageSize", "5"))
        .and(query_param("fetch", "posts.title,posts.subtitle,posts.author"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "page": 1,
            "results_per_page": 5,
            "results_size": 1,
            "total_results_size": 6,
            "total_pages": 2,
            "next_page": "https://blog.cdn.prismic.io/api/v2/documents/search?page=2",
            "results": [
                {
                    "id": "YF",
                    "uid": "como-utilizar-hooks",
                    "type": "posts",
                    "first_publication_date": "2021-03-15T19:25:28+0000",
                    "data": { "title": "Como utilizar Hooks", "author": "Joseph Oliveira" }
                }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let options = QueryOptions::first_page(5)
        .with_fetch(["posts.title", "posts.subtitle", "posts.author"]);
    let response = client(&server)
        .query_by_type("posts", &options)
        .await
        .expect("query failed");

    assert_eq!(response.total_results_size, 6);
    assert_eq!(
        response.next_page.as_deref(),
        Some("https://blog.cdn.prismic.io/api/v2/documents/search?page=2")
    );
    let doc = &response.results[0];
    assert_eq!(doc.uid.as_deref(), Some("como-utilizar-hooks"));
    assert_eq!(doc.data.title.as_deref(), Some("Como utilizar Hooks"));
    assert_eq!(doc.data.subtitle, None);
    assert!(doc.data.content.is_empty());
}

#[tokio::test]
async fn test_get_by_uid() {
    let server = MockServer::start().await;
    mount_api_root(&server).await;

    Mock::given(method("GET"))
        .and(path("/api/v2/documents/search"))
        .and(query_param("q", r#"[[at(my.posts.uid,"hello-world")]]"#))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [
                {
                    "id": "X1",
                    "uid": "hello-world",
                    "type": "posts",
                    "data": {
                        "title": "Hello World",
                        "banner": {},
                        "content": [
                            {
                                "heading": "Intro",
                                "body": [
                                    { "type": "heading3", "text": "Sub", "spans": [] },
                                    { "type": "mystery-block", "text": "?" }
                                ]
                            }
                        ]
                    }
                }
            ]
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v2/documents/search"))
        .and(query_param("q", r#"[[at(my.posts.uid,"nope")]]"#))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "results": [] })))
        .mount(&server)
        .await;

    let client = client(&server);

    let doc = client
        .get_by_uid("posts", "hello-world")
        .await
        .expect("lookup failed")
        .expect("document exists");
    assert_eq!(doc.data.title.as_deref(), Some("Hello World"));
    assert_eq!(doc.first_publication_date, None);
    assert_eq!(doc.data.banner.and_then(|b| b.url), None);
    assert_eq!(doc.data.content[0].body.len(), 2);

    let missing = client.get_by_uid("posts", "nope").await.expect("lookup failed");
    assert!(missing.is_none());
}

#[tokio::test]
async fn test_fetch_page_follows_next_page_url() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/documents/search"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "page": 2,
            "next_page": null,
            "results": [ { "id": "Z", "uid": "last", "type": "posts", "data": {} } ]
        })))
        .mount(&server)
        .await;

    let url = format!("{}/api/v2/documents/search?ref=MASTER&page=2", server.uri());
    let response = client(&server).fetch_page(&url).await.expect("fetch failed");

    assert_eq!(response.page, 2);
    assert!(response.next_page.is_none());
    assert_eq!(response.results[0].uid.as_deref(), Some("last"));
}

#[tokio::test]
async fn test_error_status_is_reported() {
    let server = MockServer::start().await;
    mount_api_root(&server).await;

    Mock::given(method("GET"))
        .and(path("/api/v2/documents/search"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let result = client(&server)
        .query_by_type("posts", &QueryOptions::first_page(5))
        .await;

    match result {
        Err(CmsError::Status { status, .. }) => assert_eq!(status.as_u16(), 500),
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_missing_master_ref() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "refs": [] })))
        .mount(&server)
        .await;

    let result = client(&server)
        .query_by_type("posts", &QueryOptions::first_page(5))
        .await;
    assert!(matches!(result, Err(CmsError::NoMasterRef)));
}

#[tokio::test]
async fn test_malformed_body_is_decode_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/documents/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let url = format!("{}/api/v2/documents/search?page=2", server.uri());
    let result = client(&server).fetch_page(&url).await;
    assert!(matches!(result, Err(CmsError::Decode { .. })));
}
