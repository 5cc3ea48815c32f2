//! Content-source client.
//!
//! The rest of the crate talks to the content service only through the
//! [`ContentSource`] trait; [`PrismicClient`] is the production implementation.

pub mod models;
mod prismic;

use async_trait::async_trait;
use thiserror::Error;

pub use models::{ContentBlock, ImageField, PostData, QueryOptions, QueryResponse, RawDocument};
pub use prismic::PrismicClient;

#[derive(Debug, Error)]
pub enum CmsError {
    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("content API returned {status} for {url}")]
    Status {
        status: reqwest::StatusCode,
        url: String,
    },
    #[error("failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("content API did not advertise a master ref")]
    NoMasterRef,
    #[error("invalid content API URL {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

/// Read access to the headless CMS.
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Query documents of one custom type, newest first as the service orders them.
    async fn query_by_type(
        &self,
        doc_type: &str,
        options: &QueryOptions,
    ) -> Result<QueryResponse, CmsError>;

    /// Fetch a single document by its uid. `Ok(None)` when no document matches.
    async fn get_by_uid(&self, doc_type: &str, uid: &str) -> Result<Option<RawDocument>, CmsError>;

    /// Follow a `next_page` URL from a previous [`QueryResponse`].
    async fn fetch_page(&self, url: &str) -> Result<QueryResponse, CmsError>;
}
