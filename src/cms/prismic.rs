use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, warn};
use url::Url;

use super::{CmsError, ContentSource, QueryOptions, QueryResponse, RawDocument};
use crate::config::Config;

const USER_AGENT: &str = concat!("headless-blog/", env!("CARGO_PKG_VERSION"));

/// Client for the Prismic REST API (v2).
///
/// Every search is pinned to the repository's current master ref, which is
/// looked up from the API root before each query so newly published content
/// shows up on the next generation.
#[derive(Debug, Clone)]
pub struct PrismicClient {
    client: Client,
    endpoint: Url,
    access_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiRoot {
    #[serde(default)]
    refs: Vec<ApiRef>,
}

#[derive(Debug, Deserialize)]
struct ApiRef {
    #[serde(rename = "ref")]
    reference: String,
    #[serde(rename = "isMasterRef", default)]
    is_master_ref: bool,
}

impl PrismicClient {
    /// Create a client for the API root at `endpoint`.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint is not a valid URL or the HTTP client
    /// cannot be built.
    pub fn new(
        endpoint: &str,
        access_token: Option<String>,
        timeout: Duration,
    ) -> Result<Self, CmsError> {
        let endpoint = Url::parse(endpoint.trim_end_matches('/')).map_err(|source| {
            CmsError::InvalidUrl {
                url: endpoint.to_string(),
                source,
            }
        })?;
        if endpoint.cannot_be_a_base() {
            return Err(not_a_base(&endpoint));
        }

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|source| CmsError::Http {
                url: endpoint.to_string(),
                source,
            })?;

        Ok(Self {
            client,
            endpoint,
            access_token,
        })
    }

    /// Create a client from application configuration.
    ///
    /// # Errors
    ///
    /// See [`PrismicClient::new`].
    pub fn from_config(config: &Config) -> Result<Self, CmsError> {
        Self::new(
            &config.prismic_api_endpoint,
            config.prismic_access_token.clone(),
            config.http_timeout,
        )
    }

    /// Look up the current master ref.
    async fn master_ref(&self) -> Result<String, CmsError> {
        let mut url = self.endpoint.clone();
        if let Some(token) = &self.access_token {
            url.query_pairs_mut().append_pair("access_token", token);
        }

        let root: ApiRoot = self.get_json(url).await?;
        root.refs
            .into_iter()
            .find(|r| r.is_master_ref)
            .map(|r| r.reference)
            .ok_or(CmsError::NoMasterRef)
    }

    /// Build a `documents/search` URL for `predicate`.
    fn search_url(
        &self,
        master_ref: &str,
        predicate: &str,
        options: &QueryOptions,
    ) -> Result<Url, CmsError> {
        let mut url = self.endpoint.clone();
        url.path_segments_mut()
            .map_err(|()| not_a_base(&self.endpoint))?
            .pop_if_empty()
            .extend(["documents", "search"]);

        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("ref", master_ref)
                .append_pair("q", &format!("[{predicate}]"))
                .append_pair("pageSize", &options.page_size.to_string())
                .append_pair("page", &options.page.to_string());
            if !options.fetch.is_empty() {
                query.append_pair("fetch", &options.fetch.join(","));
            }
            if let Some(token) = &self.access_token {
                query.append_pair("access_token", token);
            }
        }
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, CmsError> {
        debug!(url = %url, "Querying content API");

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|source| CmsError::Http {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!(url = %url, status = %status, "Content API request failed");
            return Err(CmsError::Status {
                status,
                url: url.to_string(),
            });
        }

        response.json().await.map_err(|source| CmsError::Decode {
            url: url.to_string(),
            source,
        })
    }
}

/// Error for an endpoint such as `mailto:` that has no path to extend.
fn not_a_base(url: &Url) -> CmsError {
    CmsError::InvalidUrl {
        url: url.to_string(),
        source: url::ParseError::RelativeUrlWithCannotBeABaseBase,
    }
}

/// Prismic predicate `at(path, "value")`.
fn at_predicate(path: &str, value: &str) -> String {
    let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
    format!(r#"[at({path},"{escaped}")]"#)
}

#[async_trait]
impl ContentSource for PrismicClient {
    async fn query_by_type(
        &self,
        doc_type: &str,
        options: &QueryOptions,
    ) -> Result<QueryResponse, CmsError> {
        let master_ref = self.master_ref().await?;
        let url = self.search_url(
            &master_ref,
            &at_predicate("document.type", doc_type),
            options,
        )?;
        self.get_json(url).await
    }

    async fn get_by_uid(&self, doc_type: &str, uid: &str) -> Result<Option<RawDocument>, CmsError> {
        let master_ref = self.master_ref().await?;
        let url = self.search_url(
            &master_ref,
            &at_predicate(&format!("my.{doc_type}.uid"), uid),
            &QueryOptions::first_page(1),
        )?;
        let response: QueryResponse = self.get_json(url).await?;
        Ok(response.results.into_iter().next())
    }

    async fn fetch_page(&self, url: &str) -> Result<QueryResponse, CmsError> {
        let url = Url::parse(url).map_err(|source| CmsError::InvalidUrl {
            url: url.to_string(),
            source,
        })?;
        self.get_json(url).await
    }
}
