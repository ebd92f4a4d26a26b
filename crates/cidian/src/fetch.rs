//! Document fetching.
//!
//! Plain HTTP GETs, no browser. Every request is bounded by the configured
//! timeout and is never retried.

use async_trait::async_trait;
use scraper::Html;
use url::Url;

use crate::config::FetchConfig;
use crate::error::FetchError;

/// A fetched HTML document.
#[derive(Debug, Clone)]
pub struct FetchedDocument {
    /// Final URL after HTTP redirects; relative links resolve against it.
    pub base_url: Url,
    /// Response body as text.
    pub body: String,
}

impl FetchedDocument {
    /// Parse the body into a queryable tree.
    ///
    /// The tree is not `Send`; parse, query and drop it between awaits.
    pub fn parse(&self) -> Html {
        Html::parse_document(&self.body)
    }

    /// Resolve a possibly relative link against the document's URL.
    pub fn resolve_link(&self, href: &str) -> Option<Url> {
        self.base_url.join(href).ok()
    }
}

/// Retrieves documents by absolute URL.
#[async_trait]
pub trait DocumentFetcher: Send + Sync {
    async fn fetch(&self, url: &Url) -> Result<FetchedDocument, FetchError>;
}

/// reqwest-backed fetcher.
#[derive(Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Build a client with the configured timeout, redirect limit and user agent.
    pub fn new(config: &FetchConfig) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(FetchError::Client)?;

        Ok(Self { client })
    }
}

#[async_trait]
impl DocumentFetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> Result<FetchedDocument, FetchError> {
        tracing::debug!("GET {url}");

        let resp = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(url.as_str(), e))?;

        let status = resp.status();
        let base_url = resp.url().clone();
        tracing::debug!("{} {base_url}", status.as_u16());

        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = resp
            .text()
            .await
            .map_err(|e| FetchError::from_reqwest(url.as_str(), e))?;

        Ok(FetchedDocument { base_url, body })
    }
}
