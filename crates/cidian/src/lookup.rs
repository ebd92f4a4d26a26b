//! The lookup pipeline: fetch, resolve script, extract.
//!
//! ```text
//! START → FETCHED → [REDIRECTED → FETCHED_CANONICAL] → EXTRACTED → DONE
//! ```
//!
//! Strictly sequential, at most two fetches, no retries. Nothing is shared
//! between lookups.

use crate::config::Config;
use crate::error::{ConfigError, LookupError, LookupResult};
use crate::extractor;
use crate::fetch::{DocumentFetcher, HttpFetcher};
use crate::layout::{PageLayout, WiktionaryLayout};
use crate::resolver;
use crate::types::LookupOutcome;

/// A dictionary site reached through a fetcher and described by a layout.
pub struct Dictionary<F = HttpFetcher, L = WiktionaryLayout> {
    fetcher: F,
    layout: L,
}

impl Dictionary {
    /// HTTP fetcher and Wiktionary layout as configured.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let fetcher = HttpFetcher::new(&config.fetch)?;
        let layout = WiktionaryLayout::from_config(&config.dictionary)?;
        Ok(Self::new(fetcher, layout))
    }
}

impl<F: DocumentFetcher, L: PageLayout> Dictionary<F, L> {
    pub fn new(fetcher: F, layout: L) -> Self {
        Self { fetcher, layout }
    }

    /// Look up one word.
    ///
    /// `Ok(NotFound)` when the dictionary has no article; `Err` for transport
    /// failures and broken cross-references.
    pub async fn lookup(&self, query: &str) -> LookupResult<LookupOutcome> {
        let query = query.trim();
        if query.is_empty() {
            return Err(LookupError::EmptyQuery);
        }

        let url = self.layout.article_url(query)?;
        tracing::debug!("{query}: START {url}");

        let initial = match self.fetcher.fetch(&url).await {
            Ok(doc) => doc,
            Err(e) if e.status() == Some(404) => {
                tracing::info!("{query}: no article ({e})");
                return Ok(LookupOutcome::NotFound {
                    query: query.to_string(),
                });
            }
            Err(e) => return Err(e.into()),
        };
        tracing::debug!("{query}: FETCHED {}", initial.base_url);

        let resolution = resolver::resolve(query, initial, &self.fetcher, &self.layout).await?;
        if resolution.redirected {
            tracing::debug!(
                "{query}: REDIRECTED → FETCHED_CANONICAL {}",
                resolution.canonical.base_url
            );
        }

        let doc = resolution.canonical.parse();
        let outcome = extractor::extract(&self.layout, &doc, resolution.entry);
        tracing::debug!("{query}: EXTRACTED → DONE (found: {})", outcome.is_found());

        Ok(outcome)
    }
}
