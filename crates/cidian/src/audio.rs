//! Pronunciation-audio link discovery.
//!
//! Finds the MP3 download URL for a word on Forvo or ChinesePod from their
//! public pages. Signing in and downloading the file are left to the caller.

use std::fmt;
use std::str::FromStr;

use scraper::Selector;
use url::Url;

use crate::config::AudioConfig;
use crate::dom;
use crate::error::{AudioError, ConfigError};
use crate::fetch::{DocumentFetcher, FetchedDocument};

/// Sites that host pronunciation recordings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioSite {
    Forvo,
    ChinesePod,
}

impl fmt::Display for AudioSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AudioSite::Forvo => write!(f, "forvo"),
            AudioSite::ChinesePod => write!(f, "chinesepod"),
        }
    }
}

impl FromStr for AudioSite {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "forvo" => Ok(AudioSite::Forvo),
            "chinesepod" | "cp" => Ok(AudioSite::ChinesePod),
            other => Err(format!("unknown audio site: {other} (expected forvo or chinesepod)")),
        }
    }
}

/// A located recording.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioLink {
    pub site: AudioSite,
    pub word: String,
    /// Direct MP3 download URL.
    pub url: Url,
    /// Suggested local file name, e.g. `关系_3778024.mp3`.
    pub file_name: String,
}

/// Locates recordings through a document fetcher.
pub struct AudioFinder<F> {
    fetcher: F,
    forvo_base: Url,
    chinesepod_base: Url,
    forvo_word: Selector,
    forvo_download: Selector,
    chinesepod_download: Selector,
}

impl<F: DocumentFetcher> AudioFinder<F> {
    pub fn new(fetcher: F, config: &AudioConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            fetcher,
            forvo_base: parse_base(&config.forvo_base)?,
            chinesepod_base: parse_base(&config.chinesepod_base)?,
            forvo_word: dom::compile("forvo_word", "a.word")?,
            forvo_download: dom::compile("forvo_download", "span[title*=Download]")?,
            chinesepod_download: dom::compile("chinesepod_download", "a[href*=redirect]")?,
        })
    }

    /// Find the recording of `word` on `site`.
    pub async fn find(&self, site: AudioSite, word: &str) -> Result<AudioLink, AudioError> {
        match site {
            AudioSite::Forvo => self.find_forvo(word).await,
            AudioSite::ChinesePod => self.find_chinesepod(word).await,
        }
    }

    /// Search page → first word page → download span.
    async fn find_forvo(&self, word: &str) -> Result<AudioLink, AudioError> {
        let search_url = with_segments(&self.forvo_base, &["search", word, ""])?;
        let search = self.fetcher.fetch(&search_url).await?;
        let word_url = self.forvo_word_page(&search)?;
        tracing::debug!("forvo: {word} → {word_url}");

        let page = self.fetcher.fetch(&word_url).await?;
        self.forvo_link(&page, word)
    }

    async fn find_chinesepod(&self, word: &str) -> Result<AudioLink, AudioError> {
        let entry_url =
            with_segments(&self.chinesepod_base, &["tools", "glossary", "entry", word])?;
        let page = self.fetcher.fetch(&entry_url).await?;
        self.chinesepod_link(&page, word)
    }

    /// URL of the first pronunciation page listed on a Forvo search page.
    pub fn forvo_word_page(&self, search: &FetchedDocument) -> Result<Url, AudioError> {
        let doc = search.parse();
        let link = doc
            .select(&self.forvo_word)
            .next()
            .ok_or_else(|| AudioError::ElementMissing {
                element: "a.word",
                url: search.base_url.to_string(),
            })?;
        let href = dom::attr(link, "href").ok_or_else(|| AudioError::AttributeMissing {
            element: "a.word",
            attribute: "href",
            url: search.base_url.to_string(),
        })?;
        search
            .resolve_link(href)
            .ok_or_else(|| AudioError::InvalidUrl {
                value: href.to_string(),
            })
    }

    /// Build the download link from a Forvo word page.
    ///
    /// The download span carries the URL parts in `data-p2` (already
    /// percent-encoded word), `data-p3` (language) and `data-p4` (id).
    pub fn forvo_link(&self, page: &FetchedDocument, word: &str) -> Result<AudioLink, AudioError> {
        const ELEMENT: &str = "span[title*=Download]";

        let doc = page.parse();
        let span = doc
            .select(&self.forvo_download)
            .next()
            .ok_or_else(|| AudioError::ElementMissing {
                element: ELEMENT,
                url: page.base_url.to_string(),
            })?;

        let data = |attribute: &'static str| {
            dom::attr(span, attribute).ok_or_else(|| AudioError::AttributeMissing {
                element: ELEMENT,
                attribute,
                url: page.base_url.to_string(),
            })
        };
        let (p2, p3, p4) = (data("data-p2")?, data("data-p3")?, data("data-p4")?);

        let path = format!("download/mp3/{p2}/{p3}/{p4}/");
        let url = self
            .forvo_base
            .join(&path)
            .map_err(|_| AudioError::InvalidUrl { value: path })?;

        Ok(AudioLink {
            site: AudioSite::Forvo,
            word: word.to_string(),
            url,
            file_name: format!("{word}_{p4}.mp3"),
        })
    }

    /// Build the download link from a ChinesePod glossary entry.
    pub fn chinesepod_link(
        &self,
        page: &FetchedDocument,
        word: &str,
    ) -> Result<AudioLink, AudioError> {
        const ELEMENT: &str = "a[href*=redirect]";

        let doc = page.parse();
        let link = doc
            .select(&self.chinesepod_download)
            .next()
            .ok_or_else(|| AudioError::ElementMissing {
                element: ELEMENT,
                url: page.base_url.to_string(),
            })?;
        let href = dom::attr(link, "href").ok_or_else(|| AudioError::AttributeMissing {
            element: ELEMENT,
            attribute: "href",
            url: page.base_url.to_string(),
        })?;

        let url = self
            .chinesepod_base
            .join(href)
            .map_err(|_| AudioError::InvalidUrl {
                value: href.to_string(),
            })?;

        Ok(AudioLink {
            site: AudioSite::ChinesePod,
            word: word.to_string(),
            url,
            file_name: format!("{word}_chinesepod.mp3"),
        })
    }
}

fn parse_base(raw: &str) -> Result<Url, ConfigError> {
    Url::parse(raw).map_err(|source| ConfigError::InvalidUrl {
        url: raw.to_string(),
        source,
    })
}

/// Append path segments (percent-encoded) to `base`.
fn with_segments(base: &Url, segments: &[&str]) -> Result<Url, AudioError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| AudioError::InvalidUrl {
            value: base.to_string(),
        })?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}
