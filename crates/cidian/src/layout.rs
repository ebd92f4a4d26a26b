//! Page layout adapters.
//!
//! A `PageLayout` is the only thing that knows how a dictionary site marks up
//! its articles. The resolver and extractor talk to it and never name a
//! selector themselves, so a markup change on the site means editing one
//! adapter (or its config), not the pipeline.

use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::config::LayoutConfig;
use crate::dom;
use crate::error::{ConfigError, LookupError};
use crate::types::HeadingLayout;

/// A link from a Simplified stub page to its Traditional article.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrossReference {
    /// Link text: the Traditional form.
    pub text: String,
    /// Raw `href`, if the anchor had one.
    pub href: Option<String>,
}

/// Site-specific markup knowledge.
pub trait PageLayout: Send + Sync {
    /// URL of the article for `headword`.
    fn article_url(&self, headword: &str) -> Result<Url, LookupError>;

    /// The cross-reference to a Traditional article, if `doc` is a stub.
    fn cross_reference(&self, doc: &Html) -> Option<CrossReference>;

    /// The article's main body region.
    fn content<'a>(&self, doc: &'a Html) -> Option<ElementRef<'a>>;

    /// First romanization in the content region.
    fn romanization(&self, content: ElementRef<'_>) -> Option<String>;

    /// Locate the part-of-speech heading.
    fn part_of_speech(&self, content: ElementRef<'_>) -> HeadingLayout;

    /// Gloss strings in page order, example blocks removed.
    fn glosses(&self, content: ElementRef<'_>) -> Vec<String>;
}

/// Wiktionary article layout.
#[derive(Debug, Clone)]
pub struct WiktionaryLayout {
    article_base: Url,
    cross_reference: Selector,
    cross_reference_boundary: String,
    redirect_marker: String,
    content: Selector,
    romanization: Selector,
    section_heading: Selector,
    subsection_heading: Selector,
    multi_pronunciation_marker: String,
    gloss_item: Selector,
    example_block: String,
}

impl WiktionaryLayout {
    /// Compile a layout from config. Fails on any invalid selector or base URL.
    pub fn from_config(config: &LayoutConfig) -> Result<Self, ConfigError> {
        let article_base =
            Url::parse(&config.article_base).map_err(|source| ConfigError::InvalidUrl {
                url: config.article_base.clone(),
                source,
            })?;

        Ok(Self {
            article_base,
            cross_reference: dom::compile("cross_reference", &config.cross_reference)?,
            cross_reference_boundary: config.cross_reference_boundary.clone(),
            redirect_marker: config.redirect_marker.clone(),
            content: dom::compile("content", &config.content)?,
            romanization: dom::compile("romanization", &config.romanization)?,
            section_heading: dom::compile("section_heading", &config.section_heading)?,
            subsection_heading: dom::compile("subsection_heading", &config.subsection_heading)?,
            multi_pronunciation_marker: config.multi_pronunciation_marker.clone(),
            gloss_item: dom::compile("gloss_item", &config.gloss_item)?,
            example_block: config.example_block.clone(),
        })
    }

    /// The English Wiktionary with its default selectors.
    pub fn english() -> Result<Self, ConfigError> {
        Self::from_config(&LayoutConfig::default())
    }
}

impl PageLayout for WiktionaryLayout {
    fn article_url(&self, headword: &str) -> Result<Url, LookupError> {
        let invalid = || LookupError::InvalidArticleUrl {
            headword: headword.to_string(),
        };

        let mut url = self.article_base.clone();
        url.path_segments_mut()
            .map_err(|_| invalid())?
            .pop_if_empty()
            .push(headword);
        Ok(url)
    }

    fn cross_reference(&self, doc: &Html) -> Option<CrossReference> {
        doc.select(&self.cross_reference)
            .find(|a| {
                dom::enclosing_text_contains(
                    *a,
                    &self.cross_reference_boundary,
                    &self.redirect_marker,
                )
            })
            .map(|a| CrossReference {
                text: dom::text(a),
                href: dom::attr(a, "href").map(str::to_string),
            })
    }

    fn content<'a>(&self, doc: &'a Html) -> Option<ElementRef<'a>> {
        doc.select(&self.content).next()
    }

    fn romanization(&self, content: ElementRef<'_>) -> Option<String> {
        dom::first(content, &self.romanization)
            .map(dom::text)
            .filter(|s| !s.is_empty())
    }

    fn part_of_speech(&self, content: ElementRef<'_>) -> HeadingLayout {
        let first_heading = dom::first(content, &self.section_heading)
            .map(dom::text)
            .unwrap_or_default();

        // Numbered pronunciations nest the part of speech one level down;
        // otherwise the first heading is "Pronunciation" and the second is it.
        let (pos, multi) = if first_heading.contains(&self.multi_pronunciation_marker) {
            (dom::first(content, &self.subsection_heading), true)
        } else {
            (dom::nth(content, &self.section_heading, 1), false)
        };

        match pos.map(dom::text).filter(|s| !s.is_empty()) {
            Some(pos) if multi => HeadingLayout::MultiPronunciation(pos),
            Some(pos) => HeadingLayout::SinglePronunciation(pos),
            None => HeadingLayout::Unrecognized { first_heading },
        }
    }

    fn glosses(&self, content: ElementRef<'_>) -> Vec<String> {
        content
            .select(&self.gloss_item)
            .map(|li| dom::text_excluding(li, &self.example_block))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> WiktionaryLayout {
        WiktionaryLayout::english().unwrap()
    }

    fn content_of(body: &str) -> Html {
        Html::parse_document(&format!(
            r#"<html><body><div id="bodyContent">{body}</div></body></html>"#
        ))
    }

    fn headline(tag: &str, text: &str) -> String {
        format!(r#"<{tag}><span class="mw-headline">{text}</span></{tag}>"#)
    }

    #[test]
    fn test_article_url_encodes_headword() {
        let url = layout().article_url("知道").unwrap();
        assert_eq!(
            url.as_str(),
            "https://en.wiktionary.org/wiki/%E7%9F%A5%E9%81%93"
        );
    }

    #[test]
    fn test_article_url_escapes_slash() {
        let url = layout().article_url("a/b").unwrap();
        assert_eq!(url.as_str(), "https://en.wiktionary.org/wiki/a%2Fb");
    }

    #[test]
    fn test_article_url_without_trailing_slash() {
        let config = LayoutConfig {
            article_base: "http://localhost:9000/wiki".into(),
            ..LayoutConfig::default()
        };
        let layout = WiktionaryLayout::from_config(&config).unwrap();
        assert_eq!(
            layout.article_url("書").unwrap().as_str(),
            "http://localhost:9000/wiki/%E6%9B%B8"
        );
    }

    #[test]
    fn test_cannot_be_a_base_url_rejected() {
        let config = LayoutConfig {
            article_base: "mailto:someone@example.org".into(),
            ..LayoutConfig::default()
        };
        let layout = WiktionaryLayout::from_config(&config).unwrap();
        assert!(matches!(
            layout.article_url("書"),
            Err(LookupError::InvalidArticleUrl { .. })
        ));
    }

    #[test]
    fn test_invalid_selector_in_config() {
        let config = LayoutConfig {
            gloss_item: "li[".into(),
            ..LayoutConfig::default()
        };
        let err = WiktionaryLayout::from_config(&config).unwrap_err();
        assert!(matches!(err, ConfigError::Selector { name: "gloss_item", .. }));
    }

    #[test]
    fn test_cross_reference_found() {
        let doc = Html::parse_document(
            r#"<table><tr><td>For pronunciation and definitions of <b><span class="Hani"><span class="Hani"><a href="/wiki/%E9%97%9C%E4%BF%82">關係</a></span></span></b> – see it.</td></tr></table>"#,
        );
        let xref = layout().cross_reference(&doc).unwrap();
        assert_eq!(xref.text, "關係");
        assert_eq!(xref.href.as_deref(), Some("/wiki/%E9%97%9C%E4%BF%82"));
    }

    #[test]
    fn test_cross_reference_requires_marker() {
        let doc = Html::parse_document(
            r#"<table><tr><td>Related: <span><span class="Hani"><a href="/wiki/x">關</a></span></span></td></tr></table>"#,
        );
        assert!(layout().cross_reference(&doc).is_none());
    }

    #[test]
    fn test_content_missing() {
        let doc = Html::parse_document("<html><body><p>nothing</p></body></html>");
        assert!(layout().content(&doc).is_none());
    }

    #[test]
    fn test_romanization_takes_first() {
        let doc = content_of(
            r#"<span class="zhpron-pinyin"><a>zhīdào</a></span><span class="zhpron-pinyin"><a>zhīdao</a></span>"#,
        );
        let l = layout();
        let content = l.content(&doc).unwrap();
        assert_eq!(l.romanization(content).as_deref(), Some("zhīdào"));
    }

    #[test]
    fn test_multi_pronunciation_layout() {
        let body = format!(
            "{}{}{}{}",
            headline("h3", "Pronunciation 1"),
            headline("h4", "Verb"),
            headline("h3", "Pronunciation 2"),
            headline("h4", "Noun"),
        );
        let doc = content_of(&body);
        let l = layout();
        let pos = l.part_of_speech(l.content(&doc).unwrap());
        assert_eq!(pos, HeadingLayout::MultiPronunciation("Verb".into()));
    }

    #[test]
    fn test_single_pronunciation_layout() {
        let body = format!(
            "{}{}",
            headline("h3", "Pronunciation"),
            headline("h3", "Adjective")
        );
        let doc = content_of(&body);
        let l = layout();
        let pos = l.part_of_speech(l.content(&doc).unwrap());
        assert_eq!(pos, HeadingLayout::SinglePronunciation("Adjective".into()));
    }

    #[test]
    fn test_unrecognized_layout() {
        let doc = content_of(&headline("h3", "Etymology"));
        let l = layout();
        let pos = l.part_of_speech(l.content(&doc).unwrap());
        assert_eq!(
            pos,
            HeadingLayout::Unrecognized {
                first_heading: "Etymology".into()
            }
        );
    }

    #[test]
    fn test_glosses_flat_across_headings() {
        let body = format!(
            "{}<ol><li>one</li></ol>{}<p>x</p><ol><li>two</li><li>three</li></ol>",
            headline("h3", "Noun"),
            headline("h3", "Verb")
        );
        let doc = content_of(&body);
        let l = layout();
        let glosses = l.glosses(l.content(&doc).unwrap());
        assert_eq!(glosses, vec!["one", "two", "three"]);
    }

    #[test]
    fn test_glosses_ignore_lists_before_headings() {
        let body = format!(
            "<ol><li>toc</li></ol>{}<ol><li>real</li></ol>",
            headline("h3", "Noun")
        );
        let doc = content_of(&body);
        let l = layout();
        assert_eq!(l.glosses(l.content(&doc).unwrap()), vec!["real"]);
    }

    #[test]
    fn test_nested_sub_senses_run_together() {
        // Sub-sense text is appended to its parent verbatim, then listed on its own.
        let body = format!(
            "{}<ol><li>a<ol><li>a1</li></ol></li><li>b</li></ol>",
            headline("h3", "Noun")
        );
        let doc = content_of(&body);
        let l = layout();
        assert_eq!(l.glosses(l.content(&doc).unwrap()), vec!["aa1", "a1", "b"]);
    }
}
