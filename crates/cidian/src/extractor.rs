//! Entry extraction from a canonical article.
//!
//! A pure function of the markup: the same document always yields the same
//! entry and warnings.

use scraper::Html;

use crate::layout::PageLayout;
use crate::types::{ExtractWarning, HeadingLayout, LookupOutcome, WordEntry};

/// Fill in romanization, part of speech and glosses on `entry`.
///
/// Returns `NotFound` when the article has no content region. A document
/// that is still a cross-reference stub is returned untouched with a
/// `RedirectStub` warning.
pub fn extract<L>(layout: &L, doc: &Html, mut entry: WordEntry) -> LookupOutcome
where
    L: PageLayout + ?Sized,
{
    if layout.cross_reference(doc).is_some() {
        tracing::warn!("{}: canonical page is a cross-reference stub", entry.query_form());
        return LookupOutcome::Found {
            entry,
            warnings: vec![ExtractWarning::RedirectStub],
        };
    }

    let Some(content) = layout.content(doc) else {
        tracing::debug!("{}: no content region", entry.query_form());
        return LookupOutcome::NotFound {
            query: entry.query_form().to_string(),
        };
    };

    let mut warnings = Vec::new();

    entry.romanization = layout.romanization(content).unwrap_or_default();

    let heading = layout.part_of_speech(content);
    entry.part_of_speech = heading.part_of_speech().to_string();
    if let HeadingLayout::Unrecognized { first_heading } = heading {
        tracing::warn!(
            "{}: unrecognized heading layout (first heading {first_heading:?})",
            entry.query_form()
        );
        warnings.push(ExtractWarning::MalformedHeadingLayout { first_heading });
    }

    entry.glosses = layout.glosses(content);

    tracing::debug!(
        "{}: extracted {} gloss(es), part of speech {:?}",
        entry.query_form(),
        entry.glosses.len(),
        entry.part_of_speech
    );

    LookupOutcome::Found { entry, warnings }
}
