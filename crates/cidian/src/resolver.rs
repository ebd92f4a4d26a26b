//! Script resolution: is the query the canonical Traditional headword, or a
//! Simplified form whose page only points at the Traditional article?

use crate::error::{LookupError, LookupResult};
use crate::fetch::{DocumentFetcher, FetchedDocument};
use crate::layout::PageLayout;
use crate::types::WordEntry;

/// The canonical article plus the headword forms learned on the way.
#[derive(Debug, Clone)]
pub struct Resolution {
    /// Entry with `simplified`/`traditional` filled in, nothing else.
    pub entry: WordEntry,
    /// The document holding the actual dictionary entry.
    pub canonical: FetchedDocument,
    /// Whether a cross-reference was followed.
    pub redirected: bool,
}

/// Resolve `query` given the document fetched for it.
///
/// Follows at most one cross-reference. Script-invariant headwords have no
/// cross-reference and come back exactly like Traditional ones.
pub async fn resolve<F, L>(
    query: &str,
    initial: FetchedDocument,
    fetcher: &F,
    layout: &L,
) -> LookupResult<Resolution>
where
    F: DocumentFetcher + ?Sized,
    L: PageLayout + ?Sized,
{
    let mut entry = WordEntry::for_query(query);

    let xref = {
        let doc = initial.parse();
        layout.cross_reference(&doc)
    };

    let Some(xref) = xref else {
        tracing::debug!("{query}: no cross-reference, treating as canonical");
        return Ok(Resolution {
            entry,
            canonical: initial,
            redirected: false,
        });
    };

    let traditional = xref.text.trim();
    if traditional.is_empty() {
        tracing::warn!("{query}: cross-reference has no headword text");
        return Err(LookupError::RedirectTargetMissing {
            query: query.to_string(),
        });
    }

    let target = xref
        .href
        .as_deref()
        .map(str::trim)
        .filter(|href| !href.is_empty())
        .and_then(|href| initial.resolve_link(href))
        .ok_or_else(|| LookupError::RedirectTargetMissing {
            query: query.to_string(),
        })?;

    tracing::debug!("{query}: simplified form of {traditional}, following {target}");
    entry.redirect(query, traditional);

    let canonical = fetcher.fetch(&target).await?;

    Ok(Resolution {
        entry,
        canonical,
        redirected: true,
    })
}
