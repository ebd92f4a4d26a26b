//! Core data types for dictionary lookups.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A dictionary entry for one Chinese headword.
///
/// Built field by field while a lookup runs and handed out as an owned value
/// once the pipeline finishes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordEntry {
    /// Simplified form. Empty unless the query was redirected to a Traditional article.
    pub simplified: String,
    /// Traditional form, the key of the canonical article.
    pub traditional: String,
    /// Pinyin reading of the headword (first pronunciation only).
    pub romanization: String,
    /// Part-of-speech label such as "Noun" or "Verb".
    pub part_of_speech: String,
    /// English sense definitions in page order.
    pub glosses: Vec<String>,
}

impl WordEntry {
    /// Start an entry for a query that has not been resolved yet.
    ///
    /// The query is taken to be Traditional until a cross-reference says otherwise.
    pub fn for_query(query: &str) -> Self {
        Self {
            traditional: query.to_string(),
            ..Self::default()
        }
    }

    /// Record that `query` was a Simplified form pointing at `traditional`.
    pub fn redirect(&mut self, query: &str, traditional: &str) {
        self.simplified = query.to_string();
        self.traditional = traditional.to_string();
    }

    /// The form the user typed in, whichever script it was.
    pub fn query_form(&self) -> &str {
        if self.simplified.is_empty() {
            &self.traditional
        } else {
            &self.simplified
        }
    }
}

impl fmt::Display for WordEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "simplified: {}", self.simplified)?;
        writeln!(f, "traditional: {}", self.traditional)?;
        writeln!(f, "pinyin: {}", self.romanization)?;
        writeln!(f, "part of speech: {}", self.part_of_speech)?;
        writeln!(f, "definitions:")?;
        for gloss in &self.glosses {
            writeln!(f, "{gloss}")?;
        }
        Ok(())
    }
}

/// Non-fatal findings reported alongside a successful extraction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExtractWarning {
    /// The heading structure matched neither known layout; part of speech is empty.
    MalformedHeadingLayout { first_heading: String },
    /// The canonical document was itself a cross-reference stub; nothing was extracted.
    RedirectStub,
}

impl fmt::Display for ExtractWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractWarning::MalformedHeadingLayout { first_heading } if first_heading.is_empty() => {
                write!(f, "unrecognized heading layout: no section headings")
            }
            ExtractWarning::MalformedHeadingLayout { first_heading } => {
                write!(f, "unrecognized heading layout after \"{first_heading}\"")
            }
            ExtractWarning::RedirectStub => {
                write!(f, "canonical page is a cross-reference stub; nothing extracted")
            }
        }
    }
}

/// Result of a lookup that did not fail outright.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupOutcome {
    /// An article was found and extracted.
    Found {
        entry: WordEntry,
        warnings: Vec<ExtractWarning>,
    },
    /// The dictionary has no article for the query.
    NotFound { query: String },
}

impl LookupOutcome {
    /// The extracted entry, if any.
    pub fn entry(&self) -> Option<&WordEntry> {
        match self {
            LookupOutcome::Found { entry, .. } => Some(entry),
            LookupOutcome::NotFound { .. } => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, LookupOutcome::Found { .. })
    }
}

/// How the part-of-speech heading was located in an article.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeadingLayout {
    /// Several numbered pronunciation sections; the label came from a sub-heading.
    MultiPronunciation(String),
    /// One pronunciation section; the label is the second section heading.
    SinglePronunciation(String),
    /// Neither layout applied.
    Unrecognized { first_heading: String },
}

impl HeadingLayout {
    /// The part-of-speech label, empty for an unrecognized layout.
    pub fn part_of_speech(&self) -> &str {
        match self {
            HeadingLayout::MultiPronunciation(pos) | HeadingLayout::SinglePronunciation(pos) => pos,
            HeadingLayout::Unrecognized { .. } => "",
        }
    }
}
