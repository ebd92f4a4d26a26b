//! Error types for fetching, lookup, configuration and audio discovery.

/// Failure retrieving a document. Never retried.
#[derive(thiserror::Error, Debug)]
pub enum FetchError {
    #[error("Request to {url} timed out")]
    Timeout { url: String },

    #[error("Request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("HTTP client could not be built: {0}")]
    Client(#[source] reqwest::Error),
}

impl FetchError {
    /// Classify a reqwest error for `url`.
    pub(crate) fn from_reqwest(url: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout {
                url: url.to_string(),
            }
        } else {
            FetchError::Transport {
                url: url.to_string(),
                source: err,
            }
        }
    }

    /// The HTTP status, when the server answered with a non-success code.
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Fatal errors for a single lookup.
#[derive(thiserror::Error, Debug)]
pub enum LookupError {
    #[error("Query is empty")]
    EmptyQuery,

    #[error("Cannot build an article URL for {headword:?}")]
    InvalidArticleUrl { headword: String },

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("Cross-reference for {query:?} has no usable headword or link target")]
    RedirectTargetMissing { query: String },
}

/// Errors loading or validating configuration.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid selector for {name}: {selector:?}")]
    Selector { name: &'static str, selector: String },

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("Invalid URL {url:?}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error(transparent)]
    HttpClient(#[from] FetchError),
}

/// Errors locating pronunciation audio.
#[derive(thiserror::Error, Debug)]
pub enum AudioError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("No {element} found on {url}")]
    ElementMissing { element: &'static str, url: String },

    #[error("Attribute {attribute} missing on {element} at {url}")]
    AttributeMissing {
        element: &'static str,
        attribute: &'static str,
        url: String,
    },

    #[error("Cannot build an audio URL from {value:?}")]
    InvalidUrl { value: String },
}

/// Convenience result type.
pub type LookupResult<T> = Result<T, LookupError>;
