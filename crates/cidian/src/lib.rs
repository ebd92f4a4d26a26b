//! cidian: Chinese word lookup with script resolution and dictionary entry extraction.

pub mod audio;
pub mod config;
pub mod dom;
pub mod error;
pub mod extractor;
pub mod fetch;
pub mod layout;
pub mod lookup;
pub mod resolver;
pub mod types;

pub use audio::{AudioFinder, AudioLink, AudioSite};
pub use config::{resolve_config_path, AudioConfig, Config, FetchConfig, LayoutConfig};
pub use error::{AudioError, ConfigError, FetchError, LookupError, LookupResult};
pub use fetch::{DocumentFetcher, FetchedDocument, HttpFetcher};
pub use layout::{CrossReference, PageLayout, WiktionaryLayout};
pub use lookup::Dictionary;
pub use types::*;
