//! Configuration loading and resolution.
//!
//! Every field has a default, so an empty or absent file yields a working
//! Wiktionary setup. The config is an explicit value handed to whatever needs
//! it; nothing here is process-global.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Environment variable naming a config file.
pub const CONFIG_ENV: &str = "CIDIAN_CONFIG";

/// Config file picked up from the working directory.
pub const LOCAL_CONFIG_FILE: &str = "cidian.yaml";

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub fetch: FetchConfig,
    pub dictionary: LayoutConfig,
    pub audio: AudioConfig,
}

/// HTTP settings shared by every fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Upper bound for one request, connect to last body byte.
    pub timeout_ms: u64,
    /// HTTP redirects followed per request.
    pub max_redirects: usize,
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 15_000,
            max_redirects: 5,
            user_agent: format!("cidian/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl FetchConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Selectors and marker phrases describing the dictionary site's markup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Article URL prefix; the headword is appended as one path segment.
    pub article_base: String,
    /// Anchor pointing from a Simplified stub to the Traditional article.
    pub cross_reference: String,
    /// Ancestor tag bounding the text searched for `redirect_marker`.
    pub cross_reference_boundary: String,
    pub redirect_marker: String,
    /// Main body region of an article.
    pub content: String,
    pub romanization: String,
    /// Top-level section headings.
    pub section_heading: String,
    /// Second-level headings, used when pronunciations are numbered.
    pub subsection_heading: String,
    pub multi_pronunciation_marker: String,
    pub gloss_item: String,
    /// Tag of nested usage-example blocks stripped from glosses.
    pub example_block: String,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            article_base: "https://en.wiktionary.org/wiki/".into(),
            cross_reference: "td span span[class='Hani'] a[href]".into(),
            cross_reference_boundary: "td".into(),
            redirect_marker: "For pronunciation".into(),
            content: "#bodyContent".into(),
            romanization: "span[class*='pinyin'] a".into(),
            section_heading: "h3 span[class='mw-headline']".into(),
            subsection_heading: "h4 span[class='mw-headline']".into(),
            multi_pronunciation_marker: "Pronunciation 1".into(),
            gloss_item: "h3 ~ ol li".into(),
            example_block: "dl".into(),
        }
    }
}

/// Site roots for pronunciation-audio discovery. Keep the trailing slash:
/// download paths are joined onto these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    pub forvo_base: String,
    pub chinesepod_base: String,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            forvo_base: "https://forvo.com/".into(),
            chinesepod_base: "https://chinesepod.com/".into(),
        }
    }
}

impl Config {
    /// Parse a YAML document. Missing keys take their defaults.
    pub fn from_yaml(raw: &str) -> Result<Self, ConfigError> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values no request could succeed with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fetch.timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "fetch.timeout_ms",
                reason: "must be greater than 0".into(),
            });
        }
        Ok(())
    }

    /// Read and parse a YAML config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml(&raw)
    }

    /// Load the config found by [`resolve_config_path`], or the defaults when
    /// no file is found. Returns the path that was used, if any.
    pub fn resolve(explicit: Option<&str>) -> Result<(Self, Option<PathBuf>), ConfigError> {
        match resolve_config_path(explicit) {
            Some(path) => {
                tracing::debug!("Loading config from {}", path.display());
                let config = Self::load(&path)?;
                Ok((config, Some(path)))
            }
            None => {
                tracing::debug!("No config file found, using defaults");
                Ok((Self::default(), None))
            }
        }
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }
}

/// Find the config file to use.
///
/// Order: explicit path, `CIDIAN_CONFIG`, `./cidian.yaml`, `~/.cidian/config.yaml`.
/// An explicit or env path is returned even if it does not exist, so the
/// caller reports the missing file instead of silently using defaults.
pub fn resolve_config_path(explicit: Option<&str>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(PathBuf::from(path));
    }

    if let Ok(env_path) = std::env::var(CONFIG_ENV) {
        if !env_path.is_empty() {
            return Some(PathBuf::from(env_path));
        }
    }

    let local = PathBuf::from(LOCAL_CONFIG_FILE);
    if local.exists() {
        return Some(local);
    }

    default_config_path().filter(|p| p.exists())
}

fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".cidian").join("config.yaml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_yaml_is_default() {
        assert_eq!(Config::from_yaml("").unwrap(), Config::default());
        assert_eq!(Config::from_yaml("  \n").unwrap(), Config::default());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = Config::from_yaml("fetch:\n  timeout_ms: 2500\n").unwrap();
        assert_eq!(config.fetch.timeout_ms, 2500);
        assert_eq!(config.fetch.timeout(), Duration::from_millis(2500));
        assert_eq!(config.fetch.max_redirects, 5);
        assert_eq!(config.dictionary, LayoutConfig::default());
        assert_eq!(config.audio, AudioConfig::default());
    }

    #[test]
    fn test_layout_override() {
        let yaml = "dictionary:\n  article_base: \"http://localhost:8080/wiki/\"\n  redirect_marker: \"See\"\n";
        let config = Config::from_yaml(yaml).unwrap();
        assert_eq!(config.dictionary.article_base, "http://localhost:8080/wiki/");
        assert_eq!(config.dictionary.redirect_marker, "See");
        assert_eq!(config.dictionary.content, "#bodyContent");
    }

    #[test]
    fn test_invalid_yaml_is_error() {
        let err = Config::from_yaml("fetch: 42").unwrap_err();
        assert!(matches!(err, ConfigError::Yaml(_)));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let err = Config::from_yaml("fetch:\n  timeout_ms: 0\n").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue {
                field: "fetch.timeout_ms",
                ..
            }
        ));
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_yaml_roundtrip_of_defaults() {
        let yaml = Config::default().to_yaml().unwrap();
        assert!(yaml.contains("timeout_ms: 15000"));
        assert_eq!(Config::from_yaml(&yaml).unwrap(), Config::default());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "fetch:\n  user_agent: test-agent").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.fetch.user_agent, "test-agent");
    }

    #[test]
    fn test_explicit_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.yaml");
        let err = Config::resolve(path.to_str()).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_explicit_path_wins() {
        assert_eq!(
            resolve_config_path(Some("/tmp/custom.yaml")),
            Some(PathBuf::from("/tmp/custom.yaml"))
        );
    }
}
