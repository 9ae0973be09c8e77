//! Optional TOML overrides for the feed's channel metadata.
//!
//! Without a config file every field takes the Freedoom defaults. A missing
//! or empty file also yields `FeedConfig::default()`. Unknown keys are
//! accepted by serde but logged as warnings, since they are usually typos.
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML in config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Config file too large: {0}")]
    TooLarge(String),
}

// ============================================================================
// Configuration
// ============================================================================

/// Channel constants and the item link base used when building the feed.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// Channel `<title>`.
    pub title: String,
    /// Channel `<link>`, the project site.
    pub link: String,
    /// Channel `<description>`.
    pub description: String,
    /// Channel `<language>` code.
    pub language: String,
    /// URL placed in the channel `<image>` block.
    pub image_url: String,
    /// Page the item links point into; `#freedoom-<version>` is appended.
    pub news_url: String,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            title: "Freedoom Feed".to_string(),
            link: "https://freedoom.github.io/".to_string(),
            description: "Freedoom release announcements".to_string(),
            language: "en-us".to_string(),
            image_url: "https://freedoom.github.io/img/favicon.png".to_string(),
            news_url: "https://freedoom.github.io/news.html".to_string(),
        }
    }
}

impl FeedConfig {
    const MAX_FILE_SIZE: u64 = 1_048_576;

    const KNOWN_KEYS: [&'static str; 6] = [
        "title",
        "link",
        "description",
        "language",
        "image_url",
        "news_url",
    ];

    /// Load configuration from a TOML file.
    ///
    /// - Missing file → `Ok(FeedConfig::default())`
    /// - Empty file → `Ok(FeedConfig::default())`
    /// - Invalid TOML → `Err(ConfigError::Parse)` with line number info
    /// - Unknown keys → accepted, logged as warning
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::metadata(path) {
            Ok(meta) if meta.len() > Self::MAX_FILE_SIZE => {
                return Err(ConfigError::TooLarge(format!(
                    "Config file is {} bytes (max {} bytes)",
                    meta.len(),
                    Self::MAX_FILE_SIZE
                )));
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(path = %path.display(), "Config file not found, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
            Ok(_) => {}
        }

        let content = std::fs::read_to_string(path)?;
        if content.trim().is_empty() {
            tracing::debug!(path = %path.display(), "Config file is empty, using defaults");
            return Ok(Self::default());
        }

        if let Ok(raw) = content.parse::<toml::Table>() {
            for key in raw.keys() {
                if !Self::KNOWN_KEYS.contains(&key.as_str()) {
                    tracing::warn!(key = %key, "Unknown key in config file, ignoring");
                }
            }
        }

        let config: FeedConfig = toml::from_str(&content)?;
        tracing::info!(path = %path.display(), title = %config.title, "Loaded configuration");
        Ok(config)
    }

    /// Link for one release: `<news_url>#freedoom-<version>`.
    pub fn release_link(&self, version: &str) -> String {
        format!("{}#freedoom-{}", self.news_url, version)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn scratch(name: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("freedoom_feed_config_{name}"));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_default_config() {
        let config = FeedConfig::default();
        assert_eq!(config.title, "Freedoom Feed");
        assert_eq!(config.language, "en-us");
        assert_eq!(config.news_url, "https://freedoom.github.io/news.html");
    }

    #[test]
    fn test_release_link() {
        let config = FeedConfig::default();
        assert_eq!(
            config.release_link("0.13.0"),
            "https://freedoom.github.io/news.html#freedoom-0.13.0"
        );
    }

    #[test]
    fn test_missing_file_returns_default() {
        let path = Path::new("/tmp/freedoom_feed_nonexistent_config.toml");
        assert_eq!(FeedConfig::load(path).unwrap(), FeedConfig::default());
    }

    #[test]
    fn test_whitespace_only_file_returns_default() {
        let dir = scratch("whitespace");
        let path = dir.join("feed.toml");
        std::fs::write(&path, "   \n  \n").unwrap();

        assert_eq!(FeedConfig::load(&path).unwrap(), FeedConfig::default());

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_partial_config_uses_defaults_for_missing() {
        let dir = scratch("partial");
        let path = dir.join("feed.toml");
        std::fs::write(&path, "title = \"Nightly Feed\"\nproduct = \"FreeDM\"\n").unwrap();

        // "product" is not a setting; it is ignored like any unknown key.
        let config = FeedConfig::load(&path).unwrap();
        assert_eq!(config.title, "Nightly Feed");
        assert_eq!(config.link, "https://freedoom.github.io/");

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_invalid_toml_returns_error() {
        let dir = scratch("invalid");
        let path = dir.join("feed.toml");
        std::fs::write(&path, "this is not [valid toml").unwrap();

        let err = FeedConfig::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        assert!(err.to_string().contains("Invalid TOML"));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_wrong_type_returns_error() {
        let dir = scratch("wrongtype");
        let path = dir.join("feed.toml");
        std::fs::write(&path, "language = 42\n").unwrap();

        assert!(FeedConfig::load(&path).is_err());

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_too_large_file_rejected() {
        let dir = scratch("too_large");
        let path = dir.join("feed.toml");
        std::fs::write(&path, "a".repeat(1_048_577)).unwrap();

        let err = FeedConfig::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::TooLarge(_)));

        std::fs::remove_dir_all(&dir).ok();
    }
}
