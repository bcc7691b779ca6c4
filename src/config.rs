//! Configuration file parser for ~/.config/newsdeck/config.toml.
//!
//! The config file is optional; a missing file yields `Config::default()`.
//! Unknown keys are accepted by serde but logged as a warning. The API URL
//! and token can also come from `NEWSDECK_API_URL` / `NEWSDECK_API_TOKEN`,
//! which take precedence over the file; command-line flags override both.
use serde::Deserialize;
use std::io::Read;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

pub const API_URL_ENV: &str = "NEWSDECK_API_URL";
pub const API_TOKEN_ENV: &str = "NEWSDECK_API_TOKEN";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML in config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Config file too large: {0}")]
    TooLarge(String),

    #[error("No API URL configured (set api_url, NEWSDECK_API_URL, or --api-url)")]
    MissingApiUrl,
}

/// Screen shown at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum StartScreen {
    /// Full-screen story cards.
    #[default]
    Home,
    /// Compact, filterable list.
    Feed,
}

/// Settings read from `config.toml`. Every key is optional.
///
/// `Debug` masks `api_token`.
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the news API, e.g. `https://api.example.com`.
    pub api_url: Option<String>,

    /// Access token appended to every request as `token=`.
    pub api_token: Option<String>,

    /// Theme variant name ("dark" or "light").
    pub theme: String,

    /// Which tab is active on startup.
    pub start_screen: StartScreen,

    /// Per-request timeout in seconds. 0 disables the timeout.
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: None,
            api_token: None,
            theme: "dark".to_string(),
            start_screen: StartScreen::Home,
            request_timeout_secs: crate::api::DEFAULT_TIMEOUT.as_secs(),
        }
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("api_url", &self.api_url)
            .field("api_token", &self.api_token.as_ref().map(|_| "[REDACTED]"))
            .field("theme", &self.theme)
            .field("start_screen", &self.start_screen)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

impl Config {
    const MAX_FILE_SIZE: u64 = 1_048_576;

    const KNOWN_KEYS: [&'static str; 5] = [
        "api_url",
        "api_token",
        "theme",
        "start_screen",
        "request_timeout_secs",
    ];

    /// Read `path`, falling back to defaults when it does not exist or is
    /// blank. Keys this version does not know are logged and skipped.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let file = match std::fs::File::open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(e.into()),
        };

        let size = file.metadata()?.len();
        if size > Self::MAX_FILE_SIZE {
            return Err(ConfigError::TooLarge(format!(
                "{} is {} bytes, limit is {}",
                path.display(),
                size,
                Self::MAX_FILE_SIZE
            )));
        }

        let mut content = String::new();
        file.take(Self::MAX_FILE_SIZE).read_to_string(&mut content)?;
        Self::parse(&content, path)
    }

    fn parse(content: &str, path: &Path) -> Result<Self, ConfigError> {
        if content.trim().is_empty() {
            tracing::debug!(path = %path.display(), "Blank config file, using defaults");
            return Ok(Self::default());
        }

        let table: toml::Table = content.parse()?;
        table
            .keys()
            .filter(|key| !Self::KNOWN_KEYS.contains(&key.as_str()))
            .for_each(|key| tracing::warn!(key = %key, "Ignoring unknown config key"));

        let config: Config = toml::Value::Table(table).try_into()?;
        tracing::info!(
            path = %path.display(),
            api_url = ?config.api_url,
            start_screen = ?config.start_screen,
            "Loaded configuration"
        );
        Ok(config)
    }

    /// Apply environment overrides using `lookup` (normally `std::env::var`).
    ///
    /// Empty values are ignored so an exported-but-blank variable does not
    /// wipe a value from the file.
    pub fn with_env<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(API_URL_ENV).filter(|v| !v.trim().is_empty()) {
            tracing::debug!("API URL taken from environment");
            self.api_url = Some(url);
        }
        if let Some(token) = lookup(API_TOKEN_ENV).filter(|v| !v.trim().is_empty()) {
            tracing::debug!("API token taken from environment");
            self.api_token = Some(token);
        }
        self
    }

    /// The configured API URL, or an error explaining how to set one.
    pub fn require_api_url(&self) -> Result<&str, ConfigError> {
        self.api_url
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .ok_or(ConfigError::MissingApiUrl)
    }

    /// Request timeout, `None` when disabled.
    pub fn request_timeout(&self) -> Option<Duration> {
        (self.request_timeout_secs > 0).then(|| Duration::from_secs(self.request_timeout_secs))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn write_config(name: &str, content: &str) -> (std::path::PathBuf, std::path::PathBuf) {
        let dir = std::env::temp_dir().join(format!("newsdeck_config_test_{}", name));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(&path, content).unwrap();
        (dir, path)
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.theme, "dark");
        assert_eq!(config.start_screen, StartScreen::Home);
        assert_eq!(config.request_timeout_secs, 20);
        assert!(config.api_url.is_none());
        assert!(config.api_token.is_none());
    }

    #[test]
    fn test_missing_file_returns_default() {
        let path = Path::new("/tmp/newsdeck_test_nonexistent_config.toml");
        let config = Config::load(path).unwrap();
        assert_eq!(config.theme, "dark");
    }

    #[test]
    fn test_whitespace_only_file_returns_default() {
        let (dir, path) = write_config("whitespace", "   \n  \n  ");
        let config = Config::load(&path).unwrap();
        assert_eq!(config.theme, "dark");
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_full_config() {
        let content = r#"
api_url = "https://news.example.com"
api_token = "abc123"
theme = "light"
start_screen = "feed"
request_timeout_secs = 5
"#;
        let (dir, path) = write_config("full", content);
        let config = Config::load(&path).unwrap();
        assert_eq!(config.api_url.as_deref(), Some("https://news.example.com"));
        assert_eq!(config.api_token.as_deref(), Some("abc123"));
        assert_eq!(config.theme, "light");
        assert_eq!(config.start_screen, StartScreen::Feed);
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(5)));
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_invalid_toml_returns_error() {
        let (dir, path) = write_config("invalid", "this is not [valid toml");
        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        assert!(err.to_string().contains("Invalid TOML"));
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_unknown_start_screen_is_error() {
        let (dir, path) = write_config("bad_screen", "start_screen = \"sideways\"\n");
        assert!(Config::load(&path).is_err());
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_unknown_keys_accepted() {
        let (dir, path) = write_config("unknown", "theme = \"dark\"\npage_size = 50\n");
        let config = Config::load(&path).unwrap();
        assert_eq!(config.theme, "dark");
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_too_large_file_rejected() {
        let (dir, path) = write_config("too_large", &"a".repeat(1_048_577));
        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::TooLarge(_)));
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_env_overrides_file_values() {
        let env: HashMap<&str, &str> = [
            (API_URL_ENV, "https://env.example.com"),
            (API_TOKEN_ENV, "env-token"),
        ]
        .into_iter()
        .collect();
        let config = Config {
            api_url: Some("https://file.example.com".into()),
            api_token: Some("file-token".into()),
            ..Config::default()
        }
        .with_env(|k| env.get(k).map(|v| v.to_string()));

        assert_eq!(config.api_url.as_deref(), Some("https://env.example.com"));
        assert_eq!(config.api_token.as_deref(), Some("env-token"));
    }

    #[test]
    fn test_blank_env_is_ignored() {
        let config = Config {
            api_url: Some("https://file.example.com".into()),
            ..Config::default()
        }
        .with_env(|_| Some("  ".to_string()));
        assert_eq!(config.api_url.as_deref(), Some("https://file.example.com"));
        assert!(config.api_token.is_none());
    }

    #[test]
    fn test_require_api_url() {
        assert!(matches!(
            Config::default().require_api_url(),
            Err(ConfigError::MissingApiUrl)
        ));
        let config = Config {
            api_url: Some(" https://news.example.com ".into()),
            ..Config::default()
        };
        assert_eq!(config.require_api_url().unwrap(), "https://news.example.com");
    }

    #[test]
    fn test_zero_timeout_disables() {
        let config = Config {
            request_timeout_secs: 0,
            ..Config::default()
        };
        assert_eq!(config.request_timeout(), None);
    }

    #[test]
    fn test_debug_masks_api_token() {
        let config = Config {
            api_token: Some("super-secret-token".into()),
            ..Config::default()
        };
        let debug_output = format!("{:?}", config);
        assert!(!debug_output.contains("super-secret-token"));
        assert!(debug_output.contains("[REDACTED]"));
    }
}
