use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{AppError, Result};

const YOUTUBE_KEY_ENV: &str = "YOUTUBE_API_KEY";
const GNEWS_KEY_ENV: &str = "GNEWS_API_KEY";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_roster_path")]
    pub roster_path: String,

    pub youtube_api_key: Option<String>,
    pub gnews_api_key: Option<String>,

    /// Maximum number of comments pulled from the latest video
    #[serde(default = "default_comment_cap")]
    pub comment_cap: usize,

    #[serde(default = "default_news_language")]
    pub news_language: String,

    #[serde(default = "default_news_max_results")]
    pub news_max_results: u32,
}

fn default_roster_path() -> String {
    let data_dir = dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("creator-pulse");
    std::fs::create_dir_all(&data_dir).ok();
    data_dir
        .join("creator_roster.csv")
        .to_string_lossy()
        .to_string()
}

fn default_comment_cap() -> usize {
    100
}

fn default_news_language() -> String {
    "en".to_string()
}

fn default_news_max_results() -> u32 {
    10
}

impl Default for Config {
    fn default() -> Self {
        Self {
            roster_path: default_roster_path(),
            youtube_api_key: None,
            gnews_api_key: None,
            comment_cap: default_comment_cap(),
            news_language: default_news_language(),
            news_max_results: default_news_max_results(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&Self::config_path())?;
        config.apply_overrides(
            std::env::var(YOUTUBE_KEY_ENV).ok(),
            std::env::var(GNEWS_KEY_ENV).ok(),
        );
        Ok(config)
    }

    /// Read the config file at `path`, writing a default one if it does not exist yet.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            let config = Config::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| AppError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("creator-pulse")
            .join("config.toml")
    }

    /// Environment values win over the file; blank values are ignored.
    pub fn apply_overrides(&mut self, youtube: Option<String>, gnews: Option<String>) {
        if let Some(key) = youtube.filter(|k| !k.trim().is_empty()) {
            self.youtube_api_key = Some(key);
        }
        if let Some(key) = gnews.filter(|k| !k.trim().is_empty()) {
            self.gnews_api_key = Some(key);
        }
    }

    pub fn youtube_key(&self) -> Result<&str> {
        credential(&self.youtube_api_key, "youtube_api_key")
    }

    pub fn gnews_key(&self) -> Result<&str> {
        credential(&self.gnews_api_key, "gnews_api_key")
    }
}

fn credential<'a>(value: &'a Option<String>, name: &'static str) -> Result<&'a str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .ok_or(AppError::MissingCredential(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_is_created_with_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = Config::load_from(&path).unwrap();

        assert!(path.exists());
        assert_eq!(config.comment_cap, 100);
        assert_eq!(config.news_language, "en");
        assert_eq!(config.news_max_results, 10);
        assert!(config.youtube_api_key.is_none());
    }

    #[test]
    fn partial_file_falls_back_to_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "roster_path = \"/tmp/roster.csv\"\nyoutube_api_key = \"yt\"\ncomment_cap = 25\n",
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();

        assert_eq!(config.roster_path, "/tmp/roster.csv");
        assert_eq!(config.youtube_key().unwrap(), "yt");
        assert_eq!(config.comment_cap, 25);
        assert_eq!(config.news_max_results, 10);
    }

    #[test]
    fn malformed_file_is_a_configuration_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "comment_cap = \"lots\"").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn overrides_replace_file_values_but_ignore_blanks() {
        let mut config = Config {
            youtube_api_key: Some("from-file".into()),
            gnews_api_key: Some("news-file".into()),
            ..Config::default()
        };

        config.apply_overrides(Some("from-env".into()), Some("   ".into()));

        assert_eq!(config.youtube_key().unwrap(), "from-env");
        assert_eq!(config.gnews_key().unwrap(), "news-file");
    }

    #[test]
    fn blank_credentials_are_reported_as_missing() {
        let config = Config {
            youtube_api_key: Some("  ".into()),
            gnews_api_key: None,
            ..Config::default()
        };

        assert!(matches!(
            config.youtube_key(),
            Err(AppError::MissingCredential("youtube_api_key"))
        ));
        assert!(matches!(
            config.gnews_key(),
            Err(AppError::MissingCredential("gnews_api_key"))
        ));
    }
}
