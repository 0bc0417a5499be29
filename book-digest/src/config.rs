//! book-digest configuration: windowing, thresholds and output width.

use anyhow::{Context, Result};
use llm_client::RetryPolicy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::digest::DigestSettings;
use crate::summarize::WindowSettings;

const DEFAULT_WINDOW_WORDS: usize = 400;
const DEFAULT_OVERLAP_WORDS: usize = 50;
const DEFAULT_REDUCE_THRESHOLD_WORDS: usize = 512;
const DEFAULT_MIN_SECTION_CHARS: usize = 500;
const DEFAULT_WRAP_WIDTH: usize = 100;
const RETRY_BASE_DELAY: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DigestConfig {
    /// Words per summarization window
    #[serde(default = "default_window_words")]
    pub window_words: usize,

    /// Words shared between consecutive windows
    #[serde(default = "default_overlap_words")]
    pub overlap_words: usize,

    /// Partial summaries this long or longer are reduced once more
    #[serde(default = "default_reduce_threshold_words")]
    pub reduce_threshold_words: usize,

    /// Sections shorter than this (in characters) are skipped
    #[serde(default = "default_min_section_chars")]
    pub min_section_chars: usize,

    /// Column width of the markdown output
    #[serde(default = "default_wrap_width")]
    pub wrap_width: usize,

    /// Sections summarized concurrently
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Attempts per request, including the first
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

fn default_window_words() -> usize {
    DEFAULT_WINDOW_WORDS
}

fn default_overlap_words() -> usize {
    DEFAULT_OVERLAP_WORDS
}

fn default_reduce_threshold_words() -> usize {
    DEFAULT_REDUCE_THRESHOLD_WORDS
}

fn default_min_section_chars() -> usize {
    DEFAULT_MIN_SECTION_CHARS
}

fn default_wrap_width() -> usize {
    DEFAULT_WRAP_WIDTH
}

fn default_concurrency() -> usize {
    1
}

fn default_max_attempts() -> u32 {
    3
}

impl Default for DigestConfig {
    fn default() -> Self {
        Self {
            window_words: default_window_words(),
            overlap_words: default_overlap_words(),
            reduce_threshold_words: default_reduce_threshold_words(),
            min_section_chars: default_min_section_chars(),
            wrap_width: default_wrap_width(),
            concurrency: default_concurrency(),
            max_attempts: default_max_attempts(),
        }
    }
}

impl DigestConfig {
    /// Get the config file path: ~/.config/cli-programs/book-digest.toml
    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir().context("Could not determine home directory")?;
        Ok(home
            .join(".config")
            .join("cli-programs")
            .join("book-digest.toml"))
    }

    /// Load config from file, returning default if file doesn't exist
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let config: DigestConfig = toml::from_str(&content)
            .with_context(|| format!("Invalid config: {}", path.display()))?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    pub fn window_settings(&self) -> WindowSettings {
        WindowSettings {
            window_words: self.window_words.max(1),
            overlap_words: self.overlap_words,
            reduce_threshold_words: self.reduce_threshold_words,
        }
    }

    pub fn digest_settings(&self) -> DigestSettings {
        DigestSettings {
            window: self.window_settings(),
            min_section_chars: self.min_section_chars,
            concurrency: self.concurrency.max(1),
        }
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts.max(1),
            base_delay: RETRY_BASE_DELAY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DigestConfig::default();
        assert_eq!(config.window_words, 400);
        assert_eq!(config.overlap_words, 50);
        assert_eq!(config.reduce_threshold_words, 512);
        assert_eq!(config.min_section_chars, 500);
        assert_eq!(config.wrap_width, 100);
        assert_eq!(config.concurrency, 1);
        assert_eq!(config.max_attempts, 3);
    }

    #[test]
    fn test_config_path() {
        let path = DigestConfig::config_path().unwrap();
        assert!(path.ends_with("cli-programs/book-digest.toml"));
    }

    #[test]
    fn test_parse_partial_config() {
        let toml_str = r#"
window_words = 300
wrap_width = 80
concurrency = 4
"#;
        let config: DigestConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.window_words, 300);
        assert_eq!(config.wrap_width, 80);
        assert_eq!(config.concurrency, 4);
        assert_eq!(config.overlap_words, 50);
        assert_eq!(config.min_section_chars, 500);
    }

    #[test]
    fn test_parse_empty_config() {
        let config: DigestConfig = toml::from_str("").unwrap();
        assert_eq!(config, DigestConfig::default());
    }

    #[test]
    fn test_runtime_settings() {
        let config = DigestConfig {
            window_words: 0,
            concurrency: 0,
            max_attempts: 0,
            ..DigestConfig::default()
        };
        assert_eq!(config.window_settings().window_words, 1);
        assert_eq!(config.digest_settings().concurrency, 1);
        assert_eq!(config.digest_settings().min_section_chars, 500);

        let policy = config.retry_policy();
        assert_eq!(policy.max_attempts, 1);
        assert_eq!(policy.base_delay, Duration::from_secs(2));
    }

    #[test]
    fn test_round_trips_through_toml() {
        let config = DigestConfig {
            wrap_width: 72,
            ..DigestConfig::default()
        };
        let text = toml::to_string_pretty(&config).unwrap();
        assert!(text.contains("wrap_width = 72"));
        let parsed: DigestConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed, config);
    }
}
