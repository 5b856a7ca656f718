use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::session::state::{DifficultyLevel, QUESTION_COUNTS};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default)]
    pub difficulty_level: DifficultyLevel,
    #[serde(default = "default_question_count")]
    pub question_count: usize,
    /// Remote difficulty advisor endpoint. Local rules are used when unset.
    #[serde(default)]
    pub advisor_url: Option<String>,
    #[serde(default = "default_advisor_timeout_secs")]
    pub advisor_timeout_secs: u64,
}

fn default_theme() -> String {
    crate::ui::theme::DEFAULT_THEME.to_string()
}
fn default_question_count() -> usize {
    QUESTION_COUNTS[0]
}
fn default_advisor_timeout_secs() -> u64 {
    10
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            difficulty_level: DifficultyLevel::default(),
            question_count: default_question_count(),
            advisor_url: None,
            advisor_timeout_secs: default_advisor_timeout_secs(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = fs::read_to_string(path)?;
            let mut config: Config = toml::from_str(&content)?;
            config.normalize();
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("mathdash")
            .join("config.toml")
    }

    /// Snap `question_count` to the nearest offered count and drop a blank
    /// advisor URL.
    pub fn normalize(&mut self) {
        self.question_count = nearest_question_count(self.question_count);
        if self
            .advisor_url
            .as_deref()
            .is_some_and(|url| url.trim().is_empty())
        {
            self.advisor_url = None;
        }
        self.advisor_timeout_secs = self.advisor_timeout_secs.clamp(1, 120);
    }
}

pub fn nearest_question_count(requested: usize) -> usize {
    QUESTION_COUNTS
        .iter()
        .copied()
        .min_by_key(|&n| n.abs_diff(requested))
        .unwrap_or(QUESTION_COUNTS[0])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_serde_defaults_from_empty() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.question_count, 10);
        assert_eq!(config.difficulty_level, DifficultyLevel::Medium);
        assert!(config.advisor_url.is_none());
    }

    #[test]
    fn test_config_partial_file() {
        let toml_str = r#"
theme = "nord"
difficulty_level = "hard"
advisor_url = "http://localhost:8080/advise"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.theme, "nord");
        assert_eq!(config.difficulty_level, DifficultyLevel::Hard);
        assert_eq!(config.advisor_url.as_deref(), Some("http://localhost:8080/advise"));
        assert_eq!(config.advisor_timeout_secs, 10);
    }

    #[test]
    fn test_config_serde_roundtrip() {
        let config = Config {
            question_count: 30,
            advisor_url: Some("http://example.test".to_string()),
            ..Config::default()
        };
        let serialized = toml::to_string_pretty(&config).unwrap();
        let deserialized: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_save_and_load_from_path() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        assert_eq!(Config::load_from(&path).unwrap(), Config::default());

        let config = Config {
            theme: "nord".to_string(),
            difficulty_level: DifficultyLevel::Easy,
            question_count: 50,
            ..Config::default()
        };
        config.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_normalize_snaps_question_count() {
        let mut config = Config {
            question_count: 27,
            advisor_url: Some("  ".to_string()),
            advisor_timeout_secs: 0,
            ..Config::default()
        };
        config.normalize();
        assert_eq!(config.question_count, 30);
        assert!(config.advisor_url.is_none());
        assert_eq!(config.advisor_timeout_secs, 1);
    }

    #[test]
    fn test_nearest_question_count() {
        assert_eq!(nearest_question_count(0), 10);
        assert_eq!(nearest_question_count(20), 20);
        assert_eq!(nearest_question_count(44), 50);
        assert_eq!(nearest_question_count(1000), 50);
    }
}
