//! Site configuration (_config.yml)

use anyhow::Result;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::events::EventMeta;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub description: String,
    pub language: String,
    pub url: String,
    pub timezone: String,

    // Directory
    pub content_dir: String,
    pub content_extension: String,
    pub public_dir: String,

    // Writing
    #[serde(default)]
    pub reading: ReadingConfig,
    pub excerpt_length: usize,
    #[serde(default)]
    pub highlight: HighlightConfig,

    // Contact relay
    #[serde(default)]
    pub contact: ContactConfig,

    // Preferences
    pub theme_cookie: String,

    // Events
    #[serde(default)]
    pub events: Vec<EventMeta>,

    // Store any additional fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "TensorLab".to_string(),
            description: String::new(),
            language: "vi".to_string(),
            url: "http://localhost:4000".to_string(),
            timezone: "Asia/Ho_Chi_Minh".to_string(),

            content_dir: "content/blog".to_string(),
            content_extension: "mdx".to_string(),
            public_dir: "public".to_string(),

            reading: ReadingConfig::default(),
            excerpt_length: 200,
            highlight: HighlightConfig::default(),

            contact: ContactConfig::default(),

            theme_cookie: "theme".to_string(),

            events: Vec::new(),
            extra: HashMap::new(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Resolve the configured timezone, falling back to UTC on an unknown name
    pub fn tz(&self) -> chrono_tz::Tz {
        self.timezone.parse().unwrap_or_else(|_| {
            tracing::warn!("Unknown timezone {:?}, using UTC", self.timezone);
            chrono_tz::UTC
        })
    }
}

/// Reading time configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReadingConfig {
    pub words_per_minute: usize,
    /// Replaces the generic "min read" unit in reading-time labels
    pub label: String,
}

impl Default for ReadingConfig {
    fn default() -> Self {
        Self {
            words_per_minute: 200,
            label: "phút đọc".to_string(),
        }
    }
}

/// Code highlighting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    pub theme: String,
    pub line_number: bool,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            theme: "base16-ocean.dark".to_string(),
            line_number: false,
        }
    }
}

/// Contact form relay configuration.
///
/// Credentials are never stored here, only the names of the environment
/// variables holding them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactConfig {
    pub api_base: String,
    pub token_env: String,
    pub chat_id_env: String,
    pub type_labels: IndexMap<String, String>,
}

impl Default for ContactConfig {
    fn default() -> Self {
        let mut type_labels = IndexMap::new();
        type_labels.insert("product".to_string(), "Hợp tác Product".to_string());
        type_labels.insert("outsource".to_string(), "Thuê Outsource".to_string());
        type_labels.insert("other".to_string(), "Khác".to_string());

        Self {
            api_base: "https://api.telegram.org".to_string(),
            token_env: "TELEGRAM_BOT_TOKEN".to_string(),
            chat_id_env: "TELEGRAM_CHAT_ID".to_string(),
            type_labels,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SiteConfig::default();
        assert_eq!(config.content_dir, "content/blog");
        assert_eq!(config.content_extension, "mdx");
        assert_eq!(config.reading.words_per_minute, 200);
        assert_eq!(config.excerpt_length, 200);
        assert_eq!(config.contact.type_labels["outsource"], "Thuê Outsource");
    }

    #[test]
    fn test_parse_config() {
        let yaml = r#"
title: My Lab
content_dir: posts
reading:
  words_per_minute: 180
events:
  - slug: intro
    title: Intro webinar
    desc: Getting started
    startAt: "2026-04-15T09:00:00+07:00"
    format: Google Meet
custom_key: 42
"#;
        let config: SiteConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.title, "My Lab");
        assert_eq!(config.content_dir, "posts");
        assert_eq!(config.reading.words_per_minute, 180);
        // Unset nested fields keep their defaults
        assert_eq!(config.reading.label, "phút đọc");
        assert_eq!(config.events.len(), 1);
        assert_eq!(config.events[0].slug, "intro");
        assert!(config.extra.contains_key("custom_key"));
    }

    #[test]
    fn test_timezone_fallback() {
        let mut config = SiteConfig::default();
        assert_eq!(config.tz(), chrono_tz::Asia::Ho_Chi_Minh);

        config.timezone = "Mars/Olympus".to_string();
        assert_eq!(config.tz(), chrono_tz::UTC);
    }
}
