//! Front-matter parsing

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

/// Custom deserializer that accepts any YAML scalar and keeps its textual form,
/// so `date: 2025-01-01` and `title: 2024` survive as authored
fn scalar_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::{self, Visitor};
    use std::fmt;

    struct Scalar;

    impl<'de> Visitor<'de> for Scalar {
        type Value = Option<String>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string, number or boolean")
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Some(value.to_string()))
        }

        fn visit_string<E>(self, value: String) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Some(value))
        }

        fn visit_bool<E>(self, value: bool) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Some(value.to_string()))
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Some(value.to_string()))
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Some(value.to_string()))
        }

        fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Some(value.to_string()))
        }

        fn visit_none<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(None)
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(None)
        }
    }

    deserializer.deserialize_any(Scalar)
}

/// Header block of an article source file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrontMatter {
    #[serde(deserialize_with = "scalar_string", skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(deserialize_with = "scalar_string", skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(deserialize_with = "scalar_string", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(
        rename = "coverImage",
        deserialize_with = "scalar_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub cover_image: Option<String>,

    /// Additional custom fields, in authored order
    #[serde(flatten)]
    pub extra: IndexMap<String, serde_yaml::Value>,
}

impl FrontMatter {
    /// Split raw document text into its header and body.
    ///
    /// Never fails: a missing, unterminated or unparseable header yields an
    /// empty `FrontMatter` and the whole input as body.
    pub fn parse(raw: &str) -> (Self, &str) {
        let content = raw.trim_start();

        if let Some(rest) = content.strip_prefix("---") {
            if let Some(parsed) = Self::parse_yaml(rest) {
                return parsed;
            }
        }

        (FrontMatter::default(), raw)
    }

    fn parse_yaml(rest: &str) -> Option<(Self, &str)> {
        // Only the line break ending the opening fence; a closing fence may follow directly
        let rest = rest
            .strip_prefix("\r\n")
            .or_else(|| rest.strip_prefix('\n'))
            .unwrap_or(rest);

        let (yaml_content, remaining) = match rest.strip_prefix("---") {
            Some(after) => ("", after),
            None => {
                let end_pos = rest.find("\n---")?;
                (&rest[..end_pos], &rest[end_pos + 4..])
            }
        };
        // The closing fence may carry trailing dashes or a CR before its newline
        let remaining = remaining.trim_start_matches('-');
        let remaining = remaining.trim_start_matches(['\n', '\r']);

        if yaml_content.trim().is_empty() {
            return Some((FrontMatter::default(), remaining));
        }

        // A fenced block without a single `key: value` line is a horizontal
        // rule in the body, not a header
        if !yaml_content.lines().any(looks_like_yaml_key) {
            return None;
        }

        match serde_yaml::from_str::<FrontMatter>(yaml_content) {
            Ok(fm) => Some((fm, remaining)),
            Err(e) => {
                tracing::warn!("Failed to parse YAML front-matter, treating as content: {}", e);
                None
            }
        }
    }

    /// Serialize back into a `---` fenced header block
    pub fn to_header_block(&self) -> anyhow::Result<String> {
        let yaml = serde_yaml::to_string(self)?;
        Ok(format!("---\n{}---\n", yaml))
    }
}

/// A line shaped like `key: value` or `key:` with a plain identifier key
fn looks_like_yaml_key(line: &str) -> bool {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return false;
    }

    let Some(colon_pos) = trimmed.find(':') else {
        return false;
    };

    let key = &trimmed[..colon_pos];
    let is_valid_key = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        && !matches!(key, "http" | "https" | "ftp");

    let after_colon = &trimmed[colon_pos + 1..];
    is_valid_key && (after_colon.is_empty() || after_colon.starts_with(' '))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_yaml_frontmatter() {
        let content = r#"---
title: "Hello"
date: "2025-01-01"
description: "Intro"
coverImage: /images/cover.png
tags:
  - rust
---

This is the content.
"#;

        let (fm, body) = FrontMatter::parse(content);
        assert_eq!(fm.title.as_deref(), Some("Hello"));
        assert_eq!(fm.date.as_deref(), Some("2025-01-01"));
        assert_eq!(fm.description.as_deref(), Some("Intro"));
        assert_eq!(fm.cover_image.as_deref(), Some("/images/cover.png"));
        assert!(fm.extra.contains_key("tags"));
        assert_eq!(body, "This is the content.\n");
        assert!(!body.contains("title:"));
    }

    #[test]
    fn test_unquoted_scalars_keep_text() {
        let content = "---\ntitle: 2024\ndate: 2025-02-01\ndescription: true\n---\nBody";

        let (fm, body) = FrontMatter::parse(content);
        assert_eq!(fm.title.as_deref(), Some("2024"));
        assert_eq!(fm.date.as_deref(), Some("2025-02-01"));
        assert_eq!(fm.description.as_deref(), Some("true"));
        assert_eq!(body, "Body");
    }

    #[test]
    fn test_missing_fields_are_absent() {
        let (fm, _) = FrontMatter::parse("---\ntitle: Only title\ndescription:\n---\nBody");
        assert_eq!(fm.title.as_deref(), Some("Only title"));
        assert_eq!(fm.date, None);
        assert_eq!(fm.description, None);
        assert_eq!(fm.cover_image, None);
    }

    #[test]
    fn test_no_frontmatter() {
        let content = "# Just a heading\n\nSome text.";
        let (fm, body) = FrontMatter::parse(content);
        assert_eq!(fm, FrontMatter::default());
        assert_eq!(body, content);
    }

    #[test]
    fn test_empty_header_block() {
        let (fm, body) = FrontMatter::parse("---\n---\nBody");
        assert_eq!(fm, FrontMatter::default());
        assert_eq!(body, "Body");

        let (fm, body) = FrontMatter::parse("---\r\n---\r\nBody");
        assert_eq!(fm, FrontMatter::default());
        assert_eq!(body, "Body");
    }

    #[test]
    fn test_unterminated_frontmatter() {
        let content = "---\ntitle: Never closed\n\nBody text";
        let (fm, body) = FrontMatter::parse(content);
        assert_eq!(fm.title, None);
        assert_eq!(body, content);
    }

    #[test]
    fn test_malformed_yaml_is_tolerated() {
        let content = "---\ntitle: [unclosed\ndate: 2025-01-01\n---\nBody";
        let (fm, body) = FrontMatter::parse(content);
        assert_eq!(fm, FrontMatter::default());
        assert_eq!(body, content);
    }

    #[test]
    fn test_markdown_separator_not_yaml() {
        let content = r#"
---

Check out https://example.com/path and some prose.

---
More content.
"#;

        let (fm, body) = FrontMatter::parse(content);
        assert_eq!(fm.title, None);
        assert!(body.contains("https://example.com"));
        assert!(body.contains("More content."));
    }

    #[test]
    fn test_crlf_line_endings() {
        let content = "---\r\ntitle: Windows\r\n---\r\nBody\r\n";
        let (fm, body) = FrontMatter::parse(content);
        assert_eq!(fm.title.as_deref(), Some("Windows"));
        assert_eq!(body, "Body\r\n");
    }

    #[test]
    fn test_header_block_round_trip() {
        let original = FrontMatter {
            title: Some("Triển khai: từ A đến Z".to_string()),
            date: Some("2025-01-01".to_string()),
            description: Some("Intro # with * markup".to_string()),
            cover_image: None,
            extra: IndexMap::new(),
        };

        let block = original.to_header_block().unwrap();
        assert!(block.starts_with("---\n"));
        assert!(!block.contains("coverImage"));

        let (parsed, body) = FrontMatter::parse(&block);
        assert_eq!(parsed, original);
        assert_eq!(body, "");
    }
}
