//! Post records

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

use super::{FrontMatter, ReadingTime};
use crate::config::SiteConfig;

lazy_static! {
    /// Heading, emphasis and blockquote markers plus line breaks
    static ref EXCERPT_MARKUP: Regex = Regex::new(r"[#*>\r\n]").unwrap();
}

/// Marker appended to every excerpt
const ELLIPSIS: &str = "...";

/// Summary record used in listings
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostMeta {
    /// File name without extension
    pub slug: String,
    pub title: String,
    /// Date as authored, not validated
    pub date: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    pub reading_time: String,
    pub excerpt: String,
}

/// A full article: the summary plus the unprocessed body
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Post {
    #[serde(flatten)]
    pub meta: PostMeta,

    /// Markup source with the header block removed
    pub content: String,
}

/// Knobs for building posts from source files
#[derive(Debug, Clone)]
pub struct PostOptions {
    /// Source file extension, without the dot
    pub extension: String,
    pub words_per_minute: usize,
    /// Unit text for reading-time labels
    pub reading_label: String,
    /// Characters of body taken before stripping markup
    pub excerpt_length: usize,
}

impl Default for PostOptions {
    fn default() -> Self {
        Self::from_config(&SiteConfig::default())
    }
}

impl PostOptions {
    pub fn from_config(config: &SiteConfig) -> Self {
        Self {
            extension: config.content_extension.clone(),
            words_per_minute: config.reading.words_per_minute,
            reading_label: config.reading.label.clone(),
            excerpt_length: config.excerpt_length,
        }
    }
}

impl Post {
    /// Merge a parsed header, the body and the computed fields into a post
    pub fn build(slug: &str, fm: &FrontMatter, body: &str, options: &PostOptions) -> Self {
        let reading_time = ReadingTime::estimate(body, options.words_per_minute);

        let meta = PostMeta {
            slug: slug.to_string(),
            title: fm.title.clone().unwrap_or_default(),
            date: fm.date.clone().unwrap_or_default(),
            description: fm.description.clone().unwrap_or_default(),
            cover_image: fm.cover_image.clone(),
            reading_time: reading_time.localized(&options.reading_label),
            excerpt: excerpt(body, options.excerpt_length),
        };

        Self {
            meta,
            content: body.to_string(),
        }
    }

    /// Parse a raw source document into a post
    pub fn from_source(slug: &str, raw: &str, options: &PostOptions) -> Self {
        let (fm, body) = FrontMatter::parse(raw);
        Self::build(slug, &fm, body, options)
    }

    /// Drop the body, keeping the listing record
    pub fn into_meta(self) -> PostMeta {
        self.meta
    }
}

/// Plain-text preview: the first `length` characters with each markup
/// marker and line break turned into a space. The ellipsis is appended even
/// when nothing was cut off.
pub fn excerpt(body: &str, length: usize) -> String {
    let head: String = body.chars().take(length).collect();
    let plain = EXCERPT_MARKUP.replace_all(&head, " ");
    format!("{}{}", plain.trim(), ELLIPSIS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_from_complete_header() {
        let raw = "---\ntitle: \"Hello\"\ndate: \"2025-01-01\"\ndescription: \"Intro\"\n---\nBody text here.";
        let post = Post::from_source("a", raw, &PostOptions::default());

        assert_eq!(post.meta.slug, "a");
        assert_eq!(post.meta.title, "Hello");
        assert_eq!(post.meta.date, "2025-01-01");
        assert_eq!(post.meta.description, "Intro");
        assert_eq!(post.meta.cover_image, None);
        assert_eq!(post.meta.reading_time, "1 phút đọc");
        assert_eq!(post.meta.excerpt, "Body text here....");
        assert_eq!(post.content, "Body text here.");
    }

    #[test]
    fn test_absent_fields_default_to_empty() {
        let post = Post::from_source("bare", "No header at all", &PostOptions::default());
        assert_eq!(post.meta.title, "");
        assert_eq!(post.meta.date, "");
        assert_eq!(post.meta.description, "");
        assert!(post.meta.cover_image.is_none());
    }

    #[test]
    fn test_excerpt_replaces_markup_with_spaces() {
        let body = "# Heading\n\n> Quoted **bold** and _em_ text";
        let text = excerpt(body, 200);
        assert_eq!(text, "Heading    Quoted   bold   and _em_ text...");
        for marker in ['#', '*', '>', '\n'] {
            assert!(!text.contains(marker));
        }
    }

    #[test]
    fn test_excerpt_keeps_words_on_separate_lines_apart() {
        assert_eq!(excerpt("First line\nSecond line", 200), "First line Second line...");
        assert_eq!(excerpt("One\r\nTwo", 200), "One  Two...");
    }

    #[test]
    fn test_excerpt_keeps_underscores() {
        assert_eq!(excerpt("Call `load_config` first", 200), "Call `load_config` first...");
    }

    #[test]
    fn test_excerpt_counts_characters() {
        let body = "ạ".repeat(300);
        let text = excerpt(&body, 200);
        assert_eq!(text.chars().count(), 203);
        assert!(text.ends_with("..."));
    }

    #[test]
    fn test_excerpt_ellipsis_is_unconditional() {
        assert_eq!(excerpt("Short.", 200), "Short....");
        assert_eq!(excerpt("", 200), "...");
    }

    #[test]
    fn test_custom_reading_label() {
        let options = PostOptions {
            reading_label: "minutes".to_string(),
            ..PostOptions::default()
        };
        let post = Post::from_source("x", "word", &options);
        assert_eq!(post.meta.reading_time, "1 minutes");
    }

    #[test]
    fn test_serialized_shape() {
        let raw = "---\ntitle: T\ncoverImage: /c.png\n---\nBody";
        let post = Post::from_source("s", raw, &PostOptions::default());
        let json = serde_json::to_value(&post).unwrap();
        assert_eq!(json["coverImage"], "/c.png");
        assert_eq!(json["readingTime"], "1 phút đọc");
        assert_eq!(json["content"], "Body");

        let meta = serde_json::to_value(post.into_meta()).unwrap();
        assert!(meta.get("content").is_none());

        let bare = Post::from_source("b", "Body", &PostOptions::default());
        let json = serde_json::to_value(&bare).unwrap();
        assert!(json.get("coverImage").is_none());
        assert_eq!(json["description"], "");
    }
}
