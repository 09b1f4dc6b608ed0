//! Markdown rendering with syntax highlighting and the MDX component set

use anyhow::Result;
use lazy_static::lazy_static;
use pulldown_cmark::{html, CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd};
use regex::{Captures, Regex};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use syntect::highlighting::ThemeSet;
use syntect::html::highlighted_html_for_string;
use syntect::parsing::SyntaxSet;

use crate::config::HighlightConfig;
use crate::helpers::html_escape;

lazy_static! {
    static ref CALLOUT_OPEN: Regex = Regex::new(r"<Callout\b([^>]*)>").unwrap();
    static ref CALLOUT_CLOSE: Regex = Regex::new(r"</Callout\s*>").unwrap();
    static ref IMAGE_WITH_CAPTION: Regex =
        Regex::new(r"<ImageWithCaption\b([^>]*?)/?>(?:\s*</ImageWithCaption>)?").unwrap();
    static ref ATTRIBUTE: Regex = Regex::new(r#"([A-Za-z_][\w-]*)\s*=\s*"([^"]*)""#).unwrap();
}

const CALLOUT_TYPES: [&str; 4] = ["info", "tip", "warning", "danger"];

/// One h2/h3 heading of a rendered article
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TocEntry {
    pub id: String,
    pub text: String,
    pub level: u8,
}

/// Rendered article body
#[derive(Debug, Clone, Serialize)]
pub struct RenderedBody {
    pub html: String,
    pub toc: Vec<TocEntry>,
}

/// Markdown renderer with syntax highlighting
pub struct MarkdownRenderer {
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
    theme_name: String,
    line_numbers: bool,
}

/// Heading being collected until its end tag
struct OpenHeading<'a> {
    level: u8,
    text: String,
    events: Vec<Event<'a>>,
}

impl MarkdownRenderer {
    /// Create a new markdown renderer
    pub fn new() -> Self {
        Self::with_options(&HighlightConfig::default())
    }

    /// Create with custom settings
    pub fn with_options(highlight: &HighlightConfig) -> Self {
        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme_set: ThemeSet::load_defaults(),
            theme_name: highlight.theme.clone(),
            line_numbers: highlight.line_number,
        }
    }

    /// Render markdown to HTML, collecting the table of contents on the way
    pub fn render(&self, markdown: &str) -> Result<RenderedBody> {
        let options = Options::ENABLE_TABLES
            | Options::ENABLE_FOOTNOTES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS
            | Options::ENABLE_SMART_PUNCTUATION
            | Options::ENABLE_GFM;
        let parser = Parser::new_ext(markdown, options);

        let mut events: Vec<Event> = Vec::new();
        let mut toc = Vec::new();
        let mut ids = HeadingIds::default();

        let mut heading: Option<OpenHeading> = None;
        let mut code_block: Option<(Option<String>, String)> = None;

        for event in parser {
            if let Some((_, code)) = code_block.as_mut() {
                match event {
                    Event::End(TagEnd::CodeBlock) => {
                        if let Some((lang, code)) = code_block.take() {
                            let highlighted = self.highlight_code(&code, lang.as_deref());
                            events.push(Event::Html(CowStr::from(highlighted)));
                        }
                    }
                    Event::Text(text) => code.push_str(&text),
                    _ => {}
                }
                continue;
            }

            let rewritten = match event {
                Event::Start(Tag::CodeBlock(kind)) => {
                    let lang = match kind {
                        CodeBlockKind::Fenced(lang) => {
                            // Info strings may carry extra words, e.g. "rust title=main.rs"
                            let lang = lang.split_whitespace().next().unwrap_or("").to_string();
                            (!lang.is_empty()).then_some(lang)
                        }
                        CodeBlockKind::Indented => None,
                    };
                    code_block = Some((lang, String::new()));
                    continue;
                }
                Event::Start(Tag::Heading { level, .. }) => {
                    heading = Some(OpenHeading {
                        level: level as u8,
                        text: String::new(),
                        events: Vec::new(),
                    });
                    continue;
                }
                Event::End(TagEnd::Heading(_)) => {
                    let Some(open) = heading.take() else {
                        continue;
                    };
                    let text = open.text.trim().to_string();
                    let id = ids.next(&text);
                    if matches!(open.level, 2 | 3) {
                        toc.push(TocEntry {
                            id: id.clone(),
                            text: text.clone(),
                            level: open.level,
                        });
                    }
                    let mut inner = String::new();
                    html::push_html(&mut inner, open.events.into_iter());
                    vec![Event::Html(CowStr::from(format!(
                        r##"<h{level} id="{id}">{inner}<a class="heading-anchor" href="#{id}" aria-hidden="true">#</a></h{level}>"##,
                        level = open.level,
                        id = id,
                        inner = inner,
                    )))]
                }
                Event::Start(Tag::Table(alignments)) => vec![
                    Event::Html(CowStr::from(r#"<div class="table-wrapper">"#)),
                    Event::Start(Tag::Table(alignments)),
                ],
                Event::End(TagEnd::Table) => vec![
                    Event::End(TagEnd::Table),
                    Event::Html(CowStr::from("</div>")),
                ],
                Event::Start(Tag::Link {
                    dest_url, title, ..
                }) => {
                    let title_attr = if title.is_empty() {
                        String::new()
                    } else {
                        format!(r#" title="{}""#, html_escape(&title))
                    };
                    let external = if dest_url.starts_with("http") {
                        r#" target="_blank" rel="noopener noreferrer""#
                    } else {
                        ""
                    };
                    vec![Event::InlineHtml(CowStr::from(format!(
                        r#"<a href="{}"{}{}>"#,
                        html_escape(&dest_url),
                        title_attr,
                        external
                    )))]
                }
                Event::End(TagEnd::Link) => vec![Event::InlineHtml(CowStr::from("</a>"))],
                other => vec![other],
            };

            match heading.as_mut() {
                Some(open) => {
                    for event in &rewritten {
                        if let Event::Text(text) | Event::Code(text) = event {
                            open.text.push_str(text);
                        }
                    }
                    open.events.extend(rewritten);
                }
                None => events.extend(rewritten),
            }
        }

        let mut html_output = String::new();
        html::push_html(&mut html_output, events.into_iter());

        Ok(RenderedBody {
            html: render_components(&html_output),
            toc,
        })
    }

    /// Highlight a code block
    fn highlight_code(&self, code: &str, lang: Option<&str>) -> String {
        let lang = lang.unwrap_or("text");

        let syntax = self
            .syntax_set
            .find_syntax_by_token(lang)
            .or_else(|| self.syntax_set.find_syntax_by_extension(lang))
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());

        let theme = self
            .theme_set
            .themes
            .get(&self.theme_name)
            .or_else(|| self.theme_set.themes.values().next());

        let highlighted = theme
            .and_then(|theme| {
                highlighted_html_for_string(code, &self.syntax_set, syntax, theme).ok()
            })
            .map(|html| {
                if self.line_numbers {
                    add_line_numbers(&html)
                } else {
                    html
                }
            })
            .unwrap_or_else(|| format!("<pre><code>{}</code></pre>", html_escape(code)));

        format!(
            r#"<figure class="code-block" data-language="{}">{}</figure>"#,
            html_escape(lang),
            highlighted
        )
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Anchor ids for headings, unique within one document
#[derive(Default)]
struct HeadingIds {
    seen: HashSet<String>,
}

impl HeadingIds {
    fn next(&mut self, text: &str) -> String {
        let base = match slug::slugify(text) {
            s if s.is_empty() => "section".to_string(),
            s => s,
        };

        let mut id = base.clone();
        let mut n = 2;
        while !self.seen.insert(id.clone()) {
            id = format!("{}-{}", base, n);
            n += 1;
        }
        id
    }
}

/// Add a line-number gutter to highlighted code
fn add_line_numbers(code: &str) -> String {
    let line_count = code.lines().count();
    let gutter: Vec<String> = (1..=line_count)
        .map(|n| format!(r#"<span class="line-number">{}</span>"#, n))
        .collect();

    format!(
        r#"<table><tr><td class="gutter"><pre>{}</pre></td><td class="code">{}</td></tr></table>"#,
        gutter.join("\n"),
        code
    )
}

/// Replace `<Callout>` and `<ImageWithCaption>` MDX components with plain HTML
fn render_components(html: &str) -> String {
    let html = CALLOUT_OPEN.replace_all(html, |caps: &Captures| {
        let attrs = parse_attributes(&caps[1]);
        let kind = attrs
            .get("type")
            .map(String::as_str)
            .filter(|t| CALLOUT_TYPES.contains(t))
            .unwrap_or("info");
        let title = attrs
            .get("title")
            .map(|t| format!(r#"<p class="callout-title">{}</p>"#, html_escape(t)))
            .unwrap_or_default();
        format!(
            r#"<aside class="callout callout-{}">{}<div class="callout-body">"#,
            kind, title
        )
    });
    let html = CALLOUT_CLOSE.replace_all(&html, "</div></aside>");

    IMAGE_WITH_CAPTION
        .replace_all(&html, |caps: &Captures| {
            let attrs = parse_attributes(&caps[1]);
            let attr = |name: &str| attrs.get(name).map(|v| html_escape(v)).unwrap_or_default();
            let caption = attrs
                .get("caption")
                .map(|c| format!("<figcaption>{}</figcaption>", html_escape(c)))
                .unwrap_or_default();
            format!(
                r#"<figure class="image-with-caption"><img src="{}" alt="{}" loading="lazy">{}</figure>"#,
                attr("src"),
                attr("alt"),
                caption
            )
        })
        .into_owned()
}

fn parse_attributes(raw: &str) -> HashMap<String, String> {
    ATTRIBUTE
        .captures_iter(raw)
        .map(|caps| (caps[1].to_string(), caps[2].to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_basic_markdown() {
        let renderer = MarkdownRenderer::new();
        let body = renderer.render("This is a **test**.").unwrap();
        assert!(body.html.contains("<p>This is a <strong>test</strong>.</p>"));
    }

    #[test]
    fn test_heading_anchors_and_toc() {
        let renderer = MarkdownRenderer::new();
        let body = renderer
            .render("# Title\n\n## Giới thiệu\n\ntext\n\n### Cài đặt `cargo`\n\n## Giới thiệu\n")
            .unwrap();

        assert!(body.html.contains(r#"<h1 id="title">Title"#));
        assert!(body.html.contains(r#"<h2 id="gioi-thieu">"#));
        assert!(body.html.contains(r##"href="#gioi-thieu""##));
        assert!(body.html.contains("<code>cargo</code>"));

        let ids: Vec<_> = body.toc.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["gioi-thieu", "cai-dat-cargo", "gioi-thieu-2"]);
        assert_eq!(body.toc[1].level, 3);
        assert_eq!(body.toc[1].text, "Cài đặt cargo");
    }

    #[test]
    fn test_render_code_block() {
        let renderer = MarkdownRenderer::new();
        let body = renderer.render("```rust\nfn main() {}\n```").unwrap();
        assert!(body.html.contains(r#"data-language="rust""#));
        assert!(body.html.contains("<pre"));
        assert!(body.html.contains("main"));
    }

    #[test]
    fn test_code_block_with_line_numbers() {
        let renderer = MarkdownRenderer::with_options(&HighlightConfig {
            line_number: true,
            ..HighlightConfig::default()
        });
        let body = renderer.render("```\na\nb\n```").unwrap();
        assert!(body.html.contains(r#"<span class="line-number">1</span>"#));
        assert!(body.html.contains(r#"data-language="text""#));
    }

    #[test]
    fn test_table_is_wrapped() {
        let renderer = MarkdownRenderer::new();
        let body = renderer.render("| a | b |\n|---|---|\n| 1 | 2 |\n").unwrap();
        let wrapper = body.html.find(r#"<div class="table-wrapper">"#).unwrap();
        let table = body.html.find("<table>").unwrap();
        assert!(wrapper < table);
        assert!(body.html.contains("</table>\n</div>"));
    }

    #[test]
    fn test_external_links_open_in_new_tab() {
        let renderer = MarkdownRenderer::new();
        let body = renderer
            .render("[site](https://example.com) and [local](/blog)")
            .unwrap();
        assert!(body.html.contains(
            r#"<a href="https://example.com" target="_blank" rel="noopener noreferrer">site</a>"#
        ));
        assert!(body.html.contains(r#"<a href="/blog">local</a>"#));
    }

    #[test]
    fn test_callout_component() {
        let renderer = MarkdownRenderer::new();
        let body = renderer
            .render("<Callout type=\"tip\" title=\"Mẹo hay\">\nNội dung\n</Callout>\n")
            .unwrap();
        assert!(body.html.contains(r#"<aside class="callout callout-tip">"#));
        assert!(body.html.contains(r#"<p class="callout-title">Mẹo hay</p>"#));
        assert!(body.html.contains("</div></aside>"));
        assert!(!body.html.contains("Callout"));

        let body = renderer.render("<Callout type=\"loud\">\nx\n</Callout>\n").unwrap();
        assert!(body.html.contains("callout-info"));
    }

    #[test]
    fn test_image_with_caption_component() {
        let renderer = MarkdownRenderer::new();
        let body = renderer
            .render("<ImageWithCaption src=\"/img/a.png\" alt=\"A\" caption=\"Hình 1\" />\n")
            .unwrap();
        assert!(body.html.contains(
            r#"<figure class="image-with-caption"><img src="/img/a.png" alt="A" loading="lazy"><figcaption>Hình 1</figcaption></figure>"#
        ));
    }

    #[test]
    fn test_component_markup_inside_code_is_untouched() {
        let renderer = MarkdownRenderer::new();
        let body = renderer.render("`<Callout>`").unwrap();
        assert!(body.html.contains("&lt;Callout&gt;"));
        assert!(!body.html.contains("<aside"));
    }
}
