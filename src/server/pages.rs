//! Server-rendered blog pages

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Html,
};

use super::SharedState;
use crate::content::{ContentError, PostMeta, TocEntry};
use crate::helpers::{format_post_date, html_escape, link_to, post_url};

const NOT_FOUND_TITLE: &str = "Bài viết không tìm thấy";

type Page = (StatusCode, Html<String>);

/// Wrap a page body in the site shell
fn layout(state: &SharedState, title: &str, head: &str, body: &str) -> Html<String> {
    let full_title = if title.is_empty() {
        html_escape(&state.site_title)
    } else {
        format!("{} | {}", html_escape(title), html_escape(&state.site_title))
    };

    Html(format!(
        r#"<!DOCTYPE html>
<html lang="{lang}">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
{head}</head>
<body>
<header class="site-header"><a href="/">{site}</a> <a href="/blog">Blog</a></header>
<main>
{body}
</main>
</body>
</html>
"#,
        lang = html_escape(&state.language),
        title = full_title,
        head = head,
        site = html_escape(&state.site_title),
        body = body,
    ))
}

fn not_found(state: &SharedState) -> Page {
    let body = format!(
        "<section class=\"not-found\"><h1>{}</h1><p>{}</p></section>",
        NOT_FOUND_TITLE,
        link_to("/blog", "Quay lại Blog")
    );
    (StatusCode::NOT_FOUND, layout(state, NOT_FOUND_TITLE, "", &body))
}

fn server_error(state: &SharedState, message: &str) -> Page {
    tracing::error!("{}", message);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        layout(state, "Error", "", "<h1>Internal server error</h1>"),
    )
}

fn post_card(post: &PostMeta) -> String {
    let href = post_url(&post.slug);
    let cover = post
        .cover_image
        .as_deref()
        .map(|src| {
            format!(
                "<img class=\"post-cover\" src=\"{}\" alt=\"{}\" loading=\"lazy\">",
                html_escape(src),
                html_escape(&post.title)
            )
        })
        .unwrap_or_default();

    format!(
        r#"<li class="post-card">
{cover}<h2>{link}</h2>
<p class="post-meta"><time datetime="{date_attr}">{date}</time> · {reading}</p>
<p class="post-excerpt">{excerpt}</p>
</li>"#,
        cover = cover,
        link = link_to(&href, &post.title),
        date_attr = html_escape(&post.date),
        date = html_escape(&format_post_date(&post.date)),
        reading = html_escape(&post.reading_time),
        excerpt = html_escape(if post.description.is_empty() {
            &post.excerpt
        } else {
            &post.description
        }),
    )
}

fn toc_nav(toc: &[TocEntry]) -> String {
    if toc.is_empty() {
        return String::new();
    }

    let items: String = toc
        .iter()
        .map(|entry| {
            format!(
                "<li class=\"toc-level-{}\"><a href=\"#{}\">{}</a></li>",
                entry.level,
                html_escape(&entry.id),
                html_escape(&entry.text)
            )
        })
        .collect();

    format!("<nav class=\"toc\"><ol>{}</ol></nav>\n", items)
}

/// GET /blog
pub async fn blog_index(State(state): State<SharedState>) -> Page {
    let repository = state.repository.clone();
    let posts = match tokio::task::spawn_blocking(move || repository.list_all()).await {
        Ok(Ok(posts)) => posts,
        Ok(Err(e)) => return server_error(&state, &e.to_string()),
        Err(e) => return server_error(&state, &e.to_string()),
    };

    let body = if posts.is_empty() {
        "<h1>Blog</h1>\n<p class=\"empty\">Chưa có bài viết nào.</p>".to_string()
    } else {
        let cards: Vec<String> = posts.iter().map(post_card).collect();
        format!("<h1>Blog</h1>\n<ul class=\"post-list\">\n{}\n</ul>", cards.join("\n"))
    };

    (StatusCode::OK, layout(&state, "Blog", "", &body))
}

/// GET /blog/:slug
pub async fn blog_post(State(state): State<SharedState>, Path(slug): Path<String>) -> Page {
    let worker = state.clone();
    let rendered = tokio::task::spawn_blocking(move || {
        let post = worker.repository.get_by_slug(&slug).map_err(anyhow::Error::from)?;
        let body = worker.renderer.render(&post.content)?;
        Ok::<_, anyhow::Error>((post, body))
    })
    .await;

    let (post, body) = match rendered {
        Ok(Ok(found)) => found,
        Ok(Err(e)) => {
            let missing = e
                .downcast_ref::<ContentError>()
                .is_some_and(ContentError::is_not_found);
            if missing {
                return not_found(&state);
            }
            return server_error(&state, &e.to_string());
        }
        Err(e) => return server_error(&state, &e.to_string()),
    };

    let meta = &post.meta;
    let mut head = format!(
        "<meta name=\"description\" content=\"{}\">\n<meta property=\"og:title\" content=\"{}\">\n<meta property=\"og:type\" content=\"article\">\n<meta property=\"article:published_time\" content=\"{}\">\n",
        html_escape(&meta.description),
        html_escape(&meta.title),
        html_escape(&meta.date),
    );
    if let Some(cover) = &meta.cover_image {
        head.push_str(&format!(
            "<meta property=\"og:image\" content=\"{}\">\n",
            html_escape(cover)
        ));
    }

    let article = format!(
        r#"<article class="post">
<header>
<h1>{title}</h1>
<p class="post-meta"><time datetime="{date_attr}">{date}</time> · {reading}</p>
</header>
{toc}<div class="post-body">
{html}</div>
</article>"#,
        title = html_escape(&meta.title),
        date_attr = html_escape(&meta.date),
        date = html_escape(&format_post_date(&meta.date)),
        reading = html_escape(&meta.reading_time),
        toc = toc_nav(&body.toc),
        html = body.html,
    );

    (StatusCode::OK, layout(&state, &meta.title, &head, &article))
}
