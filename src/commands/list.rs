//! List site content

use anyhow::Result;
use chrono::Utc;
use std::fmt::Write;

use crate::Site;

/// Render the listing for a content type
pub fn render(site: &Site, content_type: &str) -> Result<String> {
    let mut out = String::new();

    match content_type {
        "post" | "posts" => {
            let posts = site.repository().list_all()?;
            writeln!(out, "Posts ({}):", posts.len())?;
            for post in posts {
                writeln!(
                    out,
                    "  {} - {} [{}] ({})",
                    post.date, post.title, post.slug, post.reading_time
                )?;
            }
        }
        "event" | "events" => {
            let catalog = site.events();
            let views = catalog.views(Utc::now());
            writeln!(out, "Events ({}):", views.len())?;
            for view in views {
                writeln!(
                    out,
                    "  {} - {} [{}] {}",
                    view.date_long.as_deref().unwrap_or("-"),
                    view.meta.title,
                    view.meta.slug,
                    view.status.as_str()
                )?;
            }
        }
        _ => {
            anyhow::bail!("Unknown type: {}. Available: post, event", content_type);
        }
    }

    Ok(out)
}

/// List site content by type
pub fn run(site: &Site, content_type: &str) -> Result<()> {
    print!("{}", render(site, content_type)?);
    Ok(())
}
