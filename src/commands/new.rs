//! Create a new post

use anyhow::Result;
use chrono::Utc;
use std::fs;
use std::path::PathBuf;

use crate::content::FrontMatter;
use crate::Site;

/// Create a new post source file and return its path
pub fn create_post(site: &Site, title: &str, slug: Option<&str>) -> Result<PathBuf> {
    let slug = match slug {
        Some(s) => slug::slugify(s),
        None => slug::slugify(title),
    };
    if slug.is_empty() {
        anyhow::bail!("Cannot derive a slug from {:?}, pass one with --slug", title);
    }

    let today = Utc::now().with_timezone(&site.config.tz());
    let header = FrontMatter {
        title: Some(title.to_string()),
        date: Some(today.format("%Y-%m-%d").to_string()),
        description: Some(String::new()),
        ..FrontMatter::default()
    };

    fs::create_dir_all(&site.content_dir)?;
    let file_path = site
        .content_dir
        .join(format!("{}.{}", slug, site.config.content_extension));

    // Check if file already exists
    if file_path.exists() {
        anyhow::bail!("File already exists: {:?}", file_path);
    }

    fs::write(&file_path, header.to_header_block()?)?;
    tracing::debug!("Created post {:?}", file_path);

    Ok(file_path)
}
