//! Content repository - loads posts from the content directory

use chrono::{DateTime, Utc};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::{ContentError, Post, PostMeta, PostOptions};
use crate::helpers::parse_timestamp;
use crate::Site;

/// Reads article sources from a single directory.
///
/// Holds no state besides its location: every call re-reads the files, so
/// concurrent callers never observe each other.
#[derive(Debug, Clone)]
pub struct ContentRepository {
    dir: PathBuf,
    options: PostOptions,
}

impl ContentRepository {
    /// Create a repository over `dir`
    pub fn new<P: AsRef<Path>>(dir: P, options: PostOptions) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            options,
        }
    }

    /// Create a repository for the site's configured content directory
    pub fn for_site(site: &Site) -> Self {
        Self::new(&site.content_dir, PostOptions::from_config(&site.config))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn options(&self) -> &PostOptions {
        &self.options
    }

    /// All document slugs, in file name order.
    ///
    /// A missing content directory is created and reported as empty.
    pub fn list_slugs(&self) -> Result<Vec<String>, ContentError> {
        if !self.dir.exists() {
            tracing::info!("Content directory {:?} missing, creating it", self.dir);
            fs::create_dir_all(&self.dir).map_err(|e| self.io_error(&self.dir, e))?;
            return Ok(Vec::new());
        }

        let mut slugs = Vec::new();

        for entry in WalkDir::new(&self.dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name()
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!("Skipping unreadable entry in {:?}: {}", self.dir, e);
                    continue;
                }
            };

            let path = entry.path();
            if path.is_file() && self.has_content_extension(path) {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    slugs.push(stem.to_string());
                }
            }
        }

        tracing::debug!("Found {} documents in {:?}", slugs.len(), self.dir);
        Ok(slugs)
    }

    /// Load the full post for `slug`
    pub fn get_by_slug(&self, slug: &str) -> Result<Post, ContentError> {
        if !is_plain_slug(slug) {
            return Err(ContentError::NotFound {
                slug: slug.to_string(),
            });
        }

        let path = self.path_for(slug);
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(ContentError::NotFound {
                    slug: slug.to_string(),
                })
            }
            Err(e) => return Err(self.io_error(&path, e)),
        };

        Ok(Post::from_source(slug, &raw, &self.options))
    }

    /// Summaries of every readable post, newest first.
    ///
    /// A document that fails to load is logged and left out; it never takes
    /// the rest of the listing down with it. Equal dates keep file name order.
    pub fn list_all(&self) -> Result<Vec<PostMeta>, ContentError> {
        let mut posts: Vec<(Option<DateTime<Utc>>, PostMeta)> = self
            .list_slugs()?
            .into_iter()
            .filter_map(|slug| match self.get_by_slug(&slug) {
                Ok(post) => Some(post.into_meta()),
                Err(e) => {
                    tracing::warn!("Skipping post {:?}: {}", slug, e);
                    None
                }
            })
            .map(|meta| (parse_timestamp(&meta.date), meta))
            .collect();

        // Newest instant first; undated or unparseable dates sort last
        posts.sort_by(|a, b| b.0.cmp(&a.0));

        Ok(posts.into_iter().map(|(_, meta)| meta).collect())
    }

    fn path_for(&self, slug: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", slug, self.options.extension))
    }

    fn has_content_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| e == self.options.extension)
            .unwrap_or(false)
    }

    fn io_error(&self, path: &Path, source: std::io::Error) -> ContentError {
        ContentError::Io {
            path: path.display().to_string(),
            source,
        }
    }
}

/// A slug must name a file directly inside the content directory
fn is_plain_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug != "."
        && slug != ".."
        && !slug.contains(['/', '\\', '\0'])
}
