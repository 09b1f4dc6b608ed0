//! Content lookup errors

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ContentError {
    /// No source document exists for the slug
    #[error("post not found: {slug}")]
    NotFound { slug: String },

    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl ContentError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ContentError::NotFound { .. })
    }
}
