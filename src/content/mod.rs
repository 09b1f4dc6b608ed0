//! Content module - article sources, metadata and rendering

mod error;
mod frontmatter;
mod markdown;
mod post;
mod reading_time;
pub mod repository;

pub use error::ContentError;
pub use frontmatter::FrontMatter;
pub use markdown::{MarkdownRenderer, RenderedBody, TocEntry};
pub use post::{excerpt, Post, PostMeta, PostOptions};
pub use reading_time::ReadingTime;
pub use repository::ContentRepository;
