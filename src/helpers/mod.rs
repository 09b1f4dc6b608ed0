//! Helper functions shared by the page shells and the event catalog

mod date;
mod html;
mod url;

pub use date::*;
pub use html::*;
pub use url::*;
