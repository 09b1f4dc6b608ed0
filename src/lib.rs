//! tensorlab: content server for the TensorLab site
//!
//! Loads blog posts from MDX sources in the content directory, renders them,
//! and serves them next to the events catalog and the contact form relay.

pub mod commands;
pub mod config;
pub mod contact;
pub mod content;
pub mod events;
pub mod helpers;
pub mod preferences;
pub mod server;

use anyhow::Result;
use std::path::{Path, PathBuf};

/// Name of the site configuration file in the base directory
pub const CONFIG_FILE: &str = "_config.yml";

/// A site rooted at a base directory
#[derive(Debug, Clone)]
pub struct Site {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Directory holding article sources
    pub content_dir: PathBuf,
    /// Static assets served as-is
    pub public_dir: PathBuf,
}

impl Site {
    /// Open the site in a directory, using defaults when there is no config file
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join(CONFIG_FILE);

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            tracing::debug!("No {} in {:?}, using defaults", CONFIG_FILE, base_dir);
            config::SiteConfig::default()
        };

        Ok(Self::with_config(base_dir, config))
    }

    /// Build a site from an already loaded configuration
    pub fn with_config(base_dir: PathBuf, config: config::SiteConfig) -> Self {
        let content_dir = base_dir.join(&config.content_dir);
        let public_dir = base_dir.join(&config.public_dir);

        Self {
            config,
            base_dir,
            content_dir,
            public_dir,
        }
    }

    /// Repository over this site's content directory
    pub fn repository(&self) -> content::ContentRepository {
        content::ContentRepository::for_site(self)
    }

    /// Events configured for this site
    pub fn events(&self) -> events::EventCatalog {
        events::EventCatalog::new(self.config.events.clone(), self.config.tz())
    }
}
