//! HTTP server: blog pages, JSON API, contact relay and static assets

mod api;
mod pages;

use anyhow::Result;
use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::contact::ContactRelay;
use crate::content::{ContentRepository, MarkdownRenderer};
use crate::events::EventCatalog;
use crate::Site;

/// Everything the handlers need, shared across requests
pub struct AppState {
    pub site_title: String,
    pub language: String,
    pub theme_cookie: String,
    pub repository: ContentRepository,
    pub renderer: MarkdownRenderer,
    pub events: EventCatalog,
    pub contact: ContactRelay,
}

impl AppState {
    /// Build the state for a site, reading contact credentials from the environment
    pub fn from_site(site: &Site) -> Self {
        Self {
            site_title: site.config.title.clone(),
            language: site.config.language.clone(),
            theme_cookie: site.config.theme_cookie.clone(),
            repository: site.repository(),
            renderer: MarkdownRenderer::with_options(&site.config.highlight),
            events: site.events(),
            contact: ContactRelay::from_env(site.config.contact.clone(), site.config.tz()),
        }
    }
}

type SharedState = Arc<AppState>;

/// Build the application router
pub fn router(state: AppState, public_dir: &Path) -> Router {
    let assets = ServeDir::new(public_dir).append_index_html_on_directories(true);

    Router::new()
        .route("/blog", get(pages::blog_index))
        .route("/blog/:slug", get(pages::blog_post))
        .route("/api/posts", get(api::list_posts))
        .route("/api/posts/:slug", get(api::get_post))
        .route("/api/events", get(api::list_events))
        .route("/api/events/:slug", get(api::get_event))
        .route("/api/events/:slug/countdown", get(api::event_countdown))
        .route("/api/contact", post(api::contact))
        .route(
            "/api/preferences/theme",
            get(api::get_theme).put(api::put_theme),
        )
        .fallback_service(assets)
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

/// Start the server
pub async fn start(site: &Site, ip: &str, port: u16, open: bool) -> Result<()> {
    let app = router(AppState::from_site(site), &site.public_dir);

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    let url = format!("http://{}:{}", ip, port);
    println!("Server running at {}", url);
    println!("Press Ctrl+C to stop.");

    if open {
        if let Err(e) = open_browser(&format!("{}/blog", url)) {
            tracing::warn!("Failed to open browser: {}", e);
        }
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Open a URL in the default browser
fn open_browser(url: &str) -> Result<()> {
    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open").arg(url).spawn()?;
    }

    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open").arg(url).spawn()?;
    }

    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/c", "start", url])
            .spawn()?;
    }

    Ok(())
}
