pub mod pages;
mod routes;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use tower_http::compression::CompressionLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::cms::ContentSource;
use crate::config::Config;
use crate::detail::PostPages;
use crate::listing::{load_first_page, ListingSessions, PaginationState};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub source: Arc<dyn ContentSource>,
    /// First page of the listing, generated at startup.
    pub home: Arc<PaginationState>,
    pub pages: Arc<PostPages>,
    pub sessions: Arc<ListingSessions>,
}

impl AppState {
    /// Generate the static pages and assemble the state.
    ///
    /// Loads the first listing page and pre-generates the post pages of the
    /// bounded path set before anything is served.
    ///
    /// # Errors
    ///
    /// Returns an error if the content source cannot be listed.
    pub async fn generate(config: Config, source: Arc<dyn ContentSource>) -> Result<Self> {
        let home = load_first_page(
            source.as_ref(),
            &config.document_type,
            config.home_page_size,
        )
        .await
        .context("Failed to load first page of posts")?;

        let pages = PostPages::new(
            source.clone(),
            config.document_type.clone(),
            config.revalidate_after,
        );
        pages
            .prerender(config.prerender_page_size)
            .await
            .context("Failed to list posts for pre-generation")?;

        let sessions = Arc::new(ListingSessions::new(config.listing_session_idle));

        Ok(Self {
            config: Arc::new(config),
            source,
            home: Arc::new(home),
            pages,
            sessions,
        })
    }
}

/// Start the web server.
///
/// # Errors
///
/// Returns an error if the server fails to start.
pub async fn serve(state: AppState) -> Result<()> {
    let addr: SocketAddr = format!("{}:{}", state.config.web_host, state.config.web_port)
        .parse()
        .context("Invalid web server address")?;

    let app = create_app(state);

    info!(addr = %addr, "Starting HTTP web server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind web server")?;

    axum::serve(listener, app)
        .await
        .context("Web server error")?;

    Ok(())
}

/// Create the main application router.
pub fn create_app(state: AppState) -> Router {
    let static_dir = find_static_dir();
    info!(static_dir = ?static_dir, "Serving static files");

    Router::new()
        .merge(routes::router())
        .nest_service("/static", ServeDir::new(&static_dir))
        .fallback(routes::not_found)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Find the static files directory.
///
/// Checks in order:
/// 1. ./static (development)
/// 2. /usr/share/headless-blog/static (installed)
/// 3. Falls back to ./static
fn find_static_dir() -> PathBuf {
    let candidates = [
        PathBuf::from("./static"),
        PathBuf::from("/usr/share/headless-blog/static"),
    ];

    for path in &candidates {
        if path.is_dir() {
            return path.clone();
        }
    }

    PathBuf::from("./static")
}
