//! Local web server for shared links.
//!
//! A share link (`/?id=...&shared=true`) opens a read-only page for one
//! horse; `/tree?id=...` draws its ancestry with pan and zoom. Every request
//! reads the collection fresh from the record store.
//!
//! # Module Structure
//!
//! - `handlers` - HTTP route handlers
//! - `models` - API response types (DTOs)
//! - `pages` - HTML for the list, detail and tree pages
//! - `templates` - page shell and static assets

mod handlers;
mod models;
mod pages;
mod templates;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{routing::get, Router};
use color_eyre::eyre::Result;
use tower_http::cors::{Any, CorsLayer};

use pedigree_core::{Config, RecordStore};

// =============================================================================
// Application State
// =============================================================================

/// Shared application state for the server.
pub struct AppState {
    /// Record store every request reads from.
    pub store: Arc<dyn RecordStore>,
    /// Loaded configuration (depth, share origin, tree bounds).
    pub config: Config,
}

// =============================================================================
// Server Configuration
// =============================================================================

/// Configuration for the share-link server.
pub struct ServeConfig {
    /// Port to listen on.
    pub port: u16,
    /// Whether to open the browser automatically.
    pub open_browser: bool,
    /// Application configuration handed to the handlers.
    pub app: Config,
}

impl ServeConfig {
    pub fn from_config(config: &Config) -> Self {
        Self {
            port: config.server.port,
            open_browser: config.server.open_browser,
            app: config.clone(),
        }
    }
}

/// Routes for pages and the JSON API.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        // Pages
        .route("/", get(handlers::index))
        .route("/tree", get(handlers::tree))
        // API endpoints
        .route("/api/horses", get(handlers::api_horses))
        .route("/api/lineage/{id}", get(handlers::api_lineage))
        .layer(CorsLayer::new().allow_origin(Any))
        .with_state(state)
}

// =============================================================================
// Server Entry Point
// =============================================================================

/// Start the share-link server.
pub async fn start_server(config: ServeConfig, store: Arc<dyn RecordStore>) -> Result<()> {
    let state = Arc::new(AppState {
        store,
        config: config.app,
    });
    let app = router(state);

    let addr = SocketAddr::from(([127, 0, 0, 1], config.port));
    let url = format!("http://localhost:{}", config.port);

    println!("Starting Pedigree share server...");
    println!("Pages: {}", url);
    println!("Press Ctrl+C to stop\n");

    if config.open_browser {
        if let Err(e) = open::that(&url) {
            tracing::warn!("Could not open browser: {}", e);
        }
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on {}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
