//! Note explorer - a web viewer over a Notes API and its LLM analyses.
//!
//! The application is organized into the following modules:
//!
//! - `api`: Typed client for the Notes API
//! - `catalog`: Question catalog loading with a bundled fallback
//! - `explorer`: Per-mount view-model state and source fetches
//! - `filter` / `versions`: Note filtering, sorting and version resolution
//! - `templates`: HTML/CSS templates and rendering
//! - `handlers`: HTTP route handlers

use axum::{routing::get, Router};
use std::sync::Arc;

use note_explorer::{handlers, AppState, Config};

// ============================================================================
// Main
// ============================================================================

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    env_logger::init();

    let config = Config::from_env();
    let bind_addr = config.bind_addr.clone();
    let api_url = config.api_url.clone();
    let state = Arc::new(AppState::new(config));

    let app = Router::new()
        // Page routes
        .route("/", get(handlers::index))
        .route("/refresh", get(handlers::refresh))
        // JSON routes
        .route("/api/notes", get(handlers::api_notes))
        .route("/api/notes/{id}", get(handlers::api_note_detail))
        .route("/api/catalog", get(handlers::api_catalog))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("Failed to bind to {}: {}", bind_addr, e));

    log::info!("Note explorer running at http://{}", bind_addr);
    log::info!("Notes API: {}", api_url);

    axum::serve(listener, app).await.expect("Server error");
}
