use anyhow::{Context, Result};
use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::path::PathBuf;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, services::ServeFile, trace::TraceLayer,
};
use tracing::{info, warn};

pub mod events;
pub mod handlers;
pub mod state;

use crate::constants::ALTERNATIVE_PORT;
pub use self::state::{AppState, LoadStatus};
use handlers::{
    dismiss_results, get_all_sites, get_session, get_settings, get_site_popup, index_html,
    recenter, script_js, search_sites, select_site, session_events_stream, style_css,
};

// Create the main application router
pub fn create_app(state: AppState, data_file: PathBuf) -> Router {
    Router::new()
        .route("/", get(index_html))
        .route("/style.css", get(style_css))
        .route("/script.js", get(script_js))
        .route("/api/sites", get(get_all_sites))
        .route("/api/sites/:index/popup", get(get_site_popup))
        .route("/api/sites/:index/select", post(select_site))
        .route("/api/search", get(search_sites))
        .route("/api/dismiss", post(dismiss_results))
        .route("/api/recenter", post(recenter))
        .route("/api/session", get(get_session))
        .route("/api/settings", get(get_settings))
        .route("/api/events", get(session_events_stream))
        .route_service("/data/sites.geojson", ServeFile::new(data_file))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// Binds the configured port, falling back to the alternative one if busy
async fn bind(port: u16) -> Result<TcpListener> {
    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    match TcpListener::bind(addr).await {
        Ok(listener) => Ok(listener),
        Err(e) if port != ALTERNATIVE_PORT => {
            warn!("Port {} unavailable ({}), trying {}", port, e, ALTERNATIVE_PORT);
            let addr = SocketAddr::from(([127, 0, 0, 1], ALTERNATIVE_PORT));
            TcpListener::bind(addr)
                .await
                .with_context(|| format!("Failed to bind ports {} and {}", port, ALTERNATIVE_PORT))
        }
        Err(e) => Err(e).with_context(|| format!("Failed to bind port {}", port)),
    }
}

pub async fn start_server(state: AppState, data_file: PathBuf, port: u16, open_browser: bool) -> Result<()> {
    let app = create_app(state, data_file);
    let listener = bind(port).await?;
    let local_addr = listener.local_addr()?;
    let url = format!("http://{}", local_addr);

    info!("HTTP server started at {}", url);

    if open_browser {
        if let Err(e) = crate::utils::open_in_browser(&url) {
            warn!("Could not open browser: {}", e);
        }
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
}
