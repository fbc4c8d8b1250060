mod assistant;
mod catalog;
mod config;
mod errors;
mod extractor;
mod report;
mod routes;
mod session;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::assistant::AssistantClient;
use crate::config::Config;
use crate::routes::build_router;
use crate::session::SessionStore;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Greenlight API v{}", env!("CARGO_PKG_VERSION"));

    // Load the position workbook once. A missing or malformed workbook is
    // not fatal to the process: position selection stays disabled until the
    // file is fixed and the service restarted.
    let catalog = match catalog::load(&config.positions_path) {
        Ok(catalog) => {
            if catalog.is_empty() {
                warn!(
                    "Position workbook {} has no rows; no positions available",
                    config.positions_path.display()
                );
            }
            info!(
                "Position catalog loaded: {} positions from {}",
                catalog.len(),
                config.positions_path.display()
            );
            Some(Arc::new(catalog))
        }
        Err(e) => {
            warn!(
                "Position catalog unavailable ({}): {e}",
                config.positions_path.display()
            );
            None
        }
    };

    let assistant = AssistantClient::new();
    info!("Assistant client initialized (model: {})", assistant::MODEL);

    let state = AppState {
        catalog,
        sessions: SessionStore::new(),
        assistant,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
