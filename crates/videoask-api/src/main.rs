//! VideoAsk playback host entry point.

use std::error::Error;

use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;
use videoask_api::config::ServerConfig;
use videoask_api::routes;
use videoask_api::state::AppState;
use videoask_graph::application::loader::load_graph;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Initialize tracing subscriber.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    tracing::info!("Starting VideoAsk playback host");

    // Read configuration from environment.
    let config = ServerConfig::from_env()?;

    // Load and validate the node graph.
    let graph = load_graph(&config.graph_path).await?;

    // Start the playback session.
    let (app_state, driver) = AppState::launch(graph, config.playback_config());

    // Build router.
    let app = routes::router()
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    // Start server.
    let addr = config.socket_addr()?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app).await?;

    driver.abort();

    Ok(())
}
