pub mod request_id;

use axum::{middleware, routing::get, routing::post, Router};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::controllers::{chat::ChatController, health};
use crate::infrastructure::config::Config;
use request_id::request_id_middleware;

/// Build the application router. Factored out of the server start so tests
/// can drive it in-process.
pub fn build_router(chat_controller: Arc<ChatController>) -> Router {
    Router::new()
        .route("/", get(health::root))
        .route("/health", get(health::health))
        .route("/voices", get(ChatController::voices))
        .route("/chat", post(ChatController::chat))
        .with_state(chat_controller)
        .layer(middleware::from_fn(request_id_middleware))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Start the HTTP server with all routes configured
pub async fn start_http_server(
    config: Arc<Config>,
    chat_controller: Arc<ChatController>,
) -> Result<(), Box<dyn std::error::Error>> {
    let app = build_router(chat_controller);

    // Start server
    let listener =
        tokio::net::TcpListener::bind(format!("{}:{}", config.host, config.port)).await?;

    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
