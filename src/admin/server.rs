//! HTTP Server Module
//!
//! This module sets up the HTTP server using axum.

use std::future::Future;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::admin::auth::require_admin;
use crate::admin::handlers;
use crate::admin::state::AppState;
use crate::common::{correlation_middleware, GateError, Result, StructuredLogger};
use crate::config::GateConfig;

/// Start the HTTP server and run until Ctrl+C
pub async fn start_server(config: GateConfig) -> Result<()> {
    let listen = config.listen;
    let state = AppState::new(config, StructuredLogger::stdio());

    let listener = TcpListener::bind(listen).await?;
    log::info!("Back-office gate listening on {}", listen);

    serve(listener, state, shutdown_signal()).await
}

/// Serve `state` on an already bound listener until `shutdown` resolves
pub async fn serve<F>(listener: TcpListener, state: AppState, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = build_router(state);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| GateError::Server(e.to_string()))?;

    log::info!("Server stopped");
    Ok(())
}

/// Build the application router with all routes
pub fn build_router(state: AppState) -> Router {
    // Everything under /api/admin requires a valid admin session
    let admin_router = Router::new()
        .route("/session", get(handlers::session_info))
        .layer(middleware::from_fn_with_state(state.clone(), require_admin));

    Router::new()
        // Public routes
        .route("/health", get(handlers::health_check))
        .route("/api/auth/login", post(handlers::login))
        .route("/api/auth/verify", get(handlers::verify))
        .route("/api/auth/logout", post(handlers::logout))

        // Authenticated by request signature rather than session
        .route("/api/hooks/inbound", post(handlers::inbound_hook))

        // Protected routes
        .nest("/api/admin", admin_router)
        .with_state(state)

        // Correlation ids wrap everything, including gate rejections
        .layer(middleware::from_fn(correlation_middleware))
        .layer(TraceLayer::new_for_http())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => log::info!("Received Ctrl+C, shutting down..."),
        Err(e) => log::error!("Failed to listen for shutdown signal: {}", e),
    }
}
