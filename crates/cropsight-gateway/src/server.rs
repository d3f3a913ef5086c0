// SPDX-FileCopyrightText: 2026 Cropsight Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state for the gateway.

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use cropsight_config::model::GatewayConfig;
use cropsight_core::CropsightError;
use cropsight_pipeline::AnalysisPipeline;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    /// The analysis pipeline every request runs through.
    pub pipeline: Arc<AnalysisPipeline>,
}

impl GatewayState {
    pub fn new(pipeline: AnalysisPipeline) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
        }
    }
}

/// Builds the gateway router.
pub fn router(state: GatewayState) -> Router {
    Router::new()
        .route("/analyze", post(handlers::post_analyze))
        .route("/send-to-chatbot", post(handlers::post_send_to_chatbot))
        .route("/health", get(handlers::get_health))
        .route("/api/info", get(handlers::get_api_info))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Starts the gateway HTTP server and serves until the process stops.
pub async fn start_server(
    config: &GatewayConfig,
    pipeline: AnalysisPipeline,
) -> Result<(), CropsightError> {
    let app = router(GatewayState::new(pipeline));

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| CropsightError::Channel {
            message: format!("failed to bind gateway to {addr}: {e}"),
            source: Some(Box::new(e)),
        })?;

    tracing::info!("gateway listening on {addr}");

    axum::serve(listener, app)
        .await
        .map_err(|e| CropsightError::Channel {
            message: format!("gateway server error: {e}"),
            source: Some(Box::new(e)),
        })?;

    Ok(())
}
