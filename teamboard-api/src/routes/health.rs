/// Health check endpoint
///
/// # Endpoint
///
/// ```text
/// GET /health
/// ```
///
/// # Response
///
/// ```json
/// {
///   "success": true,
///   "message": "Service is healthy",
///   "data": { "status": "healthy", "version": "0.1.0", "store": "connected" }
/// }
/// ```
///
/// When the store is unreachable the status is `degraded` and the response
/// code is 503.

use axum::{extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{
    app::AppState,
    response::{self, Reply},
};

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Application version
    pub version: String,

    /// Store connectivity
    pub store: String,
}

pub async fn health_check(State(state): State<AppState>) -> Reply<HealthResponse> {
    let connected = match state.store.ping().await {
        Ok(()) => true,
        Err(e) => {
            warn!(error = %e, "Store health check failed");
            false
        }
    };

    let data = HealthResponse {
        status: if connected { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        store: if connected { "connected" } else { "disconnected" }.to_string(),
    };

    let mut reply = response::ok(
        if connected {
            "Service is healthy"
        } else {
            "Service is degraded"
        },
        data,
    );
    if !connected {
        reply.status = StatusCode::SERVICE_UNAVAILABLE;
        reply.body.success = false;
    }
    reply
}
