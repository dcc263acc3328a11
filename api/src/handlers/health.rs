use axum::{extract::State, response::IntoResponse, Json};
use chrono::Utc;
use tracing::{info, warn};

use crate::{
    error::ApiResult,
    models::{HealthResponse, StoreHealth},
    AppState,
};

/// Health check endpoint
///
/// GET /api/health
#[utoipa::path(
    get,
    path = "/api/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    ),
    tag = "health"
)]
pub async fn health_check(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    info!("Health check requested");

    let store = match state.store.stats().await {
        Ok(stats) => StoreHealth {
            available: true,
            projects: stats.projects,
            tasks: stats.tasks,
            users: stats.users,
        },
        Err(e) => {
            warn!("Store unavailable during health check: {}", e);
            StoreHealth {
                available: false,
                projects: 0,
                tasks: 0,
                users: 0,
            }
        }
    };

    let response = HealthResponse {
        status: if store.available {
            "healthy".to_string()
        } else {
            "degraded".to_string()
        },
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now(),
        store,
    };

    Ok(Json(response))
}
