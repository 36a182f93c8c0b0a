use crate::{AppState, dtos::envelope::Envelope};
use axum::{Json, extract::State, http::StatusCode};
use log::error;

/// Returns "OK" while the service can reach its database
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy"),
        (status = 503, description = "Database is unreachable")
    ),
    tag = "Health"
)]
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<Envelope<()>>) {
    match state.db.ping().await {
        Ok(()) => (StatusCode::OK, Json(Envelope::message("OK"))),
        Err(err) => {
            error!("Health check failed: {err}");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(Envelope::error("Database is unreachable")),
            )
        }
    }
}
