use crate::{
    AppState,
    dtos::{dashboard::DashboardResponse, envelope::Envelope},
    error::ApiError,
};
use axum::{Json, extract::State};
use chrono::Local;
use database::services::dashboard::DashboardService;

/// Totals, month over month registrations, latest registrations and the
/// share of records per schedule
#[utoipa::path(
    get,
    path = "/dashboard",
    responses(
        (status = 200, description = "Dashboard figures", body = Envelope<DashboardResponse>),
        (status = 500, description = "Internal server error")
    ),
    security(("jwt" = [])),
    tag = "Dashboard"
)]
pub async fn dashboard(
    State(state): State<AppState>,
) -> Result<Json<Envelope<DashboardResponse>>, ApiError> {
    let today = Local::now().date_naive();
    let snapshot = DashboardService::snapshot(&state.db, today)
        .await
        .map_err(|err| ApiError::internal("Failed to fetch dashboard data", err))?;

    Ok(Json(Envelope::success(
        "Dashboard data retrieved successfully",
        snapshot.into(),
    )))
}
