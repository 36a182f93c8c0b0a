use crate::{
    AppState,
    dtos::{
        DateStyle, ListQuery,
        envelope::Envelope,
        schedule::{ScheduleRequest, ScheduleResponse},
    },
    error::ApiError,
    extract::{ApiJson, ApiPath, ApiQuery},
};
use axum::{Json, extract::State, http::StatusCode};
use database::services::schedule::ScheduleService;

/// List schedules, newest first
#[utoipa::path(
    get,
    path = "/schedules",
    params(ListQuery),
    responses(
        (status = 200, description = "Page of schedules", body = Envelope<Vec<ScheduleResponse>>),
        (status = 401, description = "Missing or invalid bearer token"),
        (status = 500, description = "Internal server error")
    ),
    security(("jwt" = [])),
    tag = "Schedules"
)]
pub async fn list_schedules(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ListQuery>,
) -> Result<Json<Envelope<Vec<ScheduleResponse>>>, ApiError> {
    let params = query.list_params()?;
    let page = ScheduleService::list(&state.db, &params)
        .await
        .map_err(|err| ApiError::internal("Failed to fetch schedules", err))?;

    Ok(Json(Envelope::page(
        "Schedules retrieved successfully",
        page,
        params.page,
        |schedule| ScheduleResponse::new(schedule, DateStyle::Listed),
    )))
}

/// Get a schedule by ID
#[utoipa::path(
    get,
    path = "/schedules/{id}",
    params(("id" = i32, Path, description = "Schedule ID")),
    responses(
        (status = 200, description = "Schedule found", body = Envelope<ScheduleResponse>),
        (status = 404, description = "Schedule not found"),
        (status = 500, description = "Internal server error")
    ),
    security(("jwt" = [])),
    tag = "Schedules"
)]
pub async fn get_schedule(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> Result<Json<Envelope<ScheduleResponse>>, ApiError> {
    let schedule = ScheduleService::find_by_id(&state.db, id)
        .await
        .map_err(|err| ApiError::internal("Failed to fetch schedule", err))?
        .ok_or_else(|| ApiError::NotFound("Schedule not found".to_owned()))?;

    Ok(Json(Envelope::success(
        "Schedule retrieved successfully",
        ScheduleResponse::new(schedule, DateStyle::Detailed),
    )))
}

/// Create a schedule
#[utoipa::path(
    post,
    path = "/schedules",
    request_body = ScheduleRequest,
    responses(
        (status = 201, description = "Schedule created", body = Envelope<ScheduleResponse>),
        (status = 400, description = "Validation failed"),
        (status = 500, description = "Internal server error")
    ),
    security(("jwt" = [])),
    tag = "Schedules"
)]
pub async fn create_schedule(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<ScheduleRequest>,
) -> Result<(StatusCode, Json<Envelope<ScheduleResponse>>), ApiError> {
    let schedule = ScheduleService::create(&state.db, body.into_new()?)
        .await
        .map_err(|err| ApiError::internal("Failed to create schedule", err))?;

    Ok((
        StatusCode::CREATED,
        Json(Envelope::success(
            "Schedule created successfully",
            ScheduleResponse::new(schedule, DateStyle::Detailed),
        )),
    ))
}

/// Update the given fields of a schedule
#[utoipa::path(
    put,
    path = "/schedules/{id}",
    params(("id" = i32, Path, description = "Schedule ID")),
    request_body = ScheduleRequest,
    responses(
        (status = 200, description = "Schedule updated", body = Envelope<ScheduleResponse>),
        (status = 400, description = "Validation failed"),
        (status = 404, description = "Schedule not found"),
        (status = 500, description = "Internal server error")
    ),
    security(("jwt" = [])),
    tag = "Schedules"
)]
pub async fn update_schedule(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
    ApiJson(body): ApiJson<ScheduleRequest>,
) -> Result<Json<Envelope<ScheduleResponse>>, ApiError> {
    let schedule = ScheduleService::update(&state.db, id, body.into_changes()?)
        .await
        .map_err(|err| ApiError::internal("Failed to update schedule", err))?
        .ok_or_else(|| ApiError::NotFound("Schedule not found".to_owned()))?;

    Ok(Json(Envelope::success(
        "Schedule updated successfully",
        ScheduleResponse::new(schedule, DateStyle::Detailed),
    )))
}

/// Delete a schedule that no student record uses
#[utoipa::path(
    delete,
    path = "/schedules/{id}",
    params(("id" = i32, Path, description = "Schedule ID")),
    responses(
        (status = 200, description = "Schedule deleted"),
        (status = 400, description = "Schedule is still used by student records"),
        (status = 404, description = "Schedule not found"),
        (status = 500, description = "Internal server error")
    ),
    security(("jwt" = [])),
    tag = "Schedules"
)]
pub async fn delete_schedule(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> Result<Json<Envelope<()>>, ApiError> {
    let deleted = ScheduleService::delete(&state.db, id)
        .await
        .map_err(|err| ApiError::from_delete(err, "schedule"))?;

    if !deleted {
        return Err(ApiError::NotFound("Schedule not found".to_owned()));
    }

    Ok(Json(Envelope::message("Schedule deleted successfully")))
}
