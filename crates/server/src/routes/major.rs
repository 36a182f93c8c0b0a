use crate::{
    AppState,
    dtos::{
        DateStyle, ListQuery,
        envelope::Envelope,
        major::{MajorRequest, MajorResponse},
    },
    error::ApiError,
    extract::{ApiJson, ApiPath, ApiQuery},
};
use axum::{Json, extract::State, http::StatusCode};
use database::services::major::MajorService;

/// List majors, newest first
#[utoipa::path(
    get,
    path = "/majors",
    params(ListQuery),
    responses(
        (status = 200, description = "Page of majors", body = Envelope<Vec<MajorResponse>>),
        (status = 401, description = "Missing or invalid bearer token"),
        (status = 500, description = "Internal server error")
    ),
    security(("jwt" = [])),
    tag = "Majors"
)]
pub async fn list_majors(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ListQuery>,
) -> Result<Json<Envelope<Vec<MajorResponse>>>, ApiError> {
    let params = query.list_params()?;
    let page = MajorService::list(&state.db, &params)
        .await
        .map_err(|err| ApiError::internal("Failed to fetch majors", err))?;

    Ok(Json(Envelope::page(
        "Majors retrieved successfully",
        page,
        params.page,
        |major| MajorResponse::new(major, DateStyle::Listed),
    )))
}

/// Get a major by ID
#[utoipa::path(
    get,
    path = "/majors/{id}",
    params(("id" = i32, Path, description = "Major ID")),
    responses(
        (status = 200, description = "Major found", body = Envelope<MajorResponse>),
        (status = 404, description = "Major not found"),
        (status = 500, description = "Internal server error")
    ),
    security(("jwt" = [])),
    tag = "Majors"
)]
pub async fn get_major(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> Result<Json<Envelope<MajorResponse>>, ApiError> {
    let major = MajorService::find_by_id(&state.db, id)
        .await
        .map_err(|err| ApiError::internal("Failed to fetch major", err))?
        .ok_or_else(|| ApiError::NotFound("Major not found".to_owned()))?;

    Ok(Json(Envelope::success(
        "Major retrieved successfully",
        MajorResponse::new(major, DateStyle::Detailed),
    )))
}

/// Create a major
#[utoipa::path(
    post,
    path = "/majors",
    request_body = MajorRequest,
    responses(
        (status = 201, description = "Major created", body = Envelope<MajorResponse>),
        (status = 400, description = "Validation failed"),
        (status = 500, description = "Internal server error")
    ),
    security(("jwt" = [])),
    tag = "Majors"
)]
pub async fn create_major(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<MajorRequest>,
) -> Result<(StatusCode, Json<Envelope<MajorResponse>>), ApiError> {
    let major = MajorService::create(&state.db, body.into_new()?)
        .await
        .map_err(|err| ApiError::internal("Failed to create major", err))?;

    Ok((
        StatusCode::CREATED,
        Json(Envelope::success(
            "Major created successfully",
            MajorResponse::new(major, DateStyle::Detailed),
        )),
    ))
}

/// Update the given fields of a major
#[utoipa::path(
    put,
    path = "/majors/{id}",
    params(("id" = i32, Path, description = "Major ID")),
    request_body = MajorRequest,
    responses(
        (status = 200, description = "Major updated", body = Envelope<MajorResponse>),
        (status = 400, description = "Validation failed"),
        (status = 404, description = "Major not found"),
        (status = 500, description = "Internal server error")
    ),
    security(("jwt" = [])),
    tag = "Majors"
)]
pub async fn update_major(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
    ApiJson(body): ApiJson<MajorRequest>,
) -> Result<Json<Envelope<MajorResponse>>, ApiError> {
    let major = MajorService::update(&state.db, id, body.into_changes()?)
        .await
        .map_err(|err| ApiError::internal("Failed to update major", err))?
        .ok_or_else(|| ApiError::NotFound("Major not found".to_owned()))?;

    Ok(Json(Envelope::success(
        "Major updated successfully",
        MajorResponse::new(major, DateStyle::Detailed),
    )))
}

/// Delete a major that no student record uses
#[utoipa::path(
    delete,
    path = "/majors/{id}",
    params(("id" = i32, Path, description = "Major ID")),
    responses(
        (status = 200, description = "Major deleted"),
        (status = 400, description = "Major is still used by student records"),
        (status = 404, description = "Major not found"),
        (status = 500, description = "Internal server error")
    ),
    security(("jwt" = [])),
    tag = "Majors"
)]
pub async fn delete_major(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> Result<Json<Envelope<()>>, ApiError> {
    let deleted = MajorService::delete(&state.db, id)
        .await
        .map_err(|err| ApiError::from_delete(err, "major"))?;

    if !deleted {
        return Err(ApiError::NotFound("Major not found".to_owned()));
    }

    Ok(Json(Envelope::message("Major deleted successfully")))
}
