use crate::{
    AppState,
    dtos::{
        DateStyle, ListQuery,
        envelope::Envelope,
        grade::{GradeRequest, GradeResponse},
    },
    error::ApiError,
    extract::{ApiJson, ApiPath, ApiQuery},
};
use axum::{Json, extract::State, http::StatusCode};
use database::services::grade::GradeService;

/// List grades, newest first
#[utoipa::path(
    get,
    path = "/grades",
    params(ListQuery),
    responses(
        (status = 200, description = "Page of grades", body = Envelope<Vec<GradeResponse>>),
        (status = 401, description = "Missing or invalid bearer token"),
        (status = 500, description = "Internal server error")
    ),
    security(("jwt" = [])),
    tag = "Grades"
)]
pub async fn list_grades(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ListQuery>,
) -> Result<Json<Envelope<Vec<GradeResponse>>>, ApiError> {
    let params = query.list_params()?;
    let page = GradeService::list(&state.db, &params)
        .await
        .map_err(|err| ApiError::internal("Failed to fetch grades", err))?;

    Ok(Json(Envelope::page(
        "Grades retrieved successfully",
        page,
        params.page,
        |grade| GradeResponse::new(grade, DateStyle::Listed),
    )))
}

/// Get a grade by ID
#[utoipa::path(
    get,
    path = "/grades/{id}",
    params(("id" = i32, Path, description = "Grade ID")),
    responses(
        (status = 200, description = "Grade found", body = Envelope<GradeResponse>),
        (status = 404, description = "Grade not found"),
        (status = 500, description = "Internal server error")
    ),
    security(("jwt" = [])),
    tag = "Grades"
)]
pub async fn get_grade(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> Result<Json<Envelope<GradeResponse>>, ApiError> {
    let grade = GradeService::find_by_id(&state.db, id)
        .await
        .map_err(|err| ApiError::internal("Failed to fetch grade", err))?
        .ok_or_else(|| ApiError::NotFound("Grade not found".to_owned()))?;

    Ok(Json(Envelope::success(
        "Grade retrieved successfully",
        GradeResponse::new(grade, DateStyle::Detailed),
    )))
}

/// Create a grade
#[utoipa::path(
    post,
    path = "/grades",
    request_body = GradeRequest,
    responses(
        (status = 201, description = "Grade created", body = Envelope<GradeResponse>),
        (status = 400, description = "Validation failed"),
        (status = 500, description = "Internal server error")
    ),
    security(("jwt" = [])),
    tag = "Grades"
)]
pub async fn create_grade(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<GradeRequest>,
) -> Result<(StatusCode, Json<Envelope<GradeResponse>>), ApiError> {
    let grade = GradeService::create(&state.db, body.into_new()?)
        .await
        .map_err(|err| ApiError::internal("Failed to create grade", err))?;

    Ok((
        StatusCode::CREATED,
        Json(Envelope::success(
            "Grade created successfully",
            GradeResponse::new(grade, DateStyle::Detailed),
        )),
    ))
}

/// Update the given fields of a grade
#[utoipa::path(
    put,
    path = "/grades/{id}",
    params(("id" = i32, Path, description = "Grade ID")),
    request_body = GradeRequest,
    responses(
        (status = 200, description = "Grade updated", body = Envelope<GradeResponse>),
        (status = 400, description = "Validation failed"),
        (status = 404, description = "Grade not found"),
        (status = 500, description = "Internal server error")
    ),
    security(("jwt" = [])),
    tag = "Grades"
)]
pub async fn update_grade(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
    ApiJson(body): ApiJson<GradeRequest>,
) -> Result<Json<Envelope<GradeResponse>>, ApiError> {
    let grade = GradeService::update(&state.db, id, body.into_changes()?)
        .await
        .map_err(|err| ApiError::internal("Failed to update grade", err))?
        .ok_or_else(|| ApiError::NotFound("Grade not found".to_owned()))?;

    Ok(Json(Envelope::success(
        "Grade updated successfully",
        GradeResponse::new(grade, DateStyle::Detailed),
    )))
}

/// Delete a grade that no student record uses
#[utoipa::path(
    delete,
    path = "/grades/{id}",
    params(("id" = i32, Path, description = "Grade ID")),
    responses(
        (status = 200, description = "Grade deleted"),
        (status = 400, description = "Grade is still used by student records"),
        (status = 404, description = "Grade not found"),
        (status = 500, description = "Internal server error")
    ),
    security(("jwt" = [])),
    tag = "Grades"
)]
pub async fn delete_grade(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> Result<Json<Envelope<()>>, ApiError> {
    let deleted = GradeService::delete(&state.db, id)
        .await
        .map_err(|err| ApiError::from_delete(err, "grade"))?;

    if !deleted {
        return Err(ApiError::NotFound("Grade not found".to_owned()));
    }

    Ok(Json(Envelope::message("Grade deleted successfully")))
}
