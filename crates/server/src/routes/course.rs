use crate::{
    AppState,
    dtos::{
        DateStyle, ListQuery,
        envelope::Envelope,
        course::{CourseRequest, CourseResponse},
    },
    error::ApiError,
    extract::{ApiJson, ApiPath, ApiQuery},
};
use axum::{Json, extract::State, http::StatusCode};
use chrono::Local;
use database::services::course::CourseService;

/// List courses, newest first. Dates are shown as `DD-MMM-YYYY`
#[utoipa::path(
    get,
    path = "/courses",
    params(ListQuery),
    responses(
        (status = 200, description = "Page of courses", body = Envelope<Vec<CourseResponse>>),
        (status = 401, description = "Missing or invalid bearer token"),
        (status = 500, description = "Internal server error")
    ),
    security(("jwt" = [])),
    tag = "Courses"
)]
pub async fn list_courses(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ListQuery>,
) -> Result<Json<Envelope<Vec<CourseResponse>>>, ApiError> {
    let params = query.list_params()?;
    let page = CourseService::list(&state.db, &params)
        .await
        .map_err(|err| ApiError::internal("Failed to fetch courses", err))?;

    Ok(Json(Envelope::page(
        "Courses retrieved successfully",
        page,
        params.page,
        |course| CourseResponse::new(course, DateStyle::Listed),
    )))
}

/// Get a course by ID
#[utoipa::path(
    get,
    path = "/courses/{id}",
    params(("id" = i32, Path, description = "Course ID")),
    responses(
        (status = 200, description = "Course found", body = Envelope<CourseResponse>),
        (status = 404, description = "Course not found"),
        (status = 500, description = "Internal server error")
    ),
    security(("jwt" = [])),
    tag = "Courses"
)]
pub async fn get_course(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> Result<Json<Envelope<CourseResponse>>, ApiError> {
    let course = CourseService::find_by_id(&state.db, id)
        .await
        .map_err(|err| ApiError::internal("Failed to fetch course", err))?
        .ok_or_else(|| ApiError::NotFound("Course not found".to_owned()))?;

    Ok(Json(Envelope::success(
        "Course retrieved successfully",
        CourseResponse::new(course, DateStyle::Detailed),
    )))
}

/// Create a course
#[utoipa::path(
    post,
    path = "/courses",
    request_body = CourseRequest,
    responses(
        (status = 201, description = "Course created", body = Envelope<CourseResponse>),
        (status = 400, description = "Validation failed"),
        (status = 500, description = "Internal server error")
    ),
    security(("jwt" = [])),
    tag = "Courses"
)]
pub async fn create_course(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<CourseRequest>,
) -> Result<(StatusCode, Json<Envelope<CourseResponse>>), ApiError> {
    let course = CourseService::create(&state.db, body.into_new()?)
        .await
        .map_err(|err| ApiError::internal("Failed to create course", err))?;

    Ok((
        StatusCode::CREATED,
        Json(Envelope::success(
            "Course created successfully",
            CourseResponse::new(course, DateStyle::Detailed),
        )),
    ))
}

/// Update the given fields of a course, a new start date may not be in the past
#[utoipa::path(
    put,
    path = "/courses/{id}",
    params(("id" = i32, Path, description = "Course ID")),
    request_body = CourseRequest,
    responses(
        (status = 200, description = "Course updated", body = Envelope<CourseResponse>),
        (status = 400, description = "Validation failed, no fields given or start date in the past"),
        (status = 404, description = "Course not found"),
        (status = 500, description = "Internal server error")
    ),
    security(("jwt" = [])),
    tag = "Courses"
)]
pub async fn update_course(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
    ApiJson(body): ApiJson<CourseRequest>,
) -> Result<Json<Envelope<CourseResponse>>, ApiError> {
    let today = Local::now().date_naive();
    let course = CourseService::update(&state.db, id, body.into_changes(today)?)
        .await
        .map_err(|err| ApiError::internal("Failed to update course", err))?
        .ok_or_else(|| ApiError::NotFound("Course not found".to_owned()))?;

    Ok(Json(Envelope::success(
        "Course updated successfully",
        CourseResponse::new(course, DateStyle::Detailed),
    )))
}

/// Delete a course that no student record uses
#[utoipa::path(
    delete,
    path = "/courses/{id}",
    params(("id" = i32, Path, description = "Course ID")),
    responses(
        (status = 200, description = "Course deleted"),
        (status = 400, description = "Course is still used by student records"),
        (status = 404, description = "Course not found"),
        (status = 500, description = "Internal server error")
    ),
    security(("jwt" = [])),
    tag = "Courses"
)]
pub async fn delete_course(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> Result<Json<Envelope<()>>, ApiError> {
    let deleted = CourseService::delete(&state.db, id)
        .await
        .map_err(|err| ApiError::from_delete(err, "course"))?;

    if !deleted {
        return Err(ApiError::NotFound("Course not found".to_owned()));
    }

    Ok(Json(Envelope::message("Course deleted successfully")))
}
