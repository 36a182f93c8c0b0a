use crate::{
    AppState,
    dtos::{
        DateStyle,
        envelope::Envelope,
        student::{
            StudentFilterResponse, StudentFormResponse, StudentListQuery, StudentRequest,
            StudentResponse, gender_options, status_options,
        },
    },
    error::ApiError,
    extract::{ApiJson, ApiPath, ApiQuery},
};
use axum::{Json, extract::State, http::StatusCode};
use database::services::student::StudentService;

/// List students, newest first
#[utoipa::path(
    get,
    path = "/students",
    params(StudentListQuery),
    responses(
        (status = 200, description = "Page of students", body = Envelope<Vec<StudentResponse>>),
        (status = 400, description = "Invalid query parameters"),
        (status = 500, description = "Internal server error")
    ),
    security(("jwt" = [])),
    tag = "Students"
)]
pub async fn list_students(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<StudentListQuery>,
) -> Result<Json<Envelope<Vec<StudentResponse>>>, ApiError> {
    let params = query.list.list_params()?;
    let page = StudentService::list(&state.db, &params, &query.filters())
        .await
        .map_err(|err| ApiError::internal("Failed to fetch students", err))?;

    Ok(Json(Envelope::page(
        "Students retrieved successfully",
        page,
        params.page,
        |student| StudentResponse::new(student, DateStyle::Listed),
    )))
}

/// Choices of the student form
#[utoipa::path(
    get,
    path = "/students/form",
    responses(
        (status = 200, description = "Form options", body = Envelope<StudentFormResponse>)
    ),
    security(("jwt" = [])),
    tag = "Students"
)]
pub async fn student_form() -> Json<Envelope<StudentFormResponse>> {
    Json(Envelope::success(
        "Form options retrieved successfully",
        StudentFormResponse {
            statuses: status_options(),
            genders: gender_options(),
        },
    ))
}

/// Choices of the student list filter
#[utoipa::path(
    get,
    path = "/students/filter",
    responses(
        (status = 200, description = "Filter options", body = Envelope<StudentFilterResponse>)
    ),
    security(("jwt" = [])),
    tag = "Students"
)]
pub async fn student_filter() -> Json<Envelope<StudentFilterResponse>> {
    Json(Envelope::success(
        "Filter options retrieved successfully",
        StudentFilterResponse {
            statuses: status_options(),
        },
    ))
}

/// Get a student by internal ID
#[utoipa::path(
    get,
    path = "/students/{id}",
    params(("id" = i32, Path, description = "Student ID")),
    responses(
        (status = 200, description = "Student found", body = Envelope<StudentResponse>),
        (status = 404, description = "Student not found"),
        (status = 500, description = "Internal server error")
    ),
    security(("jwt" = [])),
    tag = "Students"
)]
pub async fn get_student(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> Result<Json<Envelope<StudentResponse>>, ApiError> {
    let student = StudentService::find_by_id(&state.db, id)
        .await
        .map_err(|err| ApiError::internal("Failed to fetch student", err))?
        .ok_or_else(|| ApiError::NotFound("Student not found".to_owned()))?;

    Ok(Json(Envelope::success(
        "Student retrieved successfully",
        StudentResponse::new(student, DateStyle::Detailed),
    )))
}

/// Register a student under the next display number
#[utoipa::path(
    post,
    path = "/students",
    request_body = StudentRequest,
    responses(
        (status = 201, description = "Student registered", body = Envelope<StudentResponse>),
        (status = 400, description = "Validation failed"),
        (status = 500, description = "Internal server error")
    ),
    security(("jwt" = [])),
    tag = "Students"
)]
pub async fn create_student(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<StudentRequest>,
) -> Result<(StatusCode, Json<Envelope<StudentResponse>>), ApiError> {
    let student = StudentService::create(&state.db, body.into_new()?)
        .await
        .map_err(|err| ApiError::internal("Failed to register student", err))?;

    Ok((
        StatusCode::CREATED,
        Json(Envelope::success(
            "Student registered successfully",
            StudentResponse::new(student, DateStyle::Detailed),
        )),
    ))
}

/// Update the given fields of a student
#[utoipa::path(
    put,
    path = "/students/{id}",
    params(("id" = i32, Path, description = "Student ID")),
    request_body = StudentRequest,
    responses(
        (status = 200, description = "Student updated", body = Envelope<StudentResponse>),
        (status = 400, description = "Validation failed"),
        (status = 404, description = "Student not found"),
        (status = 500, description = "Internal server error")
    ),
    security(("jwt" = [])),
    tag = "Students"
)]
pub async fn update_student(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
    ApiJson(body): ApiJson<StudentRequest>,
) -> Result<Json<Envelope<StudentResponse>>, ApiError> {
    let student = StudentService::update(&state.db, id, body.into_changes()?)
        .await
        .map_err(|err| ApiError::internal("Failed to update student", err))?
        .ok_or_else(|| ApiError::NotFound("Student not found".to_owned()))?;

    Ok(Json(Envelope::success(
        "Student updated successfully",
        StudentResponse::new(student, DateStyle::Detailed),
    )))
}

/// Delete a student together with its student records
#[utoipa::path(
    delete,
    path = "/students/{id}",
    params(("id" = i32, Path, description = "Student ID")),
    responses(
        (status = 200, description = "Student deleted"),
        (status = 404, description = "Student not found"),
        (status = 500, description = "Internal server error")
    ),
    security(("jwt" = [])),
    tag = "Students"
)]
pub async fn delete_student(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> Result<Json<Envelope<()>>, ApiError> {
    let deleted = StudentService::delete(&state.db, id)
        .await
        .map_err(|err| ApiError::from_delete(err, "student"))?;

    if !deleted {
        return Err(ApiError::NotFound("Student not found".to_owned()));
    }

    Ok(Json(Envelope::message("Student deleted successfully")))
}
