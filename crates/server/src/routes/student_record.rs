use crate::{
    AppState,
    dtos::{
        DateStyle, SelectOption, id_options,
        envelope::Envelope,
        student_record::{
            StatusChangeResponse, StatusRequest, StudentRecordDetailResponse,
            StudentRecordFormResponse, StudentRecordListQuery, StudentRecordRequest,
            StudentRecordResponse,
        },
    },
    error::ApiError,
    extract::{ApiJson, ApiPath, ApiQuery},
};
use axum::{Json, extract::State, http::StatusCode};
use database::services::{
    course::CourseService, grade::GradeService, major::MajorService,
    schedule::ScheduleService, student::StudentService, student_record::StudentRecordService,
};
use futures::try_join;

/// List student records joined with their student, major, grade, course
/// and schedule
#[utoipa::path(
    get,
    path = "/student-records",
    params(StudentRecordListQuery),
    responses(
        (status = 200, description = "Page of student records", body = Envelope<Vec<StudentRecordDetailResponse>>),
        (status = 400, description = "Invalid query parameters"),
        (status = 500, description = "Internal server error")
    ),
    security(("jwt" = [])),
    tag = "Student Records"
)]
pub async fn list_student_records(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<StudentRecordListQuery>,
) -> Result<Json<Envelope<Vec<StudentRecordDetailResponse>>>, ApiError> {
    let params = query.list.list_params()?;
    let page = StudentRecordService::list(&state.db, &params, &query.filters())
        .await
        .map_err(|err| ApiError::internal("Failed to fetch student records", err))?;

    Ok(Json(Envelope::page(
        "Student records retrieved successfully",
        page,
        params.page,
        |row| StudentRecordDetailResponse::new(row, DateStyle::Listed),
    )))
}

/// Choices of the student record form, only pending students are offered
#[utoipa::path(
    get,
    path = "/student-records/form",
    responses(
        (status = 200, description = "Form options", body = Envelope<StudentRecordFormResponse>),
        (status = 500, description = "Internal server error")
    ),
    security(("jwt" = [])),
    tag = "Student Records"
)]
pub async fn student_record_form(
    State(state): State<AppState>,
) -> Result<Json<Envelope<StudentRecordFormResponse>>, ApiError> {
    let db = &state.db;
    let (students, majors, grades, courses, schedules) = try_join!(
        StudentService::pending_options(db),
        MajorService::options(db),
        GradeService::options(db),
        CourseService::options(db),
        ScheduleService::options(db),
    )
    .map_err(|err| ApiError::internal("Failed to fetch form options", err))?;

    let students = students
        .into_iter()
        .map(|(id, first_name, last_name)| {
            SelectOption::new(format!("{first_name} {last_name}"), id)
        })
        .collect();

    Ok(Json(Envelope::success(
        "Form options retrieved successfully",
        StudentRecordFormResponse {
            students,
            majors: id_options(majors),
            grades: id_options(grades),
            courses: id_options(courses),
            schedules: id_options(schedules),
        },
    )))
}

/// Get a student record by ID
#[utoipa::path(
    get,
    path = "/student-records/{id}",
    params(("id" = i32, Path, description = "Student record ID")),
    responses(
        (status = 200, description = "Student record found", body = Envelope<StudentRecordDetailResponse>),
        (status = 404, description = "Student record not found"),
        (status = 500, description = "Internal server error")
    ),
    security(("jwt" = [])),
    tag = "Student Records"
)]
pub async fn get_student_record(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> Result<Json<Envelope<StudentRecordDetailResponse>>, ApiError> {
    let row = StudentRecordService::find_by_id(&state.db, id)
        .await
        .map_err(|err| ApiError::internal("Failed to fetch student record", err))?
        .ok_or_else(|| ApiError::NotFound("Student record not found".to_owned()))?;

    Ok(Json(Envelope::success(
        "Student record retrieved successfully",
        StudentRecordDetailResponse::new(row, DateStyle::Detailed),
    )))
}

/// Enroll a student
#[utoipa::path(
    post,
    path = "/student-records",
    request_body = StudentRecordRequest,
    responses(
        (status = 201, description = "Student record created", body = Envelope<StudentRecordResponse>),
        (status = 400, description = "Validation failed"),
        (status = 404, description = "Student or another referenced row not found"),
        (status = 500, description = "Internal server error")
    ),
    security(("jwt" = [])),
    tag = "Student Records"
)]
pub async fn create_student_record(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<StudentRecordRequest>,
) -> Result<(StatusCode, Json<Envelope<StudentRecordResponse>>), ApiError> {
    let record = StudentRecordService::create(&state.db, body.into_new()?)
        .await
        .map_err(|err| ApiError::from_record(err, "create"))?;

    Ok((
        StatusCode::CREATED,
        Json(Envelope::success(
            "Student record created successfully",
            record.into(),
        )),
    ))
}

/// Update the references of a student record
#[utoipa::path(
    put,
    path = "/student-records/{id}",
    params(("id" = i32, Path, description = "Student record ID")),
    request_body = StudentRecordRequest,
    responses(
        (status = 200, description = "Student record updated", body = Envelope<StudentRecordResponse>),
        (status = 400, description = "Validation failed"),
        (status = 404, description = "Student record or a referenced row not found"),
        (status = 500, description = "Internal server error")
    ),
    security(("jwt" = [])),
    tag = "Student Records"
)]
pub async fn update_student_record(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
    ApiJson(body): ApiJson<StudentRecordRequest>,
) -> Result<Json<Envelope<StudentRecordResponse>>, ApiError> {
    let record = StudentRecordService::update(&state.db, id, body.into_changes()?)
        .await
        .map_err(|err| ApiError::from_reference(err, "update"))?
        .ok_or_else(|| ApiError::NotFound("Student record not found".to_owned()))?;

    Ok(Json(Envelope::success(
        "Student record updated successfully",
        record.into(),
    )))
}

/// Confirm (or put back to pending) the student of a record
#[utoipa::path(
    put,
    path = "/student-records/{id}/status",
    params(("id" = i32, Path, description = "Student record ID")),
    request_body = StatusRequest,
    responses(
        (status = 200, description = "Status updated", body = Envelope<StatusChangeResponse>),
        (status = 400, description = "Invalid status"),
        (status = 404, description = "Student record or student not found"),
        (status = 500, description = "Internal server error")
    ),
    security(("jwt" = [])),
    tag = "Student Records"
)]
pub async fn update_student_record_status(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
    ApiJson(body): ApiJson<StatusRequest>,
) -> Result<Json<Envelope<StatusChangeResponse>>, ApiError> {
    let change = StudentRecordService::update_status(&state.db, id, body.status()?)
        .await
        .map_err(|err| ApiError::from_record(err, "update"))?;

    Ok(Json(Envelope::success(
        "Student status updated successfully",
        change.into(),
    )))
}

/// Delete a student record
#[utoipa::path(
    delete,
    path = "/student-records/{id}",
    params(("id" = i32, Path, description = "Student record ID")),
    responses(
        (status = 200, description = "Student record deleted"),
        (status = 404, description = "Student record not found"),
        (status = 500, description = "Internal server error")
    ),
    security(("jwt" = [])),
    tag = "Student Records"
)]
pub async fn delete_student_record(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> Result<Json<Envelope<()>>, ApiError> {
    let deleted = StudentRecordService::delete(&state.db, id)
        .await
        .map_err(|err| ApiError::internal("Failed to delete student record", err))?;

    if !deleted {
        return Err(ApiError::NotFound("Student record not found".to_owned()));
    }

    Ok(Json(Envelope::message("Student record deleted successfully")))
}
