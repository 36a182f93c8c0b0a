use crate::dtos::envelope::Envelope;
use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use database::services::student_record::RecordError;
use log::error;
use sea_orm::{DbErr, SqlErr};
use serde::Serialize;
use std::fmt::Display;
use thiserror::Error;
use utoipa::ToSchema;

/// A single rejected request field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Every way a request can fail, rendered as an error envelope
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Validation failed")]
    Validation(Vec<FieldError>),
    #[error("{0}")]
    BadRequest(String),
    /// The row is still referenced elsewhere
    #[error("{message}")]
    Conflict { message: String, details: String },
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{message}")]
    Internal { message: String, details: String },
}

impl ApiError {
    pub fn internal(message: impl Into<String>, details: impl Display) -> Self {
        Self::Internal {
            message: message.into(),
            details: details.to_string(),
        }
    }

    /// Classifies a failed delete: a foreign key violation means the row is
    /// still referenced by a student record.
    pub fn from_delete(err: DbErr, entity: &str) -> Self {
        Self::delete_failure(err.sql_err(), err, entity)
    }

    fn delete_failure(sql_err: Option<SqlErr>, err: DbErr, entity: &str) -> Self {
        match sql_err {
            Some(SqlErr::ForeignKeyConstraintViolation(details)) => Self::Conflict {
                message: format!(
                    "Cannot delete this {entity}, it is still used by student records"
                ),
                details,
            },
            _ => Self::internal(format!("Failed to delete {entity}"), err),
        }
    }

    /// Classifies a failed student record write: a foreign key violation
    /// means one of the referenced rows does not exist.
    pub fn from_reference(err: DbErr, action: &str) -> Self {
        Self::reference_failure(err.sql_err(), err, action)
    }

    fn reference_failure(sql_err: Option<SqlErr>, err: DbErr, action: &str) -> Self {
        match sql_err {
            Some(SqlErr::ForeignKeyConstraintViolation(_)) => Self::NotFound(
                "Referenced student, major, grade, course or schedule does not exist".to_owned(),
            ),
            _ => Self::internal(format!("Failed to {action} student record"), err),
        }
    }

    pub fn from_record(err: RecordError, action: &str) -> Self {
        match err {
            RecordError::StudentNotFound(_) => Self::NotFound("Student not found".to_owned()),
            RecordError::RecordNotFound(_) => {
                Self::NotFound("Student record not found".to_owned())
            }
            RecordError::Db(err) => Self::from_reference(err, action),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::BadRequest(_) | Self::Conflict { .. } => {
                StatusCode::BAD_REQUEST
            }
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();

        let body = match self {
            Self::Validation(errors) => Envelope::error(message).with_errors(errors),
            Self::Conflict { details, .. } => Envelope::error(message).with_details(details),
            Self::Internal { details, .. } => {
                error!("{message}: {details}");
                Envelope::error(message).with_details(details)
            }
            _ => Envelope::error(message),
        };

        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use sea_orm::RuntimeErr;
    use serde_json::Value;

    async fn body(err: ApiError) -> (StatusCode, Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_validation_envelope() {
        let (status, json) = body(ApiError::Validation(vec![FieldError::new(
            "major_name",
            "Major name is required",
        )]))
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["status"], "error");
        assert_eq!(json["error"], true);
        assert_eq!(json["message"], "Validation failed");
        assert_eq!(json["errors"][0]["field"], "major_name");
        assert!(json.get("data").is_none());
    }

    #[tokio::test]
    async fn test_internal_echoes_details() {
        let (status, json) = body(ApiError::internal("Failed to fetch majors", "pool timed out")).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["message"], "Failed to fetch majors");
        assert_eq!(json["details"], "pool timed out");
    }

    #[tokio::test]
    async fn test_not_found() {
        let (status, json) = body(ApiError::NotFound("Major not found".to_owned())).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["message"], "Major not found");
        assert!(json.get("details").is_none());
    }

    #[test]
    fn test_delete_error_without_sql_code_is_internal() {
        let err = ApiError::from_delete(
            DbErr::Exec(RuntimeErr::Internal("connection closed".to_owned())),
            "major",
        );
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    fn fk_violation() -> (Option<SqlErr>, DbErr) {
        let details = r#"update or delete on table "majors" violates foreign key constraint "fk_student_records_major_id""#;
        (
            Some(SqlErr::ForeignKeyConstraintViolation(details.to_owned())),
            DbErr::Exec(RuntimeErr::Internal(details.to_owned())),
        )
    }

    #[tokio::test]
    async fn test_delete_of_referenced_row_is_conflict() {
        let (sql_err, err) = fk_violation();
        let (status, json) = body(ApiError::delete_failure(sql_err, err, "major")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], true);
        assert_eq!(
            json["message"],
            "Cannot delete this major, it is still used by student records"
        );
        assert!(
            json["details"]
                .as_str()
                .unwrap()
                .contains("fk_student_records_major_id")
        );
    }

    #[test]
    fn test_missing_reference_is_not_found() {
        let (sql_err, err) = fk_violation();
        let err = ApiError::reference_failure(sql_err, err, "create");

        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert!(err.to_string().starts_with("Referenced student"));
    }

    #[tokio::test]
    async fn test_missing_student_of_record() {
        let (status, json) = body(ApiError::from_record(
            RecordError::StudentNotFound(42),
            "create",
        ))
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["message"], "Student not found");
    }
}
