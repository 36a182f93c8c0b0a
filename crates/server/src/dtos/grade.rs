use super::{Checks, DateStyle, double_option};
use crate::error::ApiError;
use database::{
    entities::grades,
    services::grade::{GradeChanges, NewGrade},
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct GradeResponse {
    pub id: i32,
    pub grade_name: String,
    pub description: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at: String,
    #[serde(rename = "updatedAt")]
    pub updated_at: String,
}

impl GradeResponse {
    pub(crate) fn new(grade: grades::Model, style: DateStyle) -> Self {
        Self {
            id: grade.id,
            grade_name: grade.grade_name,
            description: grade.description,
            created_at: style.timestamp(grade.created_at),
            updated_at: style.timestamp(grade.updated_at),
        }
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct GradeRequest {
    pub grade_name: Option<String>,
    /// `null` clears the description on update
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,
}

impl GradeRequest {
    pub fn into_new(self) -> Result<NewGrade, ApiError> {
        let mut checks = Checks::default();
        let grade = NewGrade {
            grade_name: checks.required("grade_name", self.grade_name),
            description: self.description.flatten(),
        };
        checks.finish(grade)
    }

    pub fn into_changes(self) -> Result<GradeChanges, ApiError> {
        let mut checks = Checks::default();
        let changes = GradeChanges {
            grade_name: checks.not_blank("grade_name", self.grade_name),
            description: self.description,
        };
        checks.finish(changes)
    }
}
