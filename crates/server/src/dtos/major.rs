use super::{Checks, DateStyle};
use crate::error::ApiError;
use database::{
    entities::majors,
    services::major::{MajorChanges, NewMajor},
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct MajorResponse {
    pub id: i32,
    pub major_name: String,
    pub major_type: String,
    #[serde(rename = "createdAt")]
    pub created_at: String,
    #[serde(rename = "updatedAt")]
    pub updated_at: String,
}

impl MajorResponse {
    pub(crate) fn new(major: majors::Model, style: DateStyle) -> Self {
        Self {
            id: major.id,
            major_name: major.major_name,
            major_type: major.major_type,
            created_at: style.timestamp(major.created_at),
            updated_at: style.timestamp(major.updated_at),
        }
    }
}

/// Body of major create and update requests
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct MajorRequest {
    pub major_name: Option<String>,
    pub major_type: Option<String>,
}

impl MajorRequest {
    pub fn into_new(self) -> Result<NewMajor, ApiError> {
        let mut checks = Checks::default();
        let major = NewMajor {
            major_name: checks.required("major_name", self.major_name),
            major_type: checks.required("major_type", self.major_type),
        };
        checks.finish(major)
    }

    pub fn into_changes(self) -> Result<MajorChanges, ApiError> {
        let mut checks = Checks::default();
        let changes = MajorChanges {
            major_name: checks.not_blank("major_name", self.major_name),
            major_type: checks.not_blank("major_type", self.major_type),
        };
        checks.finish(changes)
    }
}
