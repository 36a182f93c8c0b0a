use super::{Checks, DateStyle, double_option};
use crate::error::ApiError;
use chrono::NaiveDate;
use database::{
    entities::courses,
    services::course::{CourseChanges, NewCourse},
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct CourseResponse {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    /// `01-Jun-2025` in lists, `01-06-2025` otherwise
    pub start_date: String,
    pub end_date: String,
    pub duration: String,
    #[serde(rename = "createdAt")]
    pub created_at: String,
    #[serde(rename = "updatedAt")]
    pub updated_at: String,
}

impl CourseResponse {
    pub(crate) fn new(course: courses::Model, style: DateStyle) -> Self {
        Self {
            id: course.id,
            name: course.name,
            description: course.description,
            start_date: style.date(course.start_date),
            end_date: style.date(course.end_date),
            duration: course.duration,
            created_at: style.timestamp(course.created_at),
            updated_at: style.timestamp(course.updated_at),
        }
    }
}

/// Body of course create and update requests, dates as `DD-MM-YYYY`
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct CourseRequest {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,
    #[schema(example = "01-06-2025")]
    pub start_date: Option<String>,
    #[schema(example = "01-09-2025")]
    pub end_date: Option<String>,
    #[schema(example = "3 months")]
    pub duration: Option<String>,
}

impl CourseRequest {
    pub fn into_new(self) -> Result<NewCourse, ApiError> {
        let mut checks = Checks::default();

        let name = checks.required("name", self.name);
        let start_date = checks.required("start_date", self.start_date);
        let start_date = checks.input_date("start_date", &start_date);
        let end_date = checks.required("end_date", self.end_date);
        let end_date = checks.input_date("end_date", &end_date);
        let duration = checks.required("duration", self.duration);

        checks.finish(NewCourse {
            name,
            description: self.description.flatten(),
            start_date: start_date.unwrap_or_default(),
            end_date: end_date.unwrap_or_default(),
            duration,
        })
    }

    /// A new start date may not lie before `today`
    pub fn into_changes(self, today: NaiveDate) -> Result<CourseChanges, ApiError> {
        let mut checks = Checks::default();

        let name = checks.not_blank("name", self.name);
        let start_date = checks
            .not_blank("start_date", self.start_date)
            .and_then(|date| checks.input_date("start_date", &date));
        let end_date = checks
            .not_blank("end_date", self.end_date)
            .and_then(|date| checks.input_date("end_date", &date));
        let duration = checks.not_blank("duration", self.duration);

        let changes = checks.finish(CourseChanges {
            name,
            description: self.description,
            start_date,
            end_date,
            duration,
        })?;

        if changes.is_empty() {
            return Err(ApiError::BadRequest("No data to update".to_owned()));
        }

        if let Some(start_date) = changes.start_date
            && start_date < today
        {
            return Err(ApiError::BadRequest(
                "Start date cannot be earlier than today".to_owned(),
            ));
        }

        Ok(changes)
    }
}
