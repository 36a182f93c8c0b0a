use super::{Checks, DateStyle, ListQuery, SelectOption, empty_string_as_none};
use crate::error::ApiError;
use database::{
    entities::student_records,
    services::student_record::{
        NewStudentRecord, RecordFilters, StatusChange, StudentRecordChanges, StudentRecordRow,
    },
};
use models::student::StudentStatus;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct StudentRecordListQuery {
    #[serde(flatten)]
    pub list: ListQuery,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[param(value_type = Option<i32>)]
    pub major_id: Option<i32>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[param(value_type = Option<i32>)]
    pub grade_id: Option<i32>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[param(value_type = Option<i32>)]
    pub course_id: Option<i32>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[param(value_type = Option<i32>)]
    pub schedule_id: Option<i32>,
}

impl StudentRecordListQuery {
    pub fn filters(&self) -> RecordFilters {
        RecordFilters {
            major_id: self.major_id,
            grade_id: self.grade_id,
            course_id: self.course_id,
            schedule_id: self.schedule_id,
        }
    }
}

/// A student record with the labels of what it references
#[derive(Debug, Serialize, ToSchema)]
pub struct StudentRecordDetailResponse {
    pub id: i32,
    /// Internal id of the student
    pub stu_id: i32,
    pub first_name: String,
    pub last_name: String,
    #[schema(value_type = String, example = "pending")]
    pub status: StudentStatus,
    pub major: String,
    pub major_id: i32,
    pub grade: String,
    pub grade_id: i32,
    pub course: String,
    pub course_id: i32,
    pub schedule: String,
    pub schedule_id: i32,
    #[serde(rename = "createdAt")]
    pub created_at: String,
    #[serde(rename = "updatedAt")]
    pub updated_at: String,
}

impl StudentRecordDetailResponse {
    pub(crate) fn new(row: StudentRecordRow, style: DateStyle) -> Self {
        Self {
            id: row.id,
            stu_id: row.stu_id,
            first_name: row.first_name,
            last_name: row.last_name,
            status: row.status,
            major: row.major,
            major_id: row.major_id,
            grade: row.grade,
            grade_id: row.grade_id,
            course: row.course,
            course_id: row.course_id,
            schedule: row.schedule,
            schedule_id: row.schedule_id,
            created_at: style.timestamp(row.created_at),
            updated_at: style.timestamp(row.updated_at),
        }
    }
}

/// A student record as stored
#[derive(Debug, Serialize, ToSchema)]
pub struct StudentRecordResponse {
    pub id: i32,
    pub stu_id: i32,
    pub major_id: i32,
    pub grade_id: i32,
    pub course_id: i32,
    pub schedule_id: i32,
    #[serde(rename = "createdAt")]
    pub created_at: String,
    #[serde(rename = "updatedAt")]
    pub updated_at: String,
}

impl From<student_records::Model> for StudentRecordResponse {
    fn from(record: student_records::Model) -> Self {
        Self {
            id: record.id,
            stu_id: record.stu_id,
            major_id: record.major_id,
            grade_id: record.grade_id,
            course_id: record.course_id,
            schedule_id: record.schedule_id,
            created_at: DateStyle::Detailed.timestamp(record.created_at),
            updated_at: DateStyle::Detailed.timestamp(record.updated_at),
        }
    }
}

/// Body of student record create and update requests
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct StudentRecordRequest {
    pub stu_id: Option<i64>,
    pub major_id: Option<i64>,
    pub grade_id: Option<i64>,
    pub course_id: Option<i64>,
    pub schedule_id: Option<i64>,
}

impl StudentRecordRequest {
    pub fn into_new(self) -> Result<NewStudentRecord, ApiError> {
        let mut checks = Checks::default();
        let record = NewStudentRecord {
            stu_id: checks.required_id("stu_id", self.stu_id),
            major_id: checks.required_id("major_id", self.major_id),
            grade_id: checks.required_id("grade_id", self.grade_id),
            course_id: checks.required_id("course_id", self.course_id),
            schedule_id: checks.required_id("schedule_id", self.schedule_id),
        };
        checks.finish(record)
    }

    pub fn into_changes(self) -> Result<StudentRecordChanges, ApiError> {
        let mut checks = Checks::default();
        let changes = StudentRecordChanges {
            stu_id: checks.id("stu_id", self.stu_id),
            major_id: checks.id("major_id", self.major_id),
            grade_id: checks.id("grade_id", self.grade_id),
            course_id: checks.id("course_id", self.course_id),
            schedule_id: checks.id("schedule_id", self.schedule_id),
        };
        checks.finish(changes)
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct StatusRequest {
    #[schema(example = "confirmed")]
    pub status: Option<String>,
}

impl StatusRequest {
    pub fn status(&self) -> Result<StudentStatus, ApiError> {
        self.status
            .as_deref()
            .and_then(|status| status.parse().ok())
            .ok_or_else(|| {
                ApiError::BadRequest(
                    r#"Invalid status, it must be "pending" or "confirmed""#.to_owned(),
                )
            })
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StatusChangeResponse {
    pub student_id: i32,
    pub first_name: String,
    pub last_name: String,
    #[schema(value_type = String, example = "confirmed")]
    pub status: StudentStatus,
    pub record_id: i32,
}

impl From<StatusChange> for StatusChangeResponse {
    fn from(change: StatusChange) -> Self {
        Self {
            student_id: change.student.id,
            first_name: change.student.first_name,
            last_name: change.student.last_name,
            status: change.student.status,
            record_id: change.record_id,
        }
    }
}

/// Choices offered by the student record form
#[derive(Debug, Serialize, ToSchema)]
pub struct StudentRecordFormResponse {
    /// Students still pending, labelled with their full name
    pub students: Vec<SelectOption<i32>>,
    pub majors: Vec<SelectOption<i32>>,
    pub grades: Vec<SelectOption<i32>>,
    pub courses: Vec<SelectOption<i32>>,
    pub schedules: Vec<SelectOption<i32>>,
}
