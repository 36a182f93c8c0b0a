use super::{Checks, DateStyle, ListQuery, SelectOption, double_option, empty_string_as_none};
use crate::error::ApiError;
use database::{
    entities::students,
    services::student::{NewStudent, StudentChanges, StudentFilters},
};
use models::student::{Gender, StudentStatus};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

const INVALID_STATUS: &str = "Status must be either pending or confirmed";

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct StudentListQuery {
    #[serde(flatten)]
    pub list: ListQuery,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[param(value_type = Option<i32>)]
    pub age: Option<i32>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[param(value_type = Option<String>)]
    pub status: Option<StudentStatus>,
}

impl StudentListQuery {
    pub fn filters(&self) -> StudentFilters {
        StudentFilters {
            age: self.age,
            status: self.status,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StudentResponse {
    pub id: i32,
    /// Display number
    pub stu_id: i32,
    pub first_name: String,
    pub last_name: String,
    pub dob: Option<String>,
    pub phone: String,
    pub email: String,
    pub gender: Option<String>,
    pub age: Option<i32>,
    #[schema(value_type = String, example = "pending")]
    pub status: StudentStatus,
    #[serde(rename = "createdAt")]
    pub created_at: String,
    #[serde(rename = "updatedAt")]
    pub updated_at: String,
}

impl StudentResponse {
    pub(crate) fn new(student: students::Model, style: DateStyle) -> Self {
        Self {
            id: student.id,
            stu_id: student.stu_id,
            first_name: student.first_name,
            last_name: student.last_name,
            dob: student.dob.map(|dob| style.date(dob)),
            phone: student.phone,
            email: student.email,
            gender: student.gender,
            age: student.age,
            status: student.status,
            created_at: style.timestamp(student.created_at),
            updated_at: style.timestamp(student.updated_at),
        }
    }
}

/// Body of student create and update requests, `dob` as `DD-MM-YYYY`
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct StudentRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>, example = "14-03-2004")]
    pub dob: Option<Option<String>>,
    pub phone: Option<String>,
    pub email: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub gender: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<i32>)]
    pub age: Option<Option<i32>>,
    #[schema(example = "pending")]
    pub status: Option<String>,
}

impl StudentRequest {
    pub fn into_new(self) -> Result<NewStudent, ApiError> {
        let mut checks = Checks::default();

        let first_name = checks.required("first_name", self.first_name);
        let last_name = checks.required("last_name", self.last_name);
        let dob = checks.required("dob", self.dob.flatten());
        let dob = checks.input_date("dob", &dob);
        let phone = checks.required("phone", self.phone);
        let email = checks.required("email", self.email);
        let email = checks.email("email", email);
        let status = checks.parsed("status", self.status, INVALID_STATUS);

        checks.finish(NewStudent {
            first_name,
            last_name,
            dob,
            phone,
            email,
            gender: self.gender.flatten(),
            age: self.age.flatten(),
            status: status.unwrap_or_default(),
        })
    }

    pub fn into_changes(self) -> Result<StudentChanges, ApiError> {
        let mut checks = Checks::default();

        let first_name = checks.not_blank("first_name", self.first_name);
        let last_name = checks.not_blank("last_name", self.last_name);
        let dob = self.dob.map(|dob| {
            dob.and_then(|dob| {
                checks
                    .not_blank("dob", Some(dob))
                    .and_then(|dob| checks.input_date("dob", &dob))
            })
        });
        let phone = checks.not_blank("phone", self.phone);
        let email = checks
            .not_blank("email", self.email)
            .map(|email| checks.email("email", email));
        let status = checks.parsed("status", self.status, INVALID_STATUS);

        checks.finish(StudentChanges {
            first_name,
            last_name,
            dob,
            phone,
            email,
            gender: self.gender,
            age: self.age,
            status,
        })
    }
}

/// Choices offered by the student form
#[derive(Debug, Serialize, ToSchema)]
pub struct StudentFormResponse {
    pub statuses: Vec<SelectOption<String>>,
    pub genders: Vec<SelectOption<String>>,
}

/// Choices offered by the student list filter
#[derive(Debug, Serialize, ToSchema)]
pub struct StudentFilterResponse {
    pub statuses: Vec<SelectOption<String>>,
}

pub(crate) fn status_options() -> Vec<SelectOption<String>> {
    StudentStatus::all()
        .into_iter()
        .map(|status| SelectOption::new(status.label(), status.as_str().to_owned()))
        .collect()
}

pub(crate) fn gender_options() -> Vec<SelectOption<String>> {
    Gender::all()
        .into_iter()
        .map(|gender| SelectOption::new(gender.label(), gender.as_str().to_owned()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(body: serde_json::Value) -> StudentRequest {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn test_new_student() {
        let student = request(json!({
            "first_name": "Sok",
            "last_name": "Dara",
            "dob": "14-03-2004",
            "phone": "012345678",
            "email": "dara@example.com",
        }))
        .into_new()
        .unwrap();

        assert_eq!(student.status, StudentStatus::Pending);
        assert_eq!(student.dob.map(|d| d.to_string()), Some("2004-03-14".to_owned()));
    }

    #[test]
    fn test_new_student_validation() {
        let err = request(json!({
            "first_name": "Sok",
            "dob": "2004-03-14",
            "phone": "012345678",
            "email": "dara",
            "status": "expelled",
        }))
        .into_new()
        .unwrap_err();

        let ApiError::Validation(errors) = err else {
            panic!("expected validation errors");
        };
        let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["last_name", "dob", "email", "status"]);
        assert_eq!(errors[3].message, INVALID_STATUS);
    }

    #[test]
    fn test_changes_keep_null_apart_from_missing() {
        let changes = request(json!({"gender": null, "status": "confirmed"}))
            .into_changes()
            .unwrap();

        assert_eq!(changes.gender, Some(None));
        assert_eq!(changes.dob, None);
        assert_eq!(changes.status, Some(StudentStatus::Confirmed));
    }

    #[test]
    fn test_changes_reject_blank_fields() {
        let err = request(json!({"first_name": "  ", "dob": ""}))
            .into_changes()
            .unwrap_err();

        let ApiError::Validation(errors) = err else {
            panic!("expected validation errors");
        };
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_form_options() {
        let statuses = status_options();
        assert_eq!(statuses[0], SelectOption::new("Pending", "pending".to_owned()));
        assert_eq!(gender_options().len(), 3);
    }
}
