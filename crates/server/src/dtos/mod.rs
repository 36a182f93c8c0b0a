pub mod course;
pub mod dashboard;
pub mod envelope;
pub mod grade;
pub mod major;
pub mod schedule;
pub mod student;
pub mod student_record;

use crate::error::{ApiError, FieldError};
use chrono::{NaiveDate, NaiveDateTime};
use database::services::filter::ListParams;
use models::{
    dates::{
        DateRange, format_display, format_display_timestamp, format_input, format_timestamp,
        parse_input_date,
    },
    paging::PageRequest,
};
use serde::{Deserialize, Deserializer, Serialize, de};
use std::{fmt::Display, str::FromStr};
use utoipa::{IntoParams, ToSchema};

/// Query parameters accepted by every list endpoint
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    /// Page number, starting at 1
    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[param(value_type = Option<u64>)]
    pub page: Option<u64>,
    /// Rows per page, 10 when omitted
    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[param(value_type = Option<u64>)]
    pub size: Option<u64>,
    /// Case-insensitive substring search
    pub search: Option<String>,
    /// Lower creation date bound, e.g. `01-Jun-2025`
    #[serde(rename = "startDate")]
    pub start_date: Option<String>,
    /// Upper creation date bound, e.g. `30-Jun-2025`
    #[serde(rename = "endDate")]
    pub end_date: Option<String>,
}

impl ListQuery {
    pub fn page_request(&self) -> PageRequest {
        PageRequest::new(self.page, self.size)
    }

    /// Malformed date bounds are a server error rather than a rejection,
    /// out of range paging is a validation error
    pub fn list_params(&self) -> Result<ListParams, ApiError> {
        let page = self.page_request();
        page.check().map_err(|err| {
            ApiError::Validation(vec![FieldError::new(err.field(), err.to_string())])
        })?;

        let created = DateRange::from_query(self.start_date.as_deref(), self.end_date.as_deref())
            .map_err(|err| ApiError::internal("Invalid date range", err))?;

        Ok(ListParams {
            page,
            search: self.search.clone(),
            created,
        })
    }
}

/// A `{label, value}` choice of a form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct SelectOption<V> {
    pub label: String,
    pub value: V,
}

impl<V> SelectOption<V> {
    pub fn new(label: impl Into<String>, value: V) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

/// Labels of `(id, label)` pairs as form options
pub(crate) fn id_options(pairs: Vec<(i32, String)>) -> Vec<SelectOption<i32>> {
    pairs
        .into_iter()
        .map(|(id, label)| SelectOption::new(label, id))
        .collect()
}

/// How dates and timestamps of a response are rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DateStyle {
    /// List rows, `01-Jun-2025`
    Listed,
    /// Single records, ISO timestamps and `01-06-2025` dates
    Detailed,
}

impl DateStyle {
    pub(crate) fn timestamp(self, value: NaiveDateTime) -> String {
        match self {
            Self::Listed => format_display_timestamp(value),
            Self::Detailed => format_timestamp(value),
        }
    }

    pub(crate) fn date(self, value: NaiveDate) -> String {
        match self {
            Self::Listed => format_display(value),
            Self::Detailed => format_input(value),
        }
    }
}

/// Treats `?field=` like a missing field and parses everything else
pub(crate) fn empty_string_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    let value = Option::<String>::deserialize(deserializer)?;
    match value.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse().map(Some).map_err(de::Error::custom),
    }
}

/// Keeps an explicit `null` apart from a missing field: absent stays `None`,
/// `null` becomes `Some(None)`
pub(crate) fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Collects field errors while converting a request body
#[derive(Debug, Default)]
pub(crate) struct Checks {
    errors: Vec<FieldError>,
}

impl Checks {
    fn fail(&mut self, field: &str, message: impl Into<String>) {
        self.errors.push(FieldError::new(field, message));
    }

    /// A present, non-blank string
    pub(crate) fn required(&mut self, field: &str, value: Option<String>) -> String {
        match value.map(|v| v.trim().to_owned()).filter(|v| !v.is_empty()) {
            Some(value) => value,
            None => {
                self.fail(field, format!("{} is required", label(field)));
                String::new()
            }
        }
    }

    /// A string that may be missing but not blank when given
    pub(crate) fn not_blank(&mut self, field: &str, value: Option<String>) -> Option<String> {
        let value = value.map(|v| v.trim().to_owned())?;
        if value.is_empty() {
            self.fail(field, format!("{} cannot be empty", label(field)));
        }
        Some(value)
    }

    pub(crate) fn email(&mut self, field: &str, value: String) -> String {
        if !value.is_empty() && !looks_like_email(&value) {
            self.fail(field, "Invalid email address");
        }
        value
    }

    /// A `DD-MM-YYYY` date
    pub(crate) fn input_date(&mut self, field: &str, value: &str) -> Option<NaiveDate> {
        if value.is_empty() {
            return None;
        }

        match parse_input_date(value) {
            Ok(date) => Some(date),
            Err(err) => {
                self.fail(field, err.to_string());
                None
            }
        }
    }

    /// A positive id that fits the database column
    pub(crate) fn id(&mut self, field: &str, value: Option<i64>) -> Option<i32> {
        let id = value?;
        match i32::try_from(id) {
            Ok(id) if id > 0 => Some(id),
            _ => {
                self.fail(field, format!("{} must be a positive integer", label(field)));
                None
            }
        }
    }

    pub(crate) fn required_id(&mut self, field: &str, value: Option<i64>) -> i32 {
        if value.is_none() {
            self.fail(field, format!("{} is required", label(field)));
        }
        self.id(field, value).unwrap_or_default()
    }

    pub(crate) fn parsed<T: FromStr>(
        &mut self,
        field: &str,
        value: Option<String>,
        message: &str,
    ) -> Option<T> {
        let value = value?;
        match value.trim().parse() {
            Ok(parsed) => Some(parsed),
            Err(_) => {
                self.fail(field, message);
                None
            }
        }
    }

    /// `Ok(value)` when no check failed
    pub(crate) fn finish<T>(self, value: T) -> Result<T, ApiError> {
        if self.errors.is_empty() {
            Ok(value)
        } else {
            Err(ApiError::Validation(self.errors))
        }
    }
}

/// `first_name` -> `First name`
fn label(field: &str) -> String {
    let words = field.replace('_', " ");
    let mut chars = words.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => words,
    }
}

fn looks_like_email(value: &str) -> bool {
    match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && domain.contains('.')
                && !value.chars().any(char::is_whitespace)
                && !domain.contains('@')
        }
        None => false,
    }
}
