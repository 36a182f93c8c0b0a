use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoEnumIterator};

#[cfg(feature = "database")]
use sea_orm::Value;

/// Enrollment status of a student
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumString,
    EnumIter,
    AsRefStr,
    Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum StudentStatus {
    /// Registered, waiting for confirmation
    #[default]
    Pending,
    /// Confirmed through the student record status update
    Confirmed,
}

impl StudentStatus {
    pub fn as_str(&self) -> &str {
        self.as_ref()
    }

    /// Human readable label used by the form endpoints
    pub fn label(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Confirmed => "Confirmed",
        }
    }

    pub fn all() -> Vec<StudentStatus> {
        StudentStatus::iter().collect()
    }
}

/// Gender choices offered by the student form.
///
/// The `gender` column itself stays free text, this only drives the options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub fn as_str(&self) -> &str {
        self.as_ref()
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
            Self::Other => "Other",
        }
    }

    pub fn all() -> Vec<Gender> {
        Gender::iter().collect()
    }
}

/// Computes the display number for the next registered student.
///
/// `last` is the display number of the latest allocated student, if any.
pub fn next_display_number(last: Option<i32>) -> i32 {
    last.map_or(1, |number| number.saturating_add(1))
}

#[cfg(feature = "database")]
impl sea_orm::sea_query::ValueType for StudentStatus {
    fn try_from(v: Value) -> Result<Self, sea_orm::sea_query::ValueTypeErr> {
        match v {
            Value::String(Some(s)) => s.parse().map_err(|_| sea_orm::sea_query::ValueTypeErr),
            _ => Err(sea_orm::sea_query::ValueTypeErr),
        }
    }

    fn type_name() -> String {
        "StudentStatus".to_string()
    }

    fn array_type() -> sea_orm::sea_query::ArrayType {
        sea_orm::sea_query::ArrayType::String
    }

    fn column_type() -> sea_orm::sea_query::ColumnType {
        sea_orm::sea_query::ColumnType::Text
    }
}

#[cfg(feature = "database")]
impl From<StudentStatus> for Value {
    fn from(status: StudentStatus) -> Self {
        Value::String(Some(Box::new(status.as_str().to_owned())))
    }
}

#[cfg(feature = "database")]
impl sea_orm::TryGetable for StudentStatus {
    fn try_get_by<I: sea_orm::ColIdx>(
        res: &sea_orm::QueryResult,
        index: I,
    ) -> Result<Self, sea_orm::TryGetError> {
        let val: String = res.try_get_by(index)?;

        val.parse().map_err(|e| {
            sea_orm::TryGetError::DbErr(sea_orm::DbErr::Type(format!(
                "Failed to parse StudentStatus from `{val}`: {e}"
            )))
        })
    }
}

#[cfg(feature = "database")]
impl sea_orm::sea_query::Nullable for StudentStatus {
    fn null() -> Value {
        Value::String(None)
    }
}
