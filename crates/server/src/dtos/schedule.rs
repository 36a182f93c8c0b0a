use super::{Checks, DateStyle, double_option};
use crate::error::ApiError;
use database::{
    entities::schedules,
    services::schedule::{NewSchedule, ScheduleChanges},
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct ScheduleResponse {
    pub id: i32,
    pub schedule_list: String,
    pub description: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at: String,
    #[serde(rename = "updatedAt")]
    pub updated_at: String,
}

impl ScheduleResponse {
    pub(crate) fn new(schedule: schedules::Model, style: DateStyle) -> Self {
        Self {
            id: schedule.id,
            schedule_list: schedule.schedule_list,
            description: schedule.description,
            created_at: style.timestamp(schedule.created_at),
            updated_at: style.timestamp(schedule.updated_at),
        }
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ScheduleRequest {
    /// Time slot label, e.g. `Morning`
    pub schedule_list: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,
}

impl ScheduleRequest {
    pub fn into_new(self) -> Result<NewSchedule, ApiError> {
        let mut checks = Checks::default();
        let schedule = NewSchedule {
            schedule_list: checks.required("schedule_list", self.schedule_list),
            description: self.description.flatten(),
        };
        checks.finish(schedule)
    }

    pub fn into_changes(self) -> Result<ScheduleChanges, ApiError> {
        let mut checks = Checks::default();
        let changes = ScheduleChanges {
            schedule_list: checks.not_blank("schedule_list", self.schedule_list),
            description: self.description,
        };
        checks.finish(changes)
    }
}
