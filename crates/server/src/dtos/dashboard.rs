use super::DateStyle;
use database::services::dashboard::{DashboardSnapshot, RecentRegistration};
use models::{
    reporting::{Growth, distribution, last_month_share},
    student::StudentStatus,
};
use serde::Serialize;
use std::collections::BTreeMap;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct DashboardResponse {
    pub stats: StatsResponse,
    pub growth: GrowthResponse,
    pub recent_stu_registered: Vec<RecentRegistrationResponse>,
    /// Share of student records per schedule, e.g. `{"Morning": "50.00"}`
    pub schedule_list: BTreeMap<String, String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StatsResponse {
    pub total_stu: u64,
    pub total_grade: u64,
    pub total_major: u64,
    pub total_course: u64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct GrowthResponse {
    pub current_month: MonthGrowth,
    pub last_month: MonthGrowth,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MonthGrowth {
    /// Student records created during the month
    pub total_stu: u64,
    #[schema(example = "-50.00%")]
    pub growth: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RecentRegistrationResponse {
    pub record_id: i32,
    pub first_name: String,
    pub last_name: String,
    #[schema(value_type = String)]
    pub status: StudentStatus,
    pub major_name: String,
    #[serde(rename = "createdAt")]
    pub created_at: String,
}

impl From<RecentRegistration> for RecentRegistrationResponse {
    fn from(recent: RecentRegistration) -> Self {
        Self {
            record_id: recent.record_id,
            first_name: recent.first_name,
            last_name: recent.last_name,
            status: recent.status,
            major_name: recent.major_name,
            created_at: DateStyle::Detailed.timestamp(recent.created_at),
        }
    }
}

impl From<DashboardSnapshot> for DashboardResponse {
    fn from(snapshot: DashboardSnapshot) -> Self {
        let counts = snapshot
            .schedule_counts
            .into_iter()
            .map(|(label, count)| (label, u64::try_from(count).unwrap_or_default()));

        Self {
            stats: StatsResponse {
                total_stu: snapshot.totals.students,
                total_grade: snapshot.totals.grades,
                total_major: snapshot.totals.majors,
                total_course: snapshot.totals.courses,
            },
            growth: GrowthResponse {
                current_month: MonthGrowth {
                    total_stu: snapshot.this_month,
                    growth: Growth::between(snapshot.this_month, snapshot.last_month).to_string(),
                },
                last_month: MonthGrowth {
                    total_stu: snapshot.last_month,
                    growth: last_month_share(snapshot.this_month, snapshot.last_month),
                },
            },
            recent_stu_registered: snapshot.recent.into_iter().map(Into::into).collect(),
            schedule_list: distribution(counts, snapshot.total_records),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use database::services::dashboard::Totals;
    use serde_json::json;

    #[test]
    fn test_dashboard_shape() {
        let snapshot = DashboardSnapshot {
            totals: Totals {
                students: 12,
                grades: 3,
                majors: 4,
                courses: 5,
            },
            this_month: 5,
            last_month: 10,
            recent: vec![RecentRegistration {
                record_id: 7,
                first_name: "Sok".to_owned(),
                last_name: "Dara".to_owned(),
                status: StudentStatus::Pending,
                major_name: "Law".to_owned(),
                created_at: NaiveDate::from_ymd_opt(2025, 6, 3)
                    .unwrap()
                    .and_hms_opt(9, 15, 0)
                    .unwrap(),
            }],
            schedule_counts: vec![("Evening".to_owned(), 0), ("Morning".to_owned(), 4)],
            total_records: 4,
        };

        let value = serde_json::to_value(DashboardResponse::from(snapshot)).unwrap();

        assert_eq!(
            value["stats"],
            json!({"total_stu": 12, "total_grade": 3, "total_major": 4, "total_course": 5})
        );
        assert_eq!(
            value["growth"],
            json!({
                "current_month": {"total_stu": 5, "growth": "-50.00%"},
                "last_month": {"total_stu": 10, "growth": "200.00%"},
            })
        );
        assert_eq!(value["recent_stu_registered"][0]["createdAt"], "2025-06-03T09:15:00.000");
        assert_eq!(value["recent_stu_registered"][0]["status"], "pending");
        assert_eq!(
            value["schedule_list"],
            json!({"Evening": "0.00", "Morning": "100.00"})
        );
    }
}
