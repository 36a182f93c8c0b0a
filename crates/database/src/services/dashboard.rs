use crate::{
    entities::{courses, grades, majors, schedules, student_records, students},
    services::filter::{DateGranularity, ListFilter},
};
use futures::try_join;
use models::{dates::DateRange, student::StudentStatus};
use sea_orm::{
    DatabaseConnection, DbErr, EntityTrait, FromQueryResult, JoinType, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, RelationTrait, Select,
    prelude::{Date, DateTime, Expr},
};

/// Number of registrations listed on the dashboard
const RECENT_LIMIT: u64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Totals {
    pub students: u64,
    pub grades: u64,
    pub majors: u64,
    pub courses: u64,
}

#[derive(Debug, Clone, PartialEq, FromQueryResult)]
pub struct RecentRegistration {
    pub record_id: i32,
    pub first_name: String,
    pub last_name: String,
    pub status: StudentStatus,
    pub major_name: String,
    pub created_at: DateTime,
}

/// Raw figures behind the dashboard, as of a given day
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSnapshot {
    pub totals: Totals,
    /// Student records created during the current month
    pub this_month: u64,
    /// Student records created during the previous month
    pub last_month: u64,
    pub recent: Vec<RecentRegistration>,
    /// Student records per schedule label, every schedule included
    pub schedule_counts: Vec<(String, i64)>,
    pub total_records: u64,
}

pub struct DashboardService;

impl DashboardService {
    /// Gathers every dashboard figure, failing as a whole if any query fails
    pub async fn snapshot(
        db: &DatabaseConnection,
        today: Date,
    ) -> Result<DashboardSnapshot, DbErr> {
        let this_month = DateRange::month_containing(today)
            .ok_or_else(|| DbErr::Custom(format!("No calendar month contains {today}")))?;
        let last_month = this_month
            .previous_month()
            .ok_or_else(|| DbErr::Custom(format!("No month precedes {}", this_month.start)))?;

        let (totals, this_month, last_month, recent, schedule_counts, total_records) = try_join!(
            Self::totals(db),
            Self::records_created_within(db, this_month),
            Self::records_created_within(db, last_month),
            Self::recent_registrations(db),
            Self::schedule_counts(db),
            student_records::Entity::find().count(db),
        )?;

        Ok(DashboardSnapshot {
            totals,
            this_month,
            last_month,
            recent,
            schedule_counts,
            total_records,
        })
    }

    async fn totals(db: &DatabaseConnection) -> Result<Totals, DbErr> {
        let (students, grades, majors, courses) = try_join!(
            students::Entity::find().count(db),
            grades::Entity::find().count(db),
            majors::Entity::find().count(db),
            courses::Entity::find().count(db),
        )?;

        Ok(Totals {
            students,
            grades,
            majors,
            courses,
        })
    }

    async fn records_created_within(
        db: &DatabaseConnection,
        month: DateRange,
    ) -> Result<u64, DbErr> {
        let filter = ListFilter::new().created_within(
            student_records::Column::CreatedAt,
            Some(month),
            DateGranularity::Day,
        );

        student_records::Entity::find()
            .filter(filter.into_condition())
            .count(db)
            .await
    }

    async fn recent_registrations(
        db: &DatabaseConnection,
    ) -> Result<Vec<RecentRegistration>, DbErr> {
        student_records::Entity::find()
            .select_only()
            .column_as(student_records::Column::Id, "record_id")
            .columns([
                students::Column::FirstName,
                students::Column::LastName,
                students::Column::Status,
            ])
            .column(majors::Column::MajorName)
            .column(student_records::Column::CreatedAt)
            .join(JoinType::InnerJoin, student_records::Relation::Students.def())
            .join(JoinType::InnerJoin, student_records::Relation::Majors.def())
            .order_by_desc(student_records::Column::CreatedAt)
            .limit(RECENT_LIMIT)
            .into_model()
            .all(db)
            .await
    }

    /// `(schedule_list, total)` for every schedule, zero when unused
    fn schedule_counts_query() -> Select<schedules::Entity> {
        schedules::Entity::find()
            .select_only()
            .column(schedules::Column::ScheduleList)
            .column_as(
                Expr::col((student_records::Entity, student_records::Column::Id)).count(),
                "total",
            )
            .join(JoinType::LeftJoin, schedules::Relation::StudentRecords.def())
            .group_by(schedules::Column::ScheduleList)
            .order_by_asc(schedules::Column::ScheduleList)
    }

    async fn schedule_counts(db: &DatabaseConnection) -> Result<Vec<(String, i64)>, DbErr> {
        Self::schedule_counts_query().into_tuple().all(db).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::{count_row, timestamp};
    use sea_orm::{DatabaseBackend, QueryTrait, Value};
    use std::collections::BTreeMap;

    #[test]
    fn test_schedule_counts_keep_unused_schedules() {
        let sql = DashboardService::schedule_counts_query()
            .build(DatabaseBackend::Postgres)
            .to_string();

        assert!(sql.contains(r#"COUNT("student_records"."id") AS "total""#), "{sql}");
        assert!(sql.contains(r#"LEFT JOIN "student_records""#), "{sql}");
        assert!(sql.contains(r#"GROUP BY "schedules"."schedule_list""#), "{sql}");
    }

    #[tokio::test]
    async fn test_snapshot() {
        let recent = BTreeMap::from([
            ("record_id", Value::Int(Some(7))),
            ("first_name", Value::String(Some(Box::new("Sok".to_owned())))),
            ("last_name", Value::String(Some(Box::new("Dara".to_owned())))),
            ("status", StudentStatus::Confirmed.into()),
            ("major_name", Value::String(Some(Box::new("Law".to_owned())))),
            ("created_at", Value::ChronoDateTime(Some(Box::new(timestamp(2025, 6, 3))))),
        ]);
        let schedule = BTreeMap::from([
            ("schedule_list", Value::String(Some(Box::new("Morning".to_owned())))),
            ("total", Value::BigInt(Some(2))),
        ]);

        // Mock queries resolve on first poll, so results are consumed in
        // the order the joined futures are declared
        let db = sea_orm::MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([
                [count_row(20)],
                [count_row(3)],
                [count_row(4)],
                [count_row(5)],
                [count_row(2)],
                [count_row(1)],
            ])
            .append_query_results([[recent]])
            .append_query_results([[schedule]])
            .append_query_results([[count_row(2)]])
            .into_connection();

        let snapshot = DashboardService::snapshot(&db, timestamp(2025, 6, 15).date())
            .await
            .unwrap();

        assert_eq!(
            snapshot.totals,
            Totals {
                students: 20,
                grades: 3,
                majors: 4,
                courses: 5,
            }
        );
        assert_eq!((snapshot.this_month, snapshot.last_month), (2, 1));
        assert_eq!(snapshot.recent[0].record_id, 7);
        assert_eq!(snapshot.schedule_counts, vec![("Morning".to_owned(), 2)]);
        assert_eq!(snapshot.total_records, 2);
    }
}
