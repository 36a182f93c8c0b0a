use crate::{
    entities::{courses, grades, majors, schedules, student_records, students},
    services::{
        changed,
        filter::{DateGranularity, ListFilter, ListParams, Page, fetch_page},
        updated_or_none,
    },
};
use models::student::StudentStatus;
use sea_orm::{
    ActiveModelTrait,
    ActiveValue::{Set, Unchanged},
    DatabaseConnection, DbErr, EntityTrait, FromQueryResult, JoinType, QueryFilter,
    QuerySelect, RelationTrait, Select,
    prelude::{DateTime, Expr},
    sea_query::IntoColumnRef,
};
use thiserror::Error;

/// A student record flattened with the labels of everything it references
#[derive(Debug, Clone, PartialEq, FromQueryResult)]
pub struct StudentRecordRow {
    pub id: i32,
    pub stu_id: i32,
    pub first_name: String,
    pub last_name: String,
    pub status: StudentStatus,
    pub major_id: i32,
    pub major: String,
    pub grade_id: i32,
    pub grade: String,
    pub course_id: i32,
    pub course: String,
    pub schedule_id: i32,
    pub schedule: String,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

/// Equality filters of the student record list
#[derive(Debug, Clone, Default)]
pub struct RecordFilters {
    pub major_id: Option<i32>,
    pub grade_id: Option<i32>,
    pub course_id: Option<i32>,
    pub schedule_id: Option<i32>,
}

#[derive(Debug, Clone)]
pub struct NewStudentRecord {
    pub stu_id: i32,
    pub major_id: i32,
    pub grade_id: i32,
    pub course_id: i32,
    pub schedule_id: i32,
}

#[derive(Debug, Clone, Default)]
pub struct StudentRecordChanges {
    pub stu_id: Option<i32>,
    pub major_id: Option<i32>,
    pub grade_id: Option<i32>,
    pub course_id: Option<i32>,
    pub schedule_id: Option<i32>,
}

#[derive(Debug, Error)]
pub enum RecordError {
    #[error("Student with id = {0} does not exist")]
    StudentNotFound(i32),
    #[error("Student record with id = {0} does not exist")]
    RecordNotFound(i32),
    #[error(transparent)]
    Db(#[from] DbErr),
}

/// Result of changing a student's status through one of its records
#[derive(Debug, Clone, PartialEq)]
pub struct StatusChange {
    pub record_id: i32,
    pub student: students::Model,
}

pub struct StudentRecordService;

impl StudentRecordService {
    /// Records joined with their student, major, grade, course and schedule
    fn joined() -> Select<student_records::Entity> {
        student_records::Entity::find()
            .select_only()
            .columns([
                student_records::Column::Id,
                student_records::Column::StuId,
                student_records::Column::MajorId,
                student_records::Column::GradeId,
                student_records::Column::CourseId,
                student_records::Column::ScheduleId,
                student_records::Column::CreatedAt,
                student_records::Column::UpdatedAt,
            ])
            .columns([
                students::Column::FirstName,
                students::Column::LastName,
                students::Column::Status,
            ])
            .column_as(majors::Column::MajorName, "major")
            .column_as(grades::Column::GradeName, "grade")
            .column_as(courses::Column::Name, "course")
            .column_as(schedules::Column::ScheduleList, "schedule")
            .join(JoinType::InnerJoin, student_records::Relation::Students.def())
            .join(JoinType::InnerJoin, student_records::Relation::Majors.def())
            .join(JoinType::InnerJoin, student_records::Relation::Grades.def())
            .join(JoinType::InnerJoin, student_records::Relation::Courses.def())
            .join(JoinType::InnerJoin, student_records::Relation::Schedules.def())
    }

    fn list_filter(params: &ListParams, filters: &RecordFilters) -> ListFilter {
        ListFilter::new()
            .search(
                params.search.as_deref(),
                [
                    (students::Entity, students::Column::FirstName).into_column_ref(),
                    (students::Entity, students::Column::LastName).into_column_ref(),
                    (majors::Entity, majors::Column::MajorName).into_column_ref(),
                    (grades::Entity, grades::Column::GradeName).into_column_ref(),
                ],
            )
            .eq(
                (student_records::Entity, student_records::Column::MajorId),
                filters.major_id,
            )
            .eq(
                (student_records::Entity, student_records::Column::GradeId),
                filters.grade_id,
            )
            .eq(
                (student_records::Entity, student_records::Column::CourseId),
                filters.course_id,
            )
            .eq(
                (student_records::Entity, student_records::Column::ScheduleId),
                filters.schedule_id,
            )
            .created_within(
                (student_records::Entity, student_records::Column::CreatedAt),
                params.created,
                DateGranularity::Timestamp,
            )
    }

    pub async fn list(
        db: &DatabaseConnection,
        params: &ListParams,
        filters: &RecordFilters,
    ) -> Result<Page<StudentRecordRow>, DbErr> {
        fetch_page(
            db,
            Self::joined(),
            Self::list_filter(params, filters),
            student_records::Column::CreatedAt,
            params.page,
        )
        .await
    }

    pub async fn find_by_id(
        db: &DatabaseConnection,
        id: i32,
    ) -> Result<Option<StudentRecordRow>, DbErr> {
        Self::joined()
            .filter(Expr::col((student_records::Entity, student_records::Column::Id)).eq(id))
            .into_model::<StudentRecordRow>()
            .one(db)
            .await
    }

    /// Inserts a record once its student is known to exist. The other
    /// references are left to the foreign keys.
    pub async fn create(
        db: &DatabaseConnection,
        record: NewStudentRecord,
    ) -> Result<student_records::Model, RecordError> {
        if students::Entity::find_by_id(record.stu_id)
            .one(db)
            .await?
            .is_none()
        {
            return Err(RecordError::StudentNotFound(record.stu_id));
        }

        let created = student_records::ActiveModel {
            stu_id: Set(record.stu_id),
            major_id: Set(record.major_id),
            grade_id: Set(record.grade_id),
            course_id: Set(record.course_id),
            schedule_id: Set(record.schedule_id),
            ..Default::default()
        }
        .insert(db)
        .await?;

        Ok(created)
    }

    pub async fn update(
        db: &DatabaseConnection,
        id: i32,
        changes: StudentRecordChanges,
    ) -> Result<Option<student_records::Model>, DbErr> {
        let record = student_records::ActiveModel {
            id: Unchanged(id),
            stu_id: changed(changes.stu_id),
            major_id: changed(changes.major_id),
            grade_id: changed(changes.grade_id),
            course_id: changed(changes.course_id),
            schedule_id: changed(changes.schedule_id),
            ..Default::default()
        };

        updated_or_none(record.update(db).await)
    }

    /// Sets the status of the student a record belongs to
    pub async fn update_status(
        db: &DatabaseConnection,
        id: i32,
        status: StudentStatus,
    ) -> Result<StatusChange, RecordError> {
        let record = student_records::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or(RecordError::RecordNotFound(id))?;

        let student = students::ActiveModel {
            id: Unchanged(record.stu_id),
            status: Set(status),
            ..Default::default()
        };

        match updated_or_none(student.update(db).await)? {
            Some(student) => Ok(StatusChange {
                record_id: record.id,
                student,
            }),
            None => Err(RecordError::StudentNotFound(record.stu_id)),
        }
    }

    pub async fn delete(db: &DatabaseConnection, id: i32) -> Result<bool, DbErr> {
        let result = student_records::Entity::delete_by_id(id).exec(db).await?;
        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::{count_row, timestamp};
    use models::{dates::DateRange, paging::PageRequest};
    use sea_orm::{DatabaseBackend, MockDatabase, QueryTrait, Value};
    use std::collections::BTreeMap;

    fn record(id: i32, stu_id: i32) -> student_records::Model {
        student_records::Model {
            id,
            stu_id,
            major_id: 1,
            grade_id: 2,
            course_id: 3,
            schedule_id: 4,
            created_at: timestamp(2025, 6, 3),
            updated_at: timestamp(2025, 6, 3),
        }
    }

    fn student(id: i32, status: StudentStatus) -> students::Model {
        students::Model {
            id,
            stu_id: id,
            first_name: "Chan".to_owned(),
            last_name: "Sophea".to_owned(),
            dob: None,
            phone: "098765432".to_owned(),
            email: "sophea@example.com".to_owned(),
            gender: None,
            age: None,
            status,
            created_at: timestamp(2025, 5, 1),
            updated_at: timestamp(2025, 6, 3),
        }
    }

    fn row() -> StudentRecordRow {
        StudentRecordRow {
            id: 10,
            stu_id: 1,
            first_name: "Chan".to_owned(),
            last_name: "Sophea".to_owned(),
            status: StudentStatus::Pending,
            major_id: 1,
            major: "Computer Science".to_owned(),
            grade_id: 2,
            grade: "Year 2".to_owned(),
            course_id: 3,
            course: "Web Development".to_owned(),
            schedule_id: 4,
            schedule: "Morning".to_owned(),
            created_at: timestamp(2025, 6, 3),
            updated_at: timestamp(2025, 6, 3),
        }
    }

    fn mock_row(row: StudentRecordRow) -> BTreeMap<&'static str, Value> {
        let text = |s: String| Value::String(Some(Box::new(s)));
        let at = |t: DateTime| Value::ChronoDateTime(Some(Box::new(t)));

        BTreeMap::from([
            ("id", Value::Int(Some(row.id))),
            ("stu_id", Value::Int(Some(row.stu_id))),
            ("first_name", text(row.first_name)),
            ("last_name", text(row.last_name)),
            ("status", row.status.into()),
            ("major_id", Value::Int(Some(row.major_id))),
            ("major", text(row.major)),
            ("grade_id", Value::Int(Some(row.grade_id))),
            ("grade", text(row.grade)),
            ("course_id", Value::Int(Some(row.course_id))),
            ("course", text(row.course)),
            ("schedule_id", Value::Int(Some(row.schedule_id))),
            ("schedule", text(row.schedule)),
            ("created_at", at(row.created_at)),
            ("updated_at", at(row.updated_at)),
        ])
    }

    #[test]
    fn test_joined_query_flattens_labels() {
        let sql = StudentRecordService::joined()
            .build(DatabaseBackend::Postgres)
            .to_string();

        assert!(sql.contains(r#""majors"."major_name" AS "major""#), "{sql}");
        assert!(sql.contains(r#""schedules"."schedule_list" AS "schedule""#), "{sql}");
        assert!(
            sql.contains(
                r#"INNER JOIN "students" ON "student_records"."stu_id" = "students"."id""#
            ),
            "{sql}"
        );
        assert_eq!(sql.matches("INNER JOIN").count(), 5);
    }

    #[test]
    fn test_list_filter_uses_qualified_columns() {
        let params = ListParams {
            page: PageRequest::default(),
            search: Some("sophea".to_owned()),
            created: Some(DateRange::new(
                timestamp(2025, 6, 1).date(),
                timestamp(2025, 6, 30).date(),
            )),
        };
        let filters = RecordFilters {
            major_id: Some(1),
            ..Default::default()
        };

        let sql = StudentRecordService::joined()
            .filter(StudentRecordService::list_filter(&params, &filters).into_condition())
            .build(DatabaseBackend::Postgres)
            .to_string();
        let (_, sql) = sql.split_once(" WHERE ").unwrap();

        assert!(sql.contains(r#"LOWER("students"."first_name") LIKE '%sophea%'"#), "{sql}");
        assert!(sql.contains(r#"LOWER("grades"."grade_name") LIKE '%sophea%'"#), "{sql}");
        assert!(sql.contains(r#""student_records"."major_id" = 1"#), "{sql}");
        assert!(!sql.contains(r#""student_records"."grade_id" ="#), "{sql}");
        assert!(sql.contains(r#""student_records"."created_at" BETWEEN"#), "{sql}");
    }

    #[tokio::test]
    async fn test_list_returns_joined_rows() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[count_row(3)], [count_row(1)]])
            .append_query_results([[mock_row(row())]])
            .into_connection();

        let page = StudentRecordService::list(
            &db,
            &ListParams::default(),
            &RecordFilters::default(),
        )
        .await
        .unwrap();

        assert_eq!(page.rows, vec![row()]);
        assert_eq!((page.filtered, page.total), (1, 3));
    }

    #[tokio::test]
    async fn test_find_by_id() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[mock_row(row())]])
            .append_query_results([Vec::<BTreeMap<&str, Value>>::new()])
            .into_connection();

        assert_eq!(
            StudentRecordService::find_by_id(&db, 10).await.unwrap(),
            Some(row())
        );
        assert_eq!(StudentRecordService::find_by_id(&db, 11).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_create_requires_student() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<students::Model>::new()])
            .into_connection();

        let err = StudentRecordService::create(
            &db,
            NewStudentRecord {
                stu_id: 99,
                major_id: 1,
                grade_id: 2,
                course_id: 3,
                schedule_id: 4,
            },
        )
        .await
        .unwrap_err();

        assert!(matches!(err, RecordError::StudentNotFound(99)));
    }

    #[tokio::test]
    async fn test_create_inserts_after_student_check() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[student(1, StudentStatus::Pending)]])
            .append_query_results([[record(10, 1)]])
            .into_connection();

        let created = StudentRecordService::create(
            &db,
            NewStudentRecord {
                stu_id: 1,
                major_id: 1,
                grade_id: 2,
                course_id: 3,
                schedule_id: 4,
            },
        )
        .await
        .unwrap();

        assert_eq!(created, record(10, 1));
    }

    #[tokio::test]
    async fn test_update_status_confirms_student() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[record(10, 1)]])
            .append_query_results([[student(1, StudentStatus::Confirmed)]])
            .into_connection();

        let change = StudentRecordService::update_status(&db, 10, StudentStatus::Confirmed)
            .await
            .unwrap();

        assert_eq!(change.record_id, 10);
        assert_eq!(change.student.status, StudentStatus::Confirmed);
    }

    #[tokio::test]
    async fn test_update_status_missing_record() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<student_records::Model>::new()])
            .into_connection();

        let err = StudentRecordService::update_status(&db, 10, StudentStatus::Confirmed)
            .await
            .unwrap_err();

        assert!(matches!(err, RecordError::RecordNotFound(10)));
    }
}
