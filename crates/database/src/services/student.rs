use crate::{
    entities::students,
    services::{
        changed,
        filter::{DateGranularity, ListFilter, ListParams, Page, fetch_page},
        updated_or_none,
    },
};
use log::warn;
use models::student::{StudentStatus, next_display_number};
use sea_orm::{
    ActiveModelTrait,
    ActiveValue::{NotSet, Set, Unchanged},
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
    SqlErr,
    prelude::Date,
};

/// Equality filters of the student list
#[derive(Debug, Clone, Default)]
pub struct StudentFilters {
    pub age: Option<i32>,
    pub status: Option<StudentStatus>,
}

#[derive(Debug, Clone)]
pub struct NewStudent {
    pub first_name: String,
    pub last_name: String,
    pub dob: Option<Date>,
    pub phone: String,
    pub email: String,
    pub gender: Option<String>,
    pub age: Option<i32>,
    pub status: StudentStatus,
}

/// Fields of a student to overwrite. For the nullable columns `Some(None)`
/// clears the value.
#[derive(Debug, Clone, Default)]
pub struct StudentChanges {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub dob: Option<Option<Date>>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub gender: Option<Option<String>>,
    pub age: Option<Option<i32>>,
    pub status: Option<StudentStatus>,
}

pub struct StudentService;

impl StudentService {
    /// Attempts at claiming a display number before giving up
    const MAX_ALLOCATION_ATTEMPTS: u32 = 5;

    pub async fn list(
        db: &DatabaseConnection,
        params: &ListParams,
        filters: &StudentFilters,
    ) -> Result<Page<students::Model>, DbErr> {
        let filter = ListFilter::new()
            .search(
                params.search.as_deref(),
                [
                    students::Column::FirstName,
                    students::Column::LastName,
                    students::Column::Phone,
                ],
            )
            .eq(students::Column::Age, filters.age)
            .eq(students::Column::Status, filters.status)
            .created_within(
                students::Column::CreatedAt,
                params.created,
                DateGranularity::Day,
            );

        fetch_page(
            db,
            students::Entity::find(),
            filter,
            students::Column::CreatedAt,
            params.page,
        )
        .await
    }

    pub async fn find_by_id(
        db: &DatabaseConnection,
        id: i32,
    ) -> Result<Option<students::Model>, DbErr> {
        students::Entity::find_by_id(id).one(db).await
    }

    /// Registers a student under the next free display number.
    ///
    /// Two concurrent registrations can compute the same number, the unique
    /// index on `stu_id` rejects the second one which then retries with a
    /// fresh number.
    pub async fn create(
        db: &DatabaseConnection,
        student: NewStudent,
    ) -> Result<students::Model, DbErr> {
        Self::create_with(db, student, is_unique_violation).await
    }

    /// [`StudentService::create`] with `is_taken` deciding which insert
    /// failures mean the display number was claimed in the meantime
    async fn create_with(
        db: &DatabaseConnection,
        student: NewStudent,
        is_taken: fn(&DbErr) -> bool,
    ) -> Result<students::Model, DbErr> {
        let template = students::ActiveModel {
            id: NotSet,
            stu_id: NotSet,
            first_name: Set(student.first_name),
            last_name: Set(student.last_name),
            dob: Set(student.dob),
            phone: Set(student.phone),
            email: Set(student.email),
            gender: Set(student.gender),
            age: Set(student.age),
            status: Set(student.status),
            created_at: NotSet,
            updated_at: NotSet,
        };

        let mut attempt = 1;
        loop {
            let stu_id = next_display_number(Self::last_display_number(db).await?);

            let mut active = template.clone();
            active.stu_id = Set(stu_id);

            match active.insert(db).await {
                Ok(created) => return Ok(created),
                Err(err)
                    if attempt < Self::MAX_ALLOCATION_ATTEMPTS && is_taken(&err) =>
                {
                    warn!("Display number {stu_id} was taken, retrying (attempt {attempt})");
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// Highest display number handed out so far
    async fn last_display_number(db: &DatabaseConnection) -> Result<Option<i32>, DbErr> {
        students::Entity::find()
            .select_only()
            .column(students::Column::StuId)
            .order_by_desc(students::Column::StuId)
            .limit(1)
            .into_tuple()
            .one(db)
            .await
    }

    pub async fn update(
        db: &DatabaseConnection,
        id: i32,
        changes: StudentChanges,
    ) -> Result<Option<students::Model>, DbErr> {
        let student = students::ActiveModel {
            id: Unchanged(id),
            first_name: changed(changes.first_name),
            last_name: changed(changes.last_name),
            dob: changed(changes.dob),
            phone: changed(changes.phone),
            email: changed(changes.email),
            gender: changed(changes.gender),
            age: changed(changes.age),
            status: changed(changes.status),
            ..Default::default()
        };

        updated_or_none(student.update(db).await)
    }

    /// Deletes the student, its student records go with it
    pub async fn delete(db: &DatabaseConnection, id: i32) -> Result<bool, DbErr> {
        let result = students::Entity::delete_by_id(id).exec(db).await?;
        Ok(result.rows_affected > 0)
    }

    /// `(id, first_name, last_name)` of students still pending, newest first
    pub async fn pending_options(
        db: &DatabaseConnection,
    ) -> Result<Vec<(i32, String, String)>, DbErr> {
        students::Entity::find()
            .select_only()
            .columns([
                students::Column::Id,
                students::Column::FirstName,
                students::Column::LastName,
            ])
            .filter(students::Column::Status.eq(StudentStatus::Pending))
            .order_by_desc(students::Column::CreatedAt)
            .into_tuple()
            .all(db)
            .await
    }
}

fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}
