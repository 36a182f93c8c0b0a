use crate::{
    entities::courses,
    services::{
        changed,
        filter::{DateGranularity, ListFilter, ListParams, Page, fetch_page},
        updated_or_none,
    },
};
use sea_orm::{
    ActiveModelTrait,
    ActiveValue::{Set, Unchanged},
    DatabaseConnection, DbErr, EntityTrait, QueryOrder, QuerySelect,
    prelude::Date,
};

#[derive(Debug, Clone)]
pub struct NewCourse {
    pub name: String,
    pub description: Option<String>,
    pub start_date: Date,
    pub end_date: Date,
    pub duration: String,
}

#[derive(Debug, Clone, Default)]
pub struct CourseChanges {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
    pub duration: Option<String>,
}

impl CourseChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.start_date.is_none()
            && self.end_date.is_none()
            && self.duration.is_none()
    }
}

pub struct CourseService;

impl CourseService {
    pub async fn list(
        db: &DatabaseConnection,
        params: &ListParams,
    ) -> Result<Page<courses::Model>, DbErr> {
        let filter = ListFilter::new()
            .search(
                params.search.as_deref(),
                [courses::Column::Name, courses::Column::Description],
            )
            .created_within(
                courses::Column::CreatedAt,
                params.created,
                DateGranularity::Day,
            );

        fetch_page(
            db,
            courses::Entity::find(),
            filter,
            courses::Column::CreatedAt,
            params.page,
        )
        .await
    }

    pub async fn find_by_id(
        db: &DatabaseConnection,
        id: i32,
    ) -> Result<Option<courses::Model>, DbErr> {
        courses::Entity::find_by_id(id).one(db).await
    }

    pub async fn create(
        db: &DatabaseConnection,
        course: NewCourse,
    ) -> Result<courses::Model, DbErr> {
        courses::ActiveModel {
            name: Set(course.name),
            description: Set(course.description),
            start_date: Set(course.start_date),
            end_date: Set(course.end_date),
            duration: Set(course.duration),
            ..Default::default()
        }
        .insert(db)
        .await
    }

    pub async fn update(
        db: &DatabaseConnection,
        id: i32,
        changes: CourseChanges,
    ) -> Result<Option<courses::Model>, DbErr> {
        let course = courses::ActiveModel {
            id: Unchanged(id),
            name: changed(changes.name),
            description: changed(changes.description),
            start_date: changed(changes.start_date),
            end_date: changed(changes.end_date),
            duration: changed(changes.duration),
            ..Default::default()
        };

        updated_or_none(course.update(db).await)
    }

    pub async fn delete(db: &DatabaseConnection, id: i32) -> Result<bool, DbErr> {
        let result = courses::Entity::delete_by_id(id).exec(db).await?;
        Ok(result.rows_affected > 0)
    }

    pub async fn options(db: &DatabaseConnection) -> Result<Vec<(i32, String)>, DbErr> {
        courses::Entity::find()
            .select_only()
            .columns([courses::Column::Id, courses::Column::Name])
            .order_by_asc(courses::Column::Name)
            .into_tuple()
            .all(db)
            .await
    }
}
