use crate::{
    entities::grades,
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
};

#[derive(Debug, Clone)]
pub struct NewGrade {
    pub grade_name: String,
    pub description: Option<String>,
}

/// Fields of a grade to overwrite. `Some(None)` clears the description.
#[derive(Debug, Clone, Default)]
pub struct GradeChanges {
    pub grade_name: Option<String>,
    pub description: Option<Option<String>>,
}

pub struct GradeService;

impl GradeService {
    pub async fn list(
        db: &DatabaseConnection,
        params: &ListParams,
    ) -> Result<Page<grades::Model>, DbErr> {
        let filter = ListFilter::new()
            .search(
                params.search.as_deref(),
                [grades::Column::GradeName, grades::Column::Description],
            )
            .created_within(
                grades::Column::CreatedAt,
                params.created,
                DateGranularity::Day,
            );

        fetch_page(
            db,
            grades::Entity::find(),
            filter,
            grades::Column::CreatedAt,
            params.page,
        )
        .await
    }

    pub async fn find_by_id(
        db: &DatabaseConnection,
        id: i32,
    ) -> Result<Option<grades::Model>, DbErr> {
        grades::Entity::find_by_id(id).one(db).await
    }

    pub async fn create(db: &DatabaseConnection, grade: NewGrade) -> Result<grades::Model, DbErr> {
        grades::ActiveModel {
            grade_name: Set(grade.grade_name),
            description: Set(grade.description),
            ..Default::default()
        }
        .insert(db)
        .await
    }

    pub async fn update(
        db: &DatabaseConnection,
        id: i32,
        changes: GradeChanges,
    ) -> Result<Option<grades::Model>, DbErr> {
        let grade = grades::ActiveModel {
            id: Unchanged(id),
            grade_name: changed(changes.grade_name),
            description: changed(changes.description),
            ..Default::default()
        };

        updated_or_none(grade.update(db).await)
    }

    pub async fn delete(db: &DatabaseConnection, id: i32) -> Result<bool, DbErr> {
        let result = grades::Entity::delete_by_id(id).exec(db).await?;
        Ok(result.rows_affected > 0)
    }

    pub async fn options(db: &DatabaseConnection) -> Result<Vec<(i32, String)>, DbErr> {
        grades::Entity::find()
            .select_only()
            .columns([grades::Column::Id, grades::Column::GradeName])
            .order_by_asc(grades::Column::GradeName)
            .into_tuple()
            .all(db)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::{count_row, timestamp};
    use models::{dates::DateRange, paging::PageRequest};
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn grade(id: i32, description: Option<&str>) -> grades::Model {
        grades::Model {
            id,
            grade_name: format!("Grade {id}"),
            description: description.map(str::to_owned),
            created_at: timestamp(2025, 6, 1),
            updated_at: timestamp(2025, 6, 2),
        }
    }

    #[tokio::test]
    async fn test_list_second_page() {
        let rows = vec![grade(3, None), grade(2, Some("Second year"))];
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[count_row(4)], [count_row(4)]])
            .append_query_results([rows.clone()])
            .into_connection();

        let params = ListParams {
            page: PageRequest::new(Some(2), Some(2)),
            search: None,
            created: Some(DateRange::new(
                timestamp(2025, 6, 1).date(),
                timestamp(2025, 6, 30).date(),
            )),
        };
        let page = GradeService::list(&db, &params).await.unwrap();

        assert_eq!(page.rows, rows);
        assert_eq!(page.filtered, 4);
        assert_eq!(params.page.total_pages(page.filtered), 2);
    }

    #[tokio::test]
    async fn test_find_by_id_missing() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<grades::Model>::new()])
            .into_connection();

        assert_eq!(GradeService::find_by_id(&db, 9).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_clearing_description() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[grade(1, None)]])
            .into_connection();

        let updated = GradeService::update(
            &db,
            1,
            GradeChanges {
                description: Some(None),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .unwrap();

        assert_eq!(updated.description, None);
    }
}
