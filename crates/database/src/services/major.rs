use crate::{
    entities::majors,
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
pub struct NewMajor {
    pub major_name: String,
    pub major_type: String,
}

/// Fields of a major to overwrite, `None` leaves the column as is
#[derive(Debug, Clone, Default)]
pub struct MajorChanges {
    pub major_name: Option<String>,
    pub major_type: Option<String>,
}

pub struct MajorService;

impl MajorService {
    pub async fn list(
        db: &DatabaseConnection,
        params: &ListParams,
    ) -> Result<Page<majors::Model>, DbErr> {
        let filter = ListFilter::new()
            .search(
                params.search.as_deref(),
                [majors::Column::MajorName, majors::Column::MajorType],
            )
            .created_within(
                majors::Column::CreatedAt,
                params.created,
                DateGranularity::Day,
            );

        fetch_page(
            db,
            majors::Entity::find(),
            filter,
            majors::Column::CreatedAt,
            params.page,
        )
        .await
    }

    pub async fn find_by_id(
        db: &DatabaseConnection,
        id: i32,
    ) -> Result<Option<majors::Model>, DbErr> {
        majors::Entity::find_by_id(id).one(db).await
    }

    pub async fn create(db: &DatabaseConnection, major: NewMajor) -> Result<majors::Model, DbErr> {
        majors::ActiveModel {
            major_name: Set(major.major_name),
            major_type: Set(major.major_type),
            ..Default::default()
        }
        .insert(db)
        .await
    }

    /// Returns `None` when no major has this id
    pub async fn update(
        db: &DatabaseConnection,
        id: i32,
        changes: MajorChanges,
    ) -> Result<Option<majors::Model>, DbErr> {
        let major = majors::ActiveModel {
            id: Unchanged(id),
            major_name: changed(changes.major_name),
            major_type: changed(changes.major_type),
            ..Default::default()
        };

        updated_or_none(major.update(db).await)
    }

    /// Returns whether a row was deleted
    pub async fn delete(db: &DatabaseConnection, id: i32) -> Result<bool, DbErr> {
        let result = majors::Entity::delete_by_id(id).exec(db).await?;
        Ok(result.rows_affected > 0)
    }

    /// `(id, major_name)` pairs sorted by name
    pub async fn options(db: &DatabaseConnection) -> Result<Vec<(i32, String)>, DbErr> {
        majors::Entity::find()
            .select_only()
            .columns([majors::Column::Id, majors::Column::MajorName])
            .order_by_asc(majors::Column::MajorName)
            .into_tuple()
            .all(db)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::{rows_affected, timestamp};
    use sea_orm::{DatabaseBackend, MockDatabase, Value};
    use std::collections::BTreeMap;

    fn major(id: i32, name: &str) -> majors::Model {
        majors::Model {
            id,
            major_name: name.to_owned(),
            major_type: "Engineering".to_owned(),
            created_at: timestamp(2025, 6, 1),
            updated_at: timestamp(2025, 6, 1),
        }
    }

    #[tokio::test]
    async fn test_create_returns_inserted_row() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[major(1, "Computer Science")]])
            .into_connection();

        let created = MajorService::create(
            &db,
            NewMajor {
                major_name: "Computer Science".to_owned(),
                major_type: "Engineering".to_owned(),
            },
        )
        .await
        .unwrap();

        assert_eq!(created.id, 1);
        assert_eq!(db.into_transaction_log().len(), 1);
    }

    #[tokio::test]
    async fn test_update_missing_major_is_none() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<majors::Model>::new()])
            .into_connection();

        let updated = MajorService::update(
            &db,
            42,
            MajorChanges {
                major_name: Some("Physics".to_owned()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        assert_eq!(updated, None);
    }

    #[tokio::test]
    async fn test_update_returns_updated_row() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[major(3, "Physics")]])
            .into_connection();

        let updated = MajorService::update(
            &db,
            3,
            MajorChanges {
                major_name: Some("Physics".to_owned()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.map(|m| m.major_name), Some("Physics".to_owned()));
    }

    #[tokio::test]
    async fn test_delete_reports_affected_rows() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([rows_affected(1), rows_affected(0)])
            .into_connection();

        assert!(MajorService::delete(&db, 1).await.unwrap());
        assert!(!MajorService::delete(&db, 2).await.unwrap());
    }

    #[tokio::test]
    async fn test_options() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[BTreeMap::from([
                ("id", Value::Int(Some(2))),
                ("major_name", Value::String(Some(Box::new("Art".to_owned())))),
            ])]])
            .into_connection();

        let options = MajorService::options(&db).await.unwrap();
        assert_eq!(options, vec![(2, "Art".to_owned())]);
    }
}
