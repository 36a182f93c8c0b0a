use crate::{
    entities::schedules,
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
pub struct NewSchedule {
    pub schedule_list: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ScheduleChanges {
    pub schedule_list: Option<String>,
    pub description: Option<Option<String>>,
}

pub struct ScheduleService;

impl ScheduleService {
    pub async fn list(
        db: &DatabaseConnection,
        params: &ListParams,
    ) -> Result<Page<schedules::Model>, DbErr> {
        let filter = ListFilter::new()
            .search(
                params.search.as_deref(),
                [schedules::Column::ScheduleList, schedules::Column::Description],
            )
            .created_within(
                schedules::Column::CreatedAt,
                params.created,
                DateGranularity::Day,
            );

        fetch_page(
            db,
            schedules::Entity::find(),
            filter,
            schedules::Column::CreatedAt,
            params.page,
        )
        .await
    }

    pub async fn find_by_id(
        db: &DatabaseConnection,
        id: i32,
    ) -> Result<Option<schedules::Model>, DbErr> {
        schedules::Entity::find_by_id(id).one(db).await
    }

    pub async fn create(
        db: &DatabaseConnection,
        schedule: NewSchedule,
    ) -> Result<schedules::Model, DbErr> {
        schedules::ActiveModel {
            schedule_list: Set(schedule.schedule_list),
            description: Set(schedule.description),
            ..Default::default()
        }
        .insert(db)
        .await
    }

    pub async fn update(
        db: &DatabaseConnection,
        id: i32,
        changes: ScheduleChanges,
    ) -> Result<Option<schedules::Model>, DbErr> {
        let schedule = schedules::ActiveModel {
            id: Unchanged(id),
            schedule_list: changed(changes.schedule_list),
            description: changed(changes.description),
            ..Default::default()
        };

        updated_or_none(schedule.update(db).await)
    }

    pub async fn delete(db: &DatabaseConnection, id: i32) -> Result<bool, DbErr> {
        let result = schedules::Entity::delete_by_id(id).exec(db).await?;
        Ok(result.rows_affected > 0)
    }

    pub async fn options(db: &DatabaseConnection) -> Result<Vec<(i32, String)>, DbErr> {
        schedules::Entity::find()
            .select_only()
            .columns([schedules::Column::Id, schedules::Column::ScheduleList])
            .order_by_asc(schedules::Column::ScheduleList)
            .into_tuple()
            .all(db)
            .await
    }
}
