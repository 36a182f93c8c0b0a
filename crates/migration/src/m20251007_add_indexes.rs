use sea_orm_migration::prelude::*;

use crate::m20251007_create_all_tables::{
    Courses, Grades, Majors, Schedules, StudentRecords, Students,
};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Every list endpoint orders and date-filters on created_at
        for (name, table, column) in created_at_indexes() {
            manager
                .create_index(
                    Index::create()
                        .name(name)
                        .table(table)
                        .col(column)
                        .to_owned(),
                )
                .await?;
        }

        // Foreign key columns of student_records for faster joins and filters
        for (name, column) in [
            ("idx_student_records_stu_id", StudentRecords::StuId),
            ("idx_student_records_major_id", StudentRecords::MajorId),
            ("idx_student_records_grade_id", StudentRecords::GradeId),
            ("idx_student_records_course_id", StudentRecords::CourseId),
            ("idx_student_records_schedule_id", StudentRecords::ScheduleId),
        ] {
            manager
                .create_index(
                    Index::create()
                        .name(name)
                        .table(StudentRecords::Table)
                        .col(column)
                        .to_owned(),
                )
                .await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let names = created_at_indexes()
            .into_iter()
            .map(|(name, _, _)| name)
            .chain([
                "idx_student_records_stu_id",
                "idx_student_records_major_id",
                "idx_student_records_grade_id",
                "idx_student_records_course_id",
                "idx_student_records_schedule_id",
            ]);

        for name in names {
            manager
                .drop_index(Index::drop().name(name).to_owned())
                .await?;
        }

        Ok(())
    }
}

fn created_at_indexes() -> Vec<(&'static str, DynIden, DynIden)> {
    vec![
        (
            "idx_students_created_at",
            Students::Table.into_iden(),
            Students::CreatedAt.into_iden(),
        ),
        (
            "idx_majors_created_at",
            Majors::Table.into_iden(),
            Majors::CreatedAt.into_iden(),
        ),
        (
            "idx_grades_created_at",
            Grades::Table.into_iden(),
            Grades::CreatedAt.into_iden(),
        ),
        (
            "idx_courses_created_at",
            Courses::Table.into_iden(),
            Courses::CreatedAt.into_iden(),
        ),
        (
            "idx_schedules_created_at",
            Schedules::Table.into_iden(),
            Schedules::CreatedAt.into_iden(),
        ),
        (
            "idx_student_records_created_at",
            StudentRecords::Table.into_iden(),
            StudentRecords::CreatedAt.into_iden(),
        ),
    ]
}
