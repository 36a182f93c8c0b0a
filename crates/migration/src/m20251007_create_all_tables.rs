use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create students table
        manager
            .create_table(
                Table::create()
                    .table(Students::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Students::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    // Display number, the unique key closes the allocation race
                    .col(
                        ColumnDef::new(Students::StuId)
                            .integer()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Students::FirstName).string().not_null())
                    .col(ColumnDef::new(Students::LastName).string().not_null())
                    .col(ColumnDef::new(Students::Dob).date())
                    .col(ColumnDef::new(Students::Phone).string().not_null())
                    .col(ColumnDef::new(Students::Email).string().not_null())
                    .col(ColumnDef::new(Students::Gender).string())
                    .col(ColumnDef::new(Students::Age).integer())
                    .col(
                        ColumnDef::new(Students::Status)
                            .string()
                            .not_null()
                            .default("pending"),
                    )
                    .col(timestamp(Students::CreatedAt))
                    .col(timestamp(Students::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        // Create majors table
        manager
            .create_table(
                Table::create()
                    .table(Majors::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Majors::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Majors::MajorName).string().not_null())
                    .col(ColumnDef::new(Majors::MajorType).string().not_null())
                    .col(timestamp(Majors::CreatedAt))
                    .col(timestamp(Majors::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        // Create grades table
        manager
            .create_table(
                Table::create()
                    .table(Grades::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Grades::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Grades::GradeName).string().not_null())
                    .col(ColumnDef::new(Grades::Description).text())
                    .col(timestamp(Grades::CreatedAt))
                    .col(timestamp(Grades::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        // Create courses table
        manager
            .create_table(
                Table::create()
                    .table(Courses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Courses::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Courses::Name).string().not_null())
                    .col(ColumnDef::new(Courses::Description).text())
                    .col(ColumnDef::new(Courses::StartDate).date().not_null())
                    .col(ColumnDef::new(Courses::EndDate).date().not_null())
                    .col(ColumnDef::new(Courses::Duration).string().not_null())
                    .col(timestamp(Courses::CreatedAt))
                    .col(timestamp(Courses::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        // Create schedules table
        manager
            .create_table(
                Table::create()
                    .table(Schedules::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Schedules::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Schedules::ScheduleList).string().not_null())
                    .col(ColumnDef::new(Schedules::Description).text())
                    .col(timestamp(Schedules::CreatedAt))
                    .col(timestamp(Schedules::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        // Create student_records association table
        manager
            .create_table(
                Table::create()
                    .table(StudentRecords::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(StudentRecords::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(StudentRecords::StuId).integer().not_null())
                    .col(ColumnDef::new(StudentRecords::MajorId).integer().not_null())
                    .col(ColumnDef::new(StudentRecords::GradeId).integer().not_null())
                    .col(ColumnDef::new(StudentRecords::CourseId).integer().not_null())
                    .col(
                        ColumnDef::new(StudentRecords::ScheduleId)
                            .integer()
                            .not_null(),
                    )
                    .col(timestamp(StudentRecords::CreatedAt))
                    .col(timestamp(StudentRecords::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-student_records-stu_id")
                            .from(StudentRecords::Table, StudentRecords::StuId)
                            .to(Students::Table, Students::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-student_records-major_id")
                            .from(StudentRecords::Table, StudentRecords::MajorId)
                            .to(Majors::Table, Majors::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-student_records-grade_id")
                            .from(StudentRecords::Table, StudentRecords::GradeId)
                            .to(Grades::Table, Grades::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-student_records-course_id")
                            .from(StudentRecords::Table, StudentRecords::CourseId)
                            .to(Courses::Table, Courses::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-student_records-schedule_id")
                            .from(StudentRecords::Table, StudentRecords::ScheduleId)
                            .to(Schedules::Table, Schedules::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop the association table first due to foreign key constraints
        manager
            .drop_table(Table::drop().table(StudentRecords::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Schedules::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Courses::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Grades::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Majors::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Students::Table).to_owned())
            .await?;

        Ok(())
    }
}

/// Creation/update timestamp column defaulting to the current time
fn timestamp<T: IntoIden>(name: T) -> ColumnDef {
    ColumnDef::new(name)
        .timestamp()
        .not_null()
        .default(Expr::current_timestamp())
        .to_owned()
}

#[derive(Iden)]
pub(crate) enum Students {
    Table,
    Id,
    StuId,
    FirstName,
    LastName,
    Dob,
    Phone,
    Email,
    Gender,
    Age,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
pub(crate) enum Majors {
    Table,
    Id,
    MajorName,
    MajorType,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
pub(crate) enum Grades {
    Table,
    Id,
    GradeName,
    Description,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
pub(crate) enum Courses {
    Table,
    Id,
    Name,
    Description,
    StartDate,
    EndDate,
    Duration,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
pub(crate) enum Schedules {
    Table,
    Id,
    ScheduleList,
    Description,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
pub(crate) enum StudentRecords {
    Table,
    Id,
    StuId,
    MajorId,
    GradeId,
    CourseId,
    ScheduleId,
    CreatedAt,
    UpdatedAt,
}
