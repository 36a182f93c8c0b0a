pub mod courses;
pub mod grades;
pub mod majors;
pub mod schedules;
pub mod student_records;
pub mod students;

use sea_orm::prelude::DateTime;

/// Wall-clock time used for `created_at`/`updated_at`
pub(crate) fn local_now() -> DateTime {
    chrono::Local::now().naive_local()
}
