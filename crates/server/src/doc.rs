use crate::routes::{
    auth, course, dashboard, grade, health, major, schedule, student, student_record,
};
use utoipa::{
    Modify, OpenApi,
    openapi::{
        Components,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Components::default);
        components.add_security_scheme(
            "jwt",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

/// API Documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        health::health,
        auth::me,
        dashboard::dashboard,
        student::list_students,
        student::student_form,
        student::student_filter,
        student::get_student,
        student::create_student,
        student::update_student,
        student::delete_student,
        major::list_majors,
        major::get_major,
        major::create_major,
        major::update_major,
        major::delete_major,
        grade::list_grades,
        grade::get_grade,
        grade::create_grade,
        grade::update_grade,
        grade::delete_grade,
        course::list_courses,
        course::get_course,
        course::create_course,
        course::update_course,
        course::delete_course,
        schedule::list_schedules,
        schedule::get_schedule,
        schedule::create_schedule,
        schedule::update_schedule,
        schedule::delete_schedule,
        student_record::list_student_records,
        student_record::student_record_form,
        student_record::get_student_record,
        student_record::create_student_record,
        student_record::update_student_record,
        student_record::update_student_record_status,
        student_record::delete_student_record,
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Service liveness"),
        (name = "Authentication", description = "Identity of the caller"),
        (name = "Dashboard", description = "Registration figures"),
        (name = "Students", description = "Student registration"),
        (name = "Majors", description = "Majors offered"),
        (name = "Grades", description = "Grade levels"),
        (name = "Courses", description = "Courses and their dates"),
        (name = "Schedules", description = "Class time slots"),
        (name = "Student Records", description = "Enrollment of students"),
    ),
    info(
        title = "Student Management API",
        version = "1.0.0",
        description = "Students, their enrollment and the reference data around it",
        license(
            name = "MIT OR Apache-2.0",
        )
    )
)]
pub struct ApiDoc;
