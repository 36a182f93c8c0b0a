pub mod auth;
pub mod course;
pub mod dashboard;
pub mod grade;
pub mod health;
pub mod major;
pub mod schedule;
pub mod student;
pub mod student_record;

use crate::AppState;
use axum::{
    Router,
    routing::{get, put},
};

/// Every route that sits behind the bearer token layer
pub fn api_router() -> Router<AppState> {
    Router::new()
        .route("/auth/me", get(auth::me))
        .route("/dashboard", get(dashboard::dashboard))
        .route(
            "/students",
            get(student::list_students).post(student::create_student),
        )
        .route("/students/form", get(student::student_form))
        .route("/students/filter", get(student::student_filter))
        .route(
            "/students/{id}",
            get(student::get_student)
                .put(student::update_student)
                .delete(student::delete_student),
        )
        .route("/majors", get(major::list_majors).post(major::create_major))
        .route(
            "/majors/{id}",
            get(major::get_major)
                .put(major::update_major)
                .delete(major::delete_major),
        )
        .route("/grades", get(grade::list_grades).post(grade::create_grade))
        .route(
            "/grades/{id}",
            get(grade::get_grade)
                .put(grade::update_grade)
                .delete(grade::delete_grade),
        )
        .route(
            "/courses",
            get(course::list_courses).post(course::create_course),
        )
        .route(
            "/courses/{id}",
            get(course::get_course)
                .put(course::update_course)
                .delete(course::delete_course),
        )
        .route(
            "/schedules",
            get(schedule::list_schedules).post(schedule::create_schedule),
        )
        .route(
            "/schedules/{id}",
            get(schedule::get_schedule)
                .put(schedule::update_schedule)
                .delete(schedule::delete_schedule),
        )
        .route(
            "/student-records",
            get(student_record::list_student_records).post(student_record::create_student_record),
        )
        .route(
            "/student-records/form",
            get(student_record::student_record_form),
        )
        .route(
            "/student-records/{id}",
            get(student_record::get_student_record)
                .put(student_record::update_student_record)
                .delete(student_record::delete_student_record),
        )
        .route(
            "/student-records/{id}/status",
            put(student_record::update_student_record_status),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::health::health;
    use axum::{
        body::{Body, to_bytes},
        http::{Method, Request, StatusCode, header::CONTENT_TYPE},
    };
    use chrono::{NaiveDate, NaiveDateTime};
    use database::entities::{majors, students};
    use models::student::StudentStatus;
    use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase, MockExecResult, Value};
    use serde_json::json;
    use std::collections::BTreeMap;
    use tower::ServiceExt;

    fn app(db: DatabaseConnection) -> Router {
        api_router()
            .route("/health", get(health))
            .with_state(AppState { db })
    }

    fn empty_db() -> DatabaseConnection {
        MockDatabase::new(DatabaseBackend::Postgres).into_connection()
    }

    async fn send(
        app: Router,
        method: Method,
        uri: &str,
        body: Option<&str>,
    ) -> (StatusCode, serde_json::Value) {
        let request = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => request
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_owned())),
            None => request.body(Body::empty()),
        }
        .unwrap();

        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn count(n: i64) -> BTreeMap<&'static str, Value> {
        BTreeMap::from([("num_items", Value::BigInt(Some(n)))])
    }

    fn timestamp() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 6, 1)
            .unwrap()
            .and_hms_opt(8, 30, 0)
            .unwrap()
    }

    fn major(id: i32, name: &str) -> majors::Model {
        majors::Model {
            id,
            major_name: name.to_owned(),
            major_type: "Engineering".to_owned(),
            created_at: timestamp(),
            updated_at: timestamp(),
        }
    }

    #[tokio::test]
    async fn test_list_wraps_page_in_envelope() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[count(5)], [count(3)]])
            .append_query_results([[major(3, "Law"), major(2, "Computer Science")]])
            .into_connection();

        let (status, json) = send(app(db), Method::GET, "/majors?page=1&size=2", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "success");
        assert_eq!(json["error"], false);
        assert_eq!(
            json["paging"],
            json!({"size": 2, "page": 1, "totalPage": 2, "total": 5})
        );
        assert_eq!(json["data"][0]["major_name"], "Law");
        assert_eq!(json["data"][0]["createdAt"], "01-Jun-2025");
    }

    fn student(id: i32, age: i32) -> students::Model {
        students::Model {
            id,
            stu_id: id,
            first_name: "Sok".to_owned(),
            last_name: "Dara".to_owned(),
            dob: NaiveDate::from_ymd_opt(2004, 3, 14),
            phone: "012345678".to_owned(),
            email: "dara@example.com".to_owned(),
            gender: Some("male".to_owned()),
            age: Some(age),
            status: StudentStatus::Confirmed,
            created_at: timestamp(),
            updated_at: timestamp(),
        }
    }

    #[tokio::test]
    async fn test_student_list_filters_and_paging() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[count(8)], [count(2)]])
            .append_query_results([[student(7, 20), student(4, 20)]])
            .into_connection();

        let (status, json) = send(
            app(db.clone()),
            Method::GET,
            "/students?age=20&status=confirmed&page=1&size=5&search=",
            None,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            json["paging"],
            json!({"size": 5, "page": 1, "totalPage": 1, "total": 8})
        );
        assert_eq!(json["data"][0]["stu_id"], 7);
        assert_eq!(json["data"][1]["status"], "confirmed");

        let log = db.into_transaction_log();
        let statements: Vec<String> = log
            .iter()
            .flat_map(|transaction| transaction.statements())
            .map(ToString::to_string)
            .collect();
        assert_eq!(statements.len(), 3);
        assert!(statements[1].contains(r#""age" = 20"#), "{}", statements[1]);
        assert!(statements[1].contains(r#""status" = 'confirmed'"#), "{}", statements[1]);
        assert!(statements[2].contains("LIMIT 5 OFFSET 0"), "{}", statements[2]);
    }

    #[tokio::test]
    async fn test_unknown_list_filter_is_rejected() {
        let (status, json) =
            send(app(empty_db()), Method::GET, "/students?status=graduated", None).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["status"], "error");
        assert!(json.get("data").is_none());
    }

    #[tokio::test]
    async fn test_oversized_page_size_is_rejected() {
        let (status, json) = send(
            app(empty_db()),
            Method::GET,
            "/majors?size=10000000000000000000",
            None,
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["message"], "Validation failed");
        assert_eq!(json["errors"][0]["field"], "size");
    }

    #[tokio::test]
    async fn test_single_fetch_uses_iso_timestamps() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[major(2, "Computer Science")]])
            .into_connection();

        let (status, json) = send(app(db), Method::GET, "/majors/2", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["createdAt"], "2025-06-01T08:30:00.000");
    }

    #[tokio::test]
    async fn test_missing_row_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<majors::Model>::new()])
            .into_connection();

        let (status, json) = send(app(db), Method::GET, "/majors/9", None).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["status"], "error");
        assert_eq!(json["message"], "Major not found");
    }

    #[tokio::test]
    async fn test_delete_without_rows_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();

        let (status, json) = send(app(db), Method::DELETE, "/majors/9", None).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["message"], "Major not found");
    }

    #[tokio::test]
    async fn test_create_validates_before_touching_the_database() {
        let (status, json) = send(app(empty_db()), Method::POST, "/majors", Some("{}")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["message"], "Validation failed");

        let fields: Vec<_> = json["errors"]
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["field"].as_str().unwrap().to_owned())
            .collect();
        assert_eq!(fields, vec!["major_name", "major_type"]);
    }

    #[tokio::test]
    async fn test_malformed_json_is_an_envelope() {
        let (status, json) =
            send(app(empty_db()), Method::POST, "/majors", Some("{\"major_name\":")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["status"], "error");
        assert_eq!(json["error"], true);
    }

    #[tokio::test]
    async fn test_non_numeric_id_is_an_envelope() {
        let (status, json) = send(app(empty_db()), Method::GET, "/students/abc", None).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["status"], "error");
    }

    #[tokio::test]
    async fn test_course_update_without_fields() {
        let (status, json) = send(app(empty_db()), Method::PUT, "/courses/1", Some("{}")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["message"], "No data to update");
    }

    #[tokio::test]
    async fn test_unknown_status_is_rejected() {
        let (status, json) = send(
            app(empty_db()),
            Method::PUT,
            "/student-records/1/status",
            Some(r#"{"status": "graduated"}"#),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            json["message"],
            r#"Invalid status, it must be "pending" or "confirmed""#
        );
    }

    #[tokio::test]
    async fn test_static_paths_win_over_ids() {
        let (status, json) = send(app(empty_db()), Method::GET, "/students/form", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["statuses"][0]["value"], "pending");
        assert!(json["data"]["genders"].as_array().is_some());
    }

    #[tokio::test]
    async fn test_me_requires_claims() {
        let (status, json) = send(app(empty_db()), Method::GET, "/auth/me", None).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(json["status"], "error");
    }

    #[tokio::test]
    async fn test_health() {
        let (status, json) = send(app(empty_db()), Method::GET, "/health", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["message"], "OK");
    }
}
