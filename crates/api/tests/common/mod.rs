//! Shared helpers for the API integration tests.
//!
//! The application is built over [`MemoryStore`] so the tests exercise the
//! full router and middleware stack without a database.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use chrono::{NaiveDate, TimeZone, Utc};
use http_body_util::BodyExt;
use tower::ServiceExt;

use worklog_api::auth::jwt::{generate_access_token, JwtConfig};
use worklog_api::config::ServerConfig;
use worklog_api::router::build_app_router;
use worklog_api::state::AppState;
use worklog_core::assignment::Assignment;
use worklog_core::records::{ProjectRecord, StaffRecord};
use worklog_core::task_log::NewTaskLog;
use worklog_core::taxonomy::{EngineerType, Stage, TaskType, TransportMode, WorkStatus};
use worklog_db::memory::MemoryStore;
use worklog_db::WorklogStore;

pub const ADMIN_ID: i64 = 1;
pub const AMINA_ID: i64 = 2;
pub const BRIAN_ID: i64 = 3;
pub const CAROL_ID: i64 = 4;

pub const LIBRARY_ID: i64 = 10;
pub const CLINIC_ID: i64 = 11;
pub const DEPOT_ID: i64 = 12;

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        database_url: String::new(),
        db_max_connections: 1,
        jwt: JwtConfig {
            secret: "worklog-integration-test-secret".to_string(),
            access_token_expiry_mins: 15,
        },
    }
}

/// Build the full application router over `store`.
pub fn build_test_app(store: Arc<MemoryStore>) -> Router {
    build_app_router(AppState {
        store,
        config: Arc::new(test_config()),
    })
}

/// A valid bearer token for `user_id` with `role`.
pub fn token(user_id: i64, role: &str) -> String {
    generate_access_token(user_id, role, &test_config().jwt).unwrap()
}

pub fn admin_token() -> String {
    token(ADMIN_ID, "admin")
}

pub fn staff_token(user_id: i64) -> String {
    token(user_id, "staff")
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// Send a GET request, optionally with a bearer token.
pub async fn get(app: Router, uri: &str, token: Option<&str>) -> Response<Body> {
    let mut builder = Request::builder().method(Method::GET).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    app.oneshot(builder.body(Body::empty()).unwrap()).await.unwrap()
}

/// POST a JSON body, optionally with a bearer token.
pub async fn post_json(
    app: Router,
    uri: &str,
    token: Option<&str>,
    body: serde_json::Value,
) -> Response<Body> {
    post_raw(app, uri, token, body.to_string()).await
}

/// POST a raw string as `application/json`.
pub async fn post_raw(app: Router, uri: &str, token: Option<&str>, body: String) -> Response<Body> {
    let mut builder = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    app.oneshot(builder.body(Body::from(body)).unwrap()).await.unwrap()
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Fixture
// ---------------------------------------------------------------------------

fn staff(id: i64, name: &str, role: &str, engineer_type: Option<EngineerType>) -> StaffRecord {
    StaffRecord {
        id,
        name: name.to_string(),
        email: format!("{}@example.com", name.split(' ').next().unwrap().to_lowercase()),
        role: role.to_string(),
        engineer_type,
    }
}

fn project(
    id: i64,
    number: &str,
    name: &str,
    project_type: &str,
    stage: Option<&str>,
    status: &str,
    assignment: Assignment,
) -> ProjectRecord {
    ProjectRecord {
        id,
        project_number: number.to_string(),
        project_name: name.to_string(),
        project_type: Some(project_type.to_string()),
        stage: stage.map(str::to_string),
        status: status.to_string(),
        architect: Some("Mwangi & Partners".to_string()),
        assignment,
        created_at: Utc.with_ymd_and_hms(2025, 11, 3, 8, 0, 0).unwrap(),
    }
}

pub fn office_log(
    employee_id: i64,
    project_id: i64,
    work_date: NaiveDate,
    stage: Stage,
    hours: f64,
) -> NewTaskLog {
    NewTaskLog {
        employee_id,
        project_id,
        work_date,
        stage,
        task_type: TaskType::Design,
        status: WorkStatus::Active,
        description: None,
        project_hours: hours,
        travel_hours: 0.0,
        leaves_office: false,
        transport_mode: None,
        mileage: None,
        destination: None,
    }
}

/// Staff, projects and four task logs in February 2026.
///
/// | employee | project | date       | stage         | project h | travel h | transport        |
/// |----------|---------|------------|---------------|-----------|----------|------------------|
/// | Amina    | P-010   | 2026-02-09 | Design        | 6         | 0        |                  |
/// | Amina    | P-011   | 2026-02-10 | Tendering     | 2         | 1.5      | Road, 40 km      |
/// | Brian    | P-012   | 2026-02-11 | Commissioning | 4         | 2        | Flight, Mombasa  |
/// | Brian    | P-011   | 2026-02-17 | Design        | 3         | 0        |                  |
///
/// Projects: P-010 Active (stage Design, Amina), P-011 Completed (stage
/// Tendering, Amina and Brian), P-012 Stalled (no stage, Brian as electrical).
/// Carol is staff with no logs; Ada is the admin.
pub async fn seeded_store() -> Arc<MemoryStore> {
    let store = Arc::new(MemoryStore::new());

    store.put_staff(staff(ADMIN_ID, "Ada Wanjiru", "admin", None)).await;
    store
        .put_staff(staff(AMINA_ID, "Amina Otieno", "staff", Some(EngineerType::Electrical)))
        .await;
    store
        .put_staff(staff(BRIAN_ID, "Brian Kamau", "staff", Some(EngineerType::Mechanical)))
        .await;
    store
        .put_staff(staff(CAROL_ID, "Carol Njeri", "staff", Some(EngineerType::Electrical)))
        .await;

    store
        .put_project(project(
            LIBRARY_ID,
            "P-010",
            "Library",
            "School",
            Some("Design"),
            "Active",
            Assignment::Single { staff_id: AMINA_ID },
        ))
        .await;
    store
        .put_project(project(
            CLINIC_ID,
            "P-011",
            "Clinic",
            "Hotel",
            Some("Tendering"),
            "Completed",
            Assignment::Many {
                staff_ids: vec![AMINA_ID, BRIAN_ID],
            },
        ))
        .await;
    store
        .put_project(project(
            DEPOT_ID,
            "P-012",
            "Depot",
            "Industrial",
            None,
            "Stalled",
            Assignment::RoleSplit {
                electrical: Some(BRIAN_ID),
                mechanical: None,
                lead: None,
            },
        ))
        .await;

    let mut road = office_log(AMINA_ID, CLINIC_ID, date(2026, 2, 10), Stage::Tendering, 2.0);
    road.leaves_office = true;
    road.travel_hours = 1.5;
    road.transport_mode = Some(TransportMode::Road);
    road.mileage = Some(40.0);

    let mut flight = office_log(BRIAN_ID, DEPOT_ID, date(2026, 2, 11), Stage::Commissioning, 4.0);
    flight.leaves_office = true;
    flight.travel_hours = 2.0;
    flight.transport_mode = Some(TransportMode::Flight);
    flight.destination = Some("Mombasa".to_string());
    flight.task_type = TaskType::Inspection;

    let logs = [
        office_log(AMINA_ID, LIBRARY_ID, date(2026, 2, 9), Stage::Design, 6.0),
        road,
        flight,
        office_log(BRIAN_ID, CLINIC_ID, date(2026, 2, 17), Stage::Design, 3.0),
    ];
    for log in &logs {
        store.upsert_task_log(log).await.unwrap();
    }

    store
}
