//! Integration tests for the PostgreSQL store.
//!
//! These need a live database (`DATABASE_URL`) and are ignored by default:
//! `cargo test -p worklog-db -- --ignored`.

use chrono::NaiveDate;
use sqlx::PgPool;
use worklog_core::assignment::Assignment;
use worklog_core::filter::{DateWindow, ReportFilter, ReportQuery};
use worklog_core::task_log::NewTaskLog;
use worklog_core::taxonomy::{Stage, TaskType, TransportMode, WorkStatus};
use worklog_db::pg::PgWorklogStore;
use worklog_db::{StoreError, WorklogStore};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

async fn seed(pool: &PgPool) -> (i64, i64, i64) {
    let (staff_id,): (i64,) = sqlx::query_as(
        "INSERT INTO staff (name, email, role, engineer_type)
         VALUES ('Amina Otieno', 'amina@example.com', 'staff', 'Electrical')
         RETURNING id",
    )
    .fetch_one(pool)
    .await
    .unwrap();

    let (role_split,): (i64,) = sqlx::query_as(
        "INSERT INTO projects (project_number, project_name, project_type, stage, status, electrical_id)
         VALUES ('P-001', 'Library', 'School', 'Design', 'Active', $1)
         RETURNING id",
    )
    .bind(staff_id)
    .fetch_one(pool)
    .await
    .unwrap();

    let (array,): (i64,) = sqlx::query_as(
        "INSERT INTO projects (project_number, project_name, status, assigned_staff)
         VALUES ('P-002', 'Clinic', 'Completed', ARRAY[$1]::BIGINT[])
         RETURNING id",
    )
    .bind(staff_id)
    .fetch_one(pool)
    .await
    .unwrap();

    (staff_id, role_split, array)
}

fn new_log(employee_id: i64, project_id: i64, work_date: NaiveDate, hours: f64) -> NewTaskLog {
    NewTaskLog {
        employee_id,
        project_id,
        work_date,
        stage: Stage::Design,
        task_type: TaskType::Inspection,
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

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_upsert_is_idempotent(pool: PgPool) {
    let (staff_id, project_id, _) = seed(&pool).await;
    let store = PgWorklogStore::new(pool.clone());

    let first = store
        .upsert_task_log(&new_log(staff_id, project_id, date(2026, 2, 10), 4.0))
        .await
        .unwrap();
    assert!(first.created);

    let second = store
        .upsert_task_log(&new_log(staff_id, project_id, date(2026, 2, 10), 6.5))
        .await
        .unwrap();
    assert!(!second.created);
    assert_eq!(second.log.id, first.log.id);
    assert_eq!(second.log.total_man_hours, 6.5);

    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM task_logs")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_concurrent_duplicates_create_one_row(pool: PgPool) {
    let (staff_id, project_id, _) = seed(&pool).await;
    let store = PgWorklogStore::new(pool.clone());

    let first_log = new_log(staff_id, project_id, date(2026, 2, 12), 3.0);
    let second_log = new_log(staff_id, project_id, date(2026, 2, 12), 5.0);
    let (first, second) = tokio::join!(
        store.upsert_task_log(&first_log),
        store.upsert_task_log(&second_log),
    );
    let (first, second) = (first.unwrap(), second.unwrap());

    assert_eq!([first.created, second.created].iter().filter(|c| **c).count(), 1);
    assert_eq!(first.log.id, second.log.id);

    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM task_logs")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_generated_total_includes_travel(pool: PgPool) {
    let (staff_id, project_id, _) = seed(&pool).await;
    let store = PgWorklogStore::new(pool);

    let mut log = new_log(staff_id, project_id, date(2026, 2, 11), 5.0);
    log.leaves_office = true;
    log.travel_hours = 1.5;
    log.transport_mode = Some(TransportMode::Road);
    log.mileage = Some(38.0);

    let stored = store.upsert_task_log(&log).await.unwrap().log;
    assert_eq!(stored.total_man_hours, 6.5);
    assert_eq!(stored.transport_mode.as_deref(), Some("Road"));
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_unknown_project_maps_to_reference_error(pool: PgPool) {
    let (staff_id, _, _) = seed(&pool).await;
    let store = PgWorklogStore::new(pool);

    let result = store
        .upsert_task_log(&new_log(staff_id, 9_999, date(2026, 2, 10), 1.0))
        .await;
    assert!(matches!(
        result,
        Err(StoreError::UnknownReference { entity: "project", id: 9_999 })
    ));
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_filtered_listing_matches_in_memory_semantics(pool: PgPool) {
    let (staff_id, project_a, project_b) = seed(&pool).await;
    let store = PgWorklogStore::new(pool.clone());

    store
        .upsert_task_log(&new_log(staff_id, project_a, date(2026, 2, 9), 2.0))
        .await
        .unwrap();
    store
        .upsert_task_log(&new_log(staff_id, project_b, date(2026, 3, 2), 3.0))
        .await
        .unwrap();
    // A row written by an older deployment with the legacy stage spelling.
    sqlx::query(
        "INSERT INTO task_logs (employee_id, project_id, work_date, stage, task_type, project_hours)
         VALUES ($1, $2, '2026-02-10', 'Pre-design', 'Design', 1)",
    )
    .bind(staff_id)
    .bind(project_a)
    .execute(&pool)
    .await
    .unwrap();

    let february = ReportQuery {
        start_date: Some("2026-02-01".into()),
        end_date: Some("2026-02-28".into()),
        ..Default::default()
    }
    .build()
    .unwrap();
    let logs = store.list_task_logs(&february).await.unwrap();
    assert_eq!(logs.len(), 2);
    assert!(logs.iter().all(|l| february.matches(l)));
    assert_eq!(logs[0].work_date, date(2026, 2, 10));
    assert_eq!(logs[0].employee_name.as_deref(), Some("Amina Otieno"));

    let pre_design = ReportQuery {
        stage: Some("Pre-Design".into()),
        ..Default::default()
    }
    .build()
    .unwrap();
    assert_eq!(store.list_task_logs(&pre_design).await.unwrap().len(), 1);

    let everything = store.list_task_logs(&ReportFilter::all()).await.unwrap();
    assert_eq!(everything.len(), 3);
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_project_assignment_columns_resolve(pool: PgPool) {
    let (staff_id, role_split, array) = seed(&pool).await;
    let store = PgWorklogStore::new(pool);

    let projects = store.list_projects().await.unwrap();
    let a = projects.iter().find(|p| p.id == role_split).unwrap();
    let b = projects.iter().find(|p| p.id == array).unwrap();
    assert!(matches!(a.assignment, Assignment::RoleSplit { .. }));
    assert!(a.assignment.includes(staff_id));
    assert_eq!(b.assignment, Assignment::Many { staff_ids: vec![staff_id] });
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_week_counts_and_distinct_dates(pool: PgPool) {
    let (staff_id, project_a, project_b) = seed(&pool).await;
    let store = PgWorklogStore::new(pool);

    for (project, day) in [(project_a, 9), (project_b, 9), (project_a, 16)] {
        store
            .upsert_task_log(&new_log(staff_id, project, date(2026, 2, day), 1.0))
            .await
            .unwrap();
    }

    let week = DateWindow::days(date(2026, 2, 9), date(2026, 2, 15));
    let counts = store.count_logs_by_employee(&week).await.unwrap();
    assert_eq!(counts.get(&staff_id), Some(&2));

    let dates = store.distinct_work_dates().await.unwrap();
    assert_eq!(dates, vec![date(2026, 2, 16), date(2026, 2, 9)]);
}
