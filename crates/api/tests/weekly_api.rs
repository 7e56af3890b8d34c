//! Weekly submission compliance endpoints.

mod common;

use axum::http::StatusCode;
use common::{admin_token, body_json, build_test_app, get, seeded_store};
use serde_json::json;

async fn admin_get(uri: &str) -> (StatusCode, serde_json::Value) {
    let app = build_test_app(seeded_store().await);
    let response = get(app, uri, Some(&admin_token())).await;
    let status = response.status();
    (status, body_json(response).await)
}

#[tokio::test]
async fn report_normalizes_to_monday_and_partitions_staff() {
    let (status, json) =
        admin_get("/api/v1/admin/weekly-submission-report?weekStart=2026-02-11").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["weekStart"], "2026-02-09T00:00:00");
    assert_eq!(json["weekEnd"], "2026-02-15T23:59:59");
    assert_eq!(json["label"], "9 Feb 2026 - 15 Feb 2026");

    // The admin is not counted.
    assert_eq!(
        json["summary"],
        json!({"totalStaff": 3, "submitted": 2, "notSubmitted": 1, "submissionRate": 66.7})
    );

    let submitted: Vec<&str> = json["submittedUsers"]
        .as_array()
        .unwrap()
        .iter()
        .map(|u| u["name"].as_str().unwrap())
        .collect();
    assert_eq!(submitted, vec!["Amina Otieno", "Brian Kamau"]);
    assert_eq!(json["notSubmittedUsers"][0]["name"], "Carol Njeri");
    assert_eq!(json["notSubmittedUsers"][0]["taskCount"], 0);

    let counts: Vec<(&str, u64)> = json["allEmployeesWithTaskCounts"]
        .as_array()
        .unwrap()
        .iter()
        .map(|u| (u["name"].as_str().unwrap(), u["taskCount"].as_u64().unwrap()))
        .collect();
    assert_eq!(
        counts,
        vec![("Amina Otieno", 2), ("Brian Kamau", 1), ("Carol Njeri", 0)]
    );
}

#[tokio::test]
async fn report_honours_explicit_week_end() {
    let (_, json) = admin_get(
        "/api/v1/admin/weekly-submission-report?weekStart=2026-02-09&weekEnd=2026-02-22",
    )
    .await;
    assert_eq!(json["weekEnd"], "2026-02-22T23:59:59");
    assert_eq!(json["allEmployeesWithTaskCounts"][0]["taskCount"], 2);
    assert_eq!(json["summary"]["submitted"], 2);
    assert_eq!(
        json["submittedUsers"][1],
        json!({
            "id": 3,
            "name": "Brian Kamau",
            "email": "brian@example.com",
            "engineerType": "Mechanical",
            "taskCount": 2,
        })
    );
}

#[tokio::test]
async fn report_rejects_bad_week_parameters() {
    let (status, json) =
        admin_get("/api/v1/admin/weekly-submission-report?weekStart=last-week").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["field"], "weekStart");

    let (status, json) = admin_get(
        "/api/v1/admin/weekly-submission-report?weekStart=2026-02-11&weekEnd=2026-02-08",
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["field"], "weekEnd");
}

#[tokio::test]
async fn report_rejects_out_of_range_and_duplicate_weeks() {
    let (status, json) =
        admin_get("/api/v1/admin/weekly-submission-report?weekStart=%2B262142-12-31").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["field"], "weekStart");

    let (status, json) =
        admin_get("/api/v1/admin/weekly-submission-report?weekEnd=9999-12-31T23:59:59").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["weekEnd"], "9999-12-31T23:59:59");

    let (status, json) = admin_get(
        "/api/v1/admin/weekly-submission-report?weekStart=2026-02-09&weekStart=2026-02-16",
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn report_for_a_quiet_week_has_nobody_submitted() {
    let (_, json) =
        admin_get("/api/v1/admin/weekly-submission-report?weekStart=2026-03-02").await;
    assert_eq!(json["summary"]["submitted"], 0);
    assert_eq!(json["summary"]["submissionRate"], 0.0);
    assert_eq!(json["notSubmittedUsers"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn available_weeks_are_most_recent_first() {
    let (status, json) = admin_get("/api/v1/admin/weekly-submission-report/weeks").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        json,
        json!([
            {
                "weekStart": "2026-02-16T00:00:00",
                "weekEnd": "2026-02-22T23:59:59",
                "label": "16 Feb 2026 - 22 Feb 2026",
            },
            {
                "weekStart": "2026-02-09T00:00:00",
                "weekEnd": "2026-02-15T23:59:59",
                "label": "9 Feb 2026 - 15 Feb 2026",
            },
        ])
    );
}

#[tokio::test]
async fn listed_weeks_can_be_requested_as_reports() {
    let app = build_test_app(seeded_store().await);
    let token = admin_token();

    let weeks = body_json(
        get(app.clone(), "/api/v1/admin/weekly-submission-report/weeks", Some(&token)).await,
    )
    .await;

    for week in weeks.as_array().unwrap() {
        let uri = format!(
            "/api/v1/admin/weekly-submission-report?weekStart={}&weekEnd={}",
            week["weekStart"].as_str().unwrap(),
            week["weekEnd"].as_str().unwrap(),
        );
        let response = get(app.clone(), &uri, Some(&token)).await;
        assert_eq!(response.status(), StatusCode::OK);
        let report = body_json(response).await;
        assert_eq!(report["weekStart"], week["weekStart"]);
        assert_eq!(report["weekEnd"], week["weekEnd"]);
        assert_eq!(report["label"], week["label"]);
    }

    let latest = &weeks[0];
    let uri = format!(
        "/api/v1/admin/weekly-submission-report?weekStart={}&weekEnd={}",
        latest["weekStart"].as_str().unwrap(),
        latest["weekEnd"].as_str().unwrap(),
    );
    let report = body_json(get(app, &uri, Some(&token)).await).await;
    assert_eq!(report["summary"]["submitted"], 1);
}
