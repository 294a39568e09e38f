//! Integration tests for the locker checkout/checkin flow.

use http::StatusCode;
use serde_json::json;

use toolrack_entity::locker::LockerStatus;
use toolrack_entity::tool::ToolStatus;

use crate::helpers::TestApp;

#[tokio::test]
async fn test_health() {
    let app = TestApp::new();
    let response = app.request("GET", "/api/health", None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["status"], "ok");
    assert_eq!(response.body["data"]["database"], "connected");
}

#[tokio::test]
async fn test_get_locker_with_normalized_code() {
    let app = TestApp::new();
    app.seed_locker_with_tools("LOKER-004", 2).await;

    // Any code variant that normalizes to 004 resolves the locker.
    let response = app.request("GET", "/api/lockers/4", None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["locker"]["code"], "LOKER-004");
    assert_eq!(response.body["data"]["tools"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_unknown_locker_is_404() {
    let app = TestApp::new();
    let response = app.request("GET", "/api/lockers/999", None).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["message"], "Locker tidak ditemukan.");
}

#[tokio::test]
async fn test_checkout_checkin_round_trip() {
    let app = TestApp::new();
    app.seed_tech("12345").await;
    let (locker, tools) = app.seed_locker_with_tools("LOKER-004", 2).await;

    let response = app
        .request(
            "POST",
            "/api/lockers/004/checkout",
            Some(json!({ "nik": "12345", "tool_ids": tools })),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    let checkout_id = response.body["data"]["session_id"].as_i64().unwrap();

    let held = app.backend.locker_by_id(locker.id).await.unwrap();
    assert_eq!(held.status, LockerStatus::InUse);
    assert_eq!(held.holder_nik.as_deref(), Some("12345"));

    let response = app
        .request(
            "POST",
            "/api/lockers/004/checkin",
            Some(json!({ "nik": "12345", "tool_ids": tools })),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.body["data"]["paired_checkout_id"].as_i64().unwrap(),
        checkout_id
    );

    let released = app.backend.locker_by_id(locker.id).await.unwrap();
    assert_eq!(released.status, LockerStatus::Available);
    assert!(released.holder_nik.is_none());
}

#[tokio::test]
async fn test_checkout_by_unregistered_nik_is_403() {
    let app = TestApp::new();
    let (_locker, tools) = app.seed_locker_with_tools("LOKER-004", 1).await;

    let response = app
        .request(
            "POST",
            "/api/lockers/004/checkout",
            Some(json!({ "nik": "99999", "tool_ids": tools })),
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.body["message"], "NIK tidak terdaftar.");
}

#[tokio::test]
async fn test_non_numeric_nik_is_400() {
    let app = TestApp::new();
    let (_locker, tools) = app.seed_locker_with_tools("LOKER-004", 1).await;

    let response = app
        .request(
            "POST",
            "/api/lockers/004/checkout",
            Some(json!({ "nik": "12a45", "tool_ids": tools })),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["message"], "NIK harus berupa angka.");
}

#[tokio::test]
async fn test_checkin_by_wrong_holder_is_409() {
    let app = TestApp::new();
    app.seed_tech("12345").await;
    app.seed_tech("67890").await;
    let (_locker, tools) = app.seed_locker_with_tools("LOKER-004", 1).await;

    app.request(
        "POST",
        "/api/lockers/004/checkout",
        Some(json!({ "nik": "12345", "tool_ids": tools })),
    )
    .await;

    let response = app
        .request(
            "POST",
            "/api/lockers/004/checkin",
            Some(json!({ "nik": "67890", "tool_ids": tools })),
        )
        .await;
    assert_eq!(response.status, StatusCode::CONFLICT);
    assert!(
        response.body["message"]
            .as_str()
            .unwrap()
            .contains("dipegang NIK 12345")
    );
}

#[tokio::test]
async fn test_checkin_without_open_checkout_is_409() {
    let app = TestApp::new();
    app.seed_tech("12345").await;
    let (_locker, tools) = app.seed_locker_with_tools("LOKER-004", 1).await;

    let response = app
        .request(
            "POST",
            "/api/lockers/004/checkin",
            Some(json!({ "nik": "12345", "tool_ids": tools })),
        )
        .await;
    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(
        response.body["message"],
        "Tidak ada checkout aktif untuk di-checkin."
    );
}

#[tokio::test]
async fn test_damaged_checkin_marks_tool_and_notes_event() {
    let app = TestApp::new();
    app.seed_tech("12345").await;
    let (locker, tools) = app.seed_locker_with_tools("LOKER-004", 2).await;

    app.request(
        "POST",
        "/api/lockers/004/checkout",
        Some(json!({ "nik": "12345", "tool_ids": tools })),
    )
    .await;

    let response = app
        .request(
            "POST",
            "/api/lockers/004/checkin",
            Some(json!({
                "nik": "12345",
                "tool_ids": tools,
                "damaged": [{ "tool_id": tools[0], "note": "retak" }],
            })),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["damaged_count"], 1);

    let broken = app.backend.tool_by_id(tools[0]).await.unwrap();
    assert_eq!(broken.status, ToolStatus::Damaged);
    let fine = app.backend.tool_by_id(tools[1]).await.unwrap();
    assert_eq!(fine.status, ToolStatus::Available);

    let events = app.backend.locker_events_for(locker.id).await;
    let note = events
        .iter()
        .find_map(|e| e.note.as_deref())
        .expect("checkin event carries a note");
    assert!(note.contains("DAMAGED(1)"));

    assert_eq!(app.backend.damage_reports_for(locker.id).await.len(), 1);
}

#[tokio::test]
async fn test_rollback_on_injected_ledger_failure() {
    let app = TestApp::new();
    app.seed_tech("12345").await;
    let (locker, tools) = app.seed_locker_with_tools("LOKER-004", 2).await;

    app.backend.set_fail_tool_events(true);
    let response = app
        .request(
            "POST",
            "/api/lockers/004/checkout",
            Some(json!({ "nik": "12345", "tool_ids": tools })),
        )
        .await;
    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    app.backend.set_fail_tool_events(false);

    // Locker, tools, and sessions are all back to the starting state.
    let restored = app.backend.locker_by_id(locker.id).await.unwrap();
    assert_eq!(restored.status, LockerStatus::Available);
    assert!(restored.holder_nik.is_none());
    for id in &tools {
        let tool = app.backend.tool_by_id(*id).await.unwrap();
        assert_eq!(tool.status, ToolStatus::Available);
    }
    assert_eq!(app.backend.session_count().await, 0);
    assert!(app.backend.locker_events_for(locker.id).await.is_empty());

    // And the flow works again afterwards.
    let retry = app
        .request(
            "POST",
            "/api/lockers/004/checkout",
            Some(json!({ "nik": "12345", "tool_ids": tools })),
        )
        .await;
    assert_eq!(retry.status, StatusCode::OK);
}

#[tokio::test]
async fn test_locker_history_is_paged_newest_first() {
    let app = TestApp::new();
    app.seed_tech("12345").await;
    let (_locker, tools) = app.seed_locker_with_tools("LOKER-004", 1).await;

    app.request(
        "POST",
        "/api/lockers/004/checkout",
        Some(json!({ "nik": "12345", "tool_ids": tools })),
    )
    .await;
    app.request(
        "POST",
        "/api/lockers/004/checkin",
        Some(json!({ "nik": "12345", "tool_ids": tools })),
    )
    .await;

    let response = app
        .request("GET", "/api/lockers/004/history?page=1&page_size=10", None)
        .await;
    assert_eq!(response.status, StatusCode::OK);
    let data = &response.body["data"];
    assert_eq!(data["total_items"], 2);
    let items = data["items"].as_array().unwrap();
    assert_eq!(items[0]["action"], "CHECKIN");
    assert_eq!(items[1]["action"], "CHECKOUT");
}

#[tokio::test]
async fn test_history_tolerates_degenerate_page_params() {
    let app = TestApp::new();
    app.seed_tech("12345").await;
    let (_locker, tools) = app.seed_locker_with_tools("LOKER-004", 1).await;

    app.request(
        "POST",
        "/api/lockers/004/checkout",
        Some(json!({ "nik": "12345", "tool_ids": tools })),
    )
    .await;

    // page_size=0 and page=0 come straight off the query string; both
    // are clamped instead of being trusted.
    let response = app
        .request("GET", "/api/lockers/004/history?page=0&page_size=0", None)
        .await;
    assert_eq!(response.status, StatusCode::OK);
    let data = &response.body["data"];
    assert_eq!(data["page"], 1);
    assert_eq!(data["page_size"], 1);
    assert_eq!(data["total_items"], 1);

    let oversized = app
        .request("GET", "/api/lockers/004/history?page_size=9999", None)
        .await;
    assert_eq!(oversized.status, StatusCode::OK);
    assert_eq!(oversized.body["data"]["page_size"], 100);
}

#[tokio::test]
async fn test_deactivate_guard_and_success() {
    let app = TestApp::new();
    app.seed_locker_with_tools("LOKER-004", 1).await;
    let (empty, _) = app.seed_locker_with_tools("LOKER-007", 0).await;

    let blocked = app
        .request("POST", "/api/admin/lockers/004/deactivate", None)
        .await;
    assert_eq!(blocked.status, StatusCode::CONFLICT);

    let ok = app
        .request("POST", "/api/admin/lockers/007/deactivate", None)
        .await;
    assert_eq!(ok.status, StatusCode::OK);
    assert!(!app.backend.locker_by_id(empty.id).await.unwrap().is_active);
}
