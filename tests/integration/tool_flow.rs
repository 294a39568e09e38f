//! Integration tests for the per-tool (QR scan) endpoints.

use http::StatusCode;
use serde_json::json;

use crate::helpers::TestApp;

async fn seed_tool(app: &TestApp) -> i64 {
    let (locker, _) = app.seed_locker_with_tools("LOKER-001", 0).await;
    let tool = app.backend.seed_tool(locker.id, "Obeng", "tool-obeng").await;
    tool.id
}

#[tokio::test]
async fn test_get_tool_by_slug() {
    let app = TestApp::new();
    seed_tool(&app).await;

    let response = app.request("GET", "/api/tools/tool-obeng", None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["name"], "Obeng");
    assert_eq!(response.body["data"]["status"], "AVAILABLE");
}

#[tokio::test]
async fn test_action_round_trip() {
    let app = TestApp::new();
    seed_tool(&app).await;

    let out = app
        .request(
            "POST",
            "/api/tools/tool-obeng/action",
            Some(json!({ "action": "CHECKOUT", "nik": "12345" })),
        )
        .await;
    assert_eq!(out.status, StatusCode::OK);
    assert_eq!(out.body["data"]["status"], "IN_USE");
    assert_eq!(out.body["data"]["current_holder"], "12345");

    let back = app
        .request(
            "POST",
            "/api/tools/tool-obeng/action",
            Some(json!({ "action": "CHECKIN", "nik": "12345" })),
        )
        .await;
    assert_eq!(back.status, StatusCode::OK);
    assert_eq!(back.body["data"]["status"], "AVAILABLE");
    assert!(back.body["data"]["current_holder"].is_null());
}

#[tokio::test]
async fn test_damage_report_and_fix() {
    let app = TestApp::new();
    seed_tool(&app).await;

    let damaged = app
        .request(
            "POST",
            "/api/tools/tool-obeng/action",
            Some(json!({
                "action": "REPORT_DAMAGED",
                "nik": "12345",
                "note": "gagang patah",
            })),
        )
        .await;
    assert_eq!(damaged.status, StatusCode::OK);
    assert_eq!(damaged.body["data"]["status"], "DAMAGED");
    assert_eq!(damaged.body["data"]["last_event_note"], "gagang patah");

    // Checkout of a damaged tool is refused.
    let refused = app
        .request(
            "POST",
            "/api/tools/tool-obeng/action",
            Some(json!({ "action": "CHECKOUT", "nik": "67890" })),
        )
        .await;
    assert_eq!(refused.status, StatusCode::CONFLICT);
    assert_eq!(refused.body["message"], "Tool not available");

    let fixed = app
        .request(
            "POST",
            "/api/tools/tool-obeng/action",
            Some(json!({ "action": "MARK_FIXED", "nik": "67890" })),
        )
        .await;
    assert_eq!(fixed.status, StatusCode::OK);
    assert_eq!(fixed.body["data"]["status"], "AVAILABLE");
}

#[tokio::test]
async fn test_invalid_action_is_400() {
    let app = TestApp::new();
    seed_tool(&app).await;

    let response = app
        .request(
            "POST",
            "/api/tools/tool-obeng/action",
            Some(json!({ "action": "BORROW", "nik": "12345" })),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["message"], "Invalid action");
}

#[tokio::test]
async fn test_tool_history_lists_actions() {
    let app = TestApp::new();
    seed_tool(&app).await;

    for action in ["CHECKOUT", "CHECKIN"] {
        app.request(
            "POST",
            "/api/tools/tool-obeng/action",
            Some(json!({ "action": action, "nik": "12345" })),
        )
        .await;
    }

    let response = app
        .request("GET", "/api/tools/tool-obeng/history", None)
        .await;
    assert_eq!(response.status, StatusCode::OK);
    let data = &response.body["data"];
    assert_eq!(data["total_items"], 2);
    assert_eq!(data["items"][0]["event_type"], "CHECKIN");
}

#[tokio::test]
async fn test_unknown_tool_is_404() {
    let app = TestApp::new();
    let response = app.request("GET", "/api/tools/tool-none", None).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["message"], "Tool not found");
}
