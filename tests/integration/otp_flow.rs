//! Integration tests for admin OTP login.

use http::StatusCode;
use serde_json::json;

use crate::helpers::TestApp;

fn extract_code(text: &str) -> String {
    text.chars().filter(|c| c.is_ascii_digit()).take(6).collect()
}

#[tokio::test]
async fn test_request_and_verify_code() {
    let app = TestApp::new();
    app.seed_admin("77777", 4242).await;

    let requested = app
        .request("POST", "/api/otp/request", Some(json!({ "nik": "77777" })))
        .await;
    assert_eq!(requested.status, StatusCode::OK);

    let sent = app.messenger.sent.lock().await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].0, 4242);
    let code = extract_code(&sent[0].1);
    drop(sent);

    let verified = app
        .request(
            "POST",
            "/api/otp/verify",
            Some(json!({ "nik": "77777", "code": code })),
        )
        .await;
    assert_eq!(verified.status, StatusCode::OK);
    assert_eq!(verified.body["data"]["nik"], "77777");
    assert_eq!(verified.body["data"]["role"], "ADMIN");

    // Codes are single-use.
    let replayed = app
        .request(
            "POST",
            "/api/otp/verify",
            Some(json!({ "nik": "77777", "code": code })),
        )
        .await;
    assert_eq!(replayed.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_technician_cannot_request_code() {
    let app = TestApp::new();
    app.seed_tech("12345").await;

    let response = app
        .request("POST", "/api/otp/request", Some(json!({ "nik": "12345" })))
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.body["message"], "NIK bukan admin.");
}

#[tokio::test]
async fn test_wrong_code_is_rejected() {
    let app = TestApp::new();
    app.seed_admin("77777", 4242).await;
    app.request("POST", "/api/otp/request", Some(json!({ "nik": "77777" })))
        .await;

    let sent = app.messenger.sent.lock().await;
    let code = extract_code(&sent[0].1);
    drop(sent);
    let wrong = if code == "000000" { "000001" } else { "000000" };

    let response = app
        .request(
            "POST",
            "/api/otp/verify",
            Some(json!({ "nik": "77777", "code": wrong })),
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.body["message"], "Kode OTP salah atau kedaluwarsa.");
}
