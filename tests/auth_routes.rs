//! Device flow, admin and forwarding routes of the auth mock.

use std::time::Duration;

use axum::http::StatusCode;
use serde_json::json;

mod helpers;

use helpers::{auth_app, get, get_json, post_form, post_json};

const DEVICE_GRANT: &str = "urn:ietf:params:oauth:grant-type:device_code";

#[tokio::test]
async fn device_login_derives_user_code_from_device_code() {
    let (app, _) = auth_app();
    let (status, body) = post_json(&app, "/device-login", json!({})).await;

    assert_eq!(status, StatusCode::OK);

    let device_code = body["device_code"].as_str().unwrap();
    assert!(device_code.starts_with("device_"));
    assert_eq!(body["user_code"], format!("USER-{}", &device_code[7..13]));
    assert_eq!(body["verification_uri"], "http://localhost:3000/verify");
    assert_eq!(body["expires_in"], 1800);
    assert_eq!(body["interval"], 5);
}

#[tokio::test]
async fn token_is_pending_until_third_poll() {
    let (app, _) = auth_app();
    let req = json!({ "grant_type": DEVICE_GRANT, "device_code": "device_42" });

    for _ in 0..2 {
        let (status, body) = post_json(&app, "/token", req.clone()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "authorization_pending");
        assert!(body["error_description"].is_string());
    }

    let (status, body) = post_json(&app, "/token", req.clone()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "access_token": "mock-access-token-device_42",
            "token_type": "bearer",
            "expires_in": 3600,
            "refresh_token": "mock-refresh-token-device_42",
            "scope": "read write"
        })
    );

    let (status, _) = post_json(&app, "/token", req).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn unsupported_grant_is_rejected_without_counting() {
    let (app, state) = auth_app();
    let (status, body) = post_json(&app, "/token", json!({ "grant_type": "password" })).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "unsupported_grant_type");
    assert_eq!(state.polls.current(), 0);
}

#[tokio::test]
async fn unparseable_token_body_is_an_unsupported_grant() {
    let (app, _) = auth_app();
    let (status, body) = post_form(&app, "/token", "%%%").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["error"], "unsupported_grant_type");
}

#[tokio::test]
async fn token_accepts_form_encoded_bodies() {
    let (app, state) = auth_app();
    state.polls.force_authorize();

    let form = "grant_type=urn%3Aietf%3Aparams%3Aoauth%3Agrant-type%3Adevice_code&device_code=device_9";
    let (status, body) = post_form(&app, "/token", form).await;

    assert_eq!(status, StatusCode::OK);
    let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["access_token"], "mock-access-token-device_9");
}

#[tokio::test]
async fn verify_page_shows_code() {
    let (app, _) = auth_app();

    let (status, body) = get(&app, "/verify?code=USER-171456").await;
    assert_eq!(status, StatusCode::OK);
    assert!(String::from_utf8_lossy(&body).contains("USER-171456"));

    let (_, body) = get(&app, "/verify").await;
    assert!(String::from_utf8_lossy(&body).contains("unknown"));
}

#[tokio::test]
async fn authorize_button_skips_remaining_polls() {
    let (app, _) = auth_app();

    let (status, body) = post_form(&app, "/verify/authorize", "code=USER-1").await;
    assert_eq!(status, StatusCode::OK);
    assert!(String::from_utf8_lossy(&body).contains("USER-1"));

    let (status, body) = post_json(&app, "/token", json!({ "grant_type": DEVICE_GRANT })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["access_token"], "mock-access-token-default");
}

#[tokio::test]
async fn send_notification_without_clients_reaches_nobody() {
    let (app, state) = auth_app();
    let (status, body) = post_json(
        &app,
        "/admin/send-notification",
        json!({ "type": "refund", "data": { "amount": 42 } }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["sent_to"], 0);
    assert_eq!(body["notification"]["type"], "refund");
    assert_eq!(body["notification"]["data"]["amount"], 42);
    assert_eq!(body["notification"]["data"]["currency"], "BRL");
    assert!(body["notification"]["id"].as_str().unwrap().starts_with("notif_"));

    assert_eq!(state.stats.snapshot("").notifications_sent, 0);
}

#[tokio::test]
async fn send_notification_defaults_type_to_payment() {
    let (app, _) = auth_app();
    let (_, body) = post_json(&app, "/admin/send-notification", json!({})).await;

    assert_eq!(body["notification"]["type"], "payment");
    assert_eq!(body["notification"]["data"]["status"], "approved");
}

#[tokio::test]
async fn cli_forward_answers_even_when_receiver_is_down() {
    let (app, _) = auth_app();
    let notification = json!({ "id": "notif_1", "type": "payment" });

    let (status, body) = tokio::time::timeout(
        Duration::from_secs(2),
        post_json(&app, "/cli-forward", notification.clone()),
    )
    .await
    .expect("cli-forward should answer without waiting on the receiver");

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["notification"], notification);
    assert_eq!(
        body["message"],
        format!("Notification forwarded to {}", helpers::UNREACHABLE_RECEIVER)
    );
}

#[tokio::test]
async fn stats_reflect_forwards() {
    let (app, _) = auth_app();
    post_json(&app, "/cli-forward", json!({ "id": "a" })).await;
    post_json(&app, "/cli-forward", json!({ "id": "b" })).await;

    let (status, body) = get_json(&app, "/admin/stats").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["forwarded_requests"], 2);
    assert_eq!(body["notifications_sent"], 0);
    assert_eq!(body["ws_connections"], 0);
    assert_eq!(body["receiver_url"], helpers::UNREACHABLE_RECEIVER);
    assert!(body["uptime_seconds"].is_u64());
    assert!(body["started_at"].as_str().unwrap().ends_with('Z'));
}

#[tokio::test]
async fn instances_do_not_share_poll_counters() {
    let (first, _) = auth_app();
    let (second, _) = auth_app();
    let req = json!({ "grant_type": DEVICE_GRANT });

    for _ in 0..3 {
        post_json(&first, "/token", req.clone()).await;
    }

    let (_, body) = post_json(&second, "/token", req).await;
    assert_eq!(body["error"], "authorization_pending");
}

#[tokio::test]
async fn unknown_route_is_not_found() {
    let (app, _) = auth_app();
    let (status, _) = get(&app, "/nope").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}
