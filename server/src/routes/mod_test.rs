use std::sync::Arc;

use axum::body::Body;
use axum::http::Request;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use super::*;
use crate::state::test_helpers::{self, RecordingMailer};

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
    (status, body)
}

async fn send_text(app: &Router, req: Request<Body>) -> (StatusCode, String) {
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn with_bearer(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap()
}

fn alice_invite() -> Value {
    json!({
        "name": "Alice Carter",
        "email": "alice@example.com",
        "role": "builder",
        "projectId": "proj-7",
        "createdBy": "admin@example.com"
    })
}

/// Invite through the API and return the magic token from the link.
async fn invite(app: &Router, body: &Value) -> String {
    let (status, json) = send(app, post_json("/api/team/invite", body)).await;
    assert_eq!(status, StatusCode::CREATED, "invite failed: {json}");
    let link = json["invitation"]["magicLink"].as_str().unwrap();
    link.rsplit('/').next().unwrap().to_owned()
}

// =============================================================================
// status mapping
// =============================================================================

#[test]
fn invitation_errors_map_to_distinct_statuses() {
    assert_eq!(invitation_error_to_status(&InvitationError::InvalidEmail), StatusCode::BAD_REQUEST);
    assert_eq!(invitation_error_to_status(&InvitationError::InvalidName), StatusCode::BAD_REQUEST);
    assert_eq!(invitation_error_to_status(&InvitationError::NotFound), StatusCode::NOT_FOUND);
    assert_eq!(invitation_error_to_status(&InvitationError::Expired), StatusCode::GONE);
    assert_eq!(invitation_error_to_status(&InvitationError::AlreadyUsed), StatusCode::CONFLICT);
    assert_eq!(invitation_error_to_status(&InvitationError::NotActivated), StatusCode::UNAUTHORIZED);
}

// =============================================================================
// invite
// =============================================================================

#[tokio::test]
async fn invite_returns_link_under_public_base_url() {
    let app = app(test_helpers::test_app_state());
    let (status, json) = send(&app, post_json("/api/team/invite", &alice_invite())).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["success"], true);
    let invitation = &json["invitation"];
    assert_eq!(invitation["name"], "Alice Carter");
    assert_eq!(invitation["email"], "alice@example.com");
    assert_eq!(invitation["role"], "builder");
    assert!(invitation["id"].is_string());
    assert!(invitation["expiresAt"].is_string());
    assert!(
        invitation["magicLink"]
            .as_str()
            .unwrap()
            .starts_with("https://dash.test/magic/")
    );
}

#[tokio::test]
async fn invite_rejects_unknown_role() {
    let app = app(test_helpers::test_app_state());
    let mut body = alice_invite();
    body["role"] = json!("superintendent");
    let (status, json) = send(&app, post_json("/api/team/invite", &body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], false);
    assert!(json["error"].as_str().unwrap().contains("superintendent"));
}

#[tokio::test]
async fn invite_rejects_invalid_email() {
    let state = test_helpers::test_app_state();
    let app = app(state.clone());
    let mut body = alice_invite();
    body["email"] = json!("alice-at-example");
    let (status, json) = send(&app, post_json("/api/team/invite", &body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "invalid email");
    assert!(state.invitations.is_empty());
}

#[tokio::test]
async fn invite_with_missing_field_is_json_400() {
    let state = test_helpers::test_app_state();
    let app = app(state.clone());
    let body = json!({ "email": "a@b.c", "role": "builder" });
    let (status, json) = send(&app, post_json("/api/team/invite", &body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], false);
    assert!(json["error"].as_str().unwrap().contains("name"));
    assert!(state.invitations.is_empty());
}

#[tokio::test]
async fn invite_with_non_json_body_is_json_400() {
    let app = app(test_helpers::test_app_state());
    let req = Request::builder()
        .method("POST")
        .uri("/api/team/invite")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, json) = send(&app, req).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], false);
    assert!(json["error"].is_string());
}

#[tokio::test]
async fn invite_emails_link_when_mailer_configured() {
    let mailer = Arc::new(RecordingMailer::default());
    let app = app(test_helpers::test_app_state_with_mailer(mailer.clone()));
    let token = invite(&app, &alice_invite()).await;

    let sent = mailer.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "alice@example.com");
    assert_eq!(sent[0].name, "Alice");
    assert_eq!(sent[0].magic_link, format!("https://dash.test/magic/{token}"));
}

#[tokio::test]
async fn invite_succeeds_when_email_delivery_fails() {
    let mailer = Arc::new(RecordingMailer { fail: true, ..RecordingMailer::default() });
    let app = app(test_helpers::test_app_state_with_mailer(mailer.clone()));
    let (status, _) = send(&app, post_json("/api/team/invite", &alice_invite())).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(mailer.sent.lock().unwrap().len(), 1);
}

// =============================================================================
// magic link
// =============================================================================

#[tokio::test]
async fn magic_link_scenario_builder_then_expired() {
    let state = test_helpers::test_app_state();
    let app = app(state.clone());
    let token = invite(&app, &alice_invite()).await;

    let (status, json) = send(&app, get(&format!("/api/magic/{token}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);
    assert_eq!(json["redirectTo"], "/builder");
    assert_eq!(json["user"]["email"], "alice@example.com");
    assert_eq!(json["user"]["firstName"], "Alice");
    assert_eq!(json["user"]["role"], "builder");
    assert_eq!(json["user"]["projectId"], "proj-7");
    assert_eq!(json["user"]["magicToken"], token.as_str());

    let past_expiry = time::OffsetDateTime::now_utc() + state.config.invitation_ttl + time::Duration::hours(1);
    state.invitations.cleanup_expired_at(past_expiry);

    let (status, json) = send(&app, get(&format!("/api/magic/{token}"))).await;
    assert_eq!(status, StatusCode::GONE);
    assert_eq!(json["success"], false);
}

#[tokio::test]
async fn magic_link_unknown_token_is_404() {
    let app = app(test_helpers::test_app_state());
    let (status, json) = send(&app, get("/api/magic/deadbeef")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "invitation not found");
}

#[tokio::test]
async fn magic_link_reuse_is_409() {
    let app = app(test_helpers::test_app_state());
    let token = invite(&app, &alice_invite()).await;
    let uri = format!("/api/magic/{token}");

    assert_eq!(send(&app, get(&uri)).await.0, StatusCode::OK);
    assert_eq!(send(&app, get(&uri)).await.0, StatusCode::CONFLICT);
}

// =============================================================================
// bearer identity
// =============================================================================

#[tokio::test]
async fn auth_user_requires_bearer_header() {
    let app = app(test_helpers::test_app_state());
    let (status, json) = send(&app, get("/api/auth/user")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["error"], "missing bearer token");
}

#[tokio::test]
async fn auth_user_rejects_unknown_and_unaccepted_tokens() {
    let app = app(test_helpers::test_app_state());
    let token = invite(&app, &alice_invite()).await;

    assert_eq!(send(&app, with_bearer("/api/auth/user", "nope")).await.0, StatusCode::UNAUTHORIZED);
    assert_eq!(send(&app, with_bearer("/api/auth/user", &token)).await.0, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn auth_user_returns_identity_after_magic_login() {
    let app = app(test_helpers::test_app_state());
    let token = invite(&app, &alice_invite()).await;
    send(&app, get(&format!("/api/magic/{token}"))).await;

    let (status, json) = send(&app, with_bearer("/api/auth/user", &token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["user"]["email"], "alice@example.com");
    assert_eq!(json["user"]["role"], "builder");
    assert!(json["user"]["lastLogin"].is_string());
}

// =============================================================================
// team management
// =============================================================================

#[tokio::test]
async fn list_invitations_hides_tokens() {
    let app = app(test_helpers::test_app_state());
    invite(&app, &alice_invite()).await;

    let (status, json) = send(&app, get("/api/team/invitations")).await;
    assert_eq!(status, StatusCode::OK);
    let list = json["invitations"].as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["status"], "pending");
    assert!(list[0].get("magicToken").is_none());
}

#[tokio::test]
async fn get_invitation_by_id() {
    let state = test_helpers::test_app_state();
    let app = app(state.clone());
    invite(&app, &alice_invite()).await;
    let id = state.invitations.list()[0].id;

    let (status, json) = send(&app, get(&format!("/api/team/invitations/{id}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["invitation"]["email"], "alice@example.com");
    assert!(json["invitation"].get("magicToken").is_none());

    let missing = uuid::Uuid::new_v4();
    let (status, _) = send(&app, get(&format!("/api/team/invitations/{missing}"))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn malformed_invitation_id_is_json_400() {
    let app = app(test_helpers::test_app_state());

    let (status, json) = send(&app, get("/api/team/invitations/not-a-uuid")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], false);

    let resend = post_json("/api/team/invitations/not-a-uuid/resend", &json!({}));
    assert_eq!(send(&app, resend).await.0, StatusCode::BAD_REQUEST);

    let delete = Request::builder()
        .method("DELETE")
        .uri("/api/team/invitations/not-a-uuid")
        .body(Body::empty())
        .unwrap();
    let (status, json) = send(&app, delete).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], false);
}

#[tokio::test]
async fn resend_invalidates_old_link() {
    let state = test_helpers::test_app_state();
    let app = app(state.clone());
    let old_token = invite(&app, &alice_invite()).await;
    let id = state.invitations.list()[0].id;

    let (status, json) = send(&app, post_json(&format!("/api/team/invitations/{id}/resend"), &json!({}))).await;
    assert_eq!(status, StatusCode::OK);
    let new_link = json["invitation"]["magicLink"].as_str().unwrap();
    assert!(!new_link.ends_with(&old_token));

    assert_eq!(send(&app, get(&format!("/api/magic/{old_token}"))).await.0, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn revoke_then_revoke_again() {
    let state = test_helpers::test_app_state();
    let app = app(state.clone());
    invite(&app, &alice_invite()).await;
    let id = state.invitations.list()[0].id;

    let delete = |id: uuid::Uuid| {
        Request::builder()
            .method("DELETE")
            .uri(format!("/api/team/invitations/{id}"))
            .body(Body::empty())
            .unwrap()
    };
    assert_eq!(send(&app, delete(id)).await.0, StatusCode::NO_CONTENT);
    assert_eq!(send(&app, delete(id)).await.0, StatusCode::NOT_FOUND);
}

// =============================================================================
// admin + health
// =============================================================================

#[tokio::test]
async fn cleanup_reports_swept_count() {
    let state = test_helpers::test_app_state();
    let app = app(state.clone());
    state
        .invitations
        .create_at(
            crate::services::invitation::NewInvitation {
                name: "Old".to_owned(),
                email: "old@example.com".to_owned(),
                role: access::Role::Client,
                project_id: None,
                created_by: String::new(),
            },
            time::OffsetDateTime::now_utc() - time::Duration::days(30),
        )
        .unwrap();

    let (status, json) = send(&app, post_json("/api/admin/cleanup-invitations", &json!({}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);
    assert_eq!(json["message"], "Cleaned up 1 expired invitations");
}

#[tokio::test]
async fn team_and_admin_routes_take_no_credentials() {
    let app = app(test_helpers::test_app_state());
    assert_eq!(send(&app, get("/api/team/invitations")).await.0, StatusCode::OK);
    let cleanup = post_json("/api/admin/cleanup-invitations", &json!({}));
    assert_eq!(send(&app, cleanup).await.0, StatusCode::OK);
    assert_eq!(send(&app, get("/api/auth/user")).await.0, StatusCode::UNAUTHORIZED);
}

// =============================================================================
// client bundle
// =============================================================================

const INDEX_HTML: &str = "<!doctype html><title>propdash</title><body></body>";

#[tokio::test]
async fn emailed_magic_link_is_served_by_client_bundle() {
    let app = app(test_helpers::test_app_state_with_client(INDEX_HTML));
    let (_, json) = send(&app, post_json("/api/team/invite", &alice_invite())).await;
    let link = json["invitation"]["magicLink"].as_str().unwrap();
    let path = link.strip_prefix("https://dash.test").unwrap();

    let (status, body) = send_text(&app, get(path)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, INDEX_HTML);
}

#[tokio::test]
async fn api_routes_win_over_client_bundle() {
    let app = app(test_helpers::test_app_state_with_client(INDEX_HTML));
    let (status, json) = send(&app, get("/api/magic/deadbeef")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["success"], false);
}

#[tokio::test]
async fn healthz_is_ok() {
    let app = app(test_helpers::test_app_state());
    assert_eq!(send(&app, get("/healthz")).await.0, StatusCode::OK);
}
