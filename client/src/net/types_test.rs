use super::*;

// =============================================================
// Helpers
// =============================================================

fn magic_body() -> serde_json::Value {
    serde_json::json!({
        "success": true,
        "user": {
            "email": "alice@example.com",
            "name": "Alice Carter",
            "firstName": "Alice",
            "role": "builder",
            "projectId": "proj-7",
            "magicToken": "tok"
        },
        "redirectTo": "/builder"
    })
}

// =============================================================
// MagicLinkResponse
// =============================================================

#[test]
fn magic_link_response_parses_server_body() {
    let resp: MagicLinkResponse = serde_json::from_value(magic_body()).unwrap();
    assert_eq!(resp.redirect_to, "/builder");
    assert_eq!(resp.user.role, Role::Builder);
    assert_eq!(resp.user.first_name, "Alice");
}

#[test]
fn magic_link_response_accepts_null_project() {
    let mut body = magic_body();
    body["user"]["projectId"] = serde_json::Value::Null;
    let resp: MagicLinkResponse = serde_json::from_value(body).unwrap();
    assert_eq!(resp.user.project_id, None);
}

#[test]
fn magic_link_response_rejects_unknown_role() {
    let mut body = magic_body();
    body["user"]["role"] = serde_json::json!("superuser");
    assert!(serde_json::from_value::<MagicLinkResponse>(body).is_err());
}

#[test]
fn into_session_carries_token_and_project() {
    let resp: MagicLinkResponse = serde_json::from_value(magic_body()).unwrap();
    let session = resp.into_session(42);
    assert_eq!(session.email, "alice@example.com");
    assert_eq!(session.role, Role::Builder);
    assert_eq!(session.login_time, 42);
    assert_eq!(session.project_id.as_deref(), Some("proj-7"));
    assert_eq!(session.magic_token.as_deref(), Some("tok"));
    assert_eq!(session.impersonated_by, None);
}

// =============================================================
// Team
// =============================================================

#[test]
fn invite_request_serializes_camel_case() {
    let req = InviteRequest {
        name: "Alice Carter".to_owned(),
        email: "alice@example.com".to_owned(),
        role: Role::Investor,
        project_id: None,
        created_by: "admin@example.com".to_owned(),
    };
    let value = serde_json::to_value(&req).unwrap();
    assert_eq!(value["role"], "investor");
    assert_eq!(value["createdBy"], "admin@example.com");
    assert!(value.get("projectId").is_none());
}

#[test]
fn current_user_response_parses() {
    let body = serde_json::json!({
        "success": true,
        "user": {
            "id": "7f1c1f8e-0000-4000-8000-000000000000",
            "email": "alice@example.com",
            "name": "Alice Carter",
            "firstName": "Alice",
            "role": "builder",
            "projectId": null,
            "lastLogin": "2026-03-01T09:00:00Z"
        }
    });
    let resp: CurrentUserResponse = serde_json::from_value(body).unwrap();
    assert_eq!(resp.user.role, Role::Builder);
    assert_eq!(resp.user.last_login.as_deref(), Some("2026-03-01T09:00:00Z"));
}

// =============================================================
// TeamMember
// =============================================================

#[test]
fn invitation_listing_parses_and_yields_actor() {
    let body = serde_json::json!({
        "success": true,
        "invitations": [{
            "id": "0b6c7c1e-8f5e-4a53-9c39-3c5f0f0b8d11",
            "name": "Alice Carter",
            "email": "alice@example.com",
            "role": "builder",
            "projectId": null,
            "createdBy": "admin@example.com",
            "createdAt": "2026-03-01T09:00:00Z",
            "tokenExpiry": "2026-03-04T09:00:00Z",
            "status": "active",
            "lastLogin": "2026-03-01T10:00:00Z"
        }]
    });
    let list: InvitationListResponse = serde_json::from_value(body).unwrap();
    let member = &list.invitations[0];
    assert_eq!(member.status, "active");
    assert_eq!(member.project_id, None);
    assert_eq!(
        member.as_actor(),
        Actor { email: "alice@example.com".to_owned(), name: "Alice Carter".to_owned(), role: Role::Builder }
    );
}
