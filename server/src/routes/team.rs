//! Team invitation routes: invite, list, resend, revoke.

use access::Role;
use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tracing::{info, warn};
use uuid::Uuid;

use super::{error_response, invitation_error_response};
use crate::services::invitation::{InvitationError, InvitationRecord, NewInvitation};
use crate::services::mailer::InvitationEmail;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InviteRequest {
    pub name: String,
    pub email: String,
    /// Parsed by hand so an unknown role is a 400 with a message, not an
    /// extractor rejection.
    pub role: String,
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub created_by: Option<String>,
}

/// Invitation as shown to the inviter, including the one-time link.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvitationSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub magic_link: String,
    #[serde(with = "time::serde::rfc3339")]
    pub expires_at: OffsetDateTime,
}

impl InvitationSummary {
    fn new(record: &InvitationRecord, magic_link: String) -> Self {
        Self {
            id: record.id,
            name: record.name.clone(),
            email: record.email.clone(),
            role: record.role,
            magic_link,
            expires_at: record.token_expiry,
        }
    }
}

/// `POST /api/team/invite`: create an invitation and return its magic link.
pub async fn invite(State(state): State<AppState>, body: Result<Json<InviteRequest>, JsonRejection>) -> Response {
    let body = match body {
        Ok(Json(body)) => body,
        Err(rejection) => return error_response(StatusCode::BAD_REQUEST, &rejection.body_text()),
    };
    let role = match body.role.trim().parse::<Role>() {
        Ok(role) => role,
        Err(e) => return error_response(StatusCode::BAD_REQUEST, &e.to_string()),
    };

    let record = match state.invitations.create(NewInvitation {
        name: body.name,
        email: body.email,
        role,
        project_id: body.project_id,
        created_by: body.created_by.unwrap_or_default(),
    }) {
        Ok(record) => record,
        Err(e) => return invitation_error_response(e),
    };

    info!(invitation_id = %record.id, role = %record.role, created_by = %record.created_by, "invitation created");
    let magic_link = state.config.magic_link(&record.magic_token);
    deliver(&state, &record, &magic_link).await;

    let summary = InvitationSummary::new(&record, magic_link);
    (StatusCode::CREATED, Json(serde_json::json!({ "success": true, "invitation": summary }))).into_response()
}

/// `GET /api/team/invitations`: every invitation, oldest first, without tokens.
pub async fn list_invitations(State(state): State<AppState>) -> Json<serde_json::Value> {
    let invitations = state.invitations.list();
    Json(serde_json::json!({ "success": true, "invitations": invitations }))
}

/// `GET /api/team/invitations/{id}`: one invitation, without its token.
pub async fn get_invitation(State(state): State<AppState>, id: Result<Path<Uuid>, PathRejection>) -> Response {
    let id = match id {
        Ok(Path(id)) => id,
        Err(rejection) => return bad_id(&rejection),
    };
    match state.invitations.get(id) {
        Some(record) => Json(serde_json::json!({ "success": true, "invitation": record })).into_response(),
        None => invitation_error_response(InvitationError::NotFound),
    }
}

/// `POST /api/team/invitations/{id}/resend`: issue a fresh link.
pub async fn resend_invitation(State(state): State<AppState>, id: Result<Path<Uuid>, PathRejection>) -> Response {
    let id = match id {
        Ok(Path(id)) => id,
        Err(rejection) => return bad_id(&rejection),
    };
    let record = match state.invitations.resend(id) {
        Ok(record) => record,
        Err(e) => return invitation_error_response(e),
    };

    info!(invitation_id = %record.id, "invitation resent");
    let magic_link = state.config.magic_link(&record.magic_token);
    deliver(&state, &record, &magic_link).await;

    let summary = InvitationSummary::new(&record, magic_link);
    Json(serde_json::json!({ "success": true, "invitation": summary })).into_response()
}

/// `DELETE /api/team/invitations/{id}`: remove an invitation.
pub async fn revoke_invitation(State(state): State<AppState>, id: Result<Path<Uuid>, PathRejection>) -> Response {
    let id = match id {
        Ok(Path(id)) => id,
        Err(rejection) => return bad_id(&rejection),
    };
    match state.invitations.revoke(id) {
        Ok(record) => {
            info!(invitation_id = %record.id, "invitation revoked");
            StatusCode::NO_CONTENT.into_response()
        }
        Err(e) => invitation_error_response(e),
    }
}

fn bad_id(rejection: &PathRejection) -> Response {
    error_response(StatusCode::BAD_REQUEST, &rejection.body_text())
}

/// Email the link when a mailer is configured. Failures are logged only.
async fn deliver(state: &AppState, record: &InvitationRecord, magic_link: &str) {
    let Some(mailer) = &state.mailer else {
        return;
    };
    let email = InvitationEmail {
        to: record.email.clone(),
        name: record.first_name().to_owned(),
        role: record.role,
        magic_link: magic_link.to_owned(),
        expires_at: record.token_expiry.format(&Rfc3339).unwrap_or_default(),
    };
    if let Err(e) = mailer.send_invitation(&email).await {
        warn!(error = %e, invitation_id = %record.id, "invitation email failed");
    }
}
