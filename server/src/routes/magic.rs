//! Magic-link login.

use access::Role;
use axum::Json;
use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use tracing::{info, warn};

use super::invitation_error_response;
use crate::services::invitation::{InvitationError, MagicLogin};
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MagicUser {
    pub email: String,
    pub name: String,
    pub first_name: String,
    pub role: Role,
    pub project_id: Option<String>,
    /// Bearer credential for `GET /api/auth/user`.
    pub magic_token: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MagicLinkResponse {
    pub success: bool,
    pub user: MagicUser,
    pub redirect_to: &'static str,
}

impl From<MagicLogin> for MagicLinkResponse {
    fn from(login: MagicLogin) -> Self {
        let invitation = login.invitation;
        Self {
            success: true,
            user: MagicUser {
                first_name: invitation.first_name().to_owned(),
                email: invitation.email,
                name: invitation.name,
                role: invitation.role,
                project_id: invitation.project_id,
                magic_token: invitation.magic_token,
            },
            redirect_to: login.redirect_to,
        }
    }
}

/// `GET /api/magic/{token}`: consume a magic link.
///
/// Unknown tokens are 404 and expired tokens 410 so the client can tell the
/// user which one happened; a reused token is 409.
pub async fn consume(State(state): State<AppState>, Path(token): Path<String>) -> Response {
    match state.invitations.consume(&token) {
        Ok(login) => {
            info!(invitation_id = %login.invitation.id, role = %login.invitation.role, "magic link accepted");
            Json(MagicLinkResponse::from(login)).into_response()
        }
        Err(e) => {
            if e == InvitationError::Expired {
                info!("expired magic link presented");
            } else {
                warn!(error = %e, "magic link rejected");
            }
            invitation_error_response(e)
        }
    }
}
