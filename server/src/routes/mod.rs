//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! This module binds the invitation, magic-link, and bearer-identity
//! endpoints under a single Axum router. Every JSON body carries a
//! `success` flag; failures add an `error` message. Every other path falls
//! through to the client bundle, whose `index.html` answers client routes
//! such as the emailed `/magic/{token}` link.
//!
//! TRUST BOUNDARY
//! ==============
//! The team and admin endpoints take no credentials. The dashboard gates
//! them behind the `ManageTeam` and `CleanupInvitations` capabilities, but
//! the server does not. Deployments reachable from untrusted networks must
//! put an authenticating proxy in front of `/api/team` and `/api/admin`.
//! Only `/api/auth/user` checks a bearer magic token.

pub mod admin;
pub mod auth;
pub mod magic;
pub mod team;

use axum::Json;
use axum::Router;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use crate::services::invitation::InvitationError;
use crate::state::AppState;

/// Full HTTP surface.
pub fn app(state: AppState) -> Router {
    let client_dir = &state.config.client_dir;
    let client = ServeDir::new(client_dir).fallback(ServeFile::new(client_dir.join("index.html")));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/team/invite", post(team::invite))
        .route("/api/team/invitations", get(team::list_invitations))
        .route(
            "/api/team/invitations/{id}",
            get(team::get_invitation).delete(team::revoke_invitation),
        )
        .route("/api/team/invitations/{id}/resend", post(team::resend_invitation))
        .route("/api/magic/{token}", get(magic::consume))
        .route("/api/auth/user", get(auth::user))
        .route("/api/admin/cleanup-invitations", post(admin::cleanup_invitations))
        .route("/healthz", get(healthz))
        .fallback_service(client)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

pub(crate) fn invitation_error_to_status(err: &InvitationError) -> StatusCode {
    match err {
        InvitationError::InvalidEmail | InvitationError::InvalidName => StatusCode::BAD_REQUEST,
        InvitationError::NotFound => StatusCode::NOT_FOUND,
        InvitationError::Expired => StatusCode::GONE,
        InvitationError::AlreadyUsed => StatusCode::CONFLICT,
        InvitationError::NotActivated => StatusCode::UNAUTHORIZED,
    }
}

pub(crate) fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(serde_json::json!({ "success": false, "error": message }))).into_response()
}

pub(crate) fn invitation_error_response(err: InvitationError) -> Response {
    error_response(invitation_error_to_status(&err), &err.to_string())
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
