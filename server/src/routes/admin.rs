//! Admin maintenance routes.

use axum::Json;
use axum::extract::State;
use tracing::info;

use crate::state::AppState;

/// `POST /api/admin/cleanup-invitations`: run the expiry sweep now.
pub async fn cleanup_invitations(State(state): State<AppState>) -> Json<serde_json::Value> {
    let count = state.invitations.cleanup_expired();
    info!(count, total = state.invitations.len(), "manual invitation cleanup");
    Json(serde_json::json!({
        "success": true,
        "message": format!("Cleaned up {count} expired invitations"),
    }))
}
