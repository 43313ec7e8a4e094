mod config;
mod routes;
mod services;
mod state;

use std::sync::Arc;

use services::mailer::{InvitationMailer, ResendMailer};

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt::init();

    let config = config::Config::from_env().expect("invalid configuration");
    let port = config.port;
    tracing::info!(ttl_hours = config.invitation_ttl.whole_hours(), "invitation ttl configured");

    // Initialize mailer (non-fatal: invitation emails disabled if config missing).
    let mailer: Option<Arc<dyn InvitationMailer>> = match &config.mailer {
        Some(mailer_config) => {
            tracing::info!(from = %mailer_config.from, "invitation mailer initialized");
            Some(Arc::new(ResendMailer::new(mailer_config)))
        }
        None => {
            tracing::warn!("RESEND_API_KEY/RESEND_FROM not set; invitation emails disabled");
            None
        }
    };

    if !config.client_dir.join("index.html").is_file() {
        tracing::warn!(dir = %config.client_dir.display(), "client bundle missing; run `trunk build` in client/");
    }

    let state = state::AppState::new(config, mailer);

    // Spawn background expiry sweep.
    let _sweeper = services::sweeper::spawn_sweeper_task(state.invitations.clone(), state.config.sweep_interval);

    let app = routes::app(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .expect("failed to bind");

    tracing::info!(%port, "propdash listening");
    axum::serve(listener, app).await.expect("server failed");
}
