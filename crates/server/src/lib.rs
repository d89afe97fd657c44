//! HTTP surface for Databank.
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET`  | `/api/chat` | Current quota usage |
//! | `POST` | `/api/chat` | Answer `{message}` grounded in the corpus |
//! | `GET`  | `/live` | Liveness probe |
//!
//! `POST /api/chat` checks, in order: quota (429), body (400), backend
//! configuration (500), then runs the pipeline. Only a successful answer is
//! charged against the quota.

use axum::{routing::get, Router};
use databank_core::AppConfig;
use routes::{chat, liveness::live};

pub mod error;
mod routes;
pub mod state;

pub use error::{ApiError, QUOTA_EXHAUSTED_NOTICE};
pub use routes::chat::ChatReply;
pub use state::ServerState;

/// Build the router over `state`.
pub fn router(state: ServerState) -> Router {
    Router::new()
        .route("/api/chat", get(chat::status).post(chat::answer))
        .route("/live", get(live))
        .with_state(state)
}

/// Serve until Ctrl-C.
pub async fn run_server(config: &AppConfig) -> anyhow::Result<()> {
    let state = ServerState::from_config(config)?;
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind).await?;
    tracing::info!(
        bind = %config.bind,
        daily_limit = config.daily_limit,
        "Databank server listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutting down");
        })
        .await?;

    Ok(())
}
