use std::net::SocketAddr;

use {
    axum::{
        Json, Router,
        extract::State,
        response::IntoResponse,
        routing::{get, post},
    },
    findmy_skill::SkillHandler,
    tracing::info,
};

use crate::skill_routes::skill_turn_handler;

/// Shared state for every route.
#[derive(Clone)]
pub struct AppState {
    pub skill: SkillHandler,
    pub version: &'static str,
}

/// Build the router: `POST /skill` for turns, `GET /health` for probes.
pub fn build_gateway_app(skill: SkillHandler) -> Router {
    let state = AppState {
        skill,
        version: env!("CARGO_PKG_VERSION"),
    };
    Router::new()
        .route("/health", get(health_handler))
        .route("/skill", post(skill_turn_handler))
        .with_state(state)
}

/// Serve the skill until Ctrl-C.
pub async fn start_gateway(bind: &str, port: u16, skill: SkillHandler) -> anyhow::Result<()> {
    let addr: SocketAddr = format!("{bind}:{port}")
        .parse()
        .map_err(|e| anyhow::anyhow!("invalid bind address {bind}:{port}: {e}"))?;
    let app = build_gateway_app(skill);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, "skill gateway listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutdown requested");
        })
        .await?;
    Ok(())
}

async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": state.version,
    }))
}
