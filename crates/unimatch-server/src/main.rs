mod dto;
mod error;
mod handlers;
mod routes;
mod services;
mod state;

use std::sync::Arc;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;
use unimatch_config::Settings;

pub use state::ServerState;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .compact()
        .init();

    let settings = Settings::from_env()?;
    let state = Arc::new(ServerState::init(&settings)?);

    info!(
        "Knowledge base: {} majors, LLM scoring {}",
        state.kb.majors.len(),
        if state.llm_enabled() { "enabled" } else { "disabled" }
    );

    let app = routes::router(state);

    let addr = settings.bind_addr();
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
