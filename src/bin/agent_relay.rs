//! Gateway server binary.

use agent_relay::config::Settings;
use agent_relay::registry::TargetRegistry;
use agent_relay::server::{self, AppState};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("agent_relay=info")),
        )
        .init();

    let settings = Settings::load()?;
    let registry = TargetRegistry::initialize(&settings)?;
    let addr = settings.bind_addr();
    let app = server::router(AppState::new(settings, registry));

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(addr = %addr, "agent-relay listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("agent-relay stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        tracing::error!("failed to install ctrl-c handler");
    }
}
