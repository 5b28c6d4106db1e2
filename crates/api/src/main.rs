use anyhow::Context;

use userbase_api::{app, config::ServerConfig, shutdown};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    userbase_observability::init();

    let config = ServerConfig::from_env().context("loading server configuration")?;
    let services = app::services::build_services(&config)?;
    let router = app::build_app(services, &config.cors);

    let listener = tokio::net::TcpListener::bind(config.socket_addr())
        .await
        .with_context(|| format!("failed to bind {}", config.socket_addr()))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown::wait_for_shutdown())
        .await
        .context("server error")?;

    tracing::info!("server stopped");
    Ok(())
}
