use anyhow::Context;
use recipehub_core::AccessConfig;
use std::env;
use std::sync::Arc;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

fn init_telemetry() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_telemetry();

    let config = AccessConfig::from_env()?;
    if matches!(config, AccessConfig::Remote(_)) {
        anyhow::bail!("the server cannot use a remote store; set RECIPEHUB_BACKEND to local or memory");
    }
    let access = config.connect()?;

    let app = recipehub_server::app(Arc::from(access));

    let bind_addr = env::var("RECIPEHUB_BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
