use anyhow::Result;
use greet_rpc::config::ServerConfig;
use greet_rpc::grpc;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let config = ServerConfig::from_env()?;
    info!(
        address = %config.addr,
        stream_interval_ms = config.stream_interval.as_millis() as u64,
        session_timeout = ?config.session_timeout,
        "Greet server configured"
    );

    grpc::start_server(config, shutdown_signal()).await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
    info!("Shutdown requested");
}
