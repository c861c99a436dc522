use kana2chat::server::build_router;
use kana2chat::util::{init_tracing, AppState, ServiceConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = ServiceConfig::from_env();
    tracing::info!("Allowed CORS origin: {}", config.allowed_origin);
    tracing::info!("Reading dictionary source: {}", config.dict_url);
    tracing::info!(
        "Stream pacing: {} ms per character",
        config.stream_delay.as_millis()
    );

    // The engine loads lazily on the first request that needs it.
    let state = AppState::from_config(&config)?;
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Kana2Chat listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Kana2Chat stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to install Ctrl-C handler: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
