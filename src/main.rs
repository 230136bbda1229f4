use tracing_subscriber::EnvFilter;

use nl_search::api;
use nl_search::config::Config;
use nl_search::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env();
    match config.pipeline.base_url.as_deref() {
        Some(url) => tracing::info!("Primary backend: {url} ({}ms bound)", config.pipeline.timeout_ms),
        None => tracing::info!("Primary backend not configured, secondary only"),
    }
    tracing::info!("Secondary backend: {} ({})", config.llm.chat_model, config.llm.base_url);

    let state = AppState::new(config.clone())?;
    let app = api::router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;
    Ok(())
}
