use tracing_subscriber::{EnvFilter, fmt};

use fitness_tracker::shell::config::AppConfig;
use fitness_tracker::shell::http::router;
use fitness_tracker::shell::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    fmt()
        .with_env_filter(EnvFilter::try_new(&config.log_filter)?)
        .init();

    // In-memory repositories for now
    let app = router(AppState::in_memory());

    let addr = config.socket_addr();
    tracing::info!("HTTP endpoint: http://{}/v1", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
