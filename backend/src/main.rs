use great_circle_map::{AppState, config::ServerConfig, create_router};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "great_circle_map=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env()?;
    tracing::info!("max steps per request: {}", config.limits.max_steps);

    let app = create_router(AppState {
        limits: config.limits,
    });

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    tracing::info!("starting great-circle service on http://{}", config.addr);
    axum::serve(listener, app).await?;

    Ok(())
}
