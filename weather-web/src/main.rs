use std::net::SocketAddr;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use weather_core::{Config, WeatherService};
use weather_web::state::{AppState, Defaults};

const ADDR_ENV: &str = "WEATHER_WEB_ADDR";
const DEFAULT_ADDR: &str = "127.0.0.1:8501";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "weather_web=info,weather_core=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load()?;
    let service = WeatherService::from_config(&config, None)?;
    if service.is_sample() {
        tracing::warn!("no API key configured; serving sample data");
    }

    let state = AppState::new(service, Defaults::from(&config)).context("compiling page templates")?;
    let app = weather_web::router(state);

    let addr: SocketAddr = std::env::var(ADDR_ENV)
        .unwrap_or_else(|_| DEFAULT_ADDR.to_string())
        .parse()
        .with_context(|| format!("invalid ${ADDR_ENV}"))?;

    tracing::info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    axum::serve(listener, app).await?;

    Ok(())
}
