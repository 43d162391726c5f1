//! Browser dashboard and JSON API over `weather-core`.
//!
//! Every request builds one [`weather_core::WeatherQuery`] from its query
//! string and runs it through the shared [`weather_core::WeatherService`].

pub mod errors;
pub mod page;
pub mod routes;
pub mod state;

use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(routes::dashboard::dashboard))
        .route("/api/weather", get(routes::api::get_weather))
        .route("/api/health", get(routes::health::health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
