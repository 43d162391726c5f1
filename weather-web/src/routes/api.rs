//! JSON lookup endpoint.
//!
//! - GET /api/weather?city=London&country=GB&units=celsius&forecast=on&days=5

use axum::Json;
use axum::extract::{Query, State};
use weather_core::WeatherReport;

use super::WeatherParams;
use crate::errors::AppError;
use crate::state::AppState;

pub async fn get_weather(
    State(state): State<AppState>,
    Query(params): Query<WeatherParams>,
) -> Result<Json<WeatherReport>, AppError> {
    let query = params.to_query(&state.defaults)?;
    let report = state.service.lookup(&query).await?;
    Ok(Json(report))
}
