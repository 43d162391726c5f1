//! HTML dashboard.
//!
//! - GET /?city=London&country=GB&units=celsius&forecast=on&charts=on&days=5&submitted=1
//!
//! Lookup failures, bad form input included, are rendered inside the page
//! with status 200 so the form stays usable.

use axum::extract::{Query, State};
use axum::response::Html;

use super::WeatherParams;
use crate::errors::AppError;
use crate::page::FormValues;
use crate::state::AppState;

pub async fn dashboard(
    State(state): State<AppState>,
    Query(params): Query<WeatherParams>,
) -> Result<Html<String>, AppError> {
    let defaults = &state.defaults;

    let form = FormValues {
        city: params.city(defaults).to_string(),
        country: params.country.clone().unwrap_or_default(),
        unit: params.unit(defaults).unwrap_or(defaults.unit),
        show_forecast: params.show_forecast().unwrap_or(true),
        show_charts: params.show_charts().unwrap_or(true),
        days: params.days(defaults).unwrap_or(defaults.days),
    };

    let outcome = match params.to_query(defaults) {
        Ok(query) => state.service.lookup(&query).await,
        Err(e) => Err(e),
    };
    if let Err(err) = &outcome {
        tracing::info!(kind = err.kind(), city = %form.city, "dashboard lookup failed: {err}");
    }

    let html = state.pages.dashboard(&form, &outcome, state.service.is_sample())?;
    Ok(Html(html))
}
