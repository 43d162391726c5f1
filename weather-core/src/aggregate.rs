//! 3-hourly forecast slots into per-day summaries.
//!
//! The calendar date of a slot is taken in the forecast location's own UTC
//! offset (the provider's `city.timezone`), which [`crate::normalize`] bakes
//! into every [`ForecastEntry::timestamp`]. Grouping therefore follows the
//! local day at the place being forecast, independent of where the viewer is.

use crate::model::{DailySummary, DailyTemperature, ForecastEntry};

/// Reduce chronologically ordered `entries` into at most `days` summaries.
///
/// Consecutive entries sharing a date form one day. A trailing day with fewer
/// slots than usual is still emitted. The result has
/// `min(days, number of dates)` elements.
pub fn daily_summaries(entries: &[ForecastEntry], days: usize) -> Vec<DailySummary> {
    entries
        .chunk_by(|a, b| a.date() == b.date())
        .take(days)
        .map(summarize_day)
        .collect()
}

fn summarize_day(day: &[ForecastEntry]) -> DailySummary {
    let first = &day[0];
    let unit = first.unit;
    let n = day.len() as f64;

    let temps: Vec<f64> = day.iter().map(|e| e.unit.convert(e.temperature.temp, unit)).collect();
    let min = temps.iter().copied().fold(f64::INFINITY, f64::min);
    let max = temps.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let avg = temps.iter().sum::<f64>() / n;

    DailySummary {
        date: first.date(),
        temperature: DailyTemperature { min, max, avg },
        condition: day[(day.len() - 1) / 2].condition.clone(),
        humidity: day.iter().map(|e| f64::from(e.humidity)).sum::<f64>() / n,
        wind_speed: day.iter().map(|e| e.wind.speed).sum::<f64>() / n,
        precipitation_mm: day.iter().map(|e| e.precipitation_mm).sum(),
        samples: day.len(),
        unit,
    }
}
