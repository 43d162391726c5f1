//! Render-boundary helpers shared by the shells. Rounding happens here and
//! nowhere else.

use chrono::{DateTime, FixedOffset, NaiveDate};

use crate::units::TemperatureUnit;

pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// `20.5°C`, `68.9°F`, `293.6K`
pub fn format_temperature(value: f64, unit: TemperatureUnit) -> String {
    format!("{:.1}{}", round1(value), unit.symbol())
}

/// `06:30` in the location's own offset.
pub fn format_time(t: &DateTime<FixedOffset>) -> String {
    t.format("%H:%M").to_string()
}

pub fn format_timestamp(t: &DateTime<FixedOffset>) -> String {
    t.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// `Mon, Jul 08`
pub fn format_day(date: &NaiveDate) -> String {
    date.format("%a, %b %d").to_string()
}

/// 16-point compass name for a meteorological bearing.
pub fn compass(degrees: f64) -> &'static str {
    const POINTS: [&str; 16] = [
        "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W", "WNW", "NW",
        "NNW",
    ];
    let normalized = degrees.rem_euclid(360.0);
    let idx = ((normalized / 22.5).round() as usize) % POINTS.len();
    POINTS[idx]
}

/// One-line bar chart of `values`, resampled to `width` cells.
pub fn sparkline(values: &[f64], width: usize) -> String {
    const BARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];
    if values.is_empty() || width == 0 {
        return String::new();
    }
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let span = (max - min).max(0.001);
    (0..width)
        .map(|idx| {
            let src = (idx * values.len() / width).min(values.len() - 1);
            let norm = ((values[src] - min) / span).clamp(0.0, 1.0);
            BARS[(norm * (BARS.len() - 1) as f64).round() as usize]
        })
        .collect()
}
