//! Dashboard page: view models built from a lookup outcome, rendered with Tera.
//!
//! All text reaches the page through the template, which autoescapes `.html`.

use std::sync::Arc;

use serde::Serialize;
use tera::{Context, Tera};
use weather_core::{
    CurrentConditions, DailySummary, ForecastEntry, IconSize, TemperatureUnit, WeatherError,
    WeatherReport,
    display::{compass, format_day, format_temperature, format_time, format_timestamp, round1},
    icon_url,
};

const DASHBOARD: &str = "dashboard.html";
const DASHBOARD_TEMPLATE: &str = include_str!("../templates/dashboard.html");

/// Current form field values, echoed back into the sidebar.
#[derive(Debug, Clone, Serialize)]
pub struct FormValues {
    pub city: String,
    pub country: String,
    pub unit: TemperatureUnit,
    pub show_forecast: bool,
    pub show_charts: bool,
    pub days: usize,
}

#[derive(Debug, Serialize)]
struct UnitOption {
    value: &'static str,
    label: String,
    selected: bool,
}

#[derive(Debug, Serialize)]
struct Metric {
    label: &'static str,
    value: String,
}

#[derive(Debug, Serialize)]
struct CurrentView {
    place: String,
    icon: String,
    main: String,
    temperature: String,
    description: String,
    feels_like: String,
    metrics: Vec<Metric>,
}

#[derive(Debug, Serialize)]
struct DayView {
    day: String,
    icon: String,
    max: String,
    min: String,
    description: String,
    humidity: String,
    wind: String,
    precipitation: String,
}

/// Geometry of one SVG line chart; the markup lives in the template.
#[derive(Debug, Clone, Serialize)]
pub struct LineChart {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
    /// y of the x-axis labels
    pub baseline: f64,
    /// `x,y` pairs for `<polyline points>`; empty when there is no data.
    pub points: String,
    pub y_min: f64,
    pub y_max: f64,
    pub x_first: String,
    pub x_last: String,
}

/// Compiled page templates, shared by every request.
#[derive(Clone)]
pub struct Pages {
    tera: Arc<Tera>,
}

impl std::fmt::Debug for Pages {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pages").finish_non_exhaustive()
    }
}

impl Pages {
    pub fn new() -> Result<Self, tera::Error> {
        let mut tera = Tera::default();
        tera.autoescape_on(vec![".html"]);
        tera.add_raw_template(DASHBOARD, DASHBOARD_TEMPLATE)?;

        Ok(Self { tera: Arc::new(tera) })
    }

    pub fn dashboard(
        &self,
        form: &FormValues,
        outcome: &Result<WeatherReport, WeatherError>,
        sample_mode: bool,
    ) -> Result<String, tera::Error> {
        let (current, daily, charts, error) = match outcome {
            Ok(report) => {
                let daily: Vec<DayView> = if form.show_forecast {
                    report.daily.iter().map(day_view).collect()
                } else {
                    Vec::new()
                };
                let charts = match &report.forecast {
                    Some(forecast) if form.show_charts => chart_set(&forecast.entries, report.unit),
                    _ => Vec::new(),
                };
                (Some(current_view(&report.current)), daily, charts, None)
            }
            Err(err) => (None, Vec::new(), Vec::new(), Some(err.to_string())),
        };

        let mut ctx = Context::new();
        ctx.insert("form", form);
        ctx.insert("units", &unit_options(form.unit));
        ctx.insert("sample_mode", &sample_mode);
        ctx.insert("current", &current);
        ctx.insert("daily", &daily);
        ctx.insert("charts", &charts);
        ctx.insert("error", &error);

        self.tera.render(DASHBOARD, &ctx)
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn unit_options(selected: TemperatureUnit) -> Vec<UnitOption> {
    TemperatureUnit::all()
        .iter()
        .map(|u| UnitOption {
            value: u.as_str(),
            label: format!("{} ({})", capitalize(u.as_str()), u.symbol()),
            selected: *u == selected,
        })
        .collect()
}

fn current_view(c: &CurrentConditions) -> CurrentView {
    let temperature = format_temperature(c.temperature, c.unit);
    let metric = |label, value| Metric { label, value };

    CurrentView {
        place: c.location.display_name(),
        icon: icon_url(&c.condition.icon, IconSize::Medium),
        main: c.condition.main.clone(),
        description: c.condition.description.clone(),
        feels_like: format_temperature(c.feels_like, c.unit),
        metrics: vec![
            metric("Temperature", temperature.clone()),
            metric("Humidity", format!("{}%", c.humidity)),
            metric(
                "Wind Speed",
                format!("{} m/s {}", round1(c.wind.speed), compass(c.wind.direction)),
            ),
            metric("Visibility", format!("{:.1} km", c.visibility_km)),
            metric("Pressure", format!("{} hPa", round1(c.pressure))),
            metric("Sunrise", format_time(&c.sunrise)),
            metric("Sunset", format_time(&c.sunset)),
            metric("Updated", format_timestamp(&c.observed_at)),
        ],
        temperature,
    }
}

fn day_view(d: &DailySummary) -> DayView {
    DayView {
        day: format_day(&d.date),
        icon: icon_url(&d.condition.icon, IconSize::Small),
        max: format_temperature(d.temperature.max, d.unit),
        min: format_temperature(d.temperature.min, d.unit),
        description: d.condition.description.clone(),
        humidity: format!("{:.0}%", d.humidity),
        wind: format!("{:.1} m/s", d.wind_speed),
        precipitation: format!("{:.1} mm", d.precipitation_mm),
    }
}

fn series(entries: &[ForecastEntry], value: impl Fn(&ForecastEntry) -> f64) -> Vec<(String, f64)> {
    entries.iter().map(|e| (e.timestamp.format("%a %H:%M").to_string(), value(e))).collect()
}

fn chart_set(entries: &[ForecastEntry], unit: TemperatureUnit) -> Vec<LineChart> {
    vec![
        line_chart(
            &format!("Temperature Forecast ({})", unit.symbol()),
            &series(entries, |e| e.temperature.temp),
            760,
            260,
        ),
        line_chart("Humidity Forecast (%)", &series(entries, |e| f64::from(e.humidity)), 370, 200),
        line_chart("Wind Speed Forecast (m/s)", &series(entries, |e| e.wind.speed), 370, 200),
    ]
}

/// Lay out `points` in a `width` x `height` box. The y axis spans the data's
/// own min..max.
pub fn line_chart(title: &str, points: &[(String, f64)], width: u32, height: u32) -> LineChart {
    const PAD_LEFT: f64 = 44.0;
    const PAD_RIGHT: f64 = 12.0;
    const PAD_TOP: f64 = 28.0;
    const PAD_BOTTOM: f64 = 24.0;

    let (w, h) = (f64::from(width), f64::from(height));
    let plot_w = w - PAD_LEFT - PAD_RIGHT;
    let plot_h = h - PAD_TOP - PAD_BOTTOM;

    let mut chart = LineChart {
        title: title.to_string(),
        width,
        height,
        left: PAD_LEFT,
        right: w - PAD_RIGHT,
        top: PAD_TOP,
        bottom: PAD_TOP + plot_h,
        baseline: h - 6.0,
        points: String::new(),
        y_min: 0.0,
        y_max: 0.0,
        x_first: String::new(),
        x_last: String::new(),
    };

    let (Some(first), Some(last)) = (points.first(), points.last()) else {
        return chart;
    };

    let min = points.iter().map(|p| p.1).fold(f64::INFINITY, f64::min);
    let max = points.iter().map(|p| p.1).fold(f64::NEG_INFINITY, f64::max);
    let span = (max - min).max(0.001);
    let step = if points.len() > 1 { plot_w / (points.len() - 1) as f64 } else { 0.0 };

    chart.points = points
        .iter()
        .enumerate()
        .map(|(i, (_, v))| {
            let x = PAD_LEFT + step * i as f64;
            let y = PAD_TOP + plot_h - (v - min) / span * plot_h;
            format!("{x:.1},{y:.1}")
        })
        .collect::<Vec<_>>()
        .join(" ");
    chart.y_min = round1(min);
    chart.y_max = round1(max);
    chart.x_first = first.0.clone();
    chart.x_last = last.0.clone();

    chart
}
