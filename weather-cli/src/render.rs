//! Plain-text rendering of lookup results.

use weather_core::{
    AirQuality, CurrentConditions, DailySummary, IconSize, Location, WeatherReport,
    display::{
        compass, format_day, format_temperature, format_time, format_timestamp, round1, sparkline,
    },
    icon_url,
};

pub const SAMPLE_NOTICE: &str = "Showing sample data - add your API key for real weather";

const CHART_WIDTH: usize = 40;

pub fn report(report: &WeatherReport, charts: bool) -> String {
    let mut out = String::new();

    if report.is_sample() {
        out.push_str(&format!("! {SAMPLE_NOTICE}\n\n"));
    }

    out.push_str(&current(&report.current));

    if !report.daily.is_empty() {
        out.push('\n');
        out.push_str(&daily(&report.daily));
    }

    if charts {
        if let Some(forecast) = &report.forecast {
            out.push('\n');
            out.push_str(&charts_block(report, &forecast.entries));
        }
    }

    out
}

/// Daily forecast (and optional charts) without the current-conditions card.
pub fn forecast(report: &WeatherReport, charts: bool) -> String {
    let mut out = String::new();

    if report.is_sample() {
        out.push_str(&format!("! {SAMPLE_NOTICE}\n\n"));
    }

    out.push_str(&format!("{}\n", report.current.location.display_name()));
    if report.daily.is_empty() {
        out.push_str("No forecast data.\n");
    } else {
        out.push_str(&daily(&report.daily));
    }

    if charts {
        if let Some(forecast) = &report.forecast {
            out.push('\n');
            out.push_str(&charts_block(report, &forecast.entries));
        }
    }

    out
}

pub fn current(c: &CurrentConditions) -> String {
    let unit = c.unit;
    let mut out = String::new();

    out.push_str(&format!(
        "{}  ({})\n",
        c.location.display_name(),
        format_timestamp(&c.observed_at)
    ));
    out.push_str(&format!(
        "  {}  {}\n",
        format_temperature(c.temperature, unit),
        c.condition.description
    ));
    out.push_str(&format!("  Feels like: {}\n", format_temperature(c.feels_like, unit)));
    out.push_str(&format!(
        "  Humidity: {}%   Pressure: {} hPa\n",
        c.humidity,
        round1(c.pressure)
    ));
    out.push_str(&format!(
        "  Wind: {} m/s {} (gust {} m/s)\n",
        round1(c.wind.speed),
        compass(c.wind.direction),
        round1(c.wind.gust)
    ));
    out.push_str(&format!("  Visibility: {:.1} km\n", c.visibility_km));
    out.push_str(&format!(
        "  Sunrise: {}   Sunset: {}\n",
        format_time(&c.sunrise),
        format_time(&c.sunset)
    ));
    out.push_str(&format!("  Icon: {}\n", icon_url(&c.condition.icon, IconSize::Medium)));

    out
}

pub fn daily(days: &[DailySummary]) -> String {
    let mut out = format!("{}-day forecast\n", days.len());

    for d in days {
        out.push_str(&format!(
            "  {:<12} {:>8} / {:<8} {:<22} humidity {:>3.0}%  wind {:>4.1} m/s  precip {:.1} mm\n",
            format_day(&d.date),
            format_temperature(d.temperature.max, d.unit),
            format_temperature(d.temperature.min, d.unit),
            d.condition.description,
            d.humidity,
            d.wind_speed,
            d.precipitation_mm,
        ));
    }

    out
}

fn charts_block(report: &WeatherReport, entries: &[weather_core::ForecastEntry]) -> String {
    let temps: Vec<f64> = entries.iter().map(|e| e.temperature.temp).collect();
    let humidity: Vec<f64> = entries.iter().map(|e| f64::from(e.humidity)).collect();
    let wind: Vec<f64> = entries.iter().map(|e| e.wind.speed).collect();

    let mut out = String::from("Charts\n");
    out.push_str(&chart_line(
        &format!("Temperature ({})", report.unit.symbol()),
        &temps,
    ));
    out.push_str(&chart_line("Humidity (%)", &humidity));
    out.push_str(&chart_line("Wind speed (m/s)", &wind));
    out
}

fn chart_line(label: &str, values: &[f64]) -> String {
    if values.is_empty() {
        return format!("  {label:<18} (no data)\n");
    }
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    format!(
        "  {label:<18} {}  {}..{}\n",
        sparkline(values, CHART_WIDTH),
        round1(min),
        round1(max)
    )
}

pub fn locations(locations: &[Location]) -> String {
    if locations.is_empty() {
        return "No matching locations.\n".to_string();
    }

    locations
        .iter()
        .map(|l| {
            let state = l.state.as_deref().map(|s| format!(" ({s})")).unwrap_or_default();
            format!("  {}{}  lat {:.4}, lon {:.4}\n", l.display_name(), state, l.lat, l.lon)
        })
        .collect()
}

pub fn air_quality(location: &Location, air: &AirQuality) -> String {
    let c = &air.components;
    format!(
        "Air quality for {}: {} (AQI {})\n  PM2.5 {:.1}  PM10 {:.1}  O3 {:.1}  NO2 {:.1}  SO2 {:.1}  CO {:.1} μg/m³\n",
        location.display_name(),
        air.label(),
        air.aqi,
        c.pm2_5,
        c.pm10,
        c.o3,
        c.no2,
        c.so2,
        c.co,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, TimeZone};
    use weather_core::{WeatherQuery, WeatherService, provider::sample::SampleProvider};

    fn sample_report() -> WeatherReport {
        let now = FixedOffset::east_opt(0).unwrap().with_ymd_and_hms(2024, 7, 8, 0, 0, 0).unwrap();
        let service = WeatherService::new(Box::new(SampleProvider::at(now)));
        let rt = tokio::runtime::Runtime::new().unwrap();
        rt.block_on(service.lookup(&WeatherQuery::new("London"))).unwrap()
    }

    #[test]
    fn current_card_shows_rounded_values() {
        let text = report(&sample_report(), false);

        assert!(text.starts_with(&format!("! {SAMPLE_NOTICE}")));
        assert!(text.contains("London, GB"));
        assert!(text.contains("20.5°C  Partly Cloudy"));
        assert!(text.contains("Feels like: 22.0°C"));
        assert!(text.contains("Wind: 3.5 m/s W"));
        assert!(text.contains("Sunrise: 06:30   Sunset: 20:15"));
        assert!(text.contains("02d@2x.png"));
        assert!(!text.contains("Charts"));
    }

    #[test]
    fn daily_block_lists_each_day() {
        let text = report(&sample_report(), true);

        assert!(text.contains("5-day forecast"));
        assert!(text.contains("Mon, Jul 08"));
        assert!(text.contains("Fri, Jul 12"));
        assert!(text.contains("26.0°C"));
        assert!(text.contains("Temperature (°C)"));
    }

    #[test]
    fn fahrenheit_report_renders_fahrenheit() {
        let text = report(&sample_report().to_unit(weather_core::TemperatureUnit::Fahrenheit), false);
        assert!(text.contains("68.9°F"));
        assert!(!text.contains("°C"));
    }

    #[test]
    fn forecast_view_skips_current_card() {
        let text = forecast(&sample_report(), false);

        assert!(text.contains("London, GB"));
        assert!(text.contains("5-day forecast"));
        assert!(!text.contains("Feels like"));
        assert!(!text.contains("Charts"));
    }

    #[test]
    fn empty_location_list_says_so() {
        assert_eq!(locations(&[]), "No matching locations.\n");
    }
}
