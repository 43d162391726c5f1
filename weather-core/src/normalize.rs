//! Raw OpenWeatherMap JSON into the crate's model types.
//!
//! Fields the model relies on are required: a payload without them is a
//! provider contract violation and surfaces as [`WeatherError::DataShape`].
//! Optional extras (`wind.deg`, `wind.gust`, `visibility`, `rain`, `snow`)
//! default to zero. Values keep full precision; rounding is left to
//! [`crate::display`].

use chrono::{DateTime, FixedOffset, Utc};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{
    error::{Result, WeatherError},
    model::{
        AirQuality, Condition, CurrentConditions, Forecast, ForecastEntry, Location, Pollutants,
        TemperatureRange, Wind,
    },
    units::TemperatureUnit,
};

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: f64,
    temp_min: Option<f64>,
    temp_max: Option<f64>,
    humidity: u8,
    pressure: f64,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    main: String,
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
    #[serde(default)]
    deg: f64,
    #[serde(default)]
    gust: f64,
}

#[derive(Debug, Deserialize)]
struct OwCoord {
    lat: f64,
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct OwSys {
    country: String,
    sunrise: i64,
    sunset: i64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    dt: i64,
    coord: OwCoord,
    sys: OwSys,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
    #[serde(default)]
    visibility: f64,
    /// Seconds east of UTC for the observed location.
    #[serde(default)]
    timezone: i32,
}

#[derive(Debug, Default, Deserialize)]
struct OwVolume {
    #[serde(rename = "3h", default)]
    three_hours: f64,
}

#[derive(Debug, Deserialize)]
struct OwForecastItem {
    dt: i64,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
    #[serde(default)]
    visibility: f64,
    #[serde(default)]
    rain: Option<OwVolume>,
    #[serde(default)]
    snow: Option<OwVolume>,
}

#[derive(Debug, Deserialize)]
struct OwCity {
    name: String,
    #[serde(default)]
    country: String,
    coord: Option<OwCoord>,
    #[serde(default)]
    timezone: i32,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    city: Option<OwCity>,
    list: Vec<OwForecastItem>,
}

#[derive(Debug, Deserialize)]
struct OwGeocodeItem {
    name: String,
    #[serde(default)]
    country: String,
    state: Option<String>,
    lat: f64,
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct OwAirMain {
    aqi: u8,
}

#[derive(Debug, Deserialize)]
struct OwAirItem {
    dt: i64,
    main: OwAirMain,
    #[serde(default)]
    components: OwComponents,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct OwComponents {
    co: f64,
    no: f64,
    no2: f64,
    o3: f64,
    so2: f64,
    pm2_5: f64,
    pm10: f64,
    nh3: f64,
}

#[derive(Debug, Deserialize)]
struct OwAirResponse {
    coord: OwCoord,
    list: Vec<OwAirItem>,
}

fn parse<T: DeserializeOwned>(raw: &Value, what: &str) -> Result<T> {
    T::deserialize(raw).map_err(|e| WeatherError::data_shape(format!("{what}: {e}")))
}

/// Python-style title casing: a letter is upper-cased when it follows a
/// non-letter, lower-cased otherwise.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_is_letter = false;
    for ch in s.chars() {
        if ch.is_alphabetic() {
            if prev_is_letter {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            prev_is_letter = true;
        } else {
            out.push(ch);
            prev_is_letter = false;
        }
    }
    out
}

fn local_time(ts: i64, offset: FixedOffset, field: &str) -> Result<DateTime<FixedOffset>> {
    DateTime::<Utc>::from_timestamp(ts, 0)
        .map(|utc| utc.with_timezone(&offset))
        .ok_or_else(|| WeatherError::data_shape(format!("{field}: timestamp {ts} out of range")))
}

fn utc_offset(seconds: i32) -> Result<FixedOffset> {
    FixedOffset::east_opt(seconds)
        .ok_or_else(|| WeatherError::data_shape(format!("timezone: offset {seconds}s out of range")))
}

fn condition(weather: &[OwWeather], what: &str) -> Result<Condition> {
    let first = weather
        .first()
        .ok_or_else(|| WeatherError::data_shape(format!("{what}: empty `weather` array")))?;

    Ok(Condition {
        main: first.main.clone(),
        description: title_case(&first.description),
        icon: first.icon.clone(),
    })
}

fn wind(w: &OwWind) -> Wind {
    Wind { speed: w.speed, direction: w.deg, gust: w.gust }
}

/// `raw` must be a current-weather body requested in `unit`.
pub fn normalize_current(raw: &Value, unit: TemperatureUnit) -> Result<CurrentConditions> {
    let parsed: OwCurrentResponse = parse(raw, "current weather")?;
    let offset = utc_offset(parsed.timezone)?;

    Ok(CurrentConditions {
        location: Location {
            name: parsed.name,
            country: parsed.sys.country,
            state: None,
            lat: parsed.coord.lat,
            lon: parsed.coord.lon,
        },
        observed_at: local_time(parsed.dt, offset, "dt")?,
        temperature: parsed.main.temp,
        feels_like: parsed.main.feels_like,
        humidity: parsed.main.humidity,
        pressure: parsed.main.pressure,
        condition: condition(&parsed.weather, "current weather")?,
        wind: wind(&parsed.wind),
        visibility_km: parsed.visibility / 1000.0,
        sunrise: local_time(parsed.sys.sunrise, offset, "sys.sunrise")?,
        sunset: local_time(parsed.sys.sunset, offset, "sys.sunset")?,
        unit,
    })
}

/// `raw` must be a 5-day/3-hour forecast body requested in `unit`.
pub fn normalize_forecast(raw: &Value, unit: TemperatureUnit) -> Result<Forecast> {
    let parsed: OwForecastResponse = parse(raw, "forecast")?;

    let offset = utc_offset(parsed.city.as_ref().map_or(0, |c| c.timezone))?;
    let location = parsed.city.map(|c| {
        let (lat, lon) = c.coord.map_or((0.0, 0.0), |co| (co.lat, co.lon));
        Location { name: c.name, country: c.country, state: None, lat, lon }
    });

    let entries = parsed
        .list
        .iter()
        .enumerate()
        .map(|(idx, item)| forecast_entry(item, offset, unit, idx))
        .collect::<Result<Vec<_>>>()?;

    Ok(Forecast { location, entries })
}

fn forecast_entry(
    item: &OwForecastItem,
    offset: FixedOffset,
    unit: TemperatureUnit,
    idx: usize,
) -> Result<ForecastEntry> {
    let what = format!("forecast list[{idx}]");
    let min = item
        .main
        .temp_min
        .ok_or_else(|| WeatherError::data_shape(format!("{what}: missing field `main.temp_min`")))?;
    let max = item
        .main
        .temp_max
        .ok_or_else(|| WeatherError::data_shape(format!("{what}: missing field `main.temp_max`")))?;

    let rain = item.rain.as_ref().map_or(0.0, |v| v.three_hours);
    let snow = item.snow.as_ref().map_or(0.0, |v| v.three_hours);

    Ok(ForecastEntry {
        timestamp: local_time(item.dt, offset, &what)?,
        temperature: TemperatureRange {
            temp: item.main.temp,
            feels_like: item.main.feels_like,
            min,
            max,
        },
        condition: condition(&item.weather, &what)?,
        humidity: item.main.humidity,
        pressure: item.main.pressure,
        wind: wind(&item.wind),
        visibility_km: item.visibility / 1000.0,
        precipitation_mm: (rain + snow).max(0.0),
        unit,
    })
}

pub fn normalize_geocode(raw: &Value) -> Result<Vec<Location>> {
    let parsed: Vec<OwGeocodeItem> = parse(raw, "geocoding")?;

    Ok(parsed
        .into_iter()
        .map(|g| Location { name: g.name, country: g.country, state: g.state, lat: g.lat, lon: g.lon })
        .collect())
}

/// Uses the first (current) sample of an air-pollution body.
pub fn normalize_air_pollution(raw: &Value) -> Result<AirQuality> {
    let parsed: OwAirResponse = parse(raw, "air pollution")?;
    let item = parsed
        .list
        .first()
        .ok_or_else(|| WeatherError::data_shape("air pollution: empty `list`"))?;

    let measured_at = DateTime::<Utc>::from_timestamp(item.dt, 0)
        .ok_or_else(|| WeatherError::data_shape(format!("air pollution: timestamp {} out of range", item.dt)))?;

    let c = &item.components;
    Ok(AirQuality {
        lat: parsed.coord.lat,
        lon: parsed.coord.lon,
        measured_at,
        aqi: item.main.aqi,
        components: Pollutants {
            co: c.co,
            no: c.no,
            no2: c.no2,
            o3: c.o3,
            so2: c.so2,
            pm2_5: c.pm2_5,
            pm10: c.pm10,
            nh3: c.nh3,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn current_body() -> Value {
        json!({
            "coord": { "lon": -0.1257, "lat": 51.5085 },
            "weather": [{ "id": 803, "main": "Clouds", "description": "broken clouds", "icon": "04d" }],
            "main": { "temp": 18.27, "feels_like": 17.94, "temp_min": 16.1, "temp_max": 19.4,
                      "pressure": 1012, "humidity": 72 },
            "visibility": 9000,
            "wind": { "speed": 4.63, "deg": 240 },
            "dt": 1720440000,
            "sys": { "country": "GB", "sunrise": 1720410600, "sunset": 1720469700 },
            "timezone": 3600,
            "name": "London"
        })
    }

    fn forecast_item(dt: i64, temp: f64) -> Value {
        json!({
            "dt": dt,
            "main": { "temp": temp, "feels_like": temp - 1.0, "temp_min": temp - 0.5,
                      "temp_max": temp + 0.5, "pressure": 1015, "humidity": 60 },
            "weather": [{ "main": "Rain", "description": "light rain", "icon": "10d" }],
            "wind": { "speed": 3.1, "deg": 200, "gust": 6.2 },
            "visibility": 10000,
            "rain": { "3h": 0.42 }
        })
    }

    #[test]
    fn current_weather_is_reshaped() {
        let c = normalize_current(&current_body(), TemperatureUnit::Celsius).unwrap();

        assert_eq!(c.location.display_name(), "London, GB");
        assert_eq!(c.temperature, 18.27);
        assert_eq!(c.condition.description, "Broken Clouds");
        assert_eq!(c.condition.icon, "04d");
        assert_eq!(c.visibility_km, 9.0);
        assert_eq!(c.wind.direction, 240.0);
        assert_eq!(c.wind.gust, 0.0);
        assert_eq!(c.pressure, 1012.0);
        assert_eq!(c.observed_at.offset().local_minus_utc(), 3600);
        assert_eq!(c.unit, TemperatureUnit::Celsius);
    }

    #[test]
    fn missing_wind_is_a_data_shape_error() {
        let mut body = current_body();
        body.as_object_mut().unwrap().remove("wind");

        let err = normalize_current(&body, TemperatureUnit::Celsius).unwrap_err();
        assert!(matches!(err, WeatherError::DataShape(_)), "{err:?}");
        assert!(err.to_string().contains("wind"));
    }

    #[test]
    fn empty_weather_array_is_a_data_shape_error() {
        let mut body = current_body();
        body["weather"] = json!([]);

        let err = normalize_current(&body, TemperatureUnit::Celsius).unwrap_err();
        assert!(matches!(err, WeatherError::DataShape(_)));
    }

    #[test]
    fn missing_visibility_defaults_to_zero() {
        let mut body = current_body();
        body.as_object_mut().unwrap().remove("visibility");

        let c = normalize_current(&body, TemperatureUnit::Celsius).unwrap();
        assert_eq!(c.visibility_km, 0.0);
    }

    #[test]
    fn forecast_sums_rain_and_snow() {
        let mut item = forecast_item(1720440000, 12.0);
        item["snow"] = json!({ "3h": 0.08 });
        let body = json!({
            "list": [item, forecast_item(1720450800, 13.0)],
            "city": { "name": "Oslo", "country": "NO", "coord": { "lat": 59.9, "lon": 10.7 },
                      "timezone": 7200 }
        });

        let f = normalize_forecast(&body, TemperatureUnit::Celsius).unwrap();
        assert_eq!(f.entries.len(), 2);
        assert!((f.entries[0].precipitation_mm - 0.5).abs() < 1e-9);
        assert!((f.entries[1].precipitation_mm - 0.42).abs() < 1e-9);
        assert_eq!(f.entries[0].condition.description, "Light Rain");
        assert_eq!(f.entries[0].visibility_km, 10.0);
        assert_eq!(f.location.unwrap().name, "Oslo");
        assert_eq!(f.entries[0].timestamp.offset().local_minus_utc(), 7200);
    }

    #[test]
    fn forecast_without_precipitation_blocks_has_zero() {
        let mut item = forecast_item(1720440000, 12.0);
        item.as_object_mut().unwrap().remove("rain");

        let f = normalize_forecast(&json!({ "list": [item] }), TemperatureUnit::Celsius).unwrap();
        assert_eq!(f.entries[0].precipitation_mm, 0.0);
        assert!(f.location.is_none());
    }

    #[test]
    fn forecast_without_list_is_a_data_shape_error() {
        let err = normalize_forecast(&json!({ "cod": "200" }), TemperatureUnit::Celsius).unwrap_err();
        assert!(matches!(err, WeatherError::DataShape(_)));
    }

    #[test]
    fn forecast_entry_missing_temp_max_names_the_slot() {
        let mut item = forecast_item(1720440000, 12.0);
        item["main"].as_object_mut().unwrap().remove("temp_max");

        let err = normalize_forecast(&json!({ "list": [item] }), TemperatureUnit::Celsius).unwrap_err();
        assert!(err.to_string().contains("list[0]"));
    }

    #[test]
    fn title_case_matches_word_boundaries() {
        assert_eq!(title_case("partly cloudy"), "Partly Cloudy");
        assert_eq!(title_case("THUNDERSTORM with light rain"), "Thunderstorm With Light Rain");
        assert_eq!(title_case("mist/haze"), "Mist/Haze");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn geocode_keeps_optional_state() {
        let body = json!([
            { "name": "Springfield", "lat": 39.8, "lon": -89.6, "country": "US", "state": "Illinois" },
            { "name": "Springfield", "lat": 37.2, "lon": -93.3, "country": "US" }
        ]);

        let locations = normalize_geocode(&body).unwrap();
        assert_eq!(locations.len(), 2);
        assert_eq!(locations[0].state.as_deref(), Some("Illinois"));
        assert!(locations[1].state.is_none());
    }

    #[test]
    fn air_pollution_uses_first_sample() {
        let body = json!({
            "coord": { "lon": -0.1278, "lat": 51.5074 },
            "list": [{ "main": { "aqi": 3 }, "dt": 1720440000,
                       "components": { "co": 230.31, "no2": 21.9, "o3": 68.66, "pm2_5": 12.5, "pm10": 15.1 } }]
        });

        let aq = normalize_air_pollution(&body).unwrap();
        assert_eq!(aq.aqi, 3);
        assert_eq!(aq.label(), "Moderate");
        assert_eq!(aq.components.pm2_5, 12.5);
        assert_eq!(aq.components.so2, 0.0);
    }
}
