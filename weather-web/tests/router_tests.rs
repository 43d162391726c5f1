//! Router behaviour with sample data and a mock provider.

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode},
};
use chrono::{FixedOffset, TimeZone};
use serde_json::{Value, json};
use tower::ServiceExt;
use weather_core::{
    ClientConfig, TemperatureUnit, WeatherService,
    provider::{openweather::OpenWeatherProvider, sample::SampleProvider},
};
use weather_web::state::{AppState, Defaults};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

fn defaults() -> Defaults {
    Defaults { city: "London".into(), unit: TemperatureUnit::Celsius, days: 5 }
}

fn sample_app() -> Router {
    let now = FixedOffset::east_opt(0).unwrap().with_ymd_and_hms(2024, 7, 8, 0, 0, 0).unwrap();
    let service = WeatherService::new(Box::new(SampleProvider::at(now)));
    weather_web::router(AppState::new(service, defaults()).unwrap())
}

fn mock_app(server: &MockServer) -> Router {
    let config = ClientConfig {
        base_url: server.uri(),
        geo_url: server.uri(),
        ..ClientConfig::new("test-key")
    };
    let service = WeatherService::new(Box::new(OpenWeatherProvider::new(config).unwrap()));
    weather_web::router(AppState::new(service, defaults()).unwrap())
}

async fn get(app: Router, uri: &str) -> (StatusCode, String) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

#[tokio::test]
async fn health_reports_sample_mode() {
    let (status, body) = get(sample_app(), "/api/health").await;
    assert_eq!(status, StatusCode::OK);

    let json: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["status"], "ok");
    assert_eq!(json["sample"], true);
}

#[tokio::test]
async fn api_returns_report_json() {
    let (status, body) = get(sample_app(), "/api/weather?city=London&units=fahrenheit&days=3").await;
    assert_eq!(status, StatusCode::OK);

    let json: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["source"], "sample");
    assert_eq!(json["daily"].as_array().unwrap().len(), 3);
    assert!((json["current"]["temperature"].as_f64().unwrap() - 68.9).abs() < 1e-9);
}

#[tokio::test]
async fn api_without_forecast_has_no_daily() {
    let (status, body) = get(sample_app(), "/api/weather?city=London&forecast=off").await;
    assert_eq!(status, StatusCode::OK);

    let json: Value = serde_json::from_str(&body).unwrap();
    assert!(json["forecast"].is_null());
    assert!(json["daily"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn api_rejects_blank_city() {
    let (status, body) = get(sample_app(), "/api/weather?city=%20%20").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let json: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["kind"], "validation");
}

#[tokio::test]
async fn api_rejects_unknown_unit() {
    let (status, _) = get(sample_app(), "/api/weather?city=London&units=rankine").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn dashboard_renders_sample_page() {
    let (status, html) = get(sample_app(), "/").await;
    assert_eq!(status, StatusCode::OK);

    assert!(html.contains("Showing sample data"));
    assert!(html.contains("London, GB"));
    assert!(html.contains("20.5°C"));
    assert!(html.contains("5-Day Forecast"));
    assert!(html.contains("<svg"));
}

#[tokio::test]
async fn dashboard_honours_unticked_boxes() {
    let (status, html) = get(sample_app(), "/?city=London&units=celsius&submitted=1").await;
    assert_eq!(status, StatusCode::OK);

    assert!(html.contains("20.5°C"));
    assert!(!html.contains("Day Forecast"));
    assert!(!html.contains("<svg"));
}

#[tokio::test]
async fn dashboard_shows_validation_error_in_page() {
    let (status, html) = get(sample_app(), "/?city=&submitted=1").await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("banner error"));
}

#[tokio::test]
async fn provider_not_found_maps_to_404() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({ "cod": "404", "message": "city not found" })),
        )
        .mount(&server)
        .await;

    let (status, body) = get(mock_app(&server), "/api/weather?city=Atlantis").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let json: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["kind"], "provider");
    assert!(json["error"].as_str().unwrap().contains("city not found"));
}

#[tokio::test]
async fn provider_auth_failure_maps_to_502_and_dashboard_banner() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "cod": 401, "message": "Invalid API key" })))
        .mount(&server)
        .await;

    let (status, _) = get(mock_app(&server), "/api/weather?city=London").await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);

    let (status, html) = get(mock_app(&server), "/?city=London").await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("Invalid API key"));
    assert!(!html.contains("Showing sample data"));
}

#[tokio::test]
async fn api_rejects_malformed_days_as_json() {
    let (status, body) = get(sample_app(), "/api/weather?city=London&days=abc").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let json: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["kind"], "validation");
    assert!(json["error"].as_str().unwrap().contains("abc"));
}

#[tokio::test]
async fn dashboard_keeps_serving_on_malformed_days() {
    let (status, html) = get(sample_app(), "/?city=London&days=abc&submitted=1").await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("banner error"));
    assert!(html.contains("not a valid number of days"));

    // Blank means the configured default.
    let (status, html) = get(sample_app(), "/?city=London&days=").await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("5-Day Forecast"));
}

#[tokio::test]
async fn dashboard_forecast_label_uses_requested_days() {
    let (status, html) = get(sample_app(), "/?city=London&days=3").await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("Show 3-day forecast"));
    assert!(html.contains("3-Day Forecast"));
}
