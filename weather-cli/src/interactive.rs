//! Interactive terminal shell.
//! The loop thread owns all terminal output; lookups run as tokio tasks and
//! their results come back over an mpsc channel.

use std::{
    io::Write,
    sync::{Arc, mpsc},
    time::Duration,
};

use inquire::{InquireError, Select, Text};
use tokio::runtime::Handle;
use weather_core::{TemperatureUnit, WeatherError, WeatherQuery, WeatherReport, WeatherService};

use crate::render;

const POLL_INTERVAL: Duration = Duration::from_millis(120);
const SPINNER: [char; 4] = ['|', '/', '-', '\\'];

/// Messages sent from background lookups back to the loop thread.
#[derive(Debug)]
pub enum UiMessage {
    FetchDone(Result<WeatherReport, WeatherError>),
}

/// Spawn a lookup on `runtime`; `FetchDone` arrives on `tx` when it finishes.
pub fn request_fetch(
    tx: &mpsc::Sender<UiMessage>,
    service: Arc<WeatherService>,
    query: WeatherQuery,
    runtime: &Handle,
) {
    let tx = tx.clone();
    runtime.spawn(async move {
        let result = service.lookup(&query).await;
        // The loop may already be gone if the user quit mid-request.
        let _ = tx.send(UiMessage::FetchDone(result));
    });
}

/// Everything currently on screen. Only mutated on the loop thread.
#[derive(Debug, Clone)]
pub struct Screen {
    pub city: String,
    pub country: String,
    pub unit: TemperatureUnit,
    pub show_forecast: bool,
    pub show_charts: bool,
    pub days: usize,
    pub status: String,
    pub report: Option<WeatherReport>,
    pub error: Option<String>,
}

impl Screen {
    pub fn new(city: String, unit: TemperatureUnit, days: usize) -> Self {
        Self {
            city,
            country: String::new(),
            unit,
            show_forecast: true,
            show_charts: false,
            days,
            status: "Ready".to_string(),
            report: None,
            error: None,
        }
    }

    pub fn query(&self) -> WeatherQuery {
        WeatherQuery {
            city: self.city.clone(),
            country: Some(self.country.clone()).filter(|c| !c.trim().is_empty()),
            unit: self.unit,
            include_forecast: self.show_forecast,
            days: self.days,
        }
    }

    pub fn apply(&mut self, msg: UiMessage) {
        match msg {
            UiMessage::FetchDone(Ok(report)) => {
                self.status = if report.is_sample() {
                    render::SAMPLE_NOTICE.to_string()
                } else {
                    "Weather data updated successfully".to_string()
                };
                self.report = Some(report);
                self.error = None;
            }
            UiMessage::FetchDone(Err(err)) => {
                self.status = "Error occurred".to_string();
                self.error = Some(err.to_string());
            }
        }
    }

    /// Switching units re-expresses the current report; nothing is refetched.
    pub fn set_unit(&mut self, unit: TemperatureUnit) {
        self.unit = unit;
        if let Some(report) = &self.report {
            self.report = Some(report.to_unit(unit));
        }
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        if let Some(err) = &self.error {
            out.push_str(&format!("Error: {err}\n\n"));
        } else if let Some(report) = &self.report {
            out.push_str(&render::report(report, self.show_charts));
            out.push('\n');
        }
        out.push_str(&format!("[{}]\n", self.status));
        out
    }
}

fn wait_for(rx: &mpsc::Receiver<UiMessage>, status: &str) -> Option<UiMessage> {
    let mut stderr = std::io::stderr();
    let mut tick = 0usize;
    loop {
        match rx.recv_timeout(POLL_INTERVAL) {
            Ok(msg) => {
                let _ = write!(stderr, "\r{}\r", " ".repeat(status.len() + 2));
                return Some(msg);
            }
            Err(mpsc::RecvTimeoutError::Timeout) => {
                let _ = write!(stderr, "\r{} {status}", SPINNER[tick % SPINNER.len()]);
                let _ = stderr.flush();
                tick += 1;
            }
            Err(mpsc::RecvTimeoutError::Disconnected) => return None,
        }
    }
}

/// `Ok(None)` when the user cancelled the prompt (Esc / Ctrl-C).
fn prompt<T>(res: Result<T, InquireError>) -> anyhow::Result<Option<T>> {
    match res {
        Ok(v) => Ok(Some(v)),
        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

const MENU_SEARCH: &str = "Get weather";
const MENU_UNITS: &str = "Change units";
const MENU_FORECAST: &str = "Toggle forecast";
const MENU_CHARTS: &str = "Toggle charts";
const MENU_QUIT: &str = "Quit";

/// Run the loop on the current (blocking) thread until the user quits.
pub fn run(service: Arc<WeatherService>, runtime: Handle, mut screen: Screen) -> anyhow::Result<()> {
    let (tx, rx) = mpsc::channel();

    // Load the default city straight away.
    fetch_and_show(&tx, &rx, &service, &runtime, &mut screen);

    loop {
        let options = vec![MENU_SEARCH, MENU_UNITS, MENU_FORECAST, MENU_CHARTS, MENU_QUIT];
        let Some(choice) = prompt(Select::new("What next?", options).prompt())? else {
            break;
        };

        match choice {
            MENU_SEARCH => {
                let Some(city) = prompt(Text::new("Enter city:").with_default(&screen.city).prompt())?
                else {
                    continue;
                };
                if city.trim().is_empty() {
                    println!("Please enter a city name");
                    continue;
                }
                let Some(country) = prompt(
                    Text::new("Country code (optional):")
                        .with_default(&screen.country)
                        .prompt(),
                )?
                else {
                    continue;
                };
                screen.city = city.trim().to_string();
                screen.country = country.trim().to_string();
                fetch_and_show(&tx, &rx, &service, &runtime, &mut screen);
            }
            MENU_UNITS => {
                let Some(unit) =
                    prompt(Select::new("Temperature units:", TemperatureUnit::all().to_vec()).prompt())?
                else {
                    continue;
                };
                screen.set_unit(unit);
                print!("{}", screen.render());
            }
            MENU_FORECAST => {
                screen.show_forecast = !screen.show_forecast;
                println!("Forecast {}", if screen.show_forecast { "on" } else { "off" });
                fetch_and_show(&tx, &rx, &service, &runtime, &mut screen);
            }
            MENU_CHARTS => {
                screen.show_charts = !screen.show_charts;
                print!("{}", screen.render());
            }
            _ => break,
        }
    }

    Ok(())
}

fn fetch_and_show(
    tx: &mpsc::Sender<UiMessage>,
    rx: &mpsc::Receiver<UiMessage>,
    service: &Arc<WeatherService>,
    runtime: &Handle,
    screen: &mut Screen,
) {
    screen.status = "Fetching weather data...".to_string();
    request_fetch(tx, Arc::clone(service), screen.query(), runtime);

    match wait_for(rx, &screen.status) {
        Some(msg) => screen.apply(msg),
        None => {
            screen.status = "Error occurred".to_string();
            screen.error = Some("lookup task ended without a result".to_string());
        }
    }

    print!("{}", screen.render());
}

#[cfg(test)]
mod tests {
    use super::*;
    use weather_core::provider::sample::SampleProvider;

    fn sample_service() -> Arc<WeatherService> {
        Arc::new(WeatherService::new(Box::new(SampleProvider::new())))
    }

    #[test]
    fn background_fetch_reports_through_channel() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let (tx, rx) = mpsc::channel();
        let screen = Screen::new("London".into(), TemperatureUnit::Celsius, 5);

        request_fetch(&tx, sample_service(), screen.query(), rt.handle());

        let msg = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        let UiMessage::FetchDone(result) = msg;
        assert_eq!(result.unwrap().current.temperature, 20.5);
    }

    #[test]
    fn apply_success_stores_report() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let mut screen = Screen::new("London".into(), TemperatureUnit::Celsius, 5);
        let report = rt.block_on(sample_service().lookup(&screen.query())).unwrap();

        screen.apply(UiMessage::FetchDone(Ok(report)));
        assert!(screen.error.is_none());
        assert_eq!(screen.status, render::SAMPLE_NOTICE);
        assert!(screen.render().contains("Partly Cloudy"));
    }

    #[test]
    fn apply_error_keeps_running_with_message() {
        let mut screen = Screen::new("London".into(), TemperatureUnit::Celsius, 5);
        screen.apply(UiMessage::FetchDone(Err(WeatherError::Provider {
            status: 404,
            message: "city not found".into(),
        })));

        assert_eq!(screen.status, "Error occurred");
        assert!(screen.render().contains("city not found"));
    }

    #[test]
    fn unit_switch_converts_existing_report() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let mut screen = Screen::new("London".into(), TemperatureUnit::Celsius, 5);
        let report = rt.block_on(sample_service().lookup(&screen.query())).unwrap();
        screen.apply(UiMessage::FetchDone(Ok(report)));

        screen.set_unit(TemperatureUnit::Fahrenheit);
        let report = screen.report.as_ref().unwrap();
        assert_eq!(report.unit, TemperatureUnit::Fahrenheit);
        assert!((report.current.temperature - 68.9).abs() < 1e-9);
    }

    #[test]
    fn blank_country_is_not_sent() {
        let mut screen = Screen::new("Paris".into(), TemperatureUnit::Celsius, 3);
        screen.country = "  ".into();
        assert_eq!(screen.query().country, None);
        screen.country = "fr".into();
        assert_eq!(screen.query().city_query().unwrap().as_query(), "Paris,FR");
    }
}
