use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, NaiveDateTime, Utc};
use reqwest::Client;
use serde::Deserialize;

use crate::{
    config::Units,
    model::{ForecastEntry, WeatherSnapshot},
};

use super::{ApiError, WeatherProvider};

const CURRENT_URL: &str = "https://api.openweathermap.org/data/2.5/weather";
const FORECAST_URL: &str = "https://api.openweathermap.org/data/2.5/forecast";
const FORECAST_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// URL of the 2x condition icon for an OpenWeather icon code.
pub fn icon_url(code: &str) -> String {
    format!("https://openweathermap.org/img/wn/{code}@2x.png")
}

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    units: Units,
    lang: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String, units: Units, lang: String) -> Self {
        Self {
            api_key,
            units,
            lang,
            http: Client::new(),
        }
    }

    async fn get_body(&self, endpoint: &'static str, url: &str, city: &str) -> Result<String> {
        log::debug!("GET {url} for '{city}'");

        let res = self
            .http
            .get(url)
            .query(&[
                ("q", city),
                ("appid", self.api_key.as_str()),
                ("units", self.units.as_str()),
                ("lang", self.lang.as_str()),
            ])
            .send()
            .await
            .with_context(|| format!("Failed to send request to {endpoint}"))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .with_context(|| format!("Failed to read {endpoint} response body"))?;

        if !status.is_success() {
            return Err(ApiError {
                endpoint,
                status,
                message: error_message(&body),
            }
            .into());
        }

        Ok(body)
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: f64,
    humidity: u8,
    pressure: u32,
}

#[derive(Debug, Deserialize)]
struct OwForecastMain {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct OwIcon {
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwSys {
    sunrise: i64,
    sunset: i64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    #[serde(default)]
    name: String,
    #[serde(default)]
    timezone: i32,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
    sys: OwSys,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt_txt: String,
    main: OwForecastMain,
    weather: Vec<OwIcon>,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    list: Vec<OwForecastEntry>,
}

#[derive(Debug, Deserialize)]
struct OwErrorResponse {
    message: String,
}

pub(crate) fn parse_current(body: &str) -> Result<WeatherSnapshot> {
    let parsed: OwCurrentResponse =
        serde_json::from_str(body).context("Failed to parse OpenWeather current JSON")?;

    let weather = parsed
        .weather
        .into_iter()
        .next()
        .ok_or_else(|| anyhow!("OpenWeather current response contained no weather conditions"))?;

    let utc_offset = FixedOffset::east_opt(parsed.timezone)
        .ok_or_else(|| anyhow!("Invalid timezone offset {}", parsed.timezone))?;

    Ok(WeatherSnapshot {
        city: parsed.name,
        temperature: parsed.main.temp,
        feels_like: parsed.main.feels_like,
        humidity_pct: parsed.main.humidity,
        pressure_hpa: parsed.main.pressure,
        wind_speed: parsed.wind.speed,
        description: weather.description,
        icon: weather.icon,
        sunrise: unix_to_utc(parsed.sys.sunrise)?,
        sunset: unix_to_utc(parsed.sys.sunset)?,
        utc_offset,
    })
}

pub(crate) fn parse_forecast(body: &str) -> Result<Vec<ForecastEntry>> {
    let parsed: OwForecastResponse =
        serde_json::from_str(body).context("Failed to parse OpenWeather forecast JSON")?;

    parsed
        .list
        .into_iter()
        .map(|entry| -> Result<ForecastEntry> {
            let timestamp = NaiveDateTime::parse_from_str(&entry.dt_txt, FORECAST_TIME_FORMAT)
                .with_context(|| format!("Invalid forecast timestamp '{}'", entry.dt_txt))?;

            let icon = entry
                .weather
                .into_iter()
                .next()
                .map(|w| w.icon)
                .ok_or_else(|| {
                    anyhow!("Forecast entry {} has no weather conditions", entry.dt_txt)
                })?;

            Ok(ForecastEntry {
                timestamp,
                temperature: entry.main.temp,
                icon,
            })
        })
        .collect()
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn current(&self, city: &str) -> Result<WeatherSnapshot> {
        let body = self.get_body("OpenWeather current", CURRENT_URL, city).await?;
        parse_current(&body)
    }

    async fn forecast(&self, city: &str) -> Result<Vec<ForecastEntry>> {
        let body = self.get_body("OpenWeather forecast", FORECAST_URL, city).await?;
        parse_forecast(&body)
    }

    async fn icon(&self, code: &str) -> Result<Vec<u8>> {
        let url = icon_url(code);
        log::debug!("GET {url}");

        let res = self
            .http
            .get(&url)
            .send()
            .await
            .with_context(|| format!("Failed to request icon {code}"))?
            .error_for_status()
            .with_context(|| format!("Icon {code} is not available"))?;

        let bytes = res
            .bytes()
            .await
            .with_context(|| format!("Failed to read icon {code}"))?;

        Ok(bytes.to_vec())
    }
}

fn unix_to_utc(ts: i64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp(ts, 0).ok_or_else(|| anyhow!("Invalid unix timestamp {ts}"))
}

fn error_message(body: &str) -> String {
    serde_json::from_str::<OwErrorResponse>(body)
        .map(|e| e.message)
        .unwrap_or_else(|_| truncate_body(body))
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    const CURRENT_JSON: &str = r#"{
        "coord": {"lon": 37.62, "lat": 55.75},
        "weather": [
            {"id": 500, "main": "Rain", "description": "небольшой дождь", "icon": "10d"}
        ],
        "main": {"temp": 12.4, "feels_like": 11.9, "temp_min": 11.0, "temp_max": 13.1,
                 "pressure": 1008, "humidity": 81},
        "wind": {"speed": 3.2, "deg": 200},
        "dt": 1717660800,
        "sys": {"country": "RU", "sunrise": 1717634462, "sunset": 1717696440},
        "timezone": 10800,
        "name": "Москва",
        "cod": 200
    }"#;

    fn forecast_json(count: usize) -> String {
        let entries: Vec<String> = (0..count)
            .map(|i| {
                let hour = (i * 3) % 24;
                let day = 1 + i / 8;
                format!(
                    r#"{{"dt": {}, "main": {{"temp": {}.5}},
                        "weather": [{{"icon": "0{}d"}}],
                        "dt_txt": "2024-06-{:02} {:02}:00:00"}}"#,
                    1717200000 + i * 10800,
                    i,
                    1 + i % 4,
                    day,
                    hour
                )
            })
            .collect();
        format!(r#"{{"cod": "200", "cnt": {count}, "list": [{}]}}"#, entries.join(","))
    }

    #[test]
    fn parses_current_fields() {
        let snapshot = parse_current(CURRENT_JSON).unwrap();
        assert_eq!(snapshot.city, "Москва");
        assert_eq!(snapshot.temperature, 12.4);
        assert_eq!(snapshot.feels_like, 11.9);
        assert_eq!(snapshot.humidity_pct, 81);
        assert_eq!(snapshot.pressure_hpa, 1008);
        assert_eq!(snapshot.wind_speed, 3.2);
        assert_eq!(snapshot.description, "небольшой дождь");
        assert_eq!(snapshot.icon, "10d");
        assert_eq!(snapshot.sunrise.timestamp(), 1717634462);
        assert_eq!(snapshot.sunset.timestamp(), 1717696440);
        assert_eq!(snapshot.utc_offset.local_minus_utc(), 10800);
    }

    #[test]
    fn current_without_conditions_is_an_error() {
        let body = CURRENT_JSON.replace(
            r#"{"id": 500, "main": "Rain", "description": "небольшой дождь", "icon": "10d"}"#,
            "",
        );
        let err = parse_current(&body).unwrap_err();
        assert!(err.to_string().contains("no weather conditions"));
    }

    #[test]
    fn malformed_current_json_is_an_error() {
        let err = parse_current("{\"main\": 5}").unwrap_err();
        assert!(err.to_string().contains("Failed to parse OpenWeather current JSON"));
    }

    #[test]
    fn current_missing_main_fields_is_an_error() {
        let body =
            CURRENT_JSON.replace(r#""pressure": 1008, "humidity": 81"#, r#""pressure": 1008"#);
        let err = parse_current(&body).unwrap_err();
        assert!(err.to_string().contains("Failed to parse OpenWeather current JSON"));

        let body = CURRENT_JSON.replace(r#""feels_like": 11.9, "#, "");
        assert!(parse_current(&body).is_err());
    }

    #[test]
    fn parses_forecast_entries_in_order() {
        let entries = parse_forecast(&forecast_json(40)).unwrap();
        assert_eq!(entries.len(), 40);

        let first = &entries[0];
        assert_eq!(first.temperature, 0.5);
        assert_eq!(first.icon, "01d");
        assert_eq!(first.timestamp.day(), 1);
        assert_eq!(first.timestamp.hour(), 0);

        let ninth = &entries[8];
        assert_eq!(ninth.timestamp.day(), 2);
        assert_eq!(ninth.temperature, 8.5);
    }

    #[test]
    fn forecast_with_bad_timestamp_is_an_error() {
        let body = forecast_json(1).replace("2024-06-01 00:00:00", "tomorrow");
        let err = parse_forecast(&body).unwrap_err();
        assert!(err.to_string().contains("Invalid forecast timestamp 'tomorrow'"));
    }

    #[test]
    fn empty_forecast_is_empty() {
        assert!(parse_forecast(&forecast_json(0)).unwrap().is_empty());
    }

    #[test]
    fn error_message_prefers_api_message() {
        assert_eq!(
            error_message(r#"{"cod":"404","message":"city not found"}"#),
            "city not found"
        );
        assert_eq!(error_message("Bad Gateway"), "Bad Gateway");
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        let long = "д".repeat(300);
        let truncated = truncate_body(&long);
        assert_eq!(truncated.chars().count(), 203);
        assert!(truncated.ends_with("..."));
    }

    #[test]
    fn icon_url_pattern() {
        assert_eq!(icon_url("10d"), "https://openweathermap.org/img/wn/10d@2x.png");
    }
}
