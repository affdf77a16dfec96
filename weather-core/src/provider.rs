use crate::{
    Config, ForecastEntry, WeatherSnapshot, provider::openweather::OpenWeatherProvider,
};
use async_trait::async_trait;
use reqwest::StatusCode;
use std::fmt::Debug;
use thiserror::Error;

pub mod openweather;

/// A non-success HTTP response from the weather API.
#[derive(Debug, Error)]
#[error("{endpoint} request failed with status {status}: {message}")]
pub struct ApiError {
    pub endpoint: &'static str,
    pub status: StatusCode,
    /// The API's own `message` field when present, otherwise the truncated body.
    pub message: String,
}

#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Current conditions for a city.
    async fn current(&self, city: &str) -> anyhow::Result<WeatherSnapshot>;

    /// The 5-day forecast for a city, in 3-hour steps.
    async fn forecast(&self, city: &str) -> anyhow::Result<Vec<ForecastEntry>>;

    /// Raw PNG bytes of a condition icon.
    async fn icon(&self, code: &str) -> anyhow::Result<Vec<u8>>;
}

/// Construct the OpenWeather provider from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let api_key = config.require_api_key()?;

    Ok(Box::new(OpenWeatherProvider::new(
        api_key.to_owned(),
        config.units,
        config.lang.clone(),
    )))
}
