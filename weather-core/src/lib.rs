//! Core library for the `weather` desktop app.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The OpenWeather client behind the `WeatherProvider` trait
//! - Shared domain models and forecast cards
//! - The cityscape and weather animation generators
//! - The refresh flow the window runs on every query
//!
//! It has no GUI dependency; `weather-app` maps its shapes onto Slint.

pub mod config;
pub mod flow;
pub mod forecast;
pub mod model;
pub mod provider;
pub mod scene;

pub use config::{Config, Units};
pub use flow::{WeatherView, refresh, report_missing_provider, validate_city};
pub use forecast::{FORECAST_STRIDE, ForecastCard, build_cards};
pub use model::{ForecastEntry, SnapshotLabels, WeatherSnapshot};
pub use provider::{ApiError, WeatherProvider, provider_from_config};
