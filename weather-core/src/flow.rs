//! The sequence run when the user asks for a city's weather.

use anyhow::{Result, bail};

use crate::{
    config::Config,
    forecast::{ForecastCard, build_cards},
    model::WeatherSnapshot,
    provider::WeatherProvider,
};

/// What the refresh flow needs from a window.
pub trait WeatherView {
    fn show_current(&mut self, snapshot: &WeatherSnapshot);
    fn show_icon(&mut self, png: Vec<u8>);
    fn show_forecast(&mut self, cards: Vec<ForecastCard>);
    fn show_card_icon(&mut self, index: usize, png: Vec<u8>);
    fn show_error(&mut self, message: String);
    fn redraw_cityscape(&mut self);
}

/// Trims the input and rejects an empty city name.
pub fn validate_city(input: &str) -> Result<&str> {
    let city = input.trim();
    if city.is_empty() {
        bail!("Enter a city name");
    }
    Ok(city)
}

/// Fetches current weather, then the forecast, then redraws the cityscape.
///
/// A failed fetch is reported through [`WeatherView::show_error`] and does not
/// stop the next step. Icons are best effort and only logged on failure.
pub async fn refresh(
    provider: &dyn WeatherProvider,
    config: &Config,
    view: &mut dyn WeatherView,
    city_input: &str,
) {
    let city = match validate_city(city_input) {
        Ok(city) => city,
        Err(e) => {
            view.show_error(e.to_string());
            return;
        }
    };

    log::info!("Refreshing weather for '{city}'");

    match provider.current(city).await {
        Ok(snapshot) => {
            view.show_current(&snapshot);
            match provider.icon(&snapshot.icon).await {
                Ok(png) => view.show_icon(png),
                Err(e) => log::warn!("Failed to load icon {}: {e:#}", snapshot.icon),
            }
        }
        Err(e) => {
            log::warn!("Current weather for '{city}' failed: {e:#}");
            view.show_error(format!("Failed to get current weather: {e:#}"));
        }
    }

    let cards = match provider.forecast(city).await {
        Ok(entries) => {
            let cards = build_cards(&entries, config.units, &config.lang);
            log::debug!("{} forecast entries -> {} cards", entries.len(), cards.len());
            view.show_forecast(cards.clone());
            cards
        }
        Err(e) => {
            log::warn!("Forecast for '{city}' failed: {e:#}");
            view.show_error(format!("Failed to get forecast: {e:#}"));
            Vec::new()
        }
    };

    view.redraw_cityscape();

    for (index, card) in cards.iter().enumerate() {
        match provider.icon(&card.icon_code).await {
            Ok(png) => view.show_card_icon(index, png),
            Err(e) => log::warn!("Failed to load icon {}: {e:#}", card.icon_code),
        }
    }
}

/// Stands in for [`refresh`] when no provider could be built.
///
/// The city is still validated first, so an empty field gets the same
/// message as with a key; otherwise the missing-key hint is shown. The
/// cityscape is redrawn either way.
pub fn report_missing_provider(config: &Config, view: &mut dyn WeatherView, city_input: &str) {
    if let Err(e) = validate_city(city_input) {
        view.show_error(e.to_string());
        return;
    }

    if let Err(e) = config.require_api_key() {
        view.show_error(e.to_string());
    }
    view.redraw_cityscape();
}
