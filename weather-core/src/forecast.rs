use chrono::{Locale, NaiveDateTime};

use crate::{
    config::Units,
    model::{ForecastEntry, format_temperature},
    provider::openweather::icon_url,
};

/// Entries come in 3-hour steps, so every 8th one is roughly one per day.
pub const FORECAST_STRIDE: usize = 8;

/// A single day in the forecast row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForecastCard {
    /// Abbreviated weekday and day of month, e.g. "Mon 03".
    pub date: String,
    pub icon_code: String,
    pub icon_url: String,
    pub temperature: String,
}

/// Picks every [`FORECAST_STRIDE`]th entry, starting with the first.
pub fn build_cards(entries: &[ForecastEntry], units: Units, lang: &str) -> Vec<ForecastCard> {
    let locale = locale_for(lang);

    entries
        .iter()
        .step_by(FORECAST_STRIDE)
        .map(|entry| ForecastCard {
            date: format_day(entry.timestamp, locale),
            icon_code: entry.icon.clone(),
            icon_url: icon_url(&entry.icon),
            temperature: format_temperature(entry.temperature, units),
        })
        .collect()
}

fn format_day(timestamp: NaiveDateTime, locale: Locale) -> String {
    timestamp.and_utc().format_localized("%a %d", locale).to_string()
}

fn locale_for(lang: &str) -> Locale {
    match lang.to_lowercase().as_str() {
        "ru" => Locale::ru_RU,
        "uk" | "ua" => Locale::uk_UA,
        "de" => Locale::de_DE,
        "fr" => Locale::fr_FR,
        "es" => Locale::es_ES,
        _ => Locale::en_US,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn entries(count: usize) -> Vec<ForecastEntry> {
        let start = NaiveDate::from_ymd_opt(2024, 6, 3)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        (0..count)
            .map(|i| ForecastEntry {
                timestamp: start + Duration::hours(3 * i as i64),
                temperature: i as f64,
                icon: format!("{:02}d", i % 10),
            })
            .collect()
    }

    #[test]
    fn forty_entries_make_five_cards() {
        let cards = build_cards(&entries(40), Units::Metric, "en");
        assert_eq!(cards.len(), 5);
    }

    #[test]
    fn card_count_is_ceil_of_stride() {
        for n in [0usize, 1, 7, 8, 9, 16, 17, 39, 41] {
            let cards = build_cards(&entries(n), Units::Metric, "en");
            assert_eq!(cards.len(), n.div_ceil(FORECAST_STRIDE), "n = {n}");
        }
    }

    #[test]
    fn cards_take_every_eighth_entry() {
        let cards = build_cards(&entries(17), Units::Metric, "en");
        let temps: Vec<&str> = cards.iter().map(|c| c.temperature.as_str()).collect();
        assert_eq!(temps, vec!["0°C", "8°C", "16°C"]);
    }

    #[test]
    fn card_fields_are_formatted() {
        let cards = build_cards(&entries(1), Units::Metric, "en");
        let card = &cards[0];
        assert_eq!(card.date, "Mon 03");
        assert_eq!(card.icon_code, "00d");
        assert_eq!(card.icon_url, "https://openweathermap.org/img/wn/00d@2x.png");
        assert_eq!(card.temperature, "0°C");
    }

    #[test]
    fn russian_weekday_names() {
        let cards = build_cards(&entries(1), Units::Metric, "ru");
        assert_eq!(cards[0].date, "Пн 03");
    }
}
