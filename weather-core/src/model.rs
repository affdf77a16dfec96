use chrono::{DateTime, FixedOffset, NaiveDateTime, Utc};

use crate::config::Units;

/// Current conditions for one city, replaced on every query.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherSnapshot {
    pub city: String,
    pub temperature: f64,
    pub feels_like: f64,
    pub humidity_pct: u8,
    pub pressure_hpa: u32,
    pub wind_speed: f64,
    pub description: String,
    pub icon: String,
    pub sunrise: DateTime<Utc>,
    pub sunset: DateTime<Utc>,
    /// Offset of the city's local time from UTC.
    pub utc_offset: FixedOffset,
}

/// One 3-hour forecast datapoint.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastEntry {
    pub timestamp: NaiveDateTime,
    pub temperature: f64,
    pub icon: String,
}

/// Text shown next to the icon, already formatted for the chosen unit system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotLabels {
    pub temperature: String,
    pub feels_like: String,
    pub humidity: String,
    pub pressure: String,
    pub wind: String,
    pub description: String,
    pub sun: String,
}

pub fn format_temperature(value: f64, units: Units) -> String {
    format!("{value:.0}{}", units.temperature_suffix())
}

impl WeatherSnapshot {
    pub fn labels(&self, units: Units) -> SnapshotLabels {
        let sunrise = self.sunrise.with_timezone(&self.utc_offset);
        let sunset = self.sunset.with_timezone(&self.utc_offset);

        SnapshotLabels {
            temperature: format_temperature(self.temperature, units),
            feels_like: format!("Feels like: {}", format_temperature(self.feels_like, units)),
            humidity: format!("Humidity: {}%", self.humidity_pct),
            pressure: format!("Pressure: {} hPa", self.pressure_hpa),
            wind: format!("Wind: {} {}", self.wind_speed, units.wind_suffix()),
            description: self.description.clone(),
            sun: format!(
                "Sunrise: {} | Sunset: {}",
                sunrise.format("%H:%M"),
                sunset.format("%H:%M")
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn snapshot() -> WeatherSnapshot {
        WeatherSnapshot {
            city: "Moscow".into(),
            temperature: -3.6,
            feels_like: -8.2,
            humidity_pct: 86,
            pressure_hpa: 1012,
            wind_speed: 4.5,
            description: "пасмурно".into(),
            icon: "04d".into(),
            sunrise: Utc.with_ymd_and_hms(2024, 1, 10, 5, 57, 0).unwrap(),
            sunset: Utc.with_ymd_and_hms(2024, 1, 10, 13, 21, 0).unwrap(),
            utc_offset: FixedOffset::east_opt(3 * 3600).unwrap(),
        }
    }

    #[test]
    fn labels_use_metric_suffixes() {
        let labels = snapshot().labels(Units::Metric);
        assert_eq!(labels.temperature, "-4°C");
        assert_eq!(labels.feels_like, "Feels like: -8°C");
        assert_eq!(labels.humidity, "Humidity: 86%");
        assert_eq!(labels.pressure, "Pressure: 1012 hPa");
        assert_eq!(labels.wind, "Wind: 4.5 m/s");
        assert_eq!(labels.description, "пасмурно");
    }

    #[test]
    fn sun_times_use_city_offset() {
        let labels = snapshot().labels(Units::Metric);
        assert_eq!(labels.sun, "Sunrise: 08:57 | Sunset: 16:21");
    }

    #[test]
    fn imperial_labels() {
        let labels = snapshot().labels(Units::Imperial);
        assert_eq!(labels.temperature, "-4°F");
        assert!(labels.wind.ends_with("mph"));
    }
}
