use chrono::TimeZone;
use cityweather_core::{TemperatureUnit, WeatherViewModel, format_clock};
use std::fmt::Display;

/// One list row: city, temperature, sunrise/sunset in `tz`, icon code.
pub fn weather_row<Tz>(vm: &WeatherViewModel, unit: TemperatureUnit, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    format!(
        "{:<20} {:>7.1} {:<2}  sunrise {}  sunset {}  icon {}",
        vm.city(),
        vm.temperature_in(unit),
        unit.symbol(),
        format_clock(&vm.sunrise().with_timezone(tz)),
        format_clock(&vm.sunset().with_timezone(tz)),
        vm.icon(),
    )
}

pub fn error_row(city: &str, err: &impl Display) -> String {
    format!("{city:<20} error: {err}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};
    use cityweather_core::{DecodeError, FetchError, Weather};

    fn tokyo() -> WeatherViewModel {
        WeatherViewModel::new(Weather {
            city: "Tokyo".to_string(),
            temperature: 287.92,
            icon: "10n".to_string(),
            sunrise: DateTime::from_timestamp(1702330868, 0).expect("valid"),
            sunset: DateTime::from_timestamp(1702366096, 0).expect("valid"),
        })
    }

    #[test]
    fn row_in_celsius() {
        let row = weather_row(&tokyo(), TemperatureUnit::Celsius, &Utc);
        assert_eq!(
            row,
            "Tokyo                   14.8 °C  sunrise 09:41 PM  sunset 07:28 AM  icon 10n"
        );
    }

    #[test]
    fn row_in_kelvin() {
        let row = weather_row(&tokyo(), TemperatureUnit::Kelvin, &Utc);
        assert!(row.contains("287.9 K "));
    }

    #[test]
    fn error_row_names_city_and_cause() {
        let err = FetchError::DecodeFailed(DecodeError::EmptyArray("weather"));
        let row = error_row("Tokyo", &err);
        assert!(row.starts_with("Tokyo"));
        assert!(row.contains("array `weather` is empty"));
    }
}
