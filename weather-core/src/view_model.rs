use chrono::{DateTime, TimeZone, Utc};
use std::fmt::Display;
use uuid::Uuid;

use crate::{model::Weather, unit::TemperatureUnit};

/// A list entry: a decoded [`Weather`] plus an identity that lives only as
/// long as the entry.
#[derive(Debug, Clone)]
pub struct WeatherViewModel {
    id: Uuid,
    weather: Weather,
}

impl WeatherViewModel {
    pub fn new(weather: Weather) -> Self {
        Self {
            id: Uuid::new_v4(),
            weather,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn weather(&self) -> &Weather {
        &self.weather
    }

    pub fn city(&self) -> &str {
        &self.weather.city
    }

    /// Kelvin, as received.
    pub fn temperature(&self) -> f64 {
        self.weather.temperature
    }

    /// Temperature in the caller's preferred unit.
    pub fn temperature_in(&self, unit: TemperatureUnit) -> f64 {
        self.weather.temperature_in(unit)
    }

    pub fn icon(&self) -> &str {
        &self.weather.icon
    }

    pub fn sunrise(&self) -> DateTime<Utc> {
        self.weather.sunrise
    }

    pub fn sunset(&self) -> DateTime<Utc> {
        self.weather.sunset
    }
}

impl From<Weather> for WeatherViewModel {
    fn from(weather: Weather) -> Self {
        Self::new(weather)
    }
}

/// `hh:mm AM` style clock time in the instant's own zone.
pub fn format_clock<Tz>(instant: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    instant.format("%I:%M %p").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    fn tokyo() -> Weather {
        Weather {
            city: "Tokyo".to_string(),
            temperature: 287.92,
            icon: "10n".to_string(),
            sunrise: DateTime::from_timestamp(1702330868, 0).expect("valid"),
            sunset: DateTime::from_timestamp(1702366096, 0).expect("valid"),
        }
    }

    #[test]
    fn accessors_project_weather() {
        let vm = WeatherViewModel::new(tokyo());

        assert_eq!(vm.city(), "Tokyo");
        assert_eq!(vm.temperature(), 287.92);
        assert_eq!(vm.icon(), "10n");
        assert_eq!(vm.sunrise().timestamp(), 1702330868);
        assert_eq!(vm.sunset().timestamp(), 1702366096);
        assert_eq!(vm.weather(), &tokyo());
    }

    #[test]
    fn temperature_in_uses_given_unit() {
        let vm = WeatherViewModel::new(tokyo());

        assert_eq!(vm.temperature_in(TemperatureUnit::Kelvin), 287.92);
        assert!((vm.temperature_in(TemperatureUnit::Celsius) - 14.77).abs() < 1e-9);
        assert!((vm.temperature_in(TemperatureUnit::Fahrenheit) - 58.856).abs() < 1e-9);
    }

    #[test]
    fn each_entry_gets_its_own_id() {
        let a = WeatherViewModel::new(tokyo());
        let b = WeatherViewModel::from(tokyo());
        assert_ne!(a.id(), b.id());
        assert_eq!(a.id(), a.clone().id());
    }

    #[test]
    fn format_clock_is_twelve_hour() {
        let vm = WeatherViewModel::new(tokyo());
        assert_eq!(format_clock(&vm.sunrise()), "09:41 PM");
        assert_eq!(format_clock(&vm.sunset()), "07:28 AM");

        let jst = FixedOffset::east_opt(9 * 3600).expect("valid offset");
        assert_eq!(format_clock(&vm.sunrise().with_timezone(&jst)), "06:41 AM");
    }
}
