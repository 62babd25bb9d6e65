use chrono::{DateTime, Utc};

use crate::unit::{TemperatureUnit, convert};

/// Current weather for one city, as kept by the view layer.
///
/// `sunrise <= sunset` is whatever the provider sent; nothing here checks it.
#[derive(Debug, Clone, PartialEq)]
pub struct Weather {
    pub city: String,
    /// Kelvin.
    pub temperature: f64,
    /// Provider icon code, e.g. `10n`.
    pub icon: String,
    pub sunrise: DateTime<Utc>,
    pub sunset: DateTime<Utc>,
}

impl Weather {
    pub fn temperature_in(&self, unit: TemperatureUnit) -> f64 {
        convert(self.temperature, unit)
    }
}
