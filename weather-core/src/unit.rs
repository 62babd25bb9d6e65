use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::error::UnknownUnit;

/// Display unit for temperatures. Payload temperatures are always Kelvin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureUnit {
    #[default]
    Kelvin,
    Celsius,
    Fahrenheit,
}

impl TemperatureUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            TemperatureUnit::Kelvin => "kelvin",
            TemperatureUnit::Celsius => "celsius",
            TemperatureUnit::Fahrenheit => "fahrenheit",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            TemperatureUnit::Kelvin => "K",
            TemperatureUnit::Celsius => "°C",
            TemperatureUnit::Fahrenheit => "°F",
        }
    }

    pub const fn all() -> &'static [TemperatureUnit] {
        &[
            TemperatureUnit::Kelvin,
            TemperatureUnit::Celsius,
            TemperatureUnit::Fahrenheit,
        ]
    }

    /// Resolve a stored preference value. Missing or unrecognised values fall back to Kelvin.
    pub fn from_preference(value: Option<&str>) -> Self {
        value.and_then(|v| v.parse().ok()).unwrap_or_default()
    }
}

impl fmt::Display for TemperatureUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TemperatureUnit {
    type Err = UnknownUnit;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "kelvin" => Ok(TemperatureUnit::Kelvin),
            "celsius" => Ok(TemperatureUnit::Celsius),
            "fahrenheit" => Ok(TemperatureUnit::Fahrenheit),
            other => Err(UnknownUnit(other.to_string())),
        }
    }
}

/// Convert a Kelvin reading into `unit`.
///
/// The Fahrenheit branch offsets by `273`, not `273.15`; displayed values
/// depend on that and it must stay as is.
pub fn convert(temp_kelvin: f64, unit: TemperatureUnit) -> f64 {
    match unit {
        TemperatureUnit::Kelvin => temp_kelvin,
        TemperatureUnit::Celsius => temp_kelvin - 273.15,
        TemperatureUnit::Fahrenheit => 1.8 * (temp_kelvin - 273.0) + 32.0,
    }
}
