//! Decoding of the provider's current-weather payload.
//!
//! The wire shape is modelled by the `Raw*` records, where every field of
//! interest is optional and a value of the wrong JSON type reads as absent.
//! [`Weather::try_from`] then maps that record onto the flat [`Weather`],
//! naming the first field it could not find.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, de::DeserializeOwned};
use serde_json::Value;

use crate::{error::DecodeError, model::Weather};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawWeatherPayload {
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub main: Option<RawMain>,
    /// Conditions; the provider sends at least one. Elements stay untyped
    /// because only the first is read.
    #[serde(default, deserialize_with = "lenient")]
    pub weather: Option<Vec<Value>>,
    #[serde(default, deserialize_with = "lenient")]
    pub sys: Option<RawSys>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawMain {
    #[serde(default, deserialize_with = "lenient")]
    pub temp: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawCondition {
    #[serde(default, deserialize_with = "lenient")]
    pub main: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub icon: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSys {
    /// Unix seconds, UTC.
    #[serde(default, deserialize_with = "lenient")]
    pub sunrise: Option<i64>,
    /// Unix seconds, UTC.
    #[serde(default, deserialize_with = "lenient")]
    pub sunset: Option<i64>,
}

/// Reads any JSON value and keeps it only if it has the expected type.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| serde_json::from_value(v).ok()))
}

fn epoch_to_utc(field: &'static str, secs: i64) -> Result<DateTime<Utc>, DecodeError> {
    DateTime::from_timestamp(secs, 0).ok_or(DecodeError::InvalidTimestamp { field, value: secs })
}

impl TryFrom<RawWeatherPayload> for Weather {
    type Error = DecodeError;

    fn try_from(raw: RawWeatherPayload) -> Result<Self, Self::Error> {
        let city = raw.name.ok_or(DecodeError::MissingField("name"))?;

        let temperature = raw
            .main
            .and_then(|m| m.temp)
            .ok_or(DecodeError::MissingField("main.temp"))?;

        let conditions = raw.weather.ok_or(DecodeError::MissingField("weather"))?;
        let first = conditions
            .into_iter()
            .next()
            .ok_or(DecodeError::EmptyArray("weather"))?;
        let icon = serde_json::from_value::<RawCondition>(first)
            .ok()
            .and_then(|c| c.icon)
            .ok_or(DecodeError::MissingField("weather[0].icon"))?;

        let sys = raw.sys.unwrap_or_default();
        let sunrise = sys.sunrise.ok_or(DecodeError::MissingField("sys.sunrise"))?;
        let sunset = sys.sunset.ok_or(DecodeError::MissingField("sys.sunset"))?;

        Ok(Weather {
            city,
            temperature,
            icon,
            sunrise: epoch_to_utc("sys.sunrise", sunrise)?,
            sunset: epoch_to_utc("sys.sunset", sunset)?,
        })
    }
}

/// Decode a response body into a [`Weather`]. Pure; performs no I/O.
pub fn decode_weather(body: &[u8]) -> Result<Weather, DecodeError> {
    let raw: RawWeatherPayload = serde_json::from_slice(body)?;
    Weather::try_from(raw)
}
