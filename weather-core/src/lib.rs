//! Core library for the `cityweather` viewer.
//!
//! This crate defines:
//! - Decoding of the provider's current-weather payload into [`Weather`]
//! - Temperature unit conversion and the stored unit preference
//! - The HTTP wrapper fetching weather and icon images
//! - View models handed to the presentation layer
//!
//! It is used by the `cityweather` binary, but has no terminal or UI concerns of its own.

pub mod config;
pub mod decode;
pub mod error;
pub mod model;
pub mod service;
pub mod unit;
pub mod view_model;

pub use config::{Config, Endpoints};
pub use decode::{RawWeatherPayload, decode_weather};
pub use error::{DecodeError, FetchError, UnknownUnit};
pub use model::Weather;
pub use service::{OpenWeatherService, WeatherService};
pub use unit::{TemperatureUnit, convert};
pub use view_model::{WeatherViewModel, format_clock};
