use thiserror::Error;

/// Failure to turn a weather payload into a [`crate::Weather`].
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("payload is not a JSON object: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("missing or malformed field `{0}`")]
    MissingField(&'static str),

    #[error("array `{0}` is empty")]
    EmptyArray(&'static str),

    #[error("`{field}` is not a representable epoch timestamp: {value}")]
    InvalidTimestamp { field: &'static str, value: i64 },
}

/// Failure of a single weather or image request. Never retried.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("cannot build request URL: {0}")]
    BadUrl(String),

    #[error("no data received: {0}")]
    NoData(String),

    #[error("request failed with status {status}: {body}")]
    Http { status: u16, body: String },

    #[error("failed to decode weather payload: {0}")]
    DecodeFailed(#[from] DecodeError),
}

#[derive(Debug, Error)]
#[error("unknown temperature unit '{0}'. Supported units: kelvin, celsius, fahrenheit.")]
pub struct UnknownUnit(pub String);
