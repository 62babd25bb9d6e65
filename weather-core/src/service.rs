use async_trait::async_trait;
use reqwest::Client;
use std::fmt::Debug;
use tracing::{debug, instrument, warn};
use url::{Url, form_urlencoded};

use crate::{
    config::{Config, Endpoints},
    decode::decode_weather,
    error::FetchError,
    model::Weather,
};

/// Escape a single query component (`application/x-www-form-urlencoded`, space becomes `+`).
pub fn escape(component: &str) -> String {
    form_urlencoded::byte_serialize(component.as_bytes()).collect()
}

/// Build `<endpoint>?q=<city>&appid=<key>`, keeping any query the endpoint already has.
///
/// Pairs are encoded the same way as [`escape`].
pub fn weather_url(endpoint: &str, city: &str, api_key: &str) -> Result<Url, FetchError> {
    let city = city.trim();
    if city.is_empty() {
        return Err(FetchError::BadUrl("city name is empty".to_string()));
    }

    let mut url = Url::parse(endpoint)
        .map_err(|e| FetchError::BadUrl(format!("invalid weather endpoint '{endpoint}': {e}")))?;
    url.query_pairs_mut()
        .append_pair("q", city)
        .append_pair("appid", api_key);

    Ok(url)
}

/// Build `<endpoint>/<icon>.png`.
pub fn icon_url(endpoint: &str, icon: &str) -> Result<Url, FetchError> {
    let icon = icon.trim();
    if icon.is_empty() {
        return Err(FetchError::BadUrl("icon code is empty".to_string()));
    }

    let raw = format!("{}/{}.png", endpoint.trim_end_matches('/'), escape(icon));
    Url::parse(&raw).map_err(|e| FetchError::BadUrl(format!("invalid icon URL '{raw}': {e}")))
}

#[async_trait]
pub trait WeatherService: Send + Sync + Debug {
    /// Current weather for `city`. Exactly one request, no retry.
    async fn weather_by_city(&self, city: &str) -> Result<Weather, FetchError>;

    /// Raw bytes behind an arbitrary absolute URL.
    async fn fetch_image(&self, url: &str) -> Result<Vec<u8>, FetchError>;

    /// Image bytes for a provider icon code.
    async fn fetch_icon(&self, icon: &str) -> Result<Vec<u8>, FetchError>;
}

#[derive(Debug, Clone)]
pub struct OpenWeatherService {
    api_key: String,
    endpoints: Endpoints,
    http: Client,
}

impl OpenWeatherService {
    pub fn new(api_key: String, endpoints: Endpoints) -> Self {
        Self {
            api_key,
            endpoints,
            http: Client::new(),
        }
    }

    /// Construct the service from config; fails when no API key is available.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let api_key = config.api_key().ok_or_else(|| {
            anyhow::anyhow!(
                "No OpenWeather API key configured.\n\
                 Hint: run `cityweather configure` or set OPENWEATHER_API_KEY."
            )
        })?;

        Ok(Self::new(api_key, config.endpoints.clone()))
    }

    pub fn icon_url(&self, icon: &str) -> Result<Url, FetchError> {
        icon_url(&self.endpoints.icon, icon)
    }

    async fn get(&self, url: Url) -> Result<Vec<u8>, FetchError> {
        let res = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::NoData(e.to_string()))?;

        let status = res.status();
        let body = res
            .bytes()
            .await
            .map_err(|e| FetchError::NoData(format!("failed to read response body: {e}")))?;

        if body.is_empty() {
            return Err(FetchError::NoData(format!("empty response body (status {status})")));
        }

        if !status.is_success() {
            warn!(%status, "request failed");
            return Err(FetchError::Http {
                status: status.as_u16(),
                body: truncate_body(&String::from_utf8_lossy(&body)),
            });
        }

        debug!(bytes = body.len(), "response received");
        Ok(body.to_vec())
    }
}

#[async_trait]
impl WeatherService for OpenWeatherService {
    #[instrument(skip(self))]
    async fn weather_by_city(&self, city: &str) -> Result<Weather, FetchError> {
        let url = weather_url(&self.endpoints.weather, city, &self.api_key)?;
        debug!(host = url.host_str(), path = url.path(), "requesting current weather");

        let body = self.get(url).await?;
        let weather = decode_weather(&body).inspect_err(|e| warn!(error = %e, "undecodable payload"))?;

        Ok(weather)
    }

    #[instrument(skip(self))]
    async fn fetch_image(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let url = Url::parse(url).map_err(|e| FetchError::BadUrl(format!("'{url}': {e}")))?;
        self.get(url).await
    }

    #[instrument(skip(self))]
    async fn fetch_icon(&self, icon: &str) -> Result<Vec<u8>, FetchError> {
        let url = self.icon_url(icon)?;
        self.get(url).await
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
