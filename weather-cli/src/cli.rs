use anyhow::{Context, Result, anyhow, bail};
use chrono::Local;
use cityweather_core::{
    Config, OpenWeatherService, TemperatureUnit, WeatherService, WeatherViewModel,
};
use clap::{Parser, Subcommand};
use inquire::{Password, Select};
use std::{fs, path::PathBuf, sync::Arc};
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "cityweather", version, about = "Current weather for a list of cities")]
pub struct Cli {
    /// Log debug output to stderr (RUST_LOG takes precedence).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key and the preferred unit.
    Configure,

    /// Show current weather for one or more cities.
    Show {
        /// City names, e.g. "Tokyo" "New York".
        #[arg(required = true)]
        cities: Vec<String>,

        /// Display unit for this run only; defaults to the stored preference.
        #[arg(long)]
        unit: Option<TemperatureUnit>,
    },

    /// Print the stored temperature unit, or change it.
    Unit {
        /// kelvin, celsius or fahrenheit.
        unit: Option<TemperatureUnit>,
    },

    /// Download the image for a weather icon code.
    Icon {
        /// Icon code as reported by `show`, e.g. "10n".
        code: String,

        /// Where to write the image.
        #[arg(short, long)]
        output: PathBuf,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { cities, unit } => show(cities, unit).await,
            Command::Unit { unit } => set_or_print_unit(unit),
            Command::Icon { code, output } => download_icon(&code, output).await,
        }
    }
}

fn configure() -> Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("OpenWeather API key:")
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;
    if !api_key.trim().is_empty() {
        config.set_api_key(api_key.trim().to_string());
    }

    let current = config.unit();
    let cursor = TemperatureUnit::all()
        .iter()
        .position(|u| *u == current)
        .unwrap_or_default();
    let unit = Select::new("Temperature unit:", TemperatureUnit::all().to_vec())
        .with_starting_cursor(cursor)
        .prompt()
        .context("Failed to read temperature unit")?;
    config.set_unit(unit);

    config.save()?;
    println!("Configuration saved to {}", Config::config_file_path()?.display());
    Ok(())
}

async fn show(cities: Vec<String>, unit: Option<TemperatureUnit>) -> Result<()> {
    let config = Config::load()?;
    let unit = unit.unwrap_or_else(|| config.unit());
    let service: Arc<dyn WeatherService> = Arc::new(OpenWeatherService::from_config(&config)?);

    debug!(count = cities.len(), %unit, "fetching cities");
    let results = fetch_all(service, cities).await;

    let mut shown = 0;
    for (city, result) in &results {
        match result {
            Ok(vm) => {
                println!("{}", render::weather_row(vm, unit, &Local));
                shown += 1;
            }
            Err(err) => eprintln!("{}", render::error_row(city, err)),
        }
    }

    if shown == 0 {
        bail!("No weather could be fetched");
    }
    Ok(())
}

/// Fetch every city as an independent task; results come back in input order.
///
/// A task that dies without reporting still yields an error entry for its city.
pub(crate) async fn fetch_all(
    service: Arc<dyn WeatherService>,
    cities: Vec<String>,
) -> Vec<(String, Result<WeatherViewModel>)> {
    let mut slots: Vec<Option<Result<WeatherViewModel>>> = cities.iter().map(|_| None).collect();
    let mut tasks = JoinSet::new();

    for (idx, city) in cities.iter().cloned().enumerate() {
        let service = Arc::clone(&service);
        tasks.spawn(async move {
            let result = service.weather_by_city(&city).await.map(WeatherViewModel::new);
            (idx, result)
        });
    }

    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((idx, result)) => slots[idx] = Some(result.map_err(anyhow::Error::from)),
            Err(e) => warn!(error = %e, "weather task did not complete"),
        }
    }

    cities
        .into_iter()
        .zip(slots)
        .map(|(city, slot)| {
            let result = slot.unwrap_or_else(|| Err(anyhow!("weather task did not complete")));
            (city, result)
        })
        .collect()
}

fn set_or_print_unit(unit: Option<TemperatureUnit>) -> Result<()> {
    let mut config = Config::load()?;

    match unit {
        None => println!("{}", config.unit()),
        Some(unit) => {
            config.set_unit(unit);
            config.save()?;
            info!(%unit, "unit preference updated");
            println!("Temperature unit set to {unit}");
        }
    }

    Ok(())
}

async fn download_icon(code: &str, output: PathBuf) -> Result<()> {
    let config = Config::load()?;
    let service = OpenWeatherService::new(config.api_key().unwrap_or_default(), config.endpoints);

    let bytes = service
        .fetch_icon(code)
        .await
        .with_context(|| format!("Failed to download icon '{code}'"))?;

    fs::write(&output, &bytes)
        .with_context(|| format!("Failed to write icon to {}", output.display()))?;

    println!("Saved {} bytes to {}", bytes.len(), output.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::DateTime;
    use cityweather_core::{FetchError, Weather};
    use std::time::Duration;

    #[derive(Debug)]
    struct FakeService;

    #[async_trait]
    impl WeatherService for FakeService {
        async fn weather_by_city(&self, city: &str) -> Result<Weather, FetchError> {
            // Earlier cities finish later so completion order differs from input order.
            let delay = match city {
                "Tokyo" => 30,
                "Oslo" => 10,
                _ => 0,
            };
            tokio::time::sleep(Duration::from_millis(delay)).await;

            match city {
                "Tokyo" | "Oslo" => Ok(Weather {
                    city: city.to_string(),
                    temperature: 280.0,
                    icon: "01d".to_string(),
                    sunrise: DateTime::from_timestamp(1702330868, 0).expect("valid"),
                    sunset: DateTime::from_timestamp(1702366096, 0).expect("valid"),
                }),
                "Crash" => panic!("service blew up"),
                _ => Err(FetchError::NoData("unknown city".to_string())),
            }
        }

        async fn fetch_image(&self, _url: &str) -> Result<Vec<u8>, FetchError> {
            Ok(Vec::new())
        }

        async fn fetch_icon(&self, _icon: &str) -> Result<Vec<u8>, FetchError> {
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn fetch_all_keeps_input_order() {
        let cities = vec!["Tokyo".to_string(), "Atlantis".to_string(), "Oslo".to_string()];
        let results = fetch_all(Arc::new(FakeService), cities).await;

        let names: Vec<&str> = results.iter().map(|(c, _)| c.as_str()).collect();
        assert_eq!(names, ["Tokyo", "Atlantis", "Oslo"]);

        assert!(results[0].1.is_ok());
        let err = results[1].1.as_ref().unwrap_err();
        assert!(matches!(err.downcast_ref::<FetchError>(), Some(FetchError::NoData(_))));
        assert_eq!(results[2].1.as_ref().map(|vm| vm.city()).ok(), Some("Oslo"));
    }

    #[tokio::test]
    async fn fetch_all_reports_tasks_that_die() {
        let cities = vec!["Oslo".to_string(), "Crash".to_string()];
        let results = fetch_all(Arc::new(FakeService), cities).await;

        assert_eq!(results.len(), 2);
        assert!(results[0].1.is_ok());
        assert_eq!(results[1].0, "Crash");
        let err = results[1].1.as_ref().unwrap_err();
        assert!(err.to_string().contains("did not complete"));

        let row = crate::render::error_row(&results[1].0, err);
        assert!(row.starts_with("Crash"));
    }

    #[tokio::test]
    async fn fetch_all_with_no_cities() {
        let results = fetch_all(Arc::new(FakeService), Vec::new()).await;
        assert!(results.is_empty());
    }

    #[test]
    fn parses_show_with_unit() {
        let cli = Cli::try_parse_from(["cityweather", "show", "Tokyo", "New York", "--unit", "celsius"])
            .expect("valid args");

        match cli.command {
            Command::Show { cities, unit } => {
                assert_eq!(cities, ["Tokyo", "New York"]);
                assert_eq!(unit, Some(TemperatureUnit::Celsius));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn rejects_unknown_unit() {
        let err = Cli::try_parse_from(["cityweather", "unit", "rankine"]).unwrap_err();
        assert!(err.to_string().contains("rankine"));
    }

    #[test]
    fn show_requires_a_city() {
        assert!(Cli::try_parse_from(["cityweather", "show"]).is_err());
    }
}
