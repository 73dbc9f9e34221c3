//! Current-weather lookups against OpenWeatherMap.
//!
//! Every failure is folded into a [`WeatherReport::Error`] so the assistant can explain
//! the problem to the user instead of the request failing.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::models::weather::{WeatherReport, WeatherSummary};
use crate::providers::configs::WeatherConfig;

const NOT_CONFIGURED: &str = "Weather API key not configured. Please set OPENWEATHER_API_KEY";
const MS_TO_KMH: f64 = 3.6;

/// Resolves a place name to its current weather
#[async_trait]
pub trait WeatherLookup: Send + Sync {
    async fn fetch(&self, city: &str) -> WeatherReport;
}

#[derive(Debug, Deserialize)]
struct CurrentWeatherResponse {
    name: String,
    #[serde(default)]
    sys: Sys,
    main: Main,
    #[serde(default)]
    weather: Vec<Condition>,
    wind: Wind,
}

#[derive(Debug, Default, Deserialize)]
struct Sys {
    #[serde(default)]
    country: String,
}

#[derive(Debug, Deserialize)]
struct Main {
    temp: f64,
    feels_like: f64,
    humidity: f64,
}

#[derive(Debug, Deserialize)]
struct Condition {
    main: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct Wind {
    speed: f64,
}

pub fn kmh_from_ms(speed: f64) -> i64 {
    (speed * MS_TO_KMH).round() as i64
}

impl TryFrom<CurrentWeatherResponse> for WeatherSummary {
    type Error = anyhow::Error;

    fn try_from(data: CurrentWeatherResponse) -> Result<Self> {
        let condition = data
            .weather
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("response has no weather conditions"))?;

        Ok(WeatherSummary {
            city: data.name,
            country: data.sys.country,
            temperature: data.main.temp.round() as i64,
            feels_like: data.main.feels_like.round() as i64,
            description: condition.description,
            humidity: data.main.humidity.round() as i64,
            wind_speed: kmh_from_ms(data.wind.speed),
            conditions: condition.main,
        })
    }
}

pub struct OpenWeatherClient {
    client: Client,
    config: WeatherConfig,
}

impl OpenWeatherClient {
    pub fn new(config: WeatherConfig) -> Result<Self> {
        let client = Client::builder().build()?;
        Ok(Self { client, config })
    }

    async fn current(&self, city: &str, api_key: &str) -> Result<WeatherReport> {
        let url = format!(
            "{}/data/2.5/weather",
            self.config.host.trim_end_matches('/')
        );

        // The key travels in the query string, so keep urls out of error text
        let response = self
            .client
            .get(&url)
            .query(&[("q", city), ("appid", api_key), ("units", "metric")])
            .send()
            .await
            .map_err(|e| anyhow!(e.without_url()))?;

        if !response.status().is_success() {
            debug!("Weather provider returned {} for {}", response.status(), city);
            return Ok(WeatherReport::error(format!(
                "Could not fetch weather for {}. Please check the city name.",
                city
            )));
        }

        let data: CurrentWeatherResponse = response
            .json()
            .await
            .map_err(|e| anyhow!(e.without_url()))?;

        Ok(WeatherSummary::try_from(data)?.into())
    }
}

#[async_trait]
impl WeatherLookup for OpenWeatherClient {
    async fn fetch(&self, city: &str) -> WeatherReport {
        let Some(api_key) = self.config.api_key.as_deref() else {
            warn!("Skipping weather lookup for {}: no API key", city);
            return WeatherReport::error(NOT_CONFIGURED);
        };

        match self.current(city, api_key).await {
            Ok(report) => report,
            Err(e) => {
                warn!("Weather lookup for {} failed: {}", city, e);
                let message = e.to_string();
                let message = if message.is_empty() {
                    "Unknown error".to_string()
                } else {
                    message
                };
                WeatherReport::error(format!("Failed to fetch weather data: {}", message))
            }
        }
    }
}
