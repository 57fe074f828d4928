use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::model::{Location, WeatherReading, WeatherSource};

use super::{WeatherProvider, join_url, truncate_body};

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    http: Client,
    base_url: String,
    api_key: String,
    language: String,
}

impl OpenWeatherProvider {
    pub fn new(http: Client, base_url: &str, api_key: String, language: String) -> Self {
        Self {
            http,
            base_url: base_url.to_string(),
            api_key,
            language,
        }
    }

    fn location_query(location: &Location) -> Vec<(&'static str, String)> {
        match location {
            Location::City(city) => vec![("q", city.clone())],
            Location::Coordinates(c) => vec![("lat", c.lat.to_string()), ("lon", c.lon.to_string())],
        }
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: f64,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    main: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    main: OwMain,
    weather: Vec<OwWeather>,
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn current_weather(&self, location: &Location) -> Result<WeatherReading> {
        let url = join_url(&self.base_url, "data/2.5/weather");
        debug!(?location, "requesting current weather from OpenWeather");

        let res = self
            .http
            .get(&url)
            .query(&Self::location_query(location))
            .query(&[
                ("appid", self.api_key.as_str()),
                ("units", "metric"),
                ("lang", self.language.as_str()),
            ])
            .send()
            .await
            .context("Failed to send request to OpenWeather (current weather)")?;

        let status = res.status();
        let body = res
            .text()
            .await
            .context("Failed to read OpenWeather current response body")?;

        if !status.is_success() {
            return Err(anyhow!(
                "OpenWeather current request failed with status {}: {}",
                status,
                truncate_body(&body),
            ));
        }

        let parsed: OwCurrentResponse =
            serde_json::from_str(&body).context("Failed to parse OpenWeather current JSON")?;

        let condition = parsed
            .weather
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("OpenWeather response contained no weather condition"))?;

        Ok(WeatherReading {
            location_name: parsed.name,
            temperature_c: parsed.main.temp,
            feels_like_c: parsed.main.feels_like,
            condition_main: condition.main,
            condition_description: condition.description,
            source: WeatherSource::Live,
        })
    }
}
