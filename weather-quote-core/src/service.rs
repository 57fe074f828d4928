use chrono::{SecondsFormat, Utc};
use tracing::{info, instrument};

use crate::{
    Config,
    category::{Category, classify},
    error::{Error, Result},
    model::{CombinedResult, QuoteRefresh, WeatherReading, WeatherRequest, WeatherSummary},
    provider::{http_client, quote_providers_from_config, weather_provider_from_config},
    quote::QuoteLookup,
    weather::WeatherLookup,
};

/// Chains weather lookup, classification and quote lookup into one result.
#[derive(Debug)]
pub struct WeatherQuoteService {
    weather: WeatherLookup,
    quotes: QuoteLookup,
}

impl WeatherQuoteService {
    pub fn new(weather: WeatherLookup, quotes: QuoteLookup) -> Self {
        Self { weather, quotes }
    }

    /// Wire up providers from configuration. All providers share one HTTP
    /// client carrying the configured timeout.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let http = http_client(config)?;

        let weather = WeatherLookup::new(
            weather_provider_from_config(config, http.clone()),
            config.default_city.clone(),
        );
        let quotes = QuoteLookup::new(quote_providers_from_config(config, http));

        Ok(Self::new(weather, quotes))
    }

    pub fn weather_configured(&self) -> bool {
        self.weather.is_configured()
    }

    #[instrument(skip(self))]
    pub async fn fetch_combined(&self, request: &WeatherRequest) -> Result<CombinedResult> {
        let reading = self.weather.lookup(request).await;
        let category = classify(Some(&reading.condition_main));
        let quote = self.quotes.lookup(category).await;

        let weather = summarize(reading, category)?;
        let message = compose_message(&weather.condition);

        info!(
            location = %weather.location,
            %category,
            quote_source = ?quote.source,
            "assembled weather quote"
        );

        Ok(CombinedResult {
            weather,
            quote,
            timestamp: now_timestamp(),
            message,
        })
    }

    /// Fetch a new quote for a category the client already knows, without
    /// touching the weather provider.
    #[instrument(skip(self))]
    pub async fn fetch_quote_only(&self, category: Option<&str>) -> Result<QuoteRefresh> {
        let name = category
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .ok_or_else(|| Error::InvalidInput("weather category is required".to_string()))?;

        let quote = self.quotes.lookup(Category::from_name(name)).await;

        Ok(QuoteRefresh {
            quote,
            timestamp: now_timestamp(),
        })
    }
}

fn summarize(reading: WeatherReading, category: Category) -> Result<WeatherSummary> {
    Ok(WeatherSummary {
        temperature: round_temperature(reading.temperature_c)?,
        feels_like: round_temperature(reading.feels_like_c)?,
        location: reading.location_name,
        condition: reading.condition_main,
        description: reading.condition_description,
        category,
        source: reading.source,
    })
}

/// Round to the nearest integer, halves toward positive infinity.
fn round_temperature(value: f64) -> Result<i64> {
    let rounded = (value + 0.5).floor();
    if !rounded.is_finite() || rounded < i64::MIN as f64 || rounded > i64::MAX as f64 {
        return Err(Error::Unexpected(format!("temperature out of range: {value}")));
    }
    Ok(rounded as i64)
}

fn compose_message(condition: &str) -> String {
    if condition.to_lowercase().contains("rain") {
        "🌧️ Rainy days call for a rain-appropriate quote".to_string()
    } else {
        format!("{condition} weather quote, picked for you")
    }
}

fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
