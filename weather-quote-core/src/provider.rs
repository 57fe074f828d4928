use crate::{
    Config, WeatherReading,
    category::Category,
    model::{Location, QuoteSource},
    provider::{openweather::OpenWeatherProvider, quotable::QuotableProvider, zenquotes::ZenQuotesProvider},
};
use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use std::fmt::Debug;

pub mod openweather;
pub mod quotable;
pub mod zenquotes;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderId {
    OpenWeather,
    Quotable,
    ZenQuotes,
}

impl ProviderId {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::OpenWeather => "openweather",
            ProviderId::Quotable => "quotable",
            ProviderId::ZenQuotes => "zenquotes",
        }
    }

    pub const fn all() -> &'static [ProviderId] {
        &[ProviderId::OpenWeather, ProviderId::Quotable, ProviderId::ZenQuotes]
    }

    pub fn default_base_url(&self) -> &'static str {
        match self {
            ProviderId::OpenWeather => "https://api.openweathermap.org",
            ProviderId::Quotable => "https://api.quotable.io",
            ProviderId::ZenQuotes => "https://zenquotes.io",
        }
    }

    pub fn requires_api_key(&self) -> bool {
        matches!(self, ProviderId::OpenWeather)
    }
}

impl std::fmt::Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ProviderId {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.to_lowercase();

        match lower.as_str() {
            "openweather" => Ok(ProviderId::OpenWeather),
            "quotable" => Ok(ProviderId::Quotable),
            "zenquotes" => Ok(ProviderId::ZenQuotes),
            _ => Err(anyhow::anyhow!(
                "Unknown provider '{value}'. Supported providers: openweather, quotable, zenquotes."
            )),
        }
    }
}

#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn current_weather(&self, location: &Location) -> anyhow::Result<WeatherReading>;
}

/// Quote text as returned by a provider, before it is tagged with its source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderQuote {
    pub text: String,
    pub author: String,
}

#[async_trait]
pub trait QuoteProvider: Send + Sync + Debug {
    /// Tag attached to quotes this provider supplies.
    fn source(&self) -> QuoteSource;

    async fn random_quote(&self, category: Category) -> anyhow::Result<ProviderQuote>;
}

/// Shared HTTP client for all providers, with the configured per-call timeout.
pub fn http_client(config: &Config) -> anyhow::Result<Client> {
    let mut builder = Client::builder();
    if let Some(timeout) = config.timeout() {
        builder = builder.timeout(timeout);
    }
    builder.build().context("Failed to build HTTP client")
}

/// The weather provider, or `None` when no API key is configured.
pub fn weather_provider_from_config(
    config: &Config,
    http: Client,
) -> Option<Box<dyn WeatherProvider>> {
    let api_key = config.provider_api_key(ProviderId::OpenWeather)?;

    Some(Box::new(OpenWeatherProvider::new(
        http,
        config.provider_base_url(ProviderId::OpenWeather),
        api_key.to_owned(),
        config.language.clone(),
    )))
}

/// Quote providers in the order they are tried.
pub fn quote_providers_from_config(config: &Config, http: Client) -> Vec<Box<dyn QuoteProvider>> {
    vec![
        Box::new(QuotableProvider::new(
            http.clone(),
            config.provider_base_url(ProviderId::Quotable),
        )),
        Box::new(ZenQuotesProvider::new(
            http,
            config.provider_base_url(ProviderId::ZenQuotes),
        )),
    ]
}

pub(crate) fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
